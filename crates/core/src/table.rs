//! Precomputed feedback table
//!
//! `pages[p][i] == fallback_hash(p * PAGE_ENTRIES + i)` for every resident
//! entry. The table is built once and never mutated, so a shared reference
//! can be read from any number of threads.

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::feedback::fallback_hash;
use crate::params::PAGE_ENTRIES;

/// One page: exactly [`PAGE_ENTRIES`] values
pub type Page = Box<[u64]>;

/// Paged cache of [`fallback_hash`] over `0..page_count * PAGE_ENTRIES`
#[derive(Clone, Default)]
pub struct PrecomputedTable {
    pages: Vec<Page>,
}

impl PrecomputedTable {
    /// Table with no pages; every resolution falls back to hashing
    pub const fn empty() -> Self {
        Self { pages: Vec::new() }
    }

    /// Compute `page_count` pages in memory without touching disk
    pub fn compute(page_count: usize) -> Self {
        let pages = (0..page_count).map(compute_page).collect();
        Self { pages }
    }

    /// Assemble a table from pages the caller already has
    ///
    /// # Panics
    ///
    /// If any page does not hold exactly [`PAGE_ENTRIES`] values.
    pub fn from_pages(pages: Vec<Page>) -> Self {
        for (index, page) in pages.iter().enumerate() {
            assert_eq!(
                page.len(),
                PAGE_ENTRIES,
                "page {index} has {} entries, expected {PAGE_ENTRIES}",
                page.len()
            );
        }
        Self { pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of indices the table answers
    pub fn covered(&self) -> u64 {
        (self.pages.len() as u64).saturating_mul(PAGE_ENTRIES as u64)
    }

    pub fn page(&self, page: usize) -> Option<&[u64]> {
        self.pages.get(page).map(|entries| &entries[..])
    }

    /// Cached value for `index`, or `None` outside the covered range
    #[inline(always)]
    pub fn get(&self, index: u64) -> Option<u64> {
        if index >= self.covered() {
            return None;
        }
        let page = (index / PAGE_ENTRIES as u64) as usize;
        let slot = (index % PAGE_ENTRIES as u64) as usize;
        Some(self.pages[page][slot])
    }

    /// Cached value for `index`
    ///
    /// # Panics
    ///
    /// If `index` is outside the covered range. Callers route such indices
    /// to [`fallback_hash`] instead.
    pub fn lookup(&self, index: u64) -> u64 {
        match self.get(index) {
            Some(value) => value,
            None => panic!(
                "table lookup out of range: index {index}, covered {}",
                self.covered()
            ),
        }
    }
}

impl core::fmt::Debug for PrecomputedTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PrecomputedTable")
            .field("pages", &self.pages.len())
            .field("covered", &self.covered())
            .finish()
    }
}

/// Compute every entry of page `page`
#[cfg(feature = "parallel")]
pub fn compute_page(page: usize) -> Page {
    let base = (page as u64) * PAGE_ENTRIES as u64;
    let mut entries = vec![0u64; PAGE_ENTRIES].into_boxed_slice();
    entries
        .par_iter_mut()
        .enumerate()
        .for_each(|(slot, entry)| *entry = fallback_hash(base + slot as u64));
    entries
}

/// Compute every entry of page `page` (sequential fallback)
#[cfg(not(feature = "parallel"))]
pub fn compute_page(page: usize) -> Page {
    let base = (page as u64) * PAGE_ENTRIES as u64;
    (0..PAGE_ENTRIES as u64)
        .map(|slot| fallback_hash(base + slot))
        .collect()
}

/// Spot-check `samples` evenly spaced entries of a page against the
/// fallback hash. The last entry is always checked, the first one too once
/// `samples >= 2`.
pub fn verify_page(page: usize, entries: &[u64], samples: usize) -> bool {
    if entries.len() != PAGE_ENTRIES {
        return false;
    }
    let base = (page as u64) * PAGE_ENTRIES as u64;
    sample_slots(samples).all(|slot| entries[slot] == fallback_hash(base + slot as u64))
}

fn sample_slots(samples: usize) -> impl Iterator<Item = usize> {
    let last = PAGE_ENTRIES - 1;
    let step = if samples > 1 { last / (samples - 1) } else { 0 };
    (0..samples).map(move |i| if i + 1 == samples { last } else { i * step })
}
