//! Page-file persistence for the precomputed table
//!
//! Each page is stored as `<dir>/<page>.bin`: 2^20 little-endian u64 values,
//! 8 MiB, no header. Files of any other size are treated as missing.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info, warn};

use crate::error::TableError;
use crate::params::{DEFAULT_VERIFY_SAMPLES, PAGE_BYTES, PAGE_ENTRIES};
use crate::table::{Page, PrecomputedTable, compute_page, verify_page};

/// Directory name used when nothing else is configured
pub const DEFAULT_TABLE_DIR: &str = "mSHA3precomp";

/// Where and how large the persisted table is
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableConfig {
    /// Directory holding the page files
    pub dir: PathBuf,
    /// Number of 8 MiB pages to keep resident
    pub page_count: usize,
    /// Entries recomputed to validate each loaded page (0 disables)
    pub verify_samples: usize,
}

impl TableConfig {
    pub fn new(dir: impl Into<PathBuf>, page_count: usize) -> Self {
        Self {
            dir: dir.into(),
            page_count,
            verify_samples: DEFAULT_VERIFY_SAMPLES,
        }
    }

    pub fn with_verify_samples(mut self, verify_samples: usize) -> Self {
        self.verify_samples = verify_samples;
        self
    }

    /// Path of the file backing page `page`
    pub fn page_path(&self, page: usize) -> PathBuf {
        self.dir.join(format!("{page}.bin"))
    }

    /// Resident memory of the configured table in bytes
    pub fn memory_bytes(&self) -> usize {
        self.page_count * PAGE_BYTES
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE_DIR, 1)
    }
}

impl PrecomputedTable {
    /// Load every configured page from disk, computing and persisting the
    /// ones that are missing, truncated or fail spot verification
    ///
    /// Blocks until all pages are resident. The first I/O error aborts the
    /// whole construction.
    pub fn load_or_build(config: &TableConfig) -> Result<Self, TableError> {
        fs::create_dir_all(&config.dir).map_err(|source| TableError::CreateDir {
            path: config.dir.clone(),
            source,
        })?;

        let total = config.page_count;
        let start = Instant::now();
        let mut pages = Vec::with_capacity(total);

        for page in 0..total {
            let path = config.page_path(page);

            let loaded = match read_page(&path)? {
                Some(entries) if verify_page(page, &entries, config.verify_samples) => {
                    info!("Loading hash table page {} of {}...", page + 1, total);
                    Some(entries)
                }
                Some(_) => {
                    warn!(
                        "Table page {} failed verification, recomputing",
                        path.display()
                    );
                    None
                }
                None => None,
            };

            let entries = match loaded {
                Some(entries) => entries,
                None => {
                    info!("Filling hash table page {} of {}...", page + 1, total);
                    let page_start = Instant::now();
                    let entries = compute_page(page);
                    debug!("Page {} computed in {:?}", page, page_start.elapsed());
                    write_page(&path, &entries)?;
                    entries
                }
            };

            pages.push(entries);
        }

        debug!("Table of {} pages ready in {:?}", total, start.elapsed());
        Ok(PrecomputedTable::from_pages(pages))
    }
}

/// Read one page file
///
/// Returns `Ok(None)` when the file does not exist or has the wrong size.
/// The size is checked before anything is read.
pub fn read_page(path: &Path) -> Result<Option<Page>, TableError> {
    let read_error = |source: io::Error| TableError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(read_error(source)),
    };

    let len = file.metadata().map_err(read_error)?.len();
    if len != PAGE_BYTES as u64 {
        warn!(
            "Ignoring table page {}: {} bytes, expected {}",
            path.display(),
            len,
            PAGE_BYTES
        );
        return Ok(None);
    }

    let mut bytes = vec![0u8; PAGE_BYTES];
    file.read_exact(&mut bytes).map_err(read_error)?;

    Ok(Some(decode_page(&bytes)))
}

/// Write one page file through a temporary file and a rename
pub fn write_page(path: &Path, entries: &[u64]) -> Result<(), TableError> {
    debug_assert_eq!(entries.len(), PAGE_ENTRIES);

    let tmp = path.with_extension("bin.tmp");
    let result = fs::write(&tmp, encode_page(entries))
        .map_err(|source| TableError::Write {
            path: tmp.clone(),
            source,
        })
        .and_then(|()| {
            fs::rename(&tmp, path).map_err(|source| TableError::Rename {
                path: path.to_path_buf(),
                source,
            })
        });

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn encode_page(entries: &[u64]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(entries.len() * 8);
    for entry in entries {
        bytes.extend_from_slice(&entry.to_le_bytes());
    }
    bytes
}

fn decode_page(bytes: &[u8]) -> Page {
    bytes
        .chunks_exact(8)
        .map(|chunk| {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            u64::from_le_bytes(word)
        })
        .collect()
}
