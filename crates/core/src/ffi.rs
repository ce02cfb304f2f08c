//! C FFI bindings for the node and wallet

use crate::{DIGEST_SIZE, Msha3, TableConfig};
use core::slice;
use std::ffi::{CStr, c_char};

/// Opaque hasher handle for FFI
pub struct MHasher {
    inner: Msha3,
}

/// Create a hasher without a table
/// Returns a pointer to the hasher (caller must free with msha3_free)
#[unsafe(no_mangle)]
pub extern "C" fn msha3_new() -> *mut MHasher {
    Box::into_raw(Box::new(MHasher {
        inner: Msha3::new(),
    }))
}

/// Create a hasher, loading or building `pages` table pages under `dir`
/// - dir: NUL-terminated UTF-8 path
/// Returns null if the path is invalid or the table cannot be built
#[unsafe(no_mangle)]
pub extern "C" fn msha3_new_with_table(dir: *const c_char, pages: usize) -> *mut MHasher {
    if dir.is_null() {
        return core::ptr::null_mut();
    }

    let dir = match unsafe { CStr::from_ptr(dir) }.to_str() {
        Ok(dir) => dir,
        Err(_) => return core::ptr::null_mut(),
    };

    match Msha3::initialize(&TableConfig::new(dir, pages)) {
        Ok(inner) => Box::into_raw(Box::new(MHasher { inner })),
        Err(e) => {
            log::error!("{e}");
            core::ptr::null_mut()
        }
    }
}

/// Free a hasher instance
#[unsafe(no_mangle)]
pub extern "C" fn msha3_free(hasher: *mut MHasher) {
    if !hasher.is_null() {
        unsafe {
            let _ = Box::from_raw(hasher);
        }
    }
}

/// Compute the SHA3-512 digest of input data
/// - input: pointer to input bytes (may be null when input_len is 0)
/// - output: pointer to a 64-byte buffer for the result
/// Returns false if a required pointer is null
#[unsafe(no_mangle)]
pub extern "C" fn msha3_plain(input: *const u8, input_len: usize, output: *mut u8) -> bool {
    let Some(input) = input_slice(input, input_len) else {
        return false;
    };
    if output.is_null() {
        return false;
    }

    let digest = crate::plain_digest(input);
    unsafe { slice::from_raw_parts_mut(output, DIGEST_SIZE) }.copy_from_slice(&digest);
    true
}

/// Compute the memory-hardened digest of input data
/// - hasher: pointer from msha3_new() or msha3_new_with_table()
/// - output: pointer to a 64-byte buffer for the result
/// Returns false if a required pointer is null
#[unsafe(no_mangle)]
pub extern "C" fn msha3_extended(
    hasher: *const MHasher,
    input: *const u8,
    input_len: usize,
    output: *mut u8,
) -> bool {
    if hasher.is_null() || output.is_null() {
        return false;
    }
    let Some(input) = input_slice(input, input_len) else {
        return false;
    };

    let hasher = unsafe { &*hasher };
    let digest = hasher.inner.extended(input);
    unsafe { slice::from_raw_parts_mut(output, DIGEST_SIZE) }.copy_from_slice(&digest);
    true
}

/// Read the feedback counters: calls, hits, misses
#[unsafe(no_mangle)]
pub extern "C" fn msha3_stats(
    hasher: *const MHasher,
    calls: *mut u64,
    hits: *mut u64,
    misses: *mut u64,
) -> bool {
    if hasher.is_null() || calls.is_null() || hits.is_null() || misses.is_null() {
        return false;
    }

    let stats = unsafe { &*hasher }.inner.stats();
    unsafe {
        *calls = stats.calls;
        *hits = stats.hits;
        *misses = stats.misses;
    }
    true
}

fn input_slice<'a>(input: *const u8, input_len: usize) -> Option<&'a [u8]> {
    if input_len == 0 {
        return Some(&[]);
    }
    if input.is_null() {
        return None;
    }
    Some(unsafe { slice::from_raw_parts(input, input_len) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{extended_digest, plain_digest};

    #[test]
    fn test_ffi_digests_match_rust_api() {
        let input = b"ffi input";
        let mut out = [0u8; DIGEST_SIZE];

        assert!(msha3_plain(input.as_ptr(), input.len(), out.as_mut_ptr()));
        assert_eq!(out, plain_digest(input));

        let hasher = msha3_new();
        assert!(msha3_extended(hasher, input.as_ptr(), input.len(), out.as_mut_ptr()));
        assert_eq!(out, extended_digest(input));

        let (mut calls, mut hits, mut misses) = (0u64, 0u64, 0u64);
        assert!(msha3_stats(hasher, &mut calls, &mut hits, &mut misses));
        // Shorter than one block: only the padding permutation runs
        assert_eq!((calls, hits, misses), (24, 0, 24));

        msha3_free(hasher);
    }

    #[test]
    fn test_ffi_rejects_null_pointers() {
        let mut out = [0u8; DIGEST_SIZE];
        assert!(!msha3_plain(core::ptr::null(), 4, out.as_mut_ptr()));
        assert!(!msha3_plain(b"abcd".as_ptr(), 4, core::ptr::null_mut()));
        assert!(!msha3_extended(core::ptr::null(), b"".as_ptr(), 0, out.as_mut_ptr()));
        assert!(msha3_new_with_table(core::ptr::null(), 1).is_null());

        // Empty input may come with a null pointer
        assert!(msha3_plain(core::ptr::null(), 0, out.as_mut_ptr()));
        assert_eq!(out, plain_digest(b""));

        msha3_free(core::ptr::null_mut());
    }
}
