//! Table construction errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure while loading or persisting the precomputed table
///
/// Construction stops at the first error; no partially built table is
/// handed out.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to create table directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read table page {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write table page {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to move table page into place at {}: {source}", .path.display())]
    Rename {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TableError {
    /// File or directory the failed operation targeted
    pub fn path(&self) -> &std::path::Path {
        match self {
            TableError::CreateDir { path, .. }
            | TableError::Read { path, .. }
            | TableError::Write { path, .. }
            | TableError::Rename { path, .. } => path,
        }
    }
}
