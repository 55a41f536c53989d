//! Record file metadata returned by storage backends.

use std::path::PathBuf;

/// File metadata returned by storage backends.
///
/// Only entries that sit directly in the storage root are ever described by
/// a [`FileInfo`], so `path` is always a single file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// File name relative to the storage root
    pub path: PathBuf,
    /// File size in bytes at listing time
    pub size: u64,
}
impl FileInfo {
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        Self { path: path.into(), size }
    }
}
