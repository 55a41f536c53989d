//! In-memory storage backend for testing.

use super::FileInfoStream;
use crate::StorageBackend;
use crate::error::{ErrorKind, Result};
use crate::file::FileInfo;
use crate::path::validate as validate_path;
use async_stream::stream;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// In-memory storage backend for testing.
///
/// Files are stored in a `HashMap` behind a [`RwLock`], so all trait methods
/// operate on `&self` without external synchronisation. Listings and reads
/// are counted, which lets tests assert how often a consumer actually went
/// to storage.
///
/// # Examples
///
/// ```
/// use syllabus_storage::backend::{MockBackend, StorageBackend};
/// use std::path::Path;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = MockBackend::with_files([
///     ("go-basics.json", b"{}"),
/// ]);
/// assert_eq!(backend.read(Path::new("go-basics.json")).await?, b"{}");
/// assert_eq!(backend.list().await?.len(), 1);
/// assert_eq!(backend.list_count(), 1);
/// # Ok(())
/// # }
/// ```
pub struct MockBackend {
    name: String,
    storage: RwLock<HashMap<PathBuf, Vec<u8>>>,
    lists: AtomicUsize,
    reads: AtomicUsize,
}

impl MockBackend {
    /// Create a mock backend pre-populated with files.
    ///
    /// Panics if any path fails validation (traversal, nested paths). If
    /// test setup is wrong, then test should not pass.
    pub fn with_files(files: impl IntoIterator<Item = (impl Into<PathBuf>, impl Into<Vec<u8>>)>) -> Self {
        let mut map = HashMap::new();
        for (path, data) in files {
            let path = path.into();
            let Ok(validated) = validate_path(&path) else {
                // The panic here is DELIBERATE. MockBackend is intended to be
                // used in tests; there is no error result.
                panic!("MockBackend::with_files: invalid path {}", path.display());
            };
            map.insert(validated, data.into());
        }
        Self {
            name: "mock".to_string(),
            storage: RwLock::new(map),
            lists: AtomicUsize::new(0),
            reads: AtomicUsize::new(0),
        }
    }

    /// Add or replace a file after construction, e.g. to simulate storage
    /// changing underneath a consumer that has already loaded.
    pub async fn insert(&self, path: impl AsRef<Path>, data: impl Into<Vec<u8>>) -> Result<()> {
        let path = validate_path(path)?;
        self.storage.write().await.insert(path, data.into());
        Ok(())
    }

    /// Number of times a listing has been started.
    pub fn list_count(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    /// Number of successful and failed reads.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}
impl Default for MockBackend {
    fn default() -> Self {
        let files: [(&str, &str); 0] = [];
        Self::with_files(files)
    }
}

#[async_trait]
impl StorageBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_stream(&self) -> FileInfoStream<'_> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        Box::pin(stream! {
            // Snapshot under the read lock, then drop it before yielding to
            // avoid holding the lock across yield points.
            let entries: Vec<FileInfo> = {
                let guard = self.storage.read().await;
                guard
                    .iter()
                    .map(|(path, data)| FileInfo::new(path.clone(), data.len() as u64))
                    .collect()
            };
            for info in entries {
                yield Ok(info);
            }
        })
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let path = validate_path(path)?;
        let data = self.storage.read().await.get(&path).cloned();
        data.ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_files() {
        let backend = MockBackend::with_files([
            ("go-basics.json", Vec::from(*b"{}")),
            ("web.json.gz", Vec::from(*b"gz")),
        ]);
        let mut listing = backend.list().await.unwrap();
        listing.sort_by(|a, b| a.path.cmp(&b.path));
        assert_eq!(listing, vec![FileInfo::new("go-basics.json", 2), FileInfo::new("web.json.gz", 2)]);
        assert_eq!(backend.read(Path::new("web.json.gz")).await.unwrap(), b"gz");
    }

    #[tokio::test]
    async fn test_insert_and_read() {
        let backend = MockBackend::default();
        backend.insert("late.json", b"hello".to_vec()).await.unwrap();
        assert_eq!(backend.read(Path::new("late.json")).await.unwrap(), b"hello");
        assert_eq!(backend.read_count(), 1);
    }

    #[tokio::test]
    async fn test_read_not_found() {
        let backend = MockBackend::default();
        let err = backend.read(Path::new("missing.json")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_counts_calls() {
        let backend = MockBackend::with_files([("a.json", Vec::from(*b"1")), ("b.json", Vec::from(*b"2"))]);
        assert_eq!(backend.list_count(), 0);
        assert_eq!(backend.list().await.unwrap().len(), 2);
        assert_eq!(backend.list().await.unwrap().len(), 2);
        assert_eq!(backend.list_count(), 2);
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let backend = MockBackend::default();
        assert!(backend.read(Path::new("../etc/passwd")).await.is_err());
        assert!(backend.insert("../escape", b"bad".to_vec()).await.is_err());
        assert!(backend.insert("nested/file.json", b"bad".to_vec()).await.is_err());
    }

    #[test]
    #[should_panic(expected = "invalid path")]
    fn test_with_files_panics_on_bad_path() {
        MockBackend::with_files([("../escape", Vec::from(*b"bad"))]);
    }
}
