//! Local filesystem storage backend.
//!
//! Reads record files from a single directory on the local filesystem using
//! `tokio::fs` for async I/O.

use crate::backend::FileInfoStream;
use crate::error::ErrorKind;
use crate::{FileInfo, StorageBackend, error::Result, path::validate as validate_path};
use async_stream::stream;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{self, DirEntry, ReadDir};

/// Local filesystem storage backend.
///
/// Exposes the files directly inside a root directory. All paths are file
/// names relative to that root.
///
/// # Examples
///
/// ```no_run
/// use syllabus_storage::backend::LocalBackend;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = LocalBackend::new("courses", "/srv/syllabus/courses")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct LocalBackend {
    name: String,
    /// Directory holding the record files
    root: PathBuf,
}
impl LocalBackend {
    /// Create a new local filesystem backend.
    ///
    /// The root is not touched until the first listing: a missing directory
    /// lists as empty, and a root that is not a directory fails the listing.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPath`](ErrorKind::InvalidPath) if the path is not
    /// absolute.
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        Ok(Self { name: name.into(), root })
    }

    /// Validates the path and joins it with the root directory.
    fn absolute_path(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let validated = validate_path(path.as_ref())?;
        Ok(self.root.join(validated))
    }

    fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }

    /// Opens the root for listing. `Ok(None)` when the root doesn't exist.
    async fn open_root(&self) -> Result<Option<ReadDir>> {
        match fs::read_dir(&self.root).await {
            Ok(entries) => Ok(Some(entries)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(backend = %self.name, root = %self.root.display(), "Storage root does not exist");
                Ok(None)
            },
            Err(err) => exn::bail!(Self::map_io_error(err, &self.root)),
        }
    }

    /// Keeps the `?` operator usable for a single entry inside the listing
    /// stream, where errors have to be yielded instead.
    async fn process_entry(&self, entry: DirEntry) -> Result<Option<FileInfo>> {
        let path = entry.path();
        // Follows symlinks, so a linked record file counts as a file.
        let metadata = fs::metadata(&path).await.map_err(|e| Self::map_io_error(e, &path))?;
        if metadata.is_dir() {
            tracing::trace!(backend = %self.name, path = %path.display(), "Skipping sub-directory");
            return Ok(None);
        }
        if !metadata.is_file() {
            return Ok(None);
        }
        Ok(Some(FileInfo::new(entry.file_name(), metadata.len())))
    }
}

#[async_trait]
impl StorageBackend for LocalBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_stream(&self) -> FileInfoStream<'_> {
        Box::pin(stream! {
            let mut entries = match self.open_root().await {
                Ok(Some(entries)) => Some(entries),
                Ok(None) => None,
                Err(e) => {
                    yield Err(e);
                    None
                },
            };
            while let Some(dir) = entries.as_mut() {
                let entry = match dir.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    // The directory handle is in an unknown state now; bail
                    // out rather than spin on the same error.
                    Err(e) => {
                        yield Err(exn::Exn::from(Self::map_io_error(e, &self.root)));
                        break;
                    },
                };
                match self.process_entry(entry).await {
                    Ok(Some(info)) => yield Ok(info),
                    Ok(None) => {},
                    Err(e) => yield Err(e),
                }
            }
        })
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let abs_path = self.absolute_path(path)?;
        Ok(fs::read(&abs_path).await.map_err(|e| Self::map_io_error(e, path))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::fs as sync_fs;

    fn backend_with(files: &[(&str, &[u8])]) -> (tempfile::TempDir, LocalBackend) {
        let temp_dir = tempfile::tempdir().unwrap();
        for (name, data) in files {
            let path = temp_dir.path().join(name);
            if let Some(parent) = path.parent() {
                sync_fs::create_dir_all(parent).unwrap();
            }
            sync_fs::write(path, data).unwrap();
        }
        let backend = LocalBackend::new("local", temp_dir.path()).unwrap();
        (temp_dir, backend)
    }

    #[test]
    fn test_new_requires_absolute_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(LocalBackend::new("name", temp_dir.path()).is_ok());
        assert!(LocalBackend::new("name", "relative/path").is_err());
        assert!(LocalBackend::new("name", "./relative").is_err());
    }

    #[tokio::test]
    async fn test_file_root_fails_listing() {
        let (temp_dir, _) = backend_with(&[("file.json", b"{}")]);
        let backend = LocalBackend::new("name", temp_dir.path().join("file.json")).unwrap();
        let mut stream = backend.list_stream();
        assert!(stream.next().await.unwrap().is_err());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_missing_root_lists_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("name", temp_dir.path().join("not-created-yet")).unwrap();
        assert!(backend.list().await.unwrap().is_empty());
    }

    #[test]
    fn test_absolute_path() {
        let (temp_dir, backend) = backend_with(&[]);
        let expected = temp_dir.path().join("go-basics.json");
        assert_eq!(backend.absolute_path("go-basics.json").unwrap(), expected);
        assert!(backend.absolute_path("../etc/passwd").is_err());
        assert!(backend.absolute_path("nested/go-basics.json").is_err());
    }

    #[tokio::test]
    async fn test_read() {
        let (_temp_dir, backend) = backend_with(&[("go-basics.json", b"{\"id\":\"go-basics\"}")]);
        let data = backend.read(Path::new("go-basics.json")).await.unwrap();
        assert_eq!(data, b"{\"id\":\"go-basics\"}");
    }

    #[tokio::test]
    async fn test_read_not_found() {
        let (_temp_dir, backend) = backend_with(&[]);
        let err = backend.read(Path::new("missing.json")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_reports_size() {
        let data = b"{\"id\":\"web\"}";
        let (_temp_dir, backend) = backend_with(&[("web.json", data)]);
        let listing = backend.list().await.unwrap();
        assert_eq!(listing, vec![FileInfo::new("web.json", data.len() as u64)]);
    }

    #[tokio::test]
    async fn test_list_skips_sub_directories() {
        let (_temp_dir, backend) = backend_with(&[
            ("go-basics.json", b"{}"),
            ("web.json.gz", b"{}"),
            ("drafts/unpublished.json", b"{}"),
        ]);
        let mut names: Vec<_> = backend.list().await.unwrap().into_iter().map(|f| f.path).collect();
        names.sort();
        assert_eq!(names, vec![PathBuf::from("go-basics.json"), PathBuf::from("web.json.gz")]);
    }

    #[tokio::test]
    async fn test_list_empty_directory() {
        let (_temp_dir, backend) = backend_with(&[]);
        assert_eq!(backend.list().await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_path_security() {
        let (_temp_dir, backend) = backend_with(&[]);
        assert!(backend.read(Path::new("../etc/passwd")).await.is_err());
        assert!(backend.read(Path::new("etc/../../passwd")).await.is_err());
    }
}
