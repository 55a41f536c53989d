//! Storage backend trait and implementations.
//!
//! This module defines the `StorageBackend` trait: a read-only view of a flat
//! directory of record files. The catalog only ever enumerates the entries
//! directly inside the root and reads them whole, so that is all the trait
//! offers.

mod filter;
mod local;
#[cfg(any(test, feature = "mock"))]
mod mock;

pub use self::filter::ExtensionFilterBackend;
pub use self::local::LocalBackend;
#[cfg(any(test, feature = "mock"))]
pub use self::mock::MockBackend;
use crate::error::Result;
use crate::file::FileInfo;
use async_trait::async_trait;
use futures::{Stream, TryStreamExt};
use std::path::Path;
use std::pin::Pin;

/// Boxed stream returned by [`StorageBackend::list_stream`].
pub type FileInfoStream<'a> = Pin<Box<dyn Stream<Item = Result<FileInfo>> + Send + 'a>>;

/// Read-only interface over a directory of record files.
///
/// # Path Handling
/// All paths are single file names relative to the storage root and must be
/// validated using [`validate_path`](crate::validate_path) before use.
/// Implementations enforce this validation. Sub-directories are never
/// descended into nor reported.
///
/// # Examples
///
/// ```
/// use syllabus_storage::{backend::StorageBackend, error::Result};
///
/// async fn total_size(backend: &dyn StorageBackend) -> Result<usize> {
///     let mut total = 0;
///     for info in backend.list().await? {
///         total += backend.read(&info.path).await?.len();
///     }
///     Ok(total)
/// }
/// ```
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Name of the configured backend. Used for logging only; uniqueness is
    /// not required.
    fn name(&self) -> &str;

    /// List all record files in the storage root.
    ///
    /// Default implementation collects [`list_stream()`](Self::list_stream)
    /// into a [`Vec`] before returning. Stops at the first error.
    async fn list(&self) -> Result<Vec<FileInfo>> {
        self.list_stream().try_collect().await
    }

    /// Stream metadata for every file directly inside the storage root.
    ///
    /// Errors for individual entries are yielded in place and the stream
    /// carries on with the remaining entries, so callers can decide whether
    /// one unreadable entry should spoil the whole listing. A root that does
    /// not exist yields an empty stream, not an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use futures::StreamExt;
    /// # use syllabus_storage::backend::StorageBackend;
    /// # async fn example(backend: &dyn StorageBackend) {
    /// let mut stream = backend.list_stream();
    /// while let Some(entry) = stream.next().await {
    ///     match entry {
    ///         Ok(info) => println!("{}: {} bytes", info.path.display(), info.size),
    ///         Err(e) => eprintln!("skipping entry: {e}"),
    ///     }
    /// }
    /// # }
    /// ```
    fn list_stream(&self) -> FileInfoStream<'_>;

    /// Read file contents.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the file
    /// does not exist.
    async fn read(&self, path: &Path) -> Result<Vec<u8>>;
}
