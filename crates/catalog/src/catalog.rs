//! The loaded, immutable set of courses and the one-shot loader producing it.

use crate::error::{ErrorKind, Result};
use crate::models::{Course, CourseDetail};
use crate::record::Record;
use exn::ResultExt;
use futures::StreamExt;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use syllabus_storage::{FileInfo, StorageBackend};
use time::OffsetDateTime;
use tracing::instrument;

struct Entry {
    /// Record file the course was loaded from, for duplicate reporting.
    source: PathBuf,
    detail: CourseDetail,
}

/// Every course loaded from a backing source, in load order.
///
/// Load order is the record file names sorted lexicographically, which makes
/// "first match wins" deterministic regardless of how the backend happens
/// to enumerate its files. Course ids are unique: a record whose id was
/// already loaded from an earlier file is rejected.
pub struct Catalog {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
    loaded_at: OffsetDateTime,
}

impl Catalog {
    /// A catalog with no courses.
    pub fn empty(loaded_at: OffsetDateTime) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            loaded_at,
        }
    }

    /// Read every record file from `backend` into a new catalog.
    ///
    /// Never fails. Listing errors, unreadable, oversized and malformed
    /// records are logged and skipped; an unavailable source produces an
    /// empty catalog.
    #[instrument(skip(backend), fields(source = backend.name()))]
    pub async fn load(backend: &dyn StorageBackend, max_record_size: u64) -> Self {
        let mut catalog = Self::empty(OffsetDateTime::now_utc());
        for file in Self::discover(backend).await {
            if file.size > max_record_size {
                tracing::warn!(path = %file.path.display(), size = file.size, max_record_size, "Skipping oversized course record");
                continue;
            }
            match Self::read_record(backend, &file.path, max_record_size).await {
                Ok(record) => catalog.insert(file.path, record),
                Err(e) => tracing::warn!(path = %file.path.display(), error = ?e, "Skipping course record"),
            }
        }
        tracing::info!(courses = catalog.len(), "Catalog loaded");
        catalog
    }

    async fn discover(backend: &dyn StorageBackend) -> Vec<FileInfo> {
        let mut files = Vec::new();
        let mut listing = backend.list_stream();
        while let Some(item) = listing.next().await {
            match item {
                Ok(info) => files.push(info),
                Err(e) => tracing::warn!(error = ?e, "Skipping unreadable entry in record source"),
            }
        }
        files.sort_by(|a, b| a.path.cmp(&b.path));
        files
    }

    async fn read_record(backend: &dyn StorageBackend, path: &Path, max_size: u64) -> Result<Record> {
        let bytes = backend.read(path).await.or_raise(|| ErrorKind::Storage)?;
        Record::parse(path, &bytes, max_size)
    }

    fn insert(&mut self, source: PathBuf, record: Record) {
        if let Some(&existing) = self.index.get(&record.id) {
            tracing::warn!(
                id = %record.id,
                path = %source.display(),
                first = %self.entries[existing].source.display(),
                "Duplicate course id; keeping the first record"
            );
            return;
        }
        tracing::debug!(id = %record.id, path = %source.display(), lessons = record.lessons.len(), "Loaded course record");
        self.index.insert(record.id.clone(), self.entries.len());
        self.entries.push(Entry {
            source,
            detail: record.into_detail(self.loaded_at),
        });
    }

    /// Course summaries in load order.
    pub fn summaries(&self) -> impl ExactSizeIterator<Item = &Course> {
        self.entries.iter().map(|entry| &entry.detail.course)
    }

    pub fn get(&self, id: &str) -> Option<&CourseDetail> {
        self.index.get(id).map(|&position| &self.entries[position].detail)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Instant stamped on every course as `created_at`/`updated_at`.
    pub fn loaded_at(&self) -> OffsetDateTime {
        self.loaded_at
    }
}
