//! Catalog Store: the lazily-loaded, process-lifetime view of the catalog.

use crate::catalog::Catalog;
use crate::error::{ErrorKind, Result};
use crate::models::{Course, CourseDetail, Lesson};
use exn::ResultExt;
use std::sync::Arc;
use syllabus_config::{CatalogConfig, DEFAULT_MAX_RECORD_SIZE};
use syllabus_storage::BackendHandle;
use syllabus_storage::backend::{ExtensionFilterBackend, LocalBackend};
use tokio::sync::OnceCell;

/// Answers point queries against a catalog that is read from the backing
/// source exactly once.
///
/// The first query (from any number of concurrent callers) triggers the
/// load; everyone else awaits the same initialisation and then shares the
/// immutable result. Nothing is ever refreshed: changes to the backing
/// source after the first query are not observed for the lifetime of the
/// store. Share it between handlers with an [`Arc`].
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use syllabus_catalog::CatalogStore;
/// use syllabus_storage::backend::LocalBackend;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = LocalBackend::new("courses", "/srv/syllabus/courses")?;
/// let store = CatalogStore::new(Arc::new(backend));
/// if let Some(lesson) = store.get_lesson("go-basics", "intro").await {
///     println!("{}", lesson.title);
/// }
/// # Ok(())
/// # }
/// ```
pub struct CatalogStore {
    backend: BackendHandle,
    max_record_size: u64,
    catalog: OnceCell<Catalog>,
}

impl CatalogStore {
    pub fn new(backend: BackendHandle) -> Self {
        Self {
            backend,
            max_record_size: DEFAULT_MAX_RECORD_SIZE,
            catalog: OnceCell::new(),
        }
    }

    /// Skip records larger than `bytes`, stored or decompressed.
    pub fn with_max_record_size(mut self, bytes: u64) -> Self {
        self.max_record_size = bytes;
        self
    }

    /// Build a store over the configured record directory, restricted to the
    /// configured record extensions.
    ///
    /// Expects a validated config (absolute `directory`). Does not touch the
    /// directory at all; a missing or unreadable directory shows up as an
    /// empty catalog on the first query.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let local = LocalBackend::new("catalog", &config.directory).or_raise(|| ErrorKind::Storage)?;
        let filtered = ExtensionFilterBackend::new(Arc::new(local), &config.extensions);
        Ok(Self::new(Arc::new(filtered)).with_max_record_size(config.max_record_size))
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Whether the first load has completed.
    pub fn is_loaded(&self) -> bool {
        self.catalog.initialized()
    }

    /// The loaded catalog, loading it first if no query has run yet.
    pub async fn catalog(&self) -> &Catalog {
        self.catalog.get_or_init(|| Catalog::load(self.backend.as_ref(), self.max_record_size)).await
    }

    /// All course summaries in load order. Empty if the backing source is
    /// missing or holds no valid records.
    pub async fn list_courses(&self) -> Vec<&Course> {
        self.catalog().await.summaries().collect()
    }

    pub async fn get_course_summary(&self, id: &str) -> Option<&Course> {
        self.get_course_detail(id).await.map(CourseDetail::summary)
    }

    pub async fn get_course_detail(&self, id: &str) -> Option<&CourseDetail> {
        self.catalog().await.get(id)
    }

    /// Lesson `lesson_id` of course `course_id`. A lesson with that id in
    /// any other course does not count.
    pub async fn get_lesson(&self, course_id: &str, lesson_id: &str) -> Option<&Lesson> {
        self.get_course_detail(course_id).await?.lesson(lesson_id)
    }
}
