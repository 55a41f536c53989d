use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_DIRECTORY: &str = "courses";
const DEFAULT_ROUTE_PREFIX: &str = "/api/courses/";
const DEFAULT_EXTENSIONS: [&str; 2] = ["json", "json.gz"];
/// Largest record accepted, in bytes, stored or decompressed (10 MiB).
pub const DEFAULT_MAX_RECORD_SIZE: u64 = 10 * 1024 * 1024;

/// Where the course records live and how the catalog is addressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Directory holding one record file per course. Relative paths are
    /// resolved against the current working directory at load time.
    pub directory: PathBuf,
    /// Path prefix in front of `courseID[/lessons/lessonID]`. Always ends
    /// with `/` once validated.
    pub route_prefix: String,
    /// File name extensions treated as records; everything else in the
    /// directory is ignored.
    pub extensions: Vec<String>,
    /// Records larger than this many bytes, on disk or after decompression,
    /// are skipped.
    pub max_record_size: u64,
}
impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_DIRECTORY),
            route_prefix: DEFAULT_ROUTE_PREFIX.to_string(),
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            max_record_size: DEFAULT_MAX_RECORD_SIZE,
        }
    }
}
impl CatalogConfig {
    /// Normalise and check the loaded values.
    ///
    /// - `directory` becomes absolute,
    /// - `route_prefix` must start with `/` and gains a trailing `/`.
    pub fn validate(mut self) -> Result<Self> {
        if self.directory.as_os_str().is_empty() {
            exn::bail!(ErrorKind::Directory(self.directory));
        }
        if !self.directory.is_absolute() {
            let cwd = std::env::current_dir().or_raise(|| ErrorKind::Directory(self.directory.clone()))?;
            self.directory = cwd.join(&self.directory);
        }
        if !self.route_prefix.starts_with('/') || self.route_prefix.contains(['?', '#']) {
            exn::bail!(ErrorKind::InvalidPrefix(self.route_prefix));
        }
        if !self.route_prefix.ends_with('/') {
            self.route_prefix.push('/');
        }
        Ok(self)
    }
}
