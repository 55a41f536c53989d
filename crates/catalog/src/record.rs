//! Persisted course records.
//!
//! One file holds one course with its lessons and test cases, encoded as
//! JSON. Files ending in `.gz` are gzip-compressed JSON.
//!
//! Only the course id is required. Every other missing field takes its
//! empty or zero value, so an incomplete record still shows up in the
//! catalog.

use crate::error::{ErrorKind, Result};
use crate::models::{Course, CourseDetail, Lesson};
use exn::ResultExt;
use flate2::read::GzDecoder;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use time::OffsetDateTime;
use tracing::instrument;

const GZIP_EXTENSION: &str = "gz";

/// A course record as it is stored on disk.
///
/// Unknown fields are ignored so records can carry extra metadata without
/// breaking the loader.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instructor: String,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}
impl Record {
    /// Parse the bytes of the record file `path`.
    ///
    /// The path is only used to pick the encoding (by extension) and for
    /// error reporting. Neither the stored bytes nor the decompressed JSON
    /// may exceed `max_size` bytes.
    #[instrument(level = "trace", skip(bytes), fields(size = bytes.len()))]
    pub fn parse(path: &Path, bytes: &[u8], max_size: u64) -> Result<Self> {
        let too_large = || ErrorKind::TooLarge(path.to_path_buf());
        if bytes.len() as u64 > max_size {
            exn::bail!(too_large());
        }
        let is_gzip = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(GZIP_EXTENSION));
        if is_gzip {
            let mut json = Vec::new();
            // One byte past the limit is enough to tell an oversized record.
            GzDecoder::new(bytes)
                .take(max_size.saturating_add(1))
                .read_to_end(&mut json)
                .or_raise(|| ErrorKind::Decompress(path.to_path_buf()))?;
            if json.len() as u64 > max_size {
                exn::bail!(too_large());
            }
            return Self::parse_json(path, &json);
        }
        Self::parse_json(path, bytes)
    }

    fn parse_json(path: &Path, json: &[u8]) -> Result<Self> {
        serde_json::from_slice(json).or_raise(|| ErrorKind::RecordParse(path.to_path_buf()))
    }

    /// Turn the record into its in-memory form, stamped with the load instant.
    pub fn into_detail(self, loaded_at: OffsetDateTime) -> CourseDetail {
        let course = Course {
            id: self.id,
            title: self.title,
            description: self.description,
            instructor: self.instructor,
            duration: self.duration,
            level: self.level,
            category: self.category,
            lessons_count: self.lessons.len(),
            created_at: loaded_at,
            updated_at: loaded_at,
        };
        CourseDetail { course, lessons: self.lessons }
    }
}
