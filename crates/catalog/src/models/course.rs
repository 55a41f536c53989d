use super::Lesson;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A top-level catalog entry, without its lessons.
///
/// `created_at` and `updated_at` are not read from storage: both are the
/// instant the catalog was loaded, so they change on every restart even
/// when the record files don't.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Unique identifier, also the lookup key.
    pub id: String,
    pub title: String,
    pub description: String,
    /// Free text.
    pub instructor: String,
    /// Length of the course in hours.
    pub duration: u32,
    /// Open-ended (beginner, intermediate, advanced, ...), stored as-is.
    pub level: String,
    pub category: String,
    /// Number of lessons in the full record.
    pub lessons_count: usize,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A course together with its lessons, in record order.
///
/// Serialises as the course fields with an extra `lessons` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub lessons: Vec<Lesson>,
}
impl CourseDetail {
    /// Summary projection.
    pub fn summary(&self) -> &Course {
        &self.course
    }

    /// Exact-id lookup among this course's lessons only.
    pub fn lesson(&self, lesson_id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| lesson.id == lesson_id)
    }
}
