use serde::{Deserialize, Serialize};

/// One unit of a course. Ids are only unique within the parent course.
///
/// `order` is carried verbatim; it is neither validated nor used to sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order: i64,
    /// Rendered instructional text.
    #[serde(default)]
    pub content: String,
    /// Code sample shown alongside the lesson.
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

/// Input/expected-output pair. Pure data; nothing here runs it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
}
