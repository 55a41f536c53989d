//! Request Router: maps `courseID[/lessons/lessonID]` onto catalog queries.
//!
//! This is a fixed two-level grammar, not a general router. Anything deeper,
//! shallower in an unexpected way, or with the wrong keyword segment is a bad
//! request; there are no partial matches.

use crate::models::{Course, CourseDetail, Lesson};
use crate::store::CatalogStore;
use std::sync::Arc;
use syllabus_config::CatalogConfig;

/// Literal middle segment of a lesson path.
pub const LESSONS_SEGMENT: &str = "lessons";

pub const COURSE_ID_REQUIRED: &str = "course id required";
pub const INVALID_PATH: &str = "invalid path";
pub const COURSE_NOT_FOUND: &str = "course not found";
pub const LESSON_NOT_FOUND: &str = "lesson not found";

/// Result of routing one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterOutcome<'a> {
    Course(&'a CourseDetail),
    Lesson(&'a Lesson),
    NotFound(&'static str),
    BadRequest(&'static str),
}
impl RouterOutcome<'_> {
    /// HTTP status code for this outcome.
    pub fn status(&self) -> u16 {
        match self {
            Self::Course(_) | Self::Lesson(_) => 200,
            Self::NotFound(_) => 404,
            Self::BadRequest(_) => 400,
        }
    }

    /// Error message for the failure outcomes, `None` when something was found.
    pub fn message(&self) -> Option<&'static str> {
        match *self {
            Self::NotFound(message) | Self::BadRequest(message) => Some(message),
            Self::Course(_) | Self::Lesson(_) => None,
        }
    }
}

/// What a path suffix asks for, before anything is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target<'p> {
    Course(&'p str),
    Lesson { course_id: &'p str, lesson_id: &'p str },
}

/// Split the part of the path after the route prefix into a [`Target`], or
/// the bad-request message explaining why it isn't one.
pub(crate) fn parse(suffix: &str) -> Result<Target<'_>, &'static str> {
    if suffix.is_empty() {
        return Err(COURSE_ID_REQUIRED);
    }
    let segments: Vec<&str> = suffix.split('/').collect();
    // Empty segments come from trailing or doubled slashes; an empty id can
    // never name anything.
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(INVALID_PATH);
    }
    match segments[..] {
        [course_id] => Ok(Target::Course(course_id)),
        [course_id, LESSONS_SEGMENT, lesson_id] => Ok(Target::Lesson { course_id, lesson_id }),
        _ => Err(INVALID_PATH),
    }
}

/// Routes catalog paths to a shared [`CatalogStore`].
#[derive(Clone)]
pub struct Router {
    store: Arc<CatalogStore>,
    prefix: String,
}

impl Router {
    /// `prefix` is what every routed path starts with, e.g. `/api/courses/`.
    /// A trailing slash is added if missing.
    pub fn new(store: Arc<CatalogStore>, prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        Self { store, prefix }
    }

    pub fn from_config(store: Arc<CatalogStore>, config: &CatalogConfig) -> Self {
        Self::new(store, config.route_prefix.as_str())
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The whole-catalog listing path: the prefix without its trailing
    /// slash (`/api/courses` for `/api/courses/`).
    pub fn listing_path(&self) -> &str {
        self.prefix.trim_end_matches('/')
    }

    /// Whether `path` is the listing path, which [`list()`](Self::list)
    /// answers. The prefix itself (with the slash) is not: it is a course
    /// lookup missing its id, and [`route()`](Self::route) rejects it.
    pub fn is_listing(&self, path: &str) -> bool {
        path == self.listing_path()
    }

    /// Every course summary, in load order.
    pub async fn list(&self) -> Vec<&Course> {
        self.store.list_courses().await
    }

    /// Resolve a raw request path (including the route prefix).
    pub async fn route(&self, path: &str) -> RouterOutcome<'_> {
        let Some(suffix) = path.strip_prefix(self.prefix.as_str()) else {
            tracing::debug!(path, prefix = %self.prefix, "Path outside the catalog prefix");
            return RouterOutcome::BadRequest(INVALID_PATH);
        };
        let target = match parse(suffix) {
            Ok(target) => target,
            Err(message) => {
                tracing::debug!(path, message, "Rejected catalog path");
                return RouterOutcome::BadRequest(message);
            },
        };
        match target {
            Target::Course(id) => match self.store.get_course_detail(id).await {
                Some(detail) => RouterOutcome::Course(detail),
                None => RouterOutcome::NotFound(COURSE_NOT_FOUND),
            },
            Target::Lesson { course_id, lesson_id } => match self.store.get_lesson(course_id, lesson_id).await {
                Some(lesson) => RouterOutcome::Lesson(lesson),
                None => RouterOutcome::NotFound(LESSON_NOT_FOUND),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use syllabus_storage::backend::MockBackend;

    fn router() -> Router {
        let backend = MockBackend::with_files([
            (
                "go-basics.json",
                r#"{"id": "go-basics", "title": "Go Basics", "duration": 12, "level": "beginner",
                    "lessons": [{"id": "intro", "title": "Intro", "order": 1}]}"#,
            ),
            (
                "web.json",
                r#"{"id": "web", "title": "Web", "duration": 20, "level": "beginner",
                    "lessons": [{"id": "html", "title": "HTML", "order": 1}]}"#,
            ),
        ]);
        Router::new(Arc::new(CatalogStore::new(Arc::new(backend))), "/api/courses/")
    }

    #[rstest]
    #[case("", Err(COURSE_ID_REQUIRED))]
    #[case("go-basics", Ok(Target::Course("go-basics")))]
    #[case("go-basics/lessons/intro", Ok(Target::Lesson { course_id: "go-basics", lesson_id: "intro" }))]
    #[case("go-basics/modules/intro", Err(INVALID_PATH))]
    #[case("go-basics/lessons", Err(INVALID_PATH))]
    #[case("go-basics/lessons/", Err(INVALID_PATH))]
    #[case("go-basics/", Err(INVALID_PATH))]
    #[case("/go-basics", Err(INVALID_PATH))]
    #[case("a/b/c/d", Err(INVALID_PATH))]
    #[case("go-basics/lessons/intro/extra", Err(INVALID_PATH))]
    #[case("//lessons/intro", Err(INVALID_PATH))]
    fn test_parse(#[case] suffix: &str, #[case] expected: Result<Target<'static>, &'static str>) {
        assert_eq!(parse(suffix), expected);
    }

    #[rstest]
    #[case("/api/courses/", 400, Some(COURSE_ID_REQUIRED))]
    #[case("/api/courses/go-basics", 200, None)]
    #[case("/api/courses/missing", 404, Some(COURSE_NOT_FOUND))]
    #[case("/api/courses/go-basics/lessons/intro", 200, None)]
    #[case("/api/courses/go-basics/lessons/html", 404, Some(LESSON_NOT_FOUND))]
    #[case("/api/courses/missing/lessons/intro", 404, Some(LESSON_NOT_FOUND))]
    #[case("/api/courses/go-basics/modules/intro", 400, Some(INVALID_PATH))]
    #[case("/api/courses/a/b/c/d", 400, Some(INVALID_PATH))]
    #[case("/api/lessons/go-basics", 400, Some(INVALID_PATH))]
    #[tokio::test]
    async fn test_route(#[case] path: &str, #[case] status: u16, #[case] message: Option<&str>) {
        let router = router();
        let outcome = router.route(path).await;
        assert_eq!(outcome.status(), status);
        assert_eq!(outcome.message(), message);
    }

    #[tokio::test]
    async fn test_route_returns_records() {
        let router = router();
        let RouterOutcome::Course(detail) = router.route("/api/courses/web").await else {
            panic!("expected a course");
        };
        assert_eq!(detail.course.id, "web");
        assert_eq!(detail.lessons[0].id, "html");
        let RouterOutcome::Lesson(lesson) = router.route("/api/courses/go-basics/lessons/intro").await else {
            panic!("expected a lesson");
        };
        assert_eq!(lesson.title, "Intro");
    }

    #[tokio::test]
    async fn test_list() {
        let router = router();
        assert_eq!(router.listing_path(), "/api/courses");
        assert!(router.is_listing("/api/courses"));
        assert!(!router.is_listing("/api/courses/web"));
        let ids: Vec<_> = router.list().await.into_iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["go-basics", "web"]);
    }

    #[tokio::test]
    async fn test_bare_prefix_is_not_listing() {
        let router = router();
        assert!(!router.is_listing("/api/courses/"));
        assert_eq!(router.route("/api/courses/").await, RouterOutcome::BadRequest(COURSE_ID_REQUIRED));
    }

    #[test]
    fn test_prefix_gets_trailing_slash() {
        let store = Arc::new(CatalogStore::new(Arc::new(MockBackend::default())));
        assert_eq!(Router::new(store, "/api/courses").prefix(), "/api/courses/");
    }
}
