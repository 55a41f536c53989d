mod course;
mod lesson;

pub use self::course::{Course, CourseDetail};
pub use self::lesson::{Lesson, TestCase};
