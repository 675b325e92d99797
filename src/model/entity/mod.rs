mod module;
pub use module::{CourseModule, ModuleDraft};

mod lesson;
pub use lesson::{ContentKind, Lesson, LessonContent, LessonDraft};

mod quiz;
pub use quiz::{Quiz, QuizOption, QuizQuestion};
