use thiserror::Error;

use crate::model::entity::ContentKind;

pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("lesson title must not be empty")]
    EmptyTitle,
    #[error("module title must not be empty")]
    EmptyModuleTitle,
    #[error("unparseable duration: {0}")]
    InvalidDuration(String),
    #[error("video lessons need a video reference")]
    MissingVideoRef,
    #[error("{kind} lessons need an uploaded file")]
    MissingFileUrl { kind: ContentKind },
    #[error("text lessons need a body")]
    EmptyBody,
    #[error("a quiz needs at least one question")]
    EmptyQuiz,
    #[error("question {index} has an empty prompt")]
    EmptyPrompt { index: usize },
    #[error("question {index} needs at least two options")]
    TooFewOptions { index: usize },
    #[error("question {index} has no correct option")]
    NoCorrectOption { index: usize },
    #[error("passing score must be within 1-100, got {0}")]
    PassingScoreOutOfRange(u8),
}
