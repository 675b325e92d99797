use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::entity::Quiz;
use crate::model::{ValidationError, ValidationResult};
use crate::utils::duration::parse_duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Video,
    Pdf,
    Audio,
    File,
    Text,
    Quiz,
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Pdf => write!(f, "pdf"),
            Self::Audio => write!(f, "audio"),
            Self::File => write!(f, "file"),
            Self::Text => write!(f, "text"),
            Self::Quiz => write!(f, "quiz"),
        }
    }
}

impl std::str::FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(Self::Video),
            "pdf" => Ok(Self::Pdf),
            "audio" => Ok(Self::Audio),
            "file" => Ok(Self::File),
            "text" => Ok(Self::Text),
            "quiz" => Ok(Self::Quiz),
            other => Err(format!("unknown content kind: {other}")),
        }
    }
}

/// Content payload of a lesson. The payload variant *is* the lesson's
/// content kind, so a kind/payload mismatch cannot be represented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LessonContent {
    #[serde(rename_all = "camelCase")]
    Video { video_ref: String },
    #[serde(rename_all = "camelCase")]
    Pdf { file_url: String },
    #[serde(rename_all = "camelCase")]
    Audio { file_url: String },
    #[serde(rename_all = "camelCase")]
    File { file_url: String },
    Text { body: String },
    Quiz { quiz: Quiz },
}

impl LessonContent {
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Video { .. } => ContentKind::Video,
            Self::Pdf { .. } => ContentKind::Pdf,
            Self::Audio { .. } => ContentKind::Audio,
            Self::File { .. } => ContentKind::File,
            Self::Text { .. } => ContentKind::Text,
            Self::Quiz { .. } => ContentKind::Quiz,
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        match self {
            Self::Video { video_ref } => {
                if video_ref.trim().is_empty() {
                    return Err(ValidationError::MissingVideoRef);
                }
            }
            Self::Pdf { file_url } | Self::Audio { file_url } | Self::File { file_url } => {
                if file_url.trim().is_empty() {
                    return Err(ValidationError::MissingFileUrl { kind: self.kind() });
                }
            }
            Self::Text { body } => {
                if body.trim().is_empty() {
                    return Err(ValidationError::EmptyBody);
                }
            }
            Self::Quiz { quiz } => quiz.validate()?,
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    id: Uuid,
    module_id: Uuid,
    title: String,
    duration: String,
    lesson_order: i32,
    published: bool,
    content: LessonContent,
    updated_at: DateTime<Utc>,
}

impl Lesson {
    pub fn new(
        id: Uuid,
        module_id: Uuid,
        title: String,
        duration: String,
        lesson_order: i32,
        published: bool,
        content: LessonContent,
    ) -> Self {
        Self {
            id,
            module_id,
            title,
            duration,
            lesson_order,
            published,
            content,
            updated_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn module_id(&self) -> Uuid {
        self.module_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn duration(&self) -> &str {
        &self.duration
    }

    pub fn lesson_order(&self) -> i32 {
        self.lesson_order
    }

    pub fn published(&self) -> bool {
        self.published
    }

    pub fn content(&self) -> &LessonContent {
        &self.content
    }

    pub fn kind(&self) -> ContentKind {
        self.content.kind()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(crate) fn set_lesson_order(&mut self, lesson_order: i32) {
        self.lesson_order = lesson_order;
    }

    pub(crate) fn set_published(&mut self, published: bool) {
        self.published = published;
    }
}

/// Create/update payload for a lesson, as submitted by the lesson form.
///
/// A draft is validated locally before any request is issued; an invalid
/// draft never reaches the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDraft {
    module_id: Uuid,
    title: String,
    duration: String,
    #[serde(default)]
    published: bool,
    content: LessonContent,
}

impl LessonDraft {
    pub fn new(
        module_id: Uuid,
        title: impl Into<String>,
        duration: impl Into<String>,
        content: LessonContent,
    ) -> Self {
        Self {
            module_id,
            title: title.into(),
            duration: duration.into(),
            published: false,
            content,
        }
    }

    pub fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    pub fn module_id(&self) -> Uuid {
        self.module_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &LessonContent {
        &self.content
    }

    pub fn validate(&self) -> ValidationResult<()> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if parse_duration(&self.duration).is_none() {
            return Err(ValidationError::InvalidDuration(self.duration.clone()));
        }
        self.content.validate()
    }
}
