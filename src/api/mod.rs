use async_trait::async_trait;
use uuid::Uuid;

use crate::model::entity::{CourseModule, Lesson, LessonDraft, ModuleDraft};

mod error;
pub use error::{ApiError, ApiResult};

mod dto;
pub use dto::{LessonPatch, ModulePatch, UploadResponse};

mod http;
pub use http::HttpApi;

/// The remote collaborator: the course REST API under `/api/v1/`.
///
/// Kept behind a trait so the store and sync layer can run against an
/// in-process stub in tests.
#[async_trait]
pub trait CourseApi: Send + Sync {
    async fn list_modules(&self, course_id: Uuid) -> ApiResult<Vec<CourseModule>>;
    async fn list_lessons(&self, course_id: Uuid) -> ApiResult<Vec<Lesson>>;

    async fn create_module(&self, draft: &ModuleDraft) -> ApiResult<CourseModule>;
    async fn update_module(&self, id: Uuid, draft: &ModuleDraft) -> ApiResult<CourseModule>;
    async fn patch_module(&self, id: Uuid, patch: &ModulePatch) -> ApiResult<()>;
    async fn delete_module(&self, id: Uuid) -> ApiResult<()>;

    async fn create_lesson(&self, draft: &LessonDraft) -> ApiResult<Lesson>;
    async fn update_lesson(&self, id: Uuid, draft: &LessonDraft) -> ApiResult<Lesson>;
    async fn patch_lesson(&self, id: Uuid, patch: &LessonPatch) -> ApiResult<()>;
    async fn delete_lesson(&self, id: Uuid) -> ApiResult<()>;

    async fn upload_file(&self, filename: &str, bytes: Vec<u8>) -> ApiResult<String>;
}
