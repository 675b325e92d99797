use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::api::dto::{LessonPatch, ModulePatch, UploadResponse};
use crate::api::{ApiError, ApiResult, CourseApi};
use crate::model::entity::{CourseModule, Lesson, LessonDraft, ModuleDraft};

/// Production [`CourseApi`] over reqwest. No retries, no timeouts; a
/// non-2xx status is a failure and the raw body text is kept for the
/// logs.
#[derive(Debug, Clone)]
pub struct HttpApi {
    base_url: String,
    client: Client,
}

impl HttpApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn check(response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), %body, "api call failed");
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.client.get(self.endpoint(path)).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let response = self
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn put_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let response = self
            .client
            .put(self.endpoint(path))
            .json(body)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn put_unit<B: Serialize + Sync>(&self, path: &str, body: &B) -> ApiResult<()> {
        let response = self
            .client
            .put(self.endpoint(path))
            .json(body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> ApiResult<()> {
        let response = self.client.delete(self.endpoint(path)).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl CourseApi for HttpApi {
    async fn list_modules(&self, course_id: Uuid) -> ApiResult<Vec<CourseModule>> {
        self.get_json(&format!("/api/v1/courses/{course_id}/modules"))
            .await
    }

    async fn list_lessons(&self, course_id: Uuid) -> ApiResult<Vec<Lesson>> {
        self.get_json(&format!("/api/v1/courses/{course_id}/lessons"))
            .await
    }

    async fn create_module(&self, draft: &ModuleDraft) -> ApiResult<CourseModule> {
        self.post_json("/api/v1/modules", draft).await
    }

    async fn update_module(&self, id: Uuid, draft: &ModuleDraft) -> ApiResult<CourseModule> {
        self.put_json(&format!("/api/v1/modules/{id}"), draft).await
    }

    async fn patch_module(&self, id: Uuid, patch: &ModulePatch) -> ApiResult<()> {
        self.put_unit(&format!("/api/v1/modules/{id}"), patch).await
    }

    async fn delete_module(&self, id: Uuid) -> ApiResult<()> {
        self.delete(&format!("/api/v1/modules/{id}")).await
    }

    async fn create_lesson(&self, draft: &LessonDraft) -> ApiResult<Lesson> {
        self.post_json("/api/v1/lessons", draft).await
    }

    async fn update_lesson(&self, id: Uuid, draft: &LessonDraft) -> ApiResult<Lesson> {
        self.put_json(&format!("/api/v1/lessons/{id}"), draft).await
    }

    async fn patch_lesson(&self, id: Uuid, patch: &LessonPatch) -> ApiResult<()> {
        self.put_unit(&format!("/api/v1/lessons/{id}"), patch).await
    }

    async fn delete_lesson(&self, id: Uuid) -> ApiResult<()> {
        self.delete(&format!("/api/v1/lessons/{id}")).await
    }

    async fn upload_file(&self, filename: &str, bytes: Vec<u8>) -> ApiResult<String> {
        let response = self
            .client
            .post(self.endpoint("/api/v1/uploads"))
            .query(&[("filename", filename)])
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await?;

        let upload: UploadResponse = Self::check(response).await?.json().await?;
        Ok(upload.url)
    }
}
