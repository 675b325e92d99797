use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use cursus::api::HttpApi;
use cursus::model::entity::{LessonContent, LessonDraft, ModuleDraft};
use cursus::store::CourseEditor;
use serde_json::{Value, json};
use uuid::Uuid;

/// One request as the stub saw it, for asserting what the client
/// actually sent over the wire.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: String,
    pub path: String,
    pub body: Value,
}

impl RecordedCall {
    pub fn is(&self, method: &str, path_prefix: &str) -> bool {
        self.method == method && self.path.starts_with(path_prefix)
    }
}

#[derive(Debug, Default)]
struct StubState {
    modules: Vec<Value>,
    lessons: Vec<Value>,
    calls: Vec<RecordedCall>,
    fail_next: Option<u16>,
}

/// Shared handle to the stub's state, cloned into every handler.
#[derive(Clone, Default)]
pub struct Stub(Arc<Mutex<StubState>>);

impl Stub {
    /// Record the call and honor a pending injected failure.
    fn begin(
        &self,
        method: &str,
        path: String,
        body: Value,
    ) -> Result<MutexGuard<'_, StubState>, (StatusCode, String)> {
        let mut state = self.0.lock().unwrap();
        state.calls.push(RecordedCall {
            method: method.to_string(),
            path,
            body,
        });
        if let Some(status) = state.fail_next.take() {
            return Err((
                StatusCode::from_u16(status).unwrap(),
                "injected failure".to_string(),
            ));
        }
        Ok(state)
    }
}

type StubResult = Result<Json<Value>, (StatusCode, String)>;

async fn list_modules(State(stub): State<Stub>, Path(course): Path<Uuid>) -> StubResult {
    let state = stub.begin(
        "GET",
        format!("/api/v1/courses/{course}/modules"),
        Value::Null,
    )?;
    Ok(Json(Value::Array(state.modules.clone())))
}

async fn list_lessons(State(stub): State<Stub>, Path(course): Path<Uuid>) -> StubResult {
    let state = stub.begin(
        "GET",
        format!("/api/v1/courses/{course}/lessons"),
        Value::Null,
    )?;
    Ok(Json(Value::Array(state.lessons.clone())))
}

async fn create_module(State(stub): State<Stub>, Json(body): Json<Value>) -> StubResult {
    let mut state = stub.begin("POST", "/api/v1/modules".to_string(), body.clone())?;

    let order = body
        .get("moduleOrder")
        .and_then(Value::as_i64)
        .unwrap_or(state.modules.len() as i64 + 1);
    let module = json!({
        "id": Uuid::new_v4(),
        "title": body["title"],
        "moduleOrder": order,
        "updatedAt": Utc::now(),
    });
    state.modules.push(module.clone());
    Ok(Json(module))
}

async fn update_module(
    State(stub): State<Stub>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> StubResult {
    let mut state = stub.begin("PUT", format!("/api/v1/modules/{id}"), body.clone())?;

    let id = json!(id);
    let Some(module) = state.modules.iter_mut().find(|m| m["id"] == id) else {
        return Err((StatusCode::NOT_FOUND, "no such module".to_string()));
    };
    for key in ["title", "moduleOrder"] {
        if let Some(value) = body.get(key) {
            module[key] = value.clone();
        }
    }
    module["updatedAt"] = json!(Utc::now());
    Ok(Json(module.clone()))
}

async fn delete_module(State(stub): State<Stub>, Path(id): Path<Uuid>) -> StubResult {
    let mut state = stub.begin("DELETE", format!("/api/v1/modules/{id}"), Value::Null)?;
    let id = json!(id);
    state.modules.retain(|m| m["id"] != id);
    Ok(Json(json!({})))
}

async fn create_lesson(State(stub): State<Stub>, Json(body): Json<Value>) -> StubResult {
    let mut state = stub.begin("POST", "/api/v1/lessons".to_string(), body.clone())?;

    let module_id = body["moduleId"].clone();
    let in_module = state
        .lessons
        .iter()
        .filter(|l| l["moduleId"] == module_id)
        .count();
    let lesson = json!({
        "id": Uuid::new_v4(),
        "moduleId": module_id,
        "title": body["title"],
        "duration": body["duration"],
        "lessonOrder": in_module as i64 + 1,
        "published": body.get("published").and_then(Value::as_bool).unwrap_or(false),
        "content": body["content"],
        "updatedAt": Utc::now(),
    });
    state.lessons.push(lesson.clone());
    Ok(Json(lesson))
}

async fn update_lesson(
    State(stub): State<Stub>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> StubResult {
    let mut state = stub.begin("PUT", format!("/api/v1/lessons/{id}"), body.clone())?;

    let id = json!(id);
    let Some(lesson) = state.lessons.iter_mut().find(|l| l["id"] == id) else {
        return Err((StatusCode::NOT_FOUND, "no such lesson".to_string()));
    };
    for key in ["moduleId", "title", "duration", "lessonOrder", "published", "content"] {
        if let Some(value) = body.get(key) {
            lesson[key] = value.clone();
        }
    }
    lesson["updatedAt"] = json!(Utc::now());
    Ok(Json(lesson.clone()))
}

async fn delete_lesson(State(stub): State<Stub>, Path(id): Path<Uuid>) -> StubResult {
    let mut state = stub.begin("DELETE", format!("/api/v1/lessons/{id}"), Value::Null)?;
    let id = json!(id);
    state.lessons.retain(|l| l["id"] != id);
    Ok(Json(json!({})))
}

async fn upload(
    State(stub): State<Stub>,
    Query(params): Query<HashMap<String, String>>,
    bytes: Bytes,
) -> StubResult {
    let filename = params.get("filename").cloned().unwrap_or_default();
    stub.begin(
        "POST",
        "/api/v1/uploads".to_string(),
        json!({ "filename": filename, "size": bytes.len() }),
    )?;
    Ok(Json(json!({ "url": format!("/api/v1/static/{filename}") })))
}

pub struct StubServer {
    stub: Stub,
    addr: SocketAddr,
}

impl StubServer {
    pub async fn spawn() -> Self {
        let stub = Stub::default();
        let app = Router::new()
            .route("/api/v1/courses/{id}/modules", get(list_modules))
            .route("/api/v1/courses/{id}/lessons", get(list_lessons))
            .route("/api/v1/modules", post(create_module))
            .route(
                "/api/v1/modules/{id}",
                put(update_module).delete(delete_module),
            )
            .route("/api/v1/lessons", post(create_lesson))
            .route(
                "/api/v1/lessons/{id}",
                put(update_lesson).delete(delete_lesson),
            )
            .route("/api/v1/uploads", post(upload))
            .with_state(stub.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { stub, addr }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.stub.0.lock().unwrap().calls.clone()
    }

    pub fn calls_to(&self, method: &str, path_prefix: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.is(method, path_prefix))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.stub.0.lock().unwrap().calls.clear();
    }

    /// Make the next request fail with the given status.
    pub fn fail_next(&self, status: u16) {
        self.stub.0.lock().unwrap().fail_next = Some(status);
    }
}

pub async fn setup_editor() -> (StubServer, CourseEditor, Uuid) {
    let server = StubServer::spawn().await;
    let api = HttpApi::new(&server.base_url());
    let mut editor = cursus::build_editor_with_api(Arc::new(api));

    let course = Uuid::new_v4();
    editor.refresh(course).await.unwrap();
    (server, editor, course)
}

pub fn video_draft(module: Uuid, title: &str) -> LessonDraft {
    LessonDraft::new(
        module,
        title,
        "15m",
        LessonContent::Video {
            video_ref: format!("mux:{title}"),
        },
    )
}

/// Two modules, three lessons in the first and one in the second.
pub async fn seed_course(
    editor: &mut CourseEditor,
    course: Uuid,
) -> (Uuid, Uuid, Vec<Uuid>, Uuid) {
    let module_a = editor
        .create_module(ModuleDraft::new(course, "Getting Started with React"))
        .await
        .unwrap();
    let module_b = editor
        .create_module(ModuleDraft::new(course, "React Hooks Deep Dive"))
        .await
        .unwrap();

    let mut lessons = Vec::new();
    for title in ["Introduction to React", "Setting Up Your Environment", "React Basics Quiz"] {
        lessons.push(editor.create_lesson(video_draft(module_a, title)).await.unwrap());
    }
    let hook_lesson = editor
        .create_lesson(video_draft(module_b, "useState Hook Tutorial"))
        .await
        .unwrap();

    (module_a, module_b, lessons, hook_lesson)
}
