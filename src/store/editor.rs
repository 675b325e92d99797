use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::api::{ApiError, ApiResult, CourseApi};
use crate::model::ValidationError;
use crate::model::entity::{LessonDraft, ModuleDraft};
use crate::store::{
    CourseStore, DragSession, StoreError, SyncOutcome, SyncQueue,
};

pub type EditorResult<T> = std::result::Result<T, EditorError>;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("fetch failed: {0}")]
    Fetch(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("deletion requires an explicit confirmation")]
    DeleteNotConfirmed,
}

/// Editing front for one course: validation, the remote API, the local
/// store and the sync queue behind a single mutator.
///
/// Two mutation families with different failure semantics:
///
/// * ordering / selection / publish flips apply to the store first and
///   sync through the queue afterwards (optimistic; a failed sync sets
///   the banner and flags the module stale, it does not roll back);
/// * create / update / delete talk to the API first and merge only the
///   server-confirmed result (a failure leaves local state untouched).
pub struct CourseEditor {
    api: Arc<dyn CourseApi>,
    store: CourseStore,
    queue: SyncQueue,
    drag: DragSession,
}

impl CourseEditor {
    pub fn new(api: Arc<dyn CourseApi>) -> Self {
        let queue = SyncQueue::spawn(api.clone());
        Self {
            api,
            store: CourseStore::new(),
            queue,
            drag: DragSession::new(),
        }
    }

    pub fn store(&self) -> &CourseStore {
        &self.store
    }

    pub fn dismiss_banner(&mut self) -> Option<String> {
        self.store.dismiss_banner()
    }

    pub fn pending_sync(&self) -> usize {
        self.queue.pending()
    }

    /// Reload the whole course from the API, replacing local state and
    /// clearing staleness.
    pub async fn refresh(&mut self, course_id: Uuid) -> EditorResult<()> {
        let api = self.api.clone();
        let modules = api.list_modules(course_id).await;
        let modules = self.remote(modules)?;
        let lessons = api.list_lessons(course_id).await;
        let lessons = self.remote(lessons)?;

        self.store.replace_all(modules, lessons);
        Ok(())
    }

    // --- drag and drop ---

    pub fn drag_begin(&mut self, lesson: Uuid) {
        self.drag.begin(lesson);
    }

    pub fn drag_hover(&mut self, lesson: Uuid) {
        self.drag.hover(lesson);
    }

    pub fn drag_leave(&mut self) {
        self.drag.leave();
    }

    pub fn drag_cancel(&mut self) {
        self.drag.cancel();
    }

    /// Release the dragged lesson. A drop outside a target or onto the
    /// lesson itself is a silent cancel; a cross-module drop is
    /// rejected with both modules left untouched.
    pub fn drag_drop(&mut self) -> EditorResult<()> {
        let Some((dragged, target)) = self.drag.drop_on_target() else {
            return Ok(());
        };
        let commands = self.store.reorder_lesson(dragged, target)?;
        self.queue.enqueue(commands);
        Ok(())
    }

    /// Programmatic reorder: a full begin/hover/drop cycle in one call.
    pub fn move_lesson(&mut self, dragged: Uuid, target: Uuid) -> EditorResult<()> {
        self.drag_begin(dragged);
        self.drag_hover(target);
        self.drag_drop()
    }

    pub fn move_module(&mut self, dragged: Uuid, target: Uuid) -> EditorResult<()> {
        let commands = self.store.reorder_module(dragged, target)?;
        self.queue.enqueue(commands);
        Ok(())
    }

    // --- selection / bulk publish ---

    pub fn toggle_selection(&mut self, lesson: Uuid) -> EditorResult<bool> {
        Ok(self.store.toggle_selection(lesson)?)
    }

    pub fn select_all_in_module(&mut self, module: Uuid) -> EditorResult<()> {
        Ok(self.store.select_all_in_module(module)?)
    }

    pub fn bulk_set_published(&mut self, published: bool) {
        let commands = self.store.bulk_set_published(published);
        self.queue.enqueue(commands);
    }

    // --- lesson CRUD ---

    /// Validate and create a lesson. An invalid draft is rejected
    /// before any request goes out; on success the server-confirmed
    /// lesson is merged into the store.
    pub async fn create_lesson(&mut self, draft: LessonDraft) -> EditorResult<Uuid> {
        draft.validate()?;
        if self.store.module(draft.module_id()).is_none() {
            return Err(StoreError::UnknownModule(draft.module_id()).into());
        }

        let api = self.api.clone();
        let created = api.create_lesson(&draft).await;
        let lesson = self.remote(created)?;

        let id = lesson.id();
        let commands = self.store.insert_lesson(lesson)?;
        self.queue.enqueue(commands);
        Ok(id)
    }

    pub async fn update_lesson(&mut self, id: Uuid, draft: LessonDraft) -> EditorResult<()> {
        draft.validate()?;
        if self.store.lesson(id).is_none() {
            return Err(StoreError::UnknownLesson(id).into());
        }
        if self.store.module(draft.module_id()).is_none() {
            return Err(StoreError::UnknownModule(draft.module_id()).into());
        }

        let api = self.api.clone();
        let updated = api.update_lesson(id, &draft).await;
        let lesson = self.remote(updated)?;

        let commands = self.store.apply_update(lesson)?;
        self.queue.enqueue(commands);
        Ok(())
    }

    /// Delete a lesson. `confirmed` is the caller's confirmation
    /// dialog; nothing happens without it. The server delete runs
    /// first, local removal only after it succeeded.
    pub async fn delete_lesson(&mut self, id: Uuid, confirmed: bool) -> EditorResult<()> {
        if !confirmed {
            return Err(EditorError::DeleteNotConfirmed);
        }
        if self.store.lesson(id).is_none() {
            return Err(StoreError::UnknownLesson(id).into());
        }

        let api = self.api.clone();
        let deleted = api.delete_lesson(id).await;
        self.remote(deleted)?;

        let commands = self.store.remove_lesson(id)?;
        self.queue.enqueue(commands);
        Ok(())
    }

    // --- module CRUD ---

    pub async fn create_module(&mut self, draft: ModuleDraft) -> EditorResult<Uuid> {
        draft.validate()?;

        let api = self.api.clone();
        let created = api.create_module(&draft).await;
        let module = self.remote(created)?;

        let id = module.id();
        let commands = self.store.insert_module(module);
        self.queue.enqueue(commands);
        Ok(id)
    }

    pub async fn update_module(&mut self, id: Uuid, draft: ModuleDraft) -> EditorResult<()> {
        draft.validate()?;
        if self.store.module(id).is_none() {
            return Err(StoreError::UnknownModule(id).into());
        }

        let api = self.api.clone();
        let updated = api.update_module(id, &draft).await;
        let module = self.remote(updated)?;

        self.store.apply_module_update(module)?;
        Ok(())
    }

    /// Delete an empty module. Refused locally while lessons still
    /// reference it, so the dangling-module invariant can't be broken
    /// remotely either.
    pub async fn delete_module(&mut self, id: Uuid, confirmed: bool) -> EditorResult<()> {
        if !confirmed {
            return Err(EditorError::DeleteNotConfirmed);
        }
        if self.store.module(id).is_none() {
            return Err(StoreError::UnknownModule(id).into());
        }
        if !self.store.lessons_in(id).is_empty() {
            return Err(StoreError::ModuleNotEmpty(id).into());
        }

        let api = self.api.clone();
        let deleted = api.delete_module(id).await;
        self.remote(deleted)?;

        let commands = self.store.remove_module(id)?;
        self.queue.enqueue(commands);
        Ok(())
    }

    // --- uploads ---

    /// Push file bytes to the API, returning the stored URL for use in
    /// a pdf/audio/file lesson payload.
    pub async fn upload_file(&mut self, filename: &str, bytes: Vec<u8>) -> EditorResult<String> {
        let api = self.api.clone();
        let uploaded = api.upload_file(filename, bytes).await;
        self.remote(uploaded)
    }

    // --- sync ---

    /// Wait out the sync queue and fold every outcome into the store.
    /// Failed commands surface through the banner and staleness flags,
    /// never as an error here.
    pub async fn settle(&mut self) -> Vec<SyncOutcome> {
        let outcomes = self.queue.settle().await;
        for outcome in &outcomes {
            self.store.apply_outcome(outcome);
        }
        outcomes
    }

    pub async fn shutdown(self) {
        self.queue.shutdown().await;
    }

    fn remote<T>(&mut self, result: ApiResult<T>) -> EditorResult<T> {
        result.map_err(|error| {
            self.store.set_banner(error.client_display());
            EditorError::from(error)
        })
    }
}
