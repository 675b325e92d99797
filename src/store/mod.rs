use std::collections::{HashMap, HashSet};

use thiserror::Error;
use uuid::Uuid;

use crate::model::entity::{CourseModule, Lesson};
use crate::utils::duration::{format_duration, parse_duration};

mod drag;
pub use drag::{DragSession, DragState};

mod sync;
pub use sync::{SyncCommand, SyncOutcome, SyncQueue};

mod editor;
pub use editor::{CourseEditor, EditorError, EditorResult};

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("unknown lesson: {0}")]
    UnknownLesson(Uuid),
    #[error("unknown module: {0}")]
    UnknownModule(Uuid),
    #[error("lessons can only be dragged within their own module")]
    CrossModuleDrag { dragged: Uuid, target: Uuid },
    #[error("module {0} still contains lessons")]
    ModuleNotEmpty(Uuid),
}

/// Lesson count and summed duration of one module, shown next to the
/// module title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleStats {
    pub lesson_count: usize,
    pub total_minutes: u32,
}

impl ModuleStats {
    pub fn formatted_duration(&self) -> String {
        format_duration(self.total_minutes)
    }
}

/// Locally-visible ordering, selection and publish state for the
/// lessons of one course, grouped by module.
///
/// The store is a plain state machine: mutations apply immediately
/// (optimistically) and return the [`SyncCommand`]s needed to bring the
/// remote API up to date. Executing those commands is the
/// [`SyncQueue`]'s job; folding failures back in happens through
/// [`CourseStore::apply_outcome`].
///
/// Within a module, lesson ordering ranks always form a dense `1..=N`
/// sequence; every mutation that touches an ordering renumbers the
/// affected module before returning.
#[derive(Debug, Default)]
pub struct CourseStore {
    modules: Vec<CourseModule>,
    lessons: HashMap<Uuid, Lesson>,
    // module id -> lesson ids in rank order, so per-module views don't
    // re-filter the whole lesson set
    index: HashMap<Uuid, Vec<Uuid>>,
    selection: HashSet<Uuid>,
    banner: Option<String>,
    stale: HashSet<Uuid>,
}

impl CourseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole local state with a fresh server snapshot.
    /// Selection entries for lessons that no longer exist are dropped;
    /// staleness is cleared.
    pub fn replace_all(&mut self, mut modules: Vec<CourseModule>, lessons: Vec<Lesson>) {
        modules.sort_by_key(CourseModule::module_order);

        self.index = modules.iter().map(|m| (m.id(), Vec::new())).collect();
        self.lessons.clear();

        let mut ordered: Vec<Lesson> = lessons;
        ordered.sort_by_key(Lesson::lesson_order);
        for lesson in ordered {
            match self.index.get_mut(&lesson.module_id()) {
                Some(ids) => {
                    ids.push(lesson.id());
                    self.lessons.insert(lesson.id(), lesson);
                }
                None => {
                    tracing::warn!(
                        lesson = %lesson.id(),
                        module = %lesson.module_id(),
                        "dropping lesson referencing an unknown module"
                    );
                }
            }
        }

        // a snapshot taken after a failed sync may carry gaps or
        // duplicate ranks; normalize so the local view is dense again
        for ids in self.index.values() {
            for (position, id) in ids.iter().enumerate() {
                if let Some(lesson) = self.lessons.get_mut(id) {
                    lesson.set_lesson_order((position + 1) as i32);
                }
            }
        }

        self.modules = modules;
        self.selection.retain(|id| self.lessons.contains_key(id));
        self.stale.clear();
    }

    // --- ordering ---

    /// Reorder a lesson by dropping it onto another lesson of the same
    /// module: the dragged lesson is removed and re-inserted at the
    /// target's position, then the module is renumbered from 1.
    ///
    /// Cross-module drags are rejected and leave both modules
    /// untouched.
    pub fn reorder_lesson(&mut self, dragged: Uuid, target: Uuid) -> StoreResult<Vec<SyncCommand>> {
        let dragged_module = self
            .lessons
            .get(&dragged)
            .ok_or(StoreError::UnknownLesson(dragged))?
            .module_id();
        let target_module = self
            .lessons
            .get(&target)
            .ok_or(StoreError::UnknownLesson(target))?
            .module_id();

        if dragged_module != target_module {
            return Err(StoreError::CrossModuleDrag { dragged, target });
        }
        if dragged == target {
            return Ok(Vec::new());
        }

        let ids = self
            .index
            .get_mut(&dragged_module)
            .ok_or(StoreError::UnknownModule(dragged_module))?;
        let from = ids
            .iter()
            .position(|id| *id == dragged)
            .ok_or(StoreError::UnknownLesson(dragged))?;
        let to = ids
            .iter()
            .position(|id| *id == target)
            .ok_or(StoreError::UnknownLesson(target))?;

        let moved = ids.remove(from);
        ids.insert(to, moved);

        Ok(self.renumber_lessons(dragged_module))
    }

    /// Same splice-and-renumber over the module list itself.
    pub fn reorder_module(&mut self, dragged: Uuid, target: Uuid) -> StoreResult<Vec<SyncCommand>> {
        if dragged == target {
            return Ok(Vec::new());
        }
        let from = self
            .modules
            .iter()
            .position(|m| m.id() == dragged)
            .ok_or(StoreError::UnknownModule(dragged))?;
        let to = self
            .modules
            .iter()
            .position(|m| m.id() == target)
            .ok_or(StoreError::UnknownModule(target))?;

        let moved = self.modules.remove(from);
        self.modules.insert(to, moved);

        Ok(self.renumber_modules())
    }

    fn renumber_lessons(&mut self, module_id: Uuid) -> Vec<SyncCommand> {
        let ids = self.index.get(&module_id).cloned().unwrap_or_default();

        let mut commands = Vec::new();
        for (position, id) in ids.iter().enumerate() {
            let lesson_order = (position + 1) as i32;
            if let Some(lesson) = self.lessons.get_mut(id) {
                if lesson.lesson_order() != lesson_order {
                    lesson.set_lesson_order(lesson_order);
                    commands.push(SyncCommand::SetLessonOrder {
                        lesson_id: *id,
                        module_id,
                        lesson_order,
                    });
                }
            }
        }
        commands
    }

    fn renumber_modules(&mut self) -> Vec<SyncCommand> {
        let mut commands = Vec::new();
        for (position, module) in self.modules.iter_mut().enumerate() {
            let module_order = (position + 1) as i32;
            if module.module_order() != module_order {
                module.set_module_order(module_order);
                commands.push(SyncCommand::SetModuleOrder {
                    module_id: module.id(),
                    module_order,
                });
            }
        }
        commands
    }

    // --- selection ---

    /// Add or remove one lesson from the selection set. Returns whether
    /// the lesson is selected afterwards.
    pub fn toggle_selection(&mut self, id: Uuid) -> StoreResult<bool> {
        if !self.lessons.contains_key(&id) {
            return Err(StoreError::UnknownLesson(id));
        }
        if self.selection.remove(&id) {
            Ok(false)
        } else {
            self.selection.insert(id);
            Ok(true)
        }
    }

    /// Select every lesson of the module, unless all of them already
    /// are selected, in which case deselect them all.
    pub fn select_all_in_module(&mut self, module_id: Uuid) -> StoreResult<()> {
        let ids = self
            .index
            .get(&module_id)
            .ok_or(StoreError::UnknownModule(module_id))?;

        if ids.iter().all(|id| self.selection.contains(id)) {
            for id in ids {
                self.selection.remove(id);
            }
        } else {
            self.selection.extend(ids.iter().copied());
        }
        Ok(())
    }

    pub fn is_selected(&self, id: Uuid) -> bool {
        self.selection.contains(&id)
    }

    pub fn selection(&self) -> &HashSet<Uuid> {
        &self.selection
    }

    /// Flip the publish flag on every selected lesson, clear the
    /// selection, and emit one sync command per affected lesson.
    pub fn bulk_set_published(&mut self, published: bool) -> Vec<SyncCommand> {
        let mut commands = Vec::new();
        // walk in module/rank order so the emitted commands are
        // deterministic
        for module in &self.modules {
            let Some(ids) = self.index.get(&module.id()) else {
                continue;
            };
            for id in ids {
                if !self.selection.contains(id) {
                    continue;
                }
                if let Some(lesson) = self.lessons.get_mut(id) {
                    lesson.set_published(published);
                    commands.push(SyncCommand::SetPublished {
                        lesson_id: *id,
                        module_id: module.id(),
                        published,
                    });
                }
            }
        }
        self.selection.clear();
        commands
    }

    // --- lesson merge ops (server-confirmed state) ---

    /// Merge a server-confirmed new lesson into local state. The lesson
    /// slots in at its reported rank (clamped), and the module is
    /// renumbered to keep ranks dense.
    pub fn insert_lesson(&mut self, lesson: Lesson) -> StoreResult<Vec<SyncCommand>> {
        let module_id = lesson.module_id();
        let ids = self
            .index
            .get_mut(&module_id)
            .ok_or(StoreError::UnknownModule(module_id))?;

        let position = usize::try_from(lesson.lesson_order() - 1)
            .unwrap_or(0)
            .min(ids.len());
        ids.insert(position, lesson.id());
        self.lessons.insert(lesson.id(), lesson);

        Ok(self.renumber_lessons(module_id))
    }

    /// Merge a server-confirmed update of an existing lesson. An edit
    /// may reassign the lesson to another module; both modules get
    /// renumbered in that case.
    pub fn apply_update(&mut self, lesson: Lesson) -> StoreResult<Vec<SyncCommand>> {
        let old_module = self
            .lessons
            .get(&lesson.id())
            .ok_or(StoreError::UnknownLesson(lesson.id()))?
            .module_id();
        let new_module = lesson.module_id();
        if !self.index.contains_key(&new_module) {
            return Err(StoreError::UnknownModule(new_module));
        }

        let mut commands = Vec::new();
        if old_module != new_module {
            if let Some(ids) = self.index.get_mut(&old_module) {
                ids.retain(|id| *id != lesson.id());
            }
            commands.extend(self.renumber_lessons(old_module));

            // appended at the end of its new module
            if let Some(ids) = self.index.get_mut(&new_module) {
                ids.push(lesson.id());
            }
        }
        self.lessons.insert(lesson.id(), lesson);
        commands.extend(self.renumber_lessons(new_module));
        Ok(commands)
    }

    /// Drop a lesson after the server confirmed the delete, renumbering
    /// the remaining lessons of its module.
    pub fn remove_lesson(&mut self, id: Uuid) -> StoreResult<Vec<SyncCommand>> {
        let lesson = self
            .lessons
            .remove(&id)
            .ok_or(StoreError::UnknownLesson(id))?;
        self.selection.remove(&id);
        if let Some(ids) = self.index.get_mut(&lesson.module_id()) {
            ids.retain(|entry| *entry != id);
        }
        Ok(self.renumber_lessons(lesson.module_id()))
    }

    // --- module merge ops ---

    pub fn insert_module(&mut self, module: CourseModule) -> Vec<SyncCommand> {
        self.index.entry(module.id()).or_default();
        self.modules.push(module);
        self.modules.sort_by_key(CourseModule::module_order);
        self.renumber_modules()
    }

    pub fn apply_module_update(&mut self, module: CourseModule) -> StoreResult<()> {
        let slot = self
            .modules
            .iter_mut()
            .find(|m| m.id() == module.id())
            .ok_or(StoreError::UnknownModule(module.id()))?;
        *slot = module;
        self.modules.sort_by_key(CourseModule::module_order);
        Ok(())
    }

    /// Drop an empty module. Refuses while lessons still reference it,
    /// so lessons can never be left pointing at a missing module.
    pub fn remove_module(&mut self, id: Uuid) -> StoreResult<Vec<SyncCommand>> {
        let position = self
            .modules
            .iter()
            .position(|m| m.id() == id)
            .ok_or(StoreError::UnknownModule(id))?;
        if self.index.get(&id).is_some_and(|ids| !ids.is_empty()) {
            return Err(StoreError::ModuleNotEmpty(id));
        }
        self.modules.remove(position);
        self.index.remove(&id);
        self.stale.remove(&id);
        Ok(self.renumber_modules())
    }

    // --- sync feedback ---

    /// Fold a completed sync command back in. Failures set the banner
    /// and flag the command's module as stale; the optimistic local
    /// state stays as it is and a later refresh reconciles.
    pub fn apply_outcome(&mut self, outcome: &SyncOutcome) {
        if let Err(error) = &outcome.result {
            tracing::warn!(command = ?outcome.command, %error, "sync command failed");
            self.set_banner(error.client_display());
            self.mark_stale(outcome.command.module_id());
        }
    }

    pub fn set_banner(&mut self, message: String) {
        self.banner = Some(message);
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn dismiss_banner(&mut self) -> Option<String> {
        self.banner.take()
    }

    pub fn mark_stale(&mut self, module_id: Uuid) {
        self.stale.insert(module_id);
    }

    pub fn stale_modules(&self) -> &HashSet<Uuid> {
        &self.stale
    }

    // --- queries ---

    pub fn modules(&self) -> &[CourseModule] {
        &self.modules
    }

    pub fn module(&self, id: Uuid) -> Option<&CourseModule> {
        self.modules.iter().find(|m| m.id() == id)
    }

    pub fn lesson(&self, id: Uuid) -> Option<&Lesson> {
        self.lessons.get(&id)
    }

    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }

    /// Lessons of one module in rank order.
    pub fn lessons_in(&self, module_id: Uuid) -> Vec<&Lesson> {
        self.index
            .get(&module_id)
            .map(|ids| ids.iter().filter_map(|id| self.lessons.get(id)).collect())
            .unwrap_or_default()
    }

    /// Modules in order, each with its lessons in rank order.
    pub fn outline(&self) -> Vec<(&CourseModule, Vec<&Lesson>)> {
        self.modules
            .iter()
            .map(|module| (module, self.lessons_in(module.id())))
            .collect()
    }

    pub fn module_stats(&self, module_id: Uuid) -> StoreResult<ModuleStats> {
        if !self.index.contains_key(&module_id) {
            return Err(StoreError::UnknownModule(module_id));
        }
        let lessons = self.lessons_in(module_id);
        let total_minutes = lessons
            .iter()
            .map(|lesson| parse_duration(lesson.duration()).unwrap_or(0))
            .sum();
        Ok(ModuleStats {
            lesson_count: lessons.len(),
            total_minutes,
        })
    }
}
