use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::api::{ApiResult, CourseApi, LessonPatch, ModulePatch};

/// One remote write owed after an optimistic local mutation. Each
/// command maps to a single partial `PUT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncCommand {
    SetLessonOrder {
        lesson_id: Uuid,
        module_id: Uuid,
        lesson_order: i32,
    },
    SetPublished {
        lesson_id: Uuid,
        module_id: Uuid,
        published: bool,
    },
    SetModuleOrder {
        module_id: Uuid,
        module_order: i32,
    },
}

impl SyncCommand {
    /// The module whose server-side state this command touches; used to
    /// flag staleness when the command fails.
    pub fn module_id(&self) -> Uuid {
        match self {
            Self::SetLessonOrder { module_id, .. }
            | Self::SetPublished { module_id, .. }
            | Self::SetModuleOrder { module_id, .. } => *module_id,
        }
    }
}

#[derive(Debug)]
pub struct SyncOutcome {
    pub command: SyncCommand,
    pub result: ApiResult<()>,
}

/// Queue of pending remote writes, drained by one worker task in
/// submission order. Serializing the writes bounds the lost-update
/// hazard of overlapping bulk mutations to a single in-flight call;
/// the local view never waits on any of them.
pub struct SyncQueue {
    commands: mpsc::UnboundedSender<SyncCommand>,
    outcomes: mpsc::UnboundedReceiver<SyncOutcome>,
    in_flight: usize,
    worker: JoinHandle<()>,
}

impl SyncQueue {
    pub fn spawn(api: Arc<dyn CourseApi>) -> Self {
        let (commands, mut command_rx) = mpsc::unbounded_channel::<SyncCommand>();
        let (outcome_tx, outcomes) = mpsc::unbounded_channel();

        let worker = tokio::spawn(async move {
            while let Some(command) = command_rx.recv().await {
                tracing::debug!(?command, "running sync command");
                let result = run_command(api.as_ref(), command).await;
                if outcome_tx.send(SyncOutcome { command, result }).is_err() {
                    break;
                }
            }
        });

        Self {
            commands,
            outcomes,
            in_flight: 0,
            worker,
        }
    }

    pub fn enqueue(&mut self, commands: Vec<SyncCommand>) {
        for command in commands {
            if self.commands.send(command).is_ok() {
                self.in_flight += 1;
            }
        }
    }

    pub fn pending(&self) -> usize {
        self.in_flight
    }

    /// Wait until every queued command has completed, returning the
    /// outcomes in completion order. Failures come back as outcomes,
    /// never as a panic or an early return.
    pub async fn settle(&mut self) -> Vec<SyncOutcome> {
        let mut settled = Vec::new();
        while self.in_flight > 0 {
            match self.outcomes.recv().await {
                Some(outcome) => {
                    self.in_flight -= 1;
                    settled.push(outcome);
                }
                None => break,
            }
        }
        settled
    }

    pub async fn shutdown(self) {
        let Self {
            commands, worker, ..
        } = self;
        drop(commands);
        let _ = worker.await;
    }
}

async fn run_command(api: &dyn CourseApi, command: SyncCommand) -> ApiResult<()> {
    match command {
        SyncCommand::SetLessonOrder {
            lesson_id,
            lesson_order,
            ..
        } => {
            api.patch_lesson(lesson_id, &LessonPatch::lesson_order(lesson_order))
                .await
        }
        SyncCommand::SetPublished {
            lesson_id,
            published,
            ..
        } => {
            api.patch_lesson(lesson_id, &LessonPatch::published(published))
                .await
        }
        SyncCommand::SetModuleOrder {
            module_id,
            module_order,
        } => {
            api.patch_module(module_id, &ModulePatch::module_order(module_order))
                .await
        }
    }
}
