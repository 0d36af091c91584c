//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `keys`: Key event handlers per UI mode
//! - `navigation`: View switching, task detail and polling lifetimes
//! - `tasks`: Task mutations, confirmations and their results
//! - `log_stream`: Live log modal and stream routing

pub(crate) mod keys;
pub(crate) mod log_stream;
pub(crate) mod navigation;
pub(crate) mod tasks;
pub(crate) mod update;

#[cfg(test)]
mod tests;

use std::path::PathBuf;
use std::time::Duration;

use shakedeck_core::{LogQuery, TaskId, TaskInput};

use crate::actions::PollKind;
use crate::log_stream::{LogExport, StreamCommand};
use crate::message::{Message, TaskOp};

pub use update::update;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    LoadTasks,
    LoadStatistics,
    LoadTask { task_id: TaskId },
    LoadRealtimeStatus { task_id: TaskId },
    LoadLogs { query: LogQuery },

    /// Create (`task_id` None) or update a task
    SaveTask {
        task_id: Option<TaskId>,
        input: TaskInput,
    },
    RunTaskOp { task_id: TaskId, op: TaskOp },
    /// Clear stored logs for one task, or for all tasks
    ClearLogs { task_id: Option<TaskId> },

    /// Carry out live log session commands, in order
    LogStream(Vec<StreamCommand>),
    ExportLiveLog {
        export: LogExport,
        directory: PathBuf,
    },

    /// Start (or restart) a periodic refresh
    StartPolling { kind: PollKind, interval: Duration },
    StopPolling { kind: PollKind },
    StopAllPolling,

    /// Several actions, performed in order
    Batch(Vec<UpdateAction>),
}

impl UpdateAction {
    /// Combine actions, flattening away the single-action case.
    pub fn batch(mut actions: Vec<UpdateAction>) -> Option<UpdateAction> {
        match actions.len() {
            0 => None,
            1 => actions.pop(),
            _ => Some(UpdateAction::Batch(actions)),
        }
    }

    /// Stream commands as an action, `None` when there is nothing to do.
    pub fn stream(commands: Vec<StreamCommand>) -> Option<UpdateAction> {
        (!commands.is_empty()).then_some(UpdateAction::LogStream(commands))
    }
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }

    pub fn maybe_action(action: Option<UpdateAction>) -> Self {
        Self {
            message: None,
            action,
        }
    }

    pub fn actions(actions: Vec<UpdateAction>) -> Self {
        Self::maybe_action(UpdateAction::batch(actions))
    }
}
