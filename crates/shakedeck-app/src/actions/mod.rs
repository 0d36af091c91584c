//! Action handlers: UpdateAction dispatch and background task spawning
//!
//! Every action either spawns a short-lived request task or starts/stops a
//! long-lived one (stream worker, reconnect timer, pollers). Long-lived tasks
//! are tracked in [`TaskRegistry`] so they can be cancelled; results always
//! come back to the update loop as [`Message`]s.

use std::collections::HashMap;

use tokio::sync::mpsc;

use shakedeck_client::TaskGateway;
use shakedeck_core::prelude::*;
use shakedeck_core::TaskId;

use crate::message::Message;
use crate::UpdateAction;

pub(crate) mod polling;
pub(crate) mod requests;
pub(crate) mod stream;

pub use polling::POLL_MIN_MS;
pub use requests::STOP_THEN_DELETE_DELAY;

/// Periodic refreshes, keyed by what they refresh
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PollKind {
    TaskList,
    Statistics,
    RealtimeStatus(TaskId),
}

/// Gateways usable from spawned tasks
pub trait SharedGateway: TaskGateway + Clone + Send + Sync + 'static {}

impl<G> SharedGateway for G where G: TaskGateway + Clone + Send + Sync + 'static {}

// ─────────────────────────────────────────────────────────────────────────────
// TaskRegistry
// ─────────────────────────────────────────────────────────────────────────────

/// Handles of the long-lived background tasks
#[derive(Debug, Default)]
pub struct TaskRegistry {
    pub(crate) stream: Option<stream::StreamWorker>,
    pub(crate) reconnect_timer: Option<stream::ReconnectTimer>,
    pub(crate) pollers: HashMap<PollKind, polling::Poller>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_polling(&self, kind: &PollKind) -> bool {
        self.pollers.contains_key(kind)
    }

    pub fn poller_count(&self) -> usize {
        self.pollers.len()
    }

    pub fn has_stream(&self) -> bool {
        self.stream.is_some()
    }

    pub fn has_reconnect_timer(&self) -> bool {
        self.reconnect_timer.is_some()
    }

    /// Cancel everything. Used on shutdown.
    pub fn shutdown(&mut self) {
        polling::stop_all(self);
        if let Some(worker) = self.stream.take() {
            worker.stop();
        }
        if let Some(timer) = self.reconnect_timer.take() {
            timer.cancel();
        }
    }
}

/// Execute an action
pub fn handle_action<G: SharedGateway>(
    action: UpdateAction,
    msg_tx: mpsc::Sender<Message>,
    gateway: &G,
    registry: &mut TaskRegistry,
) {
    match action {
        UpdateAction::Batch(actions) => {
            for action in actions {
                handle_action(action, msg_tx.clone(), gateway, registry);
            }
        }

        UpdateAction::LoadTasks => requests::spawn_load_tasks(gateway.clone(), msg_tx),
        UpdateAction::LoadStatistics => requests::spawn_load_statistics(gateway.clone(), msg_tx),
        UpdateAction::LoadTask { task_id } => {
            requests::spawn_load_task(gateway.clone(), msg_tx, task_id)
        }
        UpdateAction::LoadRealtimeStatus { task_id } => {
            requests::spawn_load_realtime_status(gateway.clone(), msg_tx, task_id)
        }
        UpdateAction::LoadLogs { query } => {
            requests::spawn_load_logs(gateway.clone(), msg_tx, query)
        }
        UpdateAction::SaveTask { task_id, input } => {
            requests::spawn_save_task(gateway.clone(), msg_tx, task_id, input)
        }
        UpdateAction::RunTaskOp { task_id, op } => {
            requests::spawn_task_op(gateway.clone(), msg_tx, task_id, op)
        }
        UpdateAction::ClearLogs { task_id } => {
            requests::spawn_clear_logs(gateway.clone(), msg_tx, task_id)
        }
        UpdateAction::ExportLiveLog { export, directory } => {
            requests::spawn_export(msg_tx, export, directory)
        }

        UpdateAction::LogStream(commands) => {
            for command in commands {
                stream::execute(command, &msg_tx, gateway, registry);
            }
        }

        UpdateAction::StartPolling { kind, interval } => {
            polling::start(kind, interval, gateway.clone(), msg_tx, registry)
        }
        UpdateAction::StopPolling { kind } => polling::stop(&kind, registry),
        UpdateAction::StopAllPolling => {
            debug!("Stopping {} pollers", registry.pollers.len());
            polling::stop_all(registry)
        }
    }
}
