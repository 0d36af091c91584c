//! Message types for the application (TEA pattern)

use std::path::PathBuf;

use shakedeck_core::{
    RealtimeStatus, SyncTask, TaskId, TaskLog, TaskStatistics, TransportEvent,
};

use crate::actions::PollKind;
use crate::input_key::InputKey;
use crate::log_stream::StreamToken;
use crate::state::View;

/// Task operations that go through the server and report back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOp {
    Start,
    Stop,
    Delete,
    /// Stop, wait, then delete (used for running tasks)
    StopThenDelete,
}

impl TaskOp {
    pub fn verb(&self) -> &'static str {
        match self {
            TaskOp::Start => "start",
            TaskOp::Stop => "stop",
            TaskOp::Delete | TaskOp::StopThenDelete => "delete",
        }
    }
}

/// All possible messages/events in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from the terminal
    Key(InputKey),
    /// Periodic tick (notification expiry)
    Tick,
    /// Request to quit
    Quit,

    // ─────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────
    SwitchView(View),
    /// Reload whatever the current view shows
    Refresh,
    OpenTaskDetail { task_id: TaskId },
    CloseTaskDetail,
    OpenLiveLog { task_id: TaskId },
    CloseLiveLog,

    // ─────────────────────────────────────────────────────────
    // Server data
    // ─────────────────────────────────────────────────────────
    TasksLoaded { tasks: Vec<SyncTask> },
    StatisticsLoaded { statistics: TaskStatistics },
    TaskLoaded { task: SyncTask },
    RealtimeStatusLoaded { task_id: TaskId, status: RealtimeStatus },
    LogsLoaded { logs: Vec<TaskLog> },
    /// A background refresh failed; shown in the header, not as a toast
    PollFailed { kind: PollKind, message: String },

    // ─────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────
    TaskSaved {
        task: SyncTask,
        created: bool,
    },
    TaskOpCompleted {
        task_id: TaskId,
        op: TaskOp,
        message: String,
    },
    LogsCleared {
        task_id: Option<TaskId>,
        message: String,
    },
    /// A user-initiated request failed. `message` is ready for display.
    RequestFailed { context: String, message: String },

    // ─────────────────────────────────────────────────────────
    // Confirmation
    // ─────────────────────────────────────────────────────────
    /// Ask before deleting; running tasks get the stop-then-delete prompt
    RequestDeleteTask { task_id: TaskId },
    DeleteTaskConfirmed { task_id: TaskId, stop_first: bool },
    /// Ask before clearing stored logs (all tasks when `task_id` is None)
    RequestClearLogs { task_id: Option<TaskId> },
    ClearLogsConfirmed { task_id: Option<TaskId> },
    CancelConfirm,

    // ─────────────────────────────────────────────────────────
    // Live log stream
    // ─────────────────────────────────────────────────────────
    LogStreamTransport {
        token: StreamToken,
        event: TransportEvent,
    },
    LogStreamReconnectDue { token: StreamToken },
    ExportLiveLog,
    LogExported { path: PathBuf, line_count: usize },
    LogExportFailed { message: String },
}
