//! Live log stream session
//!
//! [`LogStreamSession`] is the client-side state for one task's live log:
//! connection status, the rendered log, the paused buffer and the reconnect
//! bookkeeping. It performs no I/O. Every operation returns the
//! [`StreamCommand`]s the caller must carry out (open or close a transport,
//! arm a reconnect timer), so the whole lifecycle can be driven from tests.
//!
//! ```text
//! disconnected ──open──▶ connecting ──transport open──▶ connected
//!                            ▲                              │
//!                            │ reconnect due                │ transport error
//!                            │ (token still current)        ▼
//!                            └────────────────────────── error
//! any ──close──▶ disconnected (no further transitions)
//! ```
//!
//! Every transport connection is identified by a [`StreamToken`]: the
//! session id plus a per-session epoch that advances on each (re)connect.
//! Events and timers carrying an older token are ignored, which is what
//! keeps a closed or superseded session from coming back to life.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};

use shakedeck_core::prelude::*;
use shakedeck_core::{LogEntry, StreamEvent, TaskId, TransportEvent};

/// Unique identifier of a session within this process
pub type SessionId = u64;

/// Global counter for generating unique session IDs
static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a new unique session ID
pub fn next_session_id() -> SessionId {
    NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed)
}

/// Banner text shown while waiting to reconnect after a transport failure.
pub const RECONNECTING_MESSAGE: &str = "Connection interrupted, reconnecting...";

/// Default delay between a transport failure and the reconnect attempt.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(3000);

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// Identifies one transport connection of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamToken {
    pub session_id: SessionId,
    pub epoch: u64,
}

/// Transport health as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl ConnectionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "Disconnected",
            ConnectionStatus::Connecting => "Connecting",
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Error => "Connection error",
        }
    }
}

/// Side effects requested by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamCommand {
    /// Open a transport for `task_id`; tag all its events with `token`.
    Connect { token: StreamToken, task_id: TaskId },
    /// Close whatever transport and timer belong to this session.
    Disconnect { session_id: SessionId },
    /// Deliver `token` back to the session after `delay`.
    ScheduleReconnect { token: StreamToken, delay: Duration },
}

/// Text export of the rendered log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogExport {
    pub file_name: String,
    pub contents: String,
    pub line_count: usize,
}

// ─────────────────────────────────────────────────────────────────────────────
// LogStreamSession
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct LogStreamSession {
    id: SessionId,
    task_id: TaskId,
    epoch: u64,
    /// False once closed; nothing reconnects an undesired session.
    desired: bool,
    /// A reconnect has been scheduled for the current epoch.
    reconnect_pending: bool,
    reconnect_delay: Duration,

    status: ConnectionStatus,
    paused: bool,
    auto_scroll: bool,
    live_log: Vec<LogEntry>,
    paused_buffer: Vec<LogEntry>,
    last_error: Option<String>,
    /// Payloads that failed to decode
    malformed: u64,
}

impl LogStreamSession {
    pub fn new(task_id: impl Into<TaskId>, reconnect_delay: Duration, auto_scroll: bool) -> Self {
        Self {
            id: next_session_id(),
            task_id: task_id.into(),
            epoch: 0,
            desired: false,
            reconnect_pending: false,
            reconnect_delay,
            status: ConnectionStatus::Disconnected,
            paused: false,
            auto_scroll,
            live_log: Vec::new(),
            paused_buffer: Vec::new(),
            last_error: None,
            malformed: 0,
        }
    }

    // ─────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn token(&self) -> StreamToken {
        StreamToken {
            session_id: self.id,
            epoch: self.epoch,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn auto_scroll(&self) -> bool {
        self.auto_scroll
    }

    /// The entries shown to the user, in arrival order.
    pub fn live_log(&self) -> &[LogEntry] {
        &self.live_log
    }

    /// Entries received while paused, not yet shown.
    pub fn paused_buffer(&self) -> &[LogEntry] {
        &self.paused_buffer
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.desired
    }

    pub fn malformed_count(&self) -> u64 {
        self.malformed
    }

    /// Whether `token` names the transport this session currently expects.
    pub fn is_current(&self, token: StreamToken) -> bool {
        token.session_id == self.id && token.epoch == self.epoch
    }

    // ─────────────────────────────────────────────────────────
    // Connection lifecycle
    // ─────────────────────────────────────────────────────────

    /// Start streaming. A no-op if the session is already open.
    pub fn open(&mut self) -> Vec<StreamCommand> {
        if self.desired {
            return Vec::new();
        }
        self.desired = true;
        info!("Log stream session {} opening for task {}", self.id, self.task_id);
        vec![self.begin_connection()]
    }

    /// User-requested reconnect, independent of the automatic retry.
    pub fn reconnect(&mut self) -> Vec<StreamCommand> {
        if !self.desired {
            return Vec::new();
        }
        info!("Log stream session {}: manual reconnect", self.id);
        vec![
            StreamCommand::Disconnect { session_id: self.id },
            self.begin_connection(),
        ]
    }

    /// Stop streaming for good. Idempotent.
    pub fn close(&mut self) -> Vec<StreamCommand> {
        if !self.desired {
            return Vec::new();
        }
        self.desired = false;
        self.reconnect_pending = false;
        self.status = ConnectionStatus::Disconnected;
        // advance the epoch so nothing in flight matches any more
        self.epoch += 1;
        info!("Log stream session {} closed", self.id);
        vec![StreamCommand::Disconnect { session_id: self.id }]
    }

    fn begin_connection(&mut self) -> StreamCommand {
        self.epoch += 1;
        self.reconnect_pending = false;
        self.status = ConnectionStatus::Connecting;
        self.last_error = None;
        StreamCommand::Connect {
            token: self.token(),
            task_id: self.task_id.clone(),
        }
    }

    /// Route a transport event. Events for stale tokens are dropped.
    pub fn on_transport_event(
        &mut self,
        token: StreamToken,
        event: TransportEvent,
    ) -> Vec<StreamCommand> {
        if !self.desired || !self.is_current(token) {
            trace!(
                "Log stream session {}: dropping event for stale token {:?}",
                self.id,
                token
            );
            return Vec::new();
        }
        match event {
            TransportEvent::Opened => {
                self.on_transport_open();
                Vec::new()
            }
            TransportEvent::Message(raw) => {
                self.on_event(&raw);
                Vec::new()
            }
            TransportEvent::Failed(reason) => self.on_transport_error(&reason),
        }
    }

    pub fn on_transport_open(&mut self) {
        if self.status == ConnectionStatus::Connecting {
            self.status = ConnectionStatus::Connected;
            debug!("Log stream session {}: transport open", self.id);
        }
    }

    /// Transport failed: flag the error and schedule one reconnect for this
    /// epoch.
    pub fn on_transport_error(&mut self, reason: &str) -> Vec<StreamCommand> {
        if !self.desired || self.reconnect_pending {
            return Vec::new();
        }
        warn!(
            "Log stream session {} (task {}): transport error: {}",
            self.id, self.task_id, reason
        );
        self.status = ConnectionStatus::Error;
        self.last_error = Some(RECONNECTING_MESSAGE.to_string());
        self.reconnect_pending = true;
        vec![StreamCommand::ScheduleReconnect {
            token: self.token(),
            delay: self.reconnect_delay,
        }]
    }

    /// A reconnect timer fired. Only the timer armed for the current epoch
    /// of a still-open session reconnects.
    pub fn on_reconnect_due(&mut self, token: StreamToken) -> Vec<StreamCommand> {
        if !self.desired || !self.is_current(token) || !self.reconnect_pending {
            debug!(
                "Log stream session {}: ignoring stale reconnect timer {:?}",
                self.id, token
            );
            return Vec::new();
        }
        info!("Log stream session {}: reconnecting", self.id);
        vec![
            StreamCommand::Disconnect { session_id: self.id },
            self.begin_connection(),
        ]
    }

    // ─────────────────────────────────────────────────────────
    // Inbound events
    // ─────────────────────────────────────────────────────────

    /// Decode and apply one stream payload. Malformed payloads are logged
    /// and otherwise ignored.
    pub fn on_event(&mut self, raw: &str) {
        let event = match StreamEvent::parse(raw) {
            Ok(event) => event,
            Err(e) => {
                self.malformed += 1;
                warn!(
                    "Log stream session {}: dropping malformed message ({}): {:.120}",
                    self.id, e, raw
                );
                return;
            }
        };

        match event {
            StreamEvent::Connected => {
                self.status = ConnectionStatus::Connected;
                self.last_error = None;
            }
            StreamEvent::Log(log) => {
                let task_id = log.task_id.unwrap_or_else(|| self.task_id.clone());
                let entry = LogEntry::new(log.timestamp, log.level, log.message, task_id);
                if self.paused {
                    self.paused_buffer.push(entry);
                } else {
                    self.live_log.push(entry);
                }
            }
            StreamEvent::Heartbeat => {}
            StreamEvent::Error { message } => {
                self.status = ConnectionStatus::Error;
                self.last_error = Some(message);
            }
            StreamEvent::Disconnected => {
                self.status = ConnectionStatus::Disconnected;
            }
            StreamEvent::Unknown => {
                debug!("Log stream session {}: ignoring unknown event type", self.id);
            }
        }
    }

    // ─────────────────────────────────────────────────────────
    // User operations
    // ─────────────────────────────────────────────────────────

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Flush the paused buffer onto the live log and stop buffering.
    pub fn resume(&mut self) {
        self.paused = false;
        self.live_log.append(&mut self.paused_buffer);
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Empty both buffers. Connection status is untouched.
    pub fn clear(&mut self) {
        self.live_log.clear();
        self.paused_buffer.clear();
    }

    pub fn set_auto_scroll(&mut self, enabled: bool) {
        self.auto_scroll = enabled;
    }

    pub fn toggle_auto_scroll(&mut self) {
        self.auto_scroll = !self.auto_scroll;
    }

    /// Serialise the live log. `None` when there is nothing to export.
    pub fn export(&self, now: DateTime<Utc>) -> Option<LogExport> {
        if self.live_log.is_empty() {
            return None;
        }
        let contents = self
            .live_log
            .iter()
            .map(LogEntry::export_line)
            .collect::<Vec<_>>()
            .join("\n");
        Some(LogExport {
            file_name: export_file_name(&self.task_id, now),
            contents,
            line_count: self.live_log.len(),
        })
    }
}

/// `task-{id}-logs-{YYYY-MM-DDTHH:MM:SS}.txt`; path separators in the id are
/// replaced so the name stays a single component.
pub fn export_file_name(task_id: &str, now: DateTime<Utc>) -> String {
    let safe_id: String = task_id
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("task-{}-logs-{}.txt", safe_id, now.format("%Y-%m-%dT%H:%M:%S"))
}
