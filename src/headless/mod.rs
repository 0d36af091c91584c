//! Headless tail - live log output without the TUI
//!
//! `shakedeck tail <id>` drives the same log stream session the console uses
//! and writes what it collects to stdout. Plain mode prints one
//! export-formatted line per entry and reports connection changes on stderr.
//! With `--json` every change is an NDJSON event on stdout instead:
//!
//! ```json
//! {"event":"connection","task_id":"42","status":"Connected","timestamp":1704700001000}
//! {"event":"log","task_id":"42","timestamp":"2024-05-01T10:00:00","level":"INFO","message":"sync started"}
//! ```

pub mod runner;

use std::io::{self, Write};

use chrono::Utc;
use serde::Serialize;
use tracing::error;

use shakedeck_app::log_stream::{ConnectionStatus, LogStreamSession};

pub use runner::run_tail;

/// Events emitted by the headless tail
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TailEvent {
    /// Stream connection changed state
    Connection {
        task_id: String,
        status: String,
        error: Option<String>,
        timestamp: i64,
    },

    /// One live log entry
    Log {
        task_id: String,
        timestamp: String,
        level: String,
        message: String,
    },

    /// Collected lines were written to disk on exit
    Exported {
        task_id: String,
        path: String,
        lines: usize,
        timestamp: i64,
    },
}

impl TailEvent {
    pub fn exported(task_id: &str, path: &str, lines: usize) -> Self {
        Self::Exported {
            task_id: task_id.to_string(),
            path: path.to_string(),
            lines,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Emit this event to stdout as one JSON line
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize tail event: {}", e);
                return;
            }
        };

        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write tail event to stdout: {}", e);
            return;
        }
        if let Err(e) = stdout.flush() {
            error!("Failed to flush stdout: {}", e);
        }
    }
}

/// Tracks what has already been reported for a session so each entry and
/// each status change is emitted once.
#[derive(Debug, Default)]
pub struct TailCursor {
    emitted: usize,
    last_status: Option<ConnectionStatus>,
}

impl TailCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events for everything that changed in `session` since the last call
    pub fn advance(&mut self, session: &LogStreamSession) -> Vec<TailEvent> {
        let mut events = Vec::new();
        let task_id = session.task_id();

        let status = session.status();
        if self.last_status != Some(status) {
            self.last_status = Some(status);
            events.push(TailEvent::Connection {
                task_id: task_id.to_string(),
                status: status.label().to_string(),
                error: session.last_error().map(str::to_string),
                timestamp: Utc::now().timestamp_millis(),
            });
        }

        let entries = session.live_log();
        if self.emitted > entries.len() {
            // log was cleared underneath us
            self.emitted = 0;
        }
        for entry in &entries[self.emitted..] {
            events.push(TailEvent::Log {
                task_id: task_id.to_string(),
                timestamp: entry.timestamp.clone(),
                level: entry.level.as_str().to_string(),
                message: entry.message.clone(),
            });
        }
        self.emitted = entries.len();
        events
    }
}

/// Plain-text rendering of an event: `(stdout line, stderr line)`
pub fn plain_lines(event: &TailEvent) -> (Option<String>, Option<String>) {
    match event {
        TailEvent::Log {
            timestamp,
            level,
            message,
            ..
        } => (Some(format!("[{}] [{}] {}", timestamp, level, message)), None),
        TailEvent::Connection { status, error, .. } => {
            let line = match error {
                Some(error) => format!("-- {}: {}", status, error),
                None => format!("-- {}", status),
            };
            (None, Some(line))
        }
        TailEvent::Exported { path, lines, .. } => {
            (None, Some(format!("-- exported {} lines to {}", lines, path)))
        }
    }
}
