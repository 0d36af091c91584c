//! Core domain type definitions

use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Task identifier as issued by the server.
pub type TaskId = String;

// ─────────────────────────────────────────────────────────
// Log Levels
// ─────────────────────────────────────────────────────────

/// Log severity levels
///
/// Parsing is lenient: the server's `WARNING`/`CRITICAL` spellings are
/// accepted and any unrecognised level is treated as [`LogLevel::Info`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    /// All levels, lowest severity first.
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    /// Parse a level string from the wire, falling back to `Info`.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "DEBUG" | "TRACE" => LogLevel::Debug,
            "INFO" => LogLevel::Info,
            "WARN" | "WARNING" => LogLevel::Warn,
            "ERROR" => LogLevel::Error,
            "FATAL" | "CRITICAL" => LogLevel::Fatal,
            _ => LogLevel::Info,
        }
    }

    /// Uppercase label used in exports and tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Spelling the server's log query endpoint filters on.
    pub fn server_name(&self) -> &'static str {
        match self {
            LogLevel::Warn => "WARNING",
            LogLevel::Fatal => "CRITICAL",
            other => other.as_str(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LogLevel::Error | LogLevel::Fatal)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for LogLevel {
    fn from(raw: String) -> Self {
        LogLevel::parse_lenient(&raw)
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.as_str().to_string()
    }
}

// ─────────────────────────────────────────────────────────
// Live Log Entries
// ─────────────────────────────────────────────────────────

/// A single line received over a task's live log stream.
///
/// Entries are immutable once built; their order is arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Timestamp plus a random disambiguator. Only used as a stable key.
    pub id: String,
    /// Timestamp exactly as the server sent it.
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
    pub task_id: TaskId,
}

impl LogEntry {
    pub fn new(
        timestamp: impl Into<String>,
        level: LogLevel,
        message: impl Into<String>,
        task_id: impl Into<TaskId>,
    ) -> Self {
        let timestamp = timestamp.into();
        let id = format!("{}-{:08x}", timestamp, rand::random::<u32>());
        Self {
            id,
            timestamp,
            level,
            message: message.into(),
            task_id: task_id.into(),
        }
    }

    /// `[timestamp] [LEVEL] message`, the line format used by exports.
    pub fn export_line(&self) -> String {
        format!("[{}] [{}] {}", self.timestamp, self.level, self.message)
    }

    /// Timestamp shortened to wall-clock time when it parses.
    pub fn formatted_time(&self) -> String {
        parse_server_time(&self.timestamp)
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| self.timestamp.clone())
    }
}

/// Parse the timestamp formats the server emits (RFC 3339 or naive ISO).
pub fn parse_server_time(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

/// Human-readable `YYYY-MM-DD HH:MM:SS` for table cells; `-` when absent.
pub fn display_time(raw: Option<&str>) -> String {
    match raw {
        None => "-".to_string(),
        Some(raw) => parse_server_time(raw)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| raw.to_string()),
    }
}

// ─────────────────────────────────────────────────────────
// Sync Tasks
// ─────────────────────────────────────────────────────────

/// Lifecycle status of a sync task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
    Stopped,
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Stopped => "stopped",
            TaskStatus::Unknown => "unknown",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, TaskStatus::Running)
    }

    /// A task can be started unless it is already running.
    pub fn can_start(&self) -> bool {
        !self.is_running()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A sync task as returned by the server.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SyncTask {
    pub id: TaskId,
    pub name: String,
    #[serde(default)]
    pub custom_config: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub process_id: Option<u32>,
    #[serde(default)]
    pub status_port: Option<u16>,
    #[serde(default)]
    pub total_keys: Option<u64>,
    #[serde(default)]
    pub processed_keys: Option<u64>,
    #[serde(default)]
    pub failed_keys: Option<u64>,
}

impl SyncTask {
    /// Processed/total as a 0..=100 percentage, when the total is known.
    pub fn progress_percent(&self) -> Option<u16> {
        let total = self.total_keys.filter(|t| *t > 0)?;
        let processed = self.processed_keys.unwrap_or(0).min(total);
        Some(((processed * 100) / total) as u16)
    }
}

/// Create/update payload. Create requires both fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_config: Option<String>,
}

impl TaskInput {
    pub fn create(name: impl Into<String>, custom_config: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            custom_config: Some(custom_config.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.custom_config.is_none()
    }
}

/// Aggregate counters for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskStatistics {
    pub total: u64,
    pub running: u64,
    pub stopped: u64,
    pub failed: u64,
    pub total_keys: u64,
    pub processed_keys: u64,
    pub failed_keys: u64,
    pub recent_tasks: Vec<RecentTask>,
}

/// Summary row of the five most recently created tasks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecentTask {
    pub id: TaskId,
    pub name: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub processed_keys: u64,
}

// ─────────────────────────────────────────────────────────
// Stored Logs
// ─────────────────────────────────────────────────────────

/// A persisted log record from the log history endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskLog {
    #[serde(default)]
    pub id: Option<String>,
    pub task_id: TaskId,
    #[serde(default)]
    pub task_name: Option<String>,
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
    #[serde(default)]
    pub source: Option<String>,
}

/// Filters for the log history listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    pub task_id: Option<TaskId>,
    pub level: Option<LogLevel>,
    pub keyword: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub limit: Option<u32>,
}

impl LogQuery {
    /// Query-string pairs for the non-empty filters, in a stable order.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(task_id) = self.task_id.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("task_id", task_id.to_string()));
        }
        if let Some(level) = self.level {
            pairs.push(("level", level.server_name().to_string()));
        }
        if let Some(keyword) = self.keyword.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("keyword", keyword.to_string()));
        }
        if let Some(start) = self.start_time.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("start_time", start.to_string()));
        }
        if let Some(end) = self.end_time.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("end_time", end.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }

    pub fn is_filtered(&self) -> bool {
        !self.to_pairs().iter().all(|(k, _)| *k == "limit")
    }

    /// Whether a stored record satisfies every filter. Time bounds that don't
    /// parse are not applied.
    pub fn matches(&self, log: &TaskLog) -> bool {
        if let Some(task_id) = self.task_id.as_deref().filter(|s| !s.is_empty()) {
            if log.task_id != task_id {
                return false;
            }
        }
        if let Some(level) = self.level {
            if log.level != level {
                return false;
            }
        }
        if let Some(keyword) = self.keyword.as_deref().filter(|s| !s.is_empty()) {
            let keyword = keyword.to_lowercase();
            let in_message = log.message.to_lowercase().contains(&keyword);
            let in_name = log
                .task_name
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(&keyword));
            if !in_message && !in_name {
                return false;
            }
        }
        let at = parse_server_time(&log.timestamp);
        let bound = |raw: &Option<String>| raw.as_deref().and_then(parse_server_time);
        if let (Some(at), Some(start)) = (at, bound(&self.start_time)) {
            if at < start {
                return false;
            }
        }
        if let (Some(at), Some(end)) = (at, bound(&self.end_time)) {
            if at > end {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_aliases() {
        assert_eq!(LogLevel::parse_lenient("WARNING"), LogLevel::Warn);
        assert_eq!(LogLevel::parse_lenient("warn"), LogLevel::Warn);
        assert_eq!(LogLevel::parse_lenient("CRITICAL"), LogLevel::Fatal);
        assert_eq!(LogLevel::parse_lenient("fatal"), LogLevel::Fatal);
        assert_eq!(LogLevel::parse_lenient(" error "), LogLevel::Error);
    }

    #[test]
    fn test_log_level_unknown_is_info() {
        assert_eq!(LogLevel::parse_lenient("VERBOSE"), LogLevel::Info);
        assert_eq!(LogLevel::parse_lenient(""), LogLevel::Info);
    }

    #[test]
    fn test_log_level_serde_roundtrip_uses_canonical_names() {
        let level: LogLevel = serde_json::from_str("\"WARNING\"").unwrap();
        assert_eq!(level, LogLevel::Warn);
        assert_eq!(serde_json::to_string(&level).unwrap(), "\"WARN\"");
    }

    #[test]
    fn test_server_name_for_query_filter() {
        assert_eq!(LogLevel::Warn.server_name(), "WARNING");
        assert_eq!(LogLevel::Fatal.server_name(), "CRITICAL");
        assert_eq!(LogLevel::Info.server_name(), "INFO");
    }

    #[test]
    fn test_log_entry_export_line() {
        let entry = LogEntry::new("2024-05-01T10:00:00", LogLevel::Error, "boom", "abc");
        assert_eq!(entry.export_line(), "[2024-05-01T10:00:00] [ERROR] boom");
    }

    #[test]
    fn test_log_entry_ids_are_distinct() {
        let a = LogEntry::new("t", LogLevel::Info, "same", "abc");
        let b = LogEntry::new("t", LogLevel::Info, "same", "abc");
        assert!(a.id.starts_with("t-"));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_formatted_time() {
        let entry = LogEntry::new("2024-05-01T10:11:12.345", LogLevel::Info, "x", "abc");
        assert_eq!(entry.formatted_time(), "10:11:12");

        let opaque = LogEntry::new("yesterday", LogLevel::Info, "x", "abc");
        assert_eq!(opaque.formatted_time(), "yesterday");
    }

    #[test]
    fn test_display_time() {
        assert_eq!(display_time(None), "-");
        assert_eq!(
            display_time(Some("2024-05-01T10:11:12.123456")),
            "2024-05-01 10:11:12"
        );
        assert_eq!(
            display_time(Some("2024-05-01T10:11:12+00:00")),
            "2024-05-01 10:11:12"
        );
    }

    #[test]
    fn test_task_status_deserialize() {
        let status: TaskStatus = serde_json::from_str("\"running\"").unwrap();
        assert!(status.is_running());
        let status: TaskStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(status, TaskStatus::Unknown);
    }

    #[test]
    fn test_sync_task_minimal_payload() {
        let task: SyncTask =
            serde_json::from_str(r#"{"id":"7","name":"orders","status":"stopped"}"#).unwrap();
        assert_eq!(task.id, "7");
        assert_eq!(task.status, TaskStatus::Stopped);
        assert_eq!(task.progress_percent(), None);
    }

    #[test]
    fn test_progress_percent() {
        let task = SyncTask {
            total_keys: Some(200),
            processed_keys: Some(50),
            ..Default::default()
        };
        assert_eq!(task.progress_percent(), Some(25));
    }

    #[test]
    fn test_task_input_skips_missing_fields() {
        let input = TaskInput {
            name: Some("renamed".into()),
            custom_config: None,
        };
        assert_eq!(
            serde_json::to_string(&input).unwrap(),
            r#"{"name":"renamed"}"#
        );
    }

    #[test]
    fn test_statistics_tolerates_missing_fields() {
        let stats: TaskStatistics = serde_json::from_str(r#"{"total":3,"running":1}"#).unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.running, 1);
        assert!(stats.recent_tasks.is_empty());
    }

    #[test]
    fn test_log_query_pairs() {
        let query = LogQuery {
            task_id: Some("abc".into()),
            level: Some(LogLevel::Warn),
            keyword: Some(String::new()),
            limit: Some(100),
            ..Default::default()
        };
        assert_eq!(
            query.to_pairs(),
            vec![
                ("task_id", "abc".to_string()),
                ("level", "WARNING".to_string()),
                ("limit", "100".to_string()),
            ]
        );
        assert!(query.is_filtered());
        assert!(!LogQuery {
            limit: Some(10),
            ..Default::default()
        }
        .is_filtered());
    }

    fn stored(task_id: &str, level: LogLevel, message: &str, timestamp: &str) -> TaskLog {
        TaskLog {
            id: None,
            task_id: task_id.into(),
            task_name: Some("orders-sync".into()),
            timestamp: timestamp.into(),
            level,
            message: message.into(),
            source: None,
        }
    }

    #[test]
    fn test_log_query_matches_filters() {
        let log = stored("abc", LogLevel::Error, "Write FAILED", "2024-05-01T10:00:00");

        assert!(LogQuery::default().matches(&log));
        assert!(LogQuery {
            keyword: Some("failed".into()),
            ..Default::default()
        }
        .matches(&log));
        assert!(LogQuery {
            keyword: Some("orders".into()),
            ..Default::default()
        }
        .matches(&log));
        assert!(!LogQuery {
            task_id: Some("xyz".into()),
            ..Default::default()
        }
        .matches(&log));
        assert!(!LogQuery {
            level: Some(LogLevel::Info),
            ..Default::default()
        }
        .matches(&log));
    }

    #[test]
    fn test_log_query_time_window() {
        let log = stored("abc", LogLevel::Info, "m", "2024-05-01T10:00:00");
        let window = |start: &str, end: &str| LogQuery {
            start_time: Some(start.into()),
            end_time: Some(end.into()),
            ..Default::default()
        };
        assert!(window("2024-05-01 09:00:00", "2024-05-01 11:00:00").matches(&log));
        assert!(!window("2024-05-01 10:30:00", "2024-05-01 11:00:00").matches(&log));
        assert!(!window("2024-04-30 00:00:00", "2024-05-01 09:59:59").matches(&log));
        // unparseable bounds are ignored
        assert!(window("soon", "later").matches(&log));
    }
}
