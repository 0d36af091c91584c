//! Wire event definitions for the live log stream

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::types::{LogLevel, TaskId};

// ─────────────────────────────────────────────────────────
// Stream Events
// ─────────────────────────────────────────────────────────

/// Payload of a `log` stream event
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StreamLog {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
    /// Absent on some servers; the receiving session fills in its own task.
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub task_id: Option<TaskId>,
}

/// One JSON object delivered in an SSE `data:` frame.
///
/// Decoding rules: a missing or non-object payload, or a known `type` with
/// missing fields, is malformed. An unrecognised `type` decodes to
/// [`StreamEvent::Unknown`] so newer servers don't break older clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    Connected,
    Log(StreamLog),
    Heartbeat,
    Error { message: String },
    Disconnected,
    #[serde(other)]
    Unknown,
}

impl StreamEvent {
    /// Decode a single stream payload.
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Short name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            StreamEvent::Connected => "connected",
            StreamEvent::Log(_) => "log",
            StreamEvent::Heartbeat => "heartbeat",
            StreamEvent::Error { .. } => "error",
            StreamEvent::Disconnected => "disconnected",
            StreamEvent::Unknown => "unknown",
        }
    }
}

// ─────────────────────────────────────────────────────────
// Transport Events
// ─────────────────────────────────────────────────────────

/// Lifecycle notifications from a stream transport.
///
/// Transports report raw frames; decoding happens in the session so that
/// malformed payloads are handled in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The server accepted the request and the stream is open
    Opened,
    /// One complete `data:` payload
    Message(String),
    /// The connection failed or ended; no more events follow
    Failed(String),
}

/// Task ids arrive as strings from current servers and as numbers from
/// older ones.
fn deserialize_opt_id<'de, D>(deserializer: D) -> std::result::Result<Option<TaskId>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_connected() {
        let event = StreamEvent::parse(r#"{"type":"connected","task_id":"abc"}"#).unwrap();
        assert_eq!(event, StreamEvent::Connected);
    }

    #[test]
    fn test_parse_log() {
        let event = StreamEvent::parse(
            r#"{"type":"log","timestamp":"2024-05-01T10:00:00","level":"WARNING","message":"slow","task_id":"abc"}"#,
        )
        .unwrap();
        match event {
            StreamEvent::Log(log) => {
                assert_eq!(log.level, LogLevel::Warn);
                assert_eq!(log.message, "slow");
                assert_eq!(log.task_id.as_deref(), Some("abc"));
            }
            other => panic!("expected log, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_log_numeric_task_id() {
        let event = StreamEvent::parse(
            r#"{"type":"log","timestamp":"t","level":"INFO","message":"m","task_id":12}"#,
        )
        .unwrap();
        assert!(matches!(event, StreamEvent::Log(StreamLog { task_id: Some(ref id), .. }) if id == "12"));
    }

    #[test]
    fn test_parse_log_without_task_id() {
        let event =
            StreamEvent::parse(r#"{"type":"log","timestamp":"t","level":"INFO","message":"m"}"#)
                .unwrap();
        assert!(matches!(event, StreamEvent::Log(StreamLog { task_id: None, .. })));
    }

    #[test]
    fn test_parse_error_event() {
        let event = StreamEvent::parse(r#"{"type":"error","message":"task not found"}"#).unwrap();
        assert_eq!(
            event,
            StreamEvent::Error {
                message: "task not found".into()
            }
        );
    }

    #[test]
    fn test_parse_heartbeat_and_disconnected() {
        assert_eq!(
            StreamEvent::parse(r#"{"type":"heartbeat","timestamp":"t"}"#).unwrap(),
            StreamEvent::Heartbeat
        );
        assert_eq!(
            StreamEvent::parse(r#"{"type":"disconnected"}"#).unwrap(),
            StreamEvent::Disconnected
        );
    }

    #[test]
    fn test_unknown_type_is_not_malformed() {
        let event = StreamEvent::parse(r#"{"type":"progress","pct":40}"#).unwrap();
        assert_eq!(event, StreamEvent::Unknown);
        assert_eq!(event.kind(), "unknown");
    }

    #[test]
    fn test_malformed_payloads() {
        assert!(StreamEvent::parse("not json").is_err());
        assert!(StreamEvent::parse("[]").is_err());
        assert!(StreamEvent::parse(r#"{"message":"no type"}"#).is_err());
        assert!(StreamEvent::parse(r#"{"type":"log","message":"no level"}"#).is_err());
        assert!(StreamEvent::parse(r#"{"type":"error"}"#).is_err());
    }
}
