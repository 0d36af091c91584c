//! Response envelope and error-message extraction

use serde::{Deserialize, Serialize};
use serde_json::Value;

use shakedeck_core::Error;

/// Default notification text when nothing better can be extracted.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Request failed";

/// Uniform body returned by every REST endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

fn default_success() -> bool {
    true
}

impl<T> ApiResponse<T> {
    /// Server-provided message, or `fallback`.
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Pull a human-readable message out of an error body.
///
/// Priority: `detail`, then `message`, then `error`. A `detail` list (as sent
/// for request validation failures) is flattened into its `msg` entries.
pub fn extract_error_message(body: &Value) -> Option<String> {
    ["detail", "message", "error"]
        .iter()
        .find_map(|key| body.get(key).and_then(value_text))
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) if !items.is_empty() => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Object(obj) => obj.get("msg").and_then(value_text),
                    _ => None,
                })
                .collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        Value::Null | Value::String(_) | Value::Array(_) => None,
        other => Some(other.to_string()),
    }
}

/// Notification text for a failed request.
///
/// Business errors (400 and unknown statuses) show the extracted server
/// message; well-known statuses and transport failures get a fixed,
/// friendlier sentence.
pub fn user_message(err: &Error) -> String {
    match err {
        Error::Api { status: 404, .. } => "Requested resource does not exist".to_string(),
        Error::Api { status: 500, .. } => "Internal server error, please try again later".to_string(),
        Error::Api { message, .. } => message.clone(),
        Error::Transport { timeout: true, .. } => "Request timed out, please try again later".to_string(),
        Error::Transport { .. } => {
            "Network connection failed, check the server address".to_string()
        }
        Error::Validation { problems } => problems.join("\n"),
        other => other.to_string(),
    }
}
