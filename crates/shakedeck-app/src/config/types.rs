//! Configuration types

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Global settings from `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub stream: StreamSettings,

    #[serde(default)]
    pub polling: PollingSettings,

    #[serde(default)]
    pub ui: UiSettings,

    #[serde(default)]
    pub export: ExportSettings,
}

/// Where the task server lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Scheme, host and optional path prefix; `/api/v1` is appended.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout for REST calls (not applied to live streams)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl ServerSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

/// Live log stream behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamSettings {
    /// Delay before reconnecting after a transport failure
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            reconnect_delay_ms: default_reconnect_delay_ms(),
        }
    }
}

impl StreamSettings {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

fn default_reconnect_delay_ms() -> u64 {
    3_000
}

/// Refresh intervals for server-backed views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingSettings {
    #[serde(default = "default_task_list_ms")]
    pub task_list_ms: u64,

    #[serde(default = "default_statistics_ms")]
    pub statistics_ms: u64,

    #[serde(default = "default_realtime_status_ms")]
    pub realtime_status_ms: u64,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            task_list_ms: default_task_list_ms(),
            statistics_ms: default_statistics_ms(),
            realtime_status_ms: default_realtime_status_ms(),
        }
    }
}

fn default_task_list_ms() -> u64 {
    10_000
}

fn default_statistics_ms() -> u64 {
    10_000
}

fn default_realtime_status_ms() -> u64 {
    2_000
}

/// UI preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    /// Initial auto-scroll state of the live log viewer
    #[serde(default = "default_true")]
    pub auto_scroll: bool,

    /// Throughput samples kept for the task detail chart
    #[serde(default = "default_status_history")]
    pub status_history: usize,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            auto_scroll: true,
            status_history: default_status_history(),
        }
    }
}

fn default_status_history() -> usize {
    shakedeck_core::DEFAULT_HISTORY_LEN
}

fn default_true() -> bool {
    true
}

/// Where exported log files are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    #[serde(default = "default_export_directory")]
    pub directory: PathBuf,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            directory: default_export_directory(),
        }
    }
}

fn default_export_directory() -> PathBuf {
    PathBuf::from(".")
}
