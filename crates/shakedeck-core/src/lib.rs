//! # shakedeck-core - Core Domain Types
//!
//! Foundation crate for shakedeck. Provides domain types, error handling,
//! live-stream event definitions and task configuration checks.
//!
//! This crate has **zero internal dependencies**.
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`SyncTask`], [`TaskStatus`], [`TaskInput`] - Sync tasks and their payloads
//! - [`TaskStatistics`], [`RecentTask`] - Dashboard aggregates
//! - [`LogEntry`], [`LogLevel`] - Live log lines
//! - [`TaskLog`], [`LogQuery`] - Stored log records and history filters
//!
//! ### Events (`events`)
//! - [`StreamEvent`] - Decoded live-stream payloads
//! - [`TransportEvent`] - Stream transport lifecycle notifications
//!
//! ### Realtime Status (`realtime`)
//! - [`RealtimeStatus`] - Replication counters for a running task
//! - [`RingBuffer`], [`OpsHistory`] - Rolling throughput history
//!
//! ### Task Configuration (`task_config`)
//! - [`task_config::validate()`] - Required-section checks before submit
//! - [`task_config::DEFAULT_TEMPLATE`] - Configuration skeleton
//!
//! ## Prelude
//!
//! ```rust
//! use shakedeck_core::prelude::*;
//! ```

pub mod error;
pub mod events;
pub mod logging;
pub mod realtime;
pub mod task_config;
pub mod types;

/// Prelude for common imports used throughout all shakedeck crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

pub use error::{Error, Result, ResultExt};
pub use events::{StreamEvent, StreamLog, TransportEvent};
pub use realtime::{
    EntryCounts, OpsHistory, OpsSample, RealtimeStatus, RingBuffer, DEFAULT_HISTORY_LEN,
};
pub use types::{
    display_time, parse_server_time, LogEntry, LogLevel, LogQuery, RecentTask, SyncTask,
    TaskId, TaskInput, TaskLog, TaskStatistics, TaskStatus,
};
