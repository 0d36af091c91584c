//! # shakedeck-client - Server Gateway
//!
//! Everything that talks to the sync task server:
//!
//! - [`ApiClient`] / [`TaskGateway`] - typed REST operations under `/api/v1`
//! - [`ApiResponse`], [`extract_error_message()`], [`user_message()`] -
//!   response envelope and failure text
//! - [`LogStream`] - server-sent-events transport for a task's live log
//!
//! This crate owns no application state. Reconnect policy, buffering and
//! pausing live in `shakedeck-app`.

pub mod api;
pub mod envelope;
pub mod stream;

pub use api::{ApiClient, LocalTaskGateway, TaskGateway, API_PREFIX};
pub use envelope::{extract_error_message, user_message, ApiResponse};
pub use stream::{LogStream, SseDecoder, SseFrame};
