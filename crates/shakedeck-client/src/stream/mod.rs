//! Live log stream transport (server-sent events)

mod client;
pub mod sse;

pub use client::LogStream;
pub use sse::{SseDecoder, SseFrame};
