//! shakedeck-app - Application state and orchestration for shakedeck
//!
//! This crate implements the TEA (The Elm Architecture) pattern for state
//! management: [`Message`]s go through [`handler::update`], which mutates
//! [`AppState`] and returns [`UpdateAction`]s that the action layer turns into
//! background tasks. The [`Engine`] ties these together for the TUI and
//! headless runners.
//!
//! The live log stream lives in [`log_stream`]: a transport-independent
//! session state machine and the host that binds it to the log viewer.

pub mod actions;
pub mod config;
pub mod engine;
pub mod handler;
pub mod input_key;
pub mod log_stream;
pub mod message;
pub mod process;
pub mod scroll_state;
pub mod signals;
pub mod state;
pub mod text_input;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export primary types
pub use actions::{PollKind, TaskRegistry};
pub use engine::Engine;
pub use handler::{UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use log_stream::{ConnectionStatus, LogStreamHost, LogStreamSession};
pub use message::{Message, TaskOp};
pub use state::{AppState, UiMode, View};
