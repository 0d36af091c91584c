//! Live log streaming
//!
//! - `session`: connection state machine and log buffers for one task
//! - `host`: ties a session to the log viewer's lifetime
//! - `export`: writing exported logs to disk

pub mod export;
pub mod host;
pub mod session;

pub use export::write_export;
pub use host::LogStreamHost;
pub use session::{
    export_file_name, next_session_id, ConnectionStatus, LogExport, LogStreamSession, SessionId,
    StreamCommand, StreamToken, DEFAULT_RECONNECT_DELAY, RECONNECTING_MESSAGE,
};
