//! Binds a live log session to the visibility of the log viewer.

use std::time::Duration;

use chrono::{DateTime, Utc};

use shakedeck_core::prelude::*;
use shakedeck_core::TransportEvent;

use super::session::{LogExport, LogStreamSession, StreamCommand, StreamToken};

/// Owns at most one [`LogStreamSession`] and opens or closes it as the
/// viewer's `(visible, task_id)` pair changes.
#[derive(Debug)]
pub struct LogStreamHost {
    session: Option<LogStreamSession>,
    reconnect_delay: Duration,
    default_auto_scroll: bool,
}

impl LogStreamHost {
    pub fn new(reconnect_delay: Duration, default_auto_scroll: bool) -> Self {
        Self {
            session: None,
            reconnect_delay,
            default_auto_scroll,
        }
    }

    pub fn session(&self) -> Option<&LogStreamSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut LogStreamSession> {
        self.session.as_mut()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn task_id(&self) -> Option<&str> {
        self.session.as_ref().map(LogStreamSession::task_id)
    }

    /// Reconcile with the viewer. A task switch closes the old session and
    /// starts a fresh one; hiding drops the session and its buffers.
    pub fn sync(&mut self, visible: bool, task_id: Option<&str>) -> Vec<StreamCommand> {
        let wanted = task_id.filter(|id| visible && !id.is_empty());

        let Some(task_id) = wanted else {
            return self.close_current();
        };

        if self.task_id() == Some(task_id) {
            return Vec::new();
        }

        let mut commands = self.close_current();
        let mut session =
            LogStreamSession::new(task_id, self.reconnect_delay, self.default_auto_scroll);
        commands.extend(session.open());
        debug!(
            "Log stream host: session {} now follows task {}",
            session.id(),
            task_id
        );
        self.session = Some(session);
        commands
    }

    pub fn show(&mut self, task_id: &str) -> Vec<StreamCommand> {
        self.sync(true, Some(task_id))
    }

    pub fn hide(&mut self) -> Vec<StreamCommand> {
        self.sync(false, None)
    }

    pub fn unmount(&mut self) -> Vec<StreamCommand> {
        self.hide()
    }

    fn close_current(&mut self) -> Vec<StreamCommand> {
        match self.session.take() {
            Some(mut session) => session.close(),
            None => Vec::new(),
        }
    }

    fn owns(&self, token: StreamToken) -> Option<&LogStreamSession> {
        self.session
            .as_ref()
            .filter(|session| session.id() == token.session_id)
    }

    // ─────────────────────────────────────────────────────────
    // Routing
    // ─────────────────────────────────────────────────────────

    pub fn on_transport_event(
        &mut self,
        token: StreamToken,
        event: TransportEvent,
    ) -> Vec<StreamCommand> {
        if self.owns(token).is_none() {
            trace!("Log stream host: no session for token {:?}", token);
            return Vec::new();
        }
        match self.session.as_mut() {
            Some(session) => session.on_transport_event(token, event),
            None => Vec::new(),
        }
    }

    pub fn on_reconnect_due(&mut self, token: StreamToken) -> Vec<StreamCommand> {
        if self.owns(token).is_none() {
            debug!("Log stream host: reconnect timer for a closed session");
            return Vec::new();
        }
        match self.session.as_mut() {
            Some(session) => session.on_reconnect_due(token),
            None => Vec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────
    // User operations
    // ─────────────────────────────────────────────────────────

    pub fn toggle_pause(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.toggle_pause();
        }
    }

    pub fn clear(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.clear();
        }
    }

    pub fn toggle_auto_scroll(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.toggle_auto_scroll();
        }
    }

    pub fn set_auto_scroll(&mut self, enabled: bool) {
        if let Some(session) = self.session.as_mut() {
            session.set_auto_scroll(enabled);
        }
    }

    pub fn reconnect(&mut self) -> Vec<StreamCommand> {
        match self.session.as_mut() {
            Some(session) => session.reconnect(),
            None => Vec::new(),
        }
    }

    pub fn export(&self, now: DateTime<Utc>) -> Option<LogExport> {
        self.session.as_ref().and_then(|session| session.export(now))
    }
}
