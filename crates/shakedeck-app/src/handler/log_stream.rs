//! Live log modal handlers

use chrono::Utc;

use shakedeck_core::prelude::*;

use super::{UpdateAction, UpdateResult};
use crate::state::{AppState, NotificationKind};

/// Show the modal for `task_id`. A different task replaces the session.
pub fn open(state: &mut AppState, task_id: &str) -> UpdateResult {
    let commands = state.live_log.show(task_id);
    if !commands.is_empty() {
        state.live_log_scroll.reset();
    }
    UpdateResult::maybe_action(UpdateAction::stream(commands))
}

/// Hide the modal; the session and its buffers are dropped.
pub fn close(state: &mut AppState) -> UpdateResult {
    state.live_log_scroll.reset();
    UpdateResult::maybe_action(UpdateAction::stream(state.live_log.hide()))
}

pub fn export(state: &mut AppState) -> UpdateResult {
    match state.live_log.export(Utc::now()) {
        Some(export) => UpdateResult::action(UpdateAction::ExportLiveLog {
            export,
            directory: state.settings.export.directory.clone(),
        }),
        None => {
            state.notify(NotificationKind::Info, "No logs to export");
            UpdateResult::none()
        }
    }
}

pub fn reconnect(state: &mut AppState) -> UpdateResult {
    UpdateResult::maybe_action(UpdateAction::stream(state.live_log.reconnect()))
}

pub fn scroll_up(state: &mut AppState, lines: usize) {
    state.live_log_scroll.scroll_up(lines);
    // reading history; stop following
    state.live_log.set_auto_scroll(false);
}

pub fn scroll_down(state: &mut AppState, lines: usize) {
    state.live_log_scroll.scroll_down(lines);
}

pub fn scroll_to_bottom(state: &mut AppState) {
    state.live_log_scroll.scroll_to_bottom();
    state.live_log.set_auto_scroll(true);
}

pub fn toggle_pause(state: &mut AppState) {
    state.live_log.toggle_pause();
    if let Some(session) = state.live_log.session() {
        debug!(
            "Live log {}: {}",
            session.task_id(),
            if session.is_paused() { "paused" } else { "resumed" }
        );
    }
}
