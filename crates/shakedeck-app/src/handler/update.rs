//! Main update function - handles state transitions (TEA pattern)

use std::time::Instant;

use shakedeck_core::prelude::*;

use super::{keys, log_stream, navigation, tasks, UpdateAction, UpdateResult};
use crate::message::Message;
use crate::state::AppState;

/// Process a message and update state
/// Returns an optional action and follow-up message
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Key(key) => keys::handle_key(state, key),

        Message::Tick => {
            state.expire_notifications(Instant::now());
            UpdateResult::none()
        }

        Message::Quit => {
            info!("Quit requested");
            state.request_quit();
            let mut actions = vec![UpdateAction::StopAllPolling];
            actions.extend(UpdateAction::stream(state.live_log.unmount()));
            UpdateResult::actions(actions)
        }

        // ─────────────────────────────────────────────────────────
        // Navigation
        // ─────────────────────────────────────────────────────────
        Message::SwitchView(view) => navigation::switch_view(state, view),
        Message::Refresh => navigation::refresh(state),
        Message::OpenTaskDetail { task_id } => navigation::open_task_detail(state, task_id),
        Message::CloseTaskDetail => navigation::close_task_detail(state),
        Message::OpenLiveLog { task_id } => log_stream::open(state, &task_id),
        Message::CloseLiveLog => log_stream::close(state),

        // ─────────────────────────────────────────────────────────
        // Server data
        // ─────────────────────────────────────────────────────────
        Message::TasksLoaded { tasks } => navigation::handle_tasks_loaded(state, tasks),
        Message::StatisticsLoaded { statistics } => {
            navigation::clear_poll_error(state, &crate::actions::PollKind::Statistics);
            state.statistics = Some(statistics);
            UpdateResult::none()
        }
        Message::TaskLoaded { task } => navigation::handle_task_loaded(state, task),
        Message::RealtimeStatusLoaded { task_id, status } => {
            if let Some(detail) = state.detail.as_mut().filter(|d| d.task_id == task_id) {
                detail.record(status);
            }
            UpdateResult::none()
        }
        Message::LogsLoaded { logs } => {
            debug!("Loaded {} stored log records", logs.len());
            state.logs = logs;
            state.log_scroll.reset();
            UpdateResult::none()
        }
        Message::PollFailed { kind, message } => {
            warn!("Background refresh {:?} failed: {}", kind, message);
            state.poll_error = Some((kind, message));
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Mutations
        // ─────────────────────────────────────────────────────────
        Message::TaskSaved { task, created } => tasks::handle_task_saved(state, task, created),
        Message::TaskOpCompleted {
            task_id,
            op,
            message,
        } => tasks::handle_task_op_completed(state, task_id, op, message),
        Message::LogsCleared { task_id, message } => {
            tasks::handle_logs_cleared(state, task_id, message)
        }
        Message::RequestFailed { context, message } => {
            warn!("{} failed: {}", context, message);
            if let Some(form) = state.form.as_mut() {
                form.submitting = false;
            }
            state.notify_error(message);
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Confirmation
        // ─────────────────────────────────────────────────────────
        Message::RequestDeleteTask { task_id } => tasks::request_delete(state, task_id),
        Message::DeleteTaskConfirmed {
            task_id,
            stop_first,
        } => tasks::delete_confirmed(task_id, stop_first),
        Message::RequestClearLogs { task_id } => tasks::request_clear_logs(state, task_id),
        Message::ClearLogsConfirmed { task_id } => {
            UpdateResult::action(UpdateAction::ClearLogs { task_id })
        }
        Message::CancelConfirm => {
            state.hide_confirm_dialog();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Live log stream
        // ─────────────────────────────────────────────────────────
        Message::LogStreamTransport { token, event } => {
            UpdateResult::maybe_action(UpdateAction::stream(
                state.live_log.on_transport_event(token, event),
            ))
        }
        Message::LogStreamReconnectDue { token } => UpdateResult::maybe_action(
            UpdateAction::stream(state.live_log.on_reconnect_due(token)),
        ),
        Message::ExportLiveLog => log_stream::export(state),
        Message::LogExported { path, line_count } => {
            state.notify_success(format!(
                "Exported {} lines to {}",
                line_count,
                path.display()
            ));
            UpdateResult::none()
        }
        Message::LogExportFailed { message } => {
            state.notify_error(format!("Export failed: {message}"));
            UpdateResult::none()
        }
    }
}
