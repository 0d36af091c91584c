//! Task mutations, confirmations and their results

use shakedeck_core::prelude::*;
use shakedeck_core::{SyncTask, TaskId};

use super::navigation::sync_realtime_polling;
use super::{UpdateAction, UpdateResult};
use crate::actions::PollKind;
use crate::message::{Message, TaskOp};
use crate::state::{AppState, ConfirmDialogState, NotificationKind, TaskFormState};

fn task_label(state: &AppState, task_id: &str) -> String {
    state
        .task(task_id)
        .map(|t| format!("'{}'", t.name))
        .unwrap_or_else(|| format!("#{task_id}"))
}

// ─────────────────────────────────────────────────────────
// Form
// ─────────────────────────────────────────────────────────

pub fn open_create_form(state: &mut AppState) -> UpdateResult {
    state.show_task_form(TaskFormState::create());
    UpdateResult::none()
}

pub fn open_edit_form(state: &mut AppState, task_id: &str) -> UpdateResult {
    match state.task(task_id) {
        Some(task) => {
            let form = TaskFormState::edit(task);
            state.show_task_form(form);
        }
        None => state.notify_error("Task is no longer available"),
    }
    UpdateResult::none()
}

/// Validate locally and send the form. Invalid forms never reach the server.
pub fn submit_form(state: &mut AppState) -> UpdateResult {
    let Some(form) = state.form.as_mut() else {
        return UpdateResult::none();
    };
    if form.submitting {
        return UpdateResult::none();
    }
    match form.validate() {
        Ok(input) => {
            form.problems.clear();
            form.submitting = true;
            UpdateResult::action(UpdateAction::SaveTask {
                task_id: form.editing.clone(),
                input,
            })
        }
        Err(problems) => {
            debug!("Task form rejected: {:?}", problems);
            form.problems = problems;
            UpdateResult::none()
        }
    }
}

pub fn handle_task_saved(state: &mut AppState, task: SyncTask, created: bool) -> UpdateResult {
    let verb = if created { "created" } else { "updated" };
    state.notify_success(format!("Task '{}' {}", task.name, verb));
    state.upsert_task(task);
    state.hide_task_form();
    UpdateResult::action(UpdateAction::LoadTasks)
}

// ─────────────────────────────────────────────────────────
// Start / stop / delete
// ─────────────────────────────────────────────────────────

pub fn start_task(state: &mut AppState, task_id: TaskId) -> UpdateResult {
    if state.task(&task_id).is_some_and(|t| !t.status.can_start()) {
        state.notify(NotificationKind::Info, "Task is already running");
        return UpdateResult::none();
    }
    UpdateResult::action(UpdateAction::RunTaskOp {
        task_id,
        op: TaskOp::Start,
    })
}

pub fn stop_task(state: &mut AppState, task_id: TaskId) -> UpdateResult {
    if state.task(&task_id).is_some_and(|t| !t.status.is_running()) {
        state.notify(NotificationKind::Info, "Task is not running");
        return UpdateResult::none();
    }
    UpdateResult::action(UpdateAction::RunTaskOp {
        task_id,
        op: TaskOp::Stop,
    })
}

/// Ask for confirmation. A running task can't be deleted directly, so the
/// prompt offers to stop it first.
pub fn request_delete(state: &mut AppState, task_id: TaskId) -> UpdateResult {
    let label = task_label(state, &task_id);
    let running = state.task(&task_id).is_some_and(|t| t.status.is_running());

    let dialog = if running {
        ConfirmDialogState::new(
            "Task is running",
            format!("{label} is running. Stop it and delete?"),
            "Stop and delete",
            Message::DeleteTaskConfirmed {
                task_id,
                stop_first: true,
            },
        )
    } else {
        ConfirmDialogState::new(
            "Delete task",
            format!("Delete {label}? This cannot be undone."),
            "Delete",
            Message::DeleteTaskConfirmed {
                task_id,
                stop_first: false,
            },
        )
    };
    state.show_confirm_dialog(dialog);
    UpdateResult::none()
}

pub fn delete_confirmed(task_id: TaskId, stop_first: bool) -> UpdateResult {
    let op = if stop_first {
        TaskOp::StopThenDelete
    } else {
        TaskOp::Delete
    };
    UpdateResult::action(UpdateAction::RunTaskOp { task_id, op })
}

pub fn handle_task_op_completed(
    state: &mut AppState,
    task_id: TaskId,
    op: TaskOp,
    message: String,
) -> UpdateResult {
    info!("Task {} {}: {}", task_id, op.verb(), message);
    state.notify_success(message);

    let mut actions = Vec::new();
    if matches!(op, TaskOp::Delete | TaskOp::StopThenDelete) {
        state.remove_task(&task_id);
        if state.detail.as_ref().is_some_and(|d| d.task_id == task_id) {
            let was_polling = state.detail.take().is_some_and(|d| d.polling);
            if was_polling {
                actions.push(UpdateAction::StopPolling {
                    kind: PollKind::RealtimeStatus(task_id.clone()),
                });
            }
        }
    }
    actions.push(UpdateAction::LoadTasks);
    if let Some(detail) = &state.detail {
        actions.push(UpdateAction::LoadTask {
            task_id: detail.task_id.clone(),
        });
    }
    actions.extend(sync_realtime_polling(state));
    UpdateResult::actions(actions)
}

// ─────────────────────────────────────────────────────────
// Stored logs
// ─────────────────────────────────────────────────────────

pub fn request_clear_logs(state: &mut AppState, task_id: Option<TaskId>) -> UpdateResult {
    let message = match &task_id {
        Some(id) => format!("Delete all stored logs of {}?", task_label(state, id)),
        None => "Delete stored logs of every task?".to_string(),
    };
    state.show_confirm_dialog(ConfirmDialogState::new(
        "Clear logs",
        message,
        "Clear",
        Message::ClearLogsConfirmed { task_id },
    ));
    UpdateResult::none()
}

pub fn handle_logs_cleared(
    state: &mut AppState,
    task_id: Option<TaskId>,
    message: String,
) -> UpdateResult {
    state.notify_success(message);
    match &task_id {
        Some(id) => state.logs.retain(|log| &log.task_id != id),
        None => state.logs.clear(),
    }
    state.log_scroll.reset();
    UpdateResult::action(UpdateAction::LoadLogs {
        query: state.log_query.clone(),
    })
}
