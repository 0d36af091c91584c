//! View switching, task detail and the pollers tied to them

use std::time::Duration;

use shakedeck_core::prelude::*;
use shakedeck_core::{SyncTask, TaskId};

use super::{UpdateAction, UpdateResult};
use crate::actions::PollKind;
use crate::state::{AppState, TaskDetailState, View};

fn interval(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

/// Actions that load a view's data and start its pollers.
fn enter_view(state: &AppState, view: View) -> Vec<UpdateAction> {
    let polling = &state.settings.polling;
    match view {
        View::Dashboard => vec![
            UpdateAction::LoadStatistics,
            UpdateAction::StartPolling {
                kind: PollKind::Statistics,
                interval: interval(polling.statistics_ms),
            },
        ],
        View::Tasks => vec![
            UpdateAction::LoadTasks,
            UpdateAction::StartPolling {
                kind: PollKind::TaskList,
                interval: interval(polling.task_list_ms),
            },
        ],
        View::Logs => vec![UpdateAction::LoadLogs {
            query: state.log_query.clone(),
        }],
    }
}

/// Switch tabs. Pollers of the previous view stop and the detail panel closes.
pub fn switch_view(state: &mut AppState, view: View) -> UpdateResult {
    debug!("Switching view {:?} -> {:?}", state.view, view);
    state.view = view;
    state.detail = None;
    state.poll_error = None;

    let mut actions = vec![UpdateAction::StopAllPolling];
    actions.extend(enter_view(state, view));
    UpdateResult::actions(actions)
}

/// Reload the data behind the current view.
pub fn refresh(state: &mut AppState) -> UpdateResult {
    let mut actions = match state.view {
        View::Dashboard => vec![UpdateAction::LoadStatistics],
        View::Tasks => vec![UpdateAction::LoadTasks],
        View::Logs => vec![UpdateAction::LoadLogs {
            query: state.log_query.clone(),
        }],
    };
    if let Some(detail) = &state.detail {
        actions.push(UpdateAction::LoadTask {
            task_id: detail.task_id.clone(),
        });
    }
    UpdateResult::actions(actions)
}

pub fn open_task_detail(state: &mut AppState, task_id: TaskId) -> UpdateResult {
    let mut actions = close_detail_actions(state);
    state.detail = Some(TaskDetailState::new(
        task_id.clone(),
        state.settings.ui.status_history,
    ));
    actions.push(UpdateAction::LoadTask { task_id });
    actions.extend(sync_realtime_polling(state));
    UpdateResult::actions(actions)
}

pub fn close_task_detail(state: &mut AppState) -> UpdateResult {
    UpdateResult::actions(close_detail_actions(state))
}

fn close_detail_actions(state: &mut AppState) -> Vec<UpdateAction> {
    match state.detail.take() {
        Some(detail) if detail.polling => vec![UpdateAction::StopPolling {
            kind: PollKind::RealtimeStatus(detail.task_id),
        }],
        _ => Vec::new(),
    }
}

/// Start realtime polling while the detail task runs; stop it otherwise.
pub fn sync_realtime_polling(state: &mut AppState) -> Vec<UpdateAction> {
    let running = state.detail_task().is_some_and(|t| t.status.is_running());
    let interval_ms = state.settings.polling.realtime_status_ms;
    let Some(detail) = state.detail.as_mut() else {
        return Vec::new();
    };
    let kind = PollKind::RealtimeStatus(detail.task_id.clone());

    match (running, detail.polling) {
        (true, false) => {
            detail.polling = true;
            vec![
                UpdateAction::LoadRealtimeStatus {
                    task_id: detail.task_id.clone(),
                },
                UpdateAction::StartPolling {
                    kind,
                    interval: interval(interval_ms),
                },
            ]
        }
        (false, true) => {
            detail.polling = false;
            vec![UpdateAction::StopPolling { kind }]
        }
        _ => Vec::new(),
    }
}

pub fn clear_poll_error(state: &mut AppState, kind: &PollKind) {
    if state.poll_error.as_ref().is_some_and(|(k, _)| k == kind) {
        state.poll_error = None;
    }
}

pub fn handle_tasks_loaded(state: &mut AppState, tasks: Vec<SyncTask>) -> UpdateResult {
    debug!("Loaded {} tasks", tasks.len());
    clear_poll_error(state, &PollKind::TaskList);
    state.set_tasks(tasks);
    UpdateResult::actions(sync_realtime_polling(state))
}

pub fn handle_task_loaded(state: &mut AppState, task: SyncTask) -> UpdateResult {
    state.upsert_task(task);
    UpdateResult::actions(sync_realtime_polling(state))
}
