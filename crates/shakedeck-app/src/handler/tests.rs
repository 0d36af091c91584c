//! Tests for handler module

use std::time::Duration;

use super::*;
use crate::input_key::InputKey;
use crate::log_stream::{ConnectionStatus, RECONNECTING_MESSAGE};
use crate::message::Message;
use crate::state::{AppState, FilterField, FormField, NotificationKind, UiMode, View};
use crate::test_support::{running_task, stopped_task};
use shakedeck_core::{LogLevel, RealtimeStatus, TaskStatistics, TransportEvent};

fn key(state: &mut AppState, key: InputKey) -> UpdateResult {
    update(state, Message::Key(key))
}

fn type_text(state: &mut AppState, text: &str) {
    for c in text.chars() {
        key(state, InputKey::Char(c));
    }
}

fn flatten(action: Option<UpdateAction>) -> Vec<UpdateAction> {
    match action {
        None => Vec::new(),
        Some(UpdateAction::Batch(actions)) => actions,
        Some(action) => vec![action],
    }
}

fn tasks_state() -> AppState {
    let mut state = AppState::new();
    state.view = View::Tasks;
    update(
        &mut state,
        Message::TasksLoaded {
            tasks: vec![stopped_task("1", "alpha"), running_task("2", "beta")],
        },
    );
    state
}

fn last_notification(state: &AppState) -> (NotificationKind, String) {
    let n = state.notifications.back().expect("a notification");
    (n.kind, n.message.clone())
}

fn stream_commands(action: Option<UpdateAction>) -> Vec<StreamCommand> {
    flatten(action)
        .into_iter()
        .flat_map(|a| match a {
            UpdateAction::LogStream(commands) => commands,
            _ => Vec::new(),
        })
        .collect()
}

// ─────────────────────────────────────────────────────────
// Quit and navigation
// ─────────────────────────────────────────────────────────

#[test]
fn test_quit_message_sets_quit_and_stops_work() {
    let mut state = AppState::new();
    update(&mut state, Message::OpenLiveLog { task_id: "1".into() });

    let result = update(&mut state, Message::Quit);

    assert!(state.should_quit());
    let actions = flatten(result.action);
    assert_eq!(actions[0], UpdateAction::StopAllPolling);
    assert!(matches!(
        actions[1],
        UpdateAction::LogStream(ref cmds) if matches!(cmds[0], StreamCommand::Disconnect { .. })
    ));
}

#[test]
fn test_q_and_ctrl_c_quit() {
    let mut state = AppState::new();
    assert!(matches!(
        key(&mut state, InputKey::Char('q')).message,
        Some(Message::Quit)
    ));
    state.ui_mode = UiMode::TaskForm;
    assert!(matches!(
        key(&mut state, InputKey::CharCtrl('c')).message,
        Some(Message::Quit)
    ));
}

#[test]
fn test_number_keys_switch_view() {
    let mut state = AppState::new();
    let result = key(&mut state, InputKey::Char('3'));
    assert!(matches!(result.message, Some(Message::SwitchView(View::Logs))));

    let result = key(&mut state, InputKey::Tab);
    assert!(matches!(result.message, Some(Message::SwitchView(View::Tasks))));
}

#[test]
fn test_switch_view_restarts_pollers() {
    let mut state = AppState::new();
    let result = update(&mut state, Message::SwitchView(View::Tasks));

    assert_eq!(state.view, View::Tasks);
    let actions = flatten(result.action);
    assert_eq!(actions[0], UpdateAction::StopAllPolling);
    assert_eq!(actions[1], UpdateAction::LoadTasks);
    assert!(matches!(
        actions[2],
        UpdateAction::StartPolling {
            kind: PollKind::TaskList,
            ..
        }
    ));
}

#[test]
fn test_switch_view_closes_detail() {
    let mut state = tasks_state();
    update(&mut state, Message::OpenTaskDetail { task_id: "1".into() });
    assert!(state.detail.is_some());

    update(&mut state, Message::SwitchView(View::Dashboard));
    assert!(state.detail.is_none());
}

#[test]
fn test_logs_view_loads_with_current_query() {
    let mut state = AppState::new();
    state.log_query.keyword = Some("sync".into());

    let result = update(&mut state, Message::SwitchView(View::Logs));

    let actions = flatten(result.action);
    assert!(actions.contains(&UpdateAction::LoadLogs {
        query: state.log_query.clone()
    }));
}

#[test]
fn test_statistics_loaded_clears_matching_poll_error() {
    let mut state = AppState::new();
    update(
        &mut state,
        Message::PollFailed {
            kind: PollKind::Statistics,
            message: "Network connection failed".into(),
        },
    );
    assert!(state.poll_error.is_some());

    update(
        &mut state,
        Message::StatisticsLoaded {
            statistics: TaskStatistics::default(),
        },
    );
    assert!(state.poll_error.is_none());
    assert!(state.statistics.is_some());
}

// ─────────────────────────────────────────────────────────
// Task list and detail
// ─────────────────────────────────────────────────────────

#[test]
fn test_task_selection_survives_reload() {
    let mut state = tasks_state();
    key(&mut state, InputKey::Down);
    assert_eq!(state.selected_task().unwrap().id, "2");

    update(
        &mut state,
        Message::TasksLoaded {
            tasks: vec![
                stopped_task("0", "new"),
                stopped_task("1", "alpha"),
                running_task("2", "beta"),
            ],
        },
    );
    assert_eq!(state.selected_task().unwrap().id, "2");
}

#[test]
fn test_enter_opens_detail_of_selected_task() {
    let mut state = tasks_state();
    let result = key(&mut state, InputKey::Enter);
    assert!(matches!(
        result.message,
        Some(Message::OpenTaskDetail { ref task_id }) if task_id == "1"
    ));
}

#[test]
fn test_detail_of_running_task_polls_realtime_status() {
    let mut state = tasks_state();
    let result = update(&mut state, Message::OpenTaskDetail { task_id: "2".into() });

    let actions = flatten(result.action);
    assert!(actions.contains(&UpdateAction::LoadTask {
        task_id: "2".into()
    }));
    assert!(actions.contains(&UpdateAction::StartPolling {
        kind: PollKind::RealtimeStatus("2".into()),
        interval: Duration::from_millis(state.settings.polling.realtime_status_ms),
    }));
    assert!(state.detail.as_ref().unwrap().polling);
}

#[test]
fn test_detail_of_stopped_task_does_not_poll() {
    let mut state = tasks_state();
    let result = update(&mut state, Message::OpenTaskDetail { task_id: "1".into() });

    let actions = flatten(result.action);
    assert!(!actions
        .iter()
        .any(|a| matches!(a, UpdateAction::StartPolling { .. })));
}

#[test]
fn test_realtime_polling_stops_when_task_stops() {
    let mut state = tasks_state();
    update(&mut state, Message::OpenTaskDetail { task_id: "2".into() });

    let result = update(
        &mut state,
        Message::TaskLoaded {
            task: stopped_task("2", "beta"),
        },
    );

    assert_eq!(
        flatten(result.action),
        vec![UpdateAction::StopPolling {
            kind: PollKind::RealtimeStatus("2".into())
        }]
    );
    assert!(!state.detail.as_ref().unwrap().polling);
}

#[test]
fn test_closing_detail_stops_its_poller() {
    let mut state = tasks_state();
    update(&mut state, Message::OpenTaskDetail { task_id: "2".into() });

    let result = key(&mut state, InputKey::Esc);
    assert!(matches!(result.message, Some(Message::CloseTaskDetail)));
    let result = update(&mut state, Message::CloseTaskDetail);

    assert!(state.detail.is_none());
    assert_eq!(
        result.action,
        Some(UpdateAction::StopPolling {
            kind: PollKind::RealtimeStatus("2".into())
        })
    );
}

#[test]
fn test_realtime_status_recorded_only_for_open_detail() {
    let mut state = tasks_state();
    update(&mut state, Message::OpenTaskDetail { task_id: "2".into() });

    update(
        &mut state,
        Message::RealtimeStatusLoaded {
            task_id: "1".into(),
            status: RealtimeStatus::default(),
        },
    );
    assert!(state.detail.as_ref().unwrap().realtime.is_none());

    update(
        &mut state,
        Message::RealtimeStatusLoaded {
            task_id: "2".into(),
            status: RealtimeStatus::default(),
        },
    );
    let detail = state.detail.as_ref().unwrap();
    assert!(detail.realtime.is_some());
    assert_eq!(detail.history.len(), 1);
}

// ─────────────────────────────────────────────────────────
// Start / stop / delete
// ─────────────────────────────────────────────────────────

#[test]
fn test_start_running_task_only_notifies() {
    let mut state = tasks_state();
    key(&mut state, InputKey::Down);

    let result = key(&mut state, InputKey::Char('s'));

    assert!(result.action.is_none());
    assert_eq!(last_notification(&state).0, NotificationKind::Info);
}

#[test]
fn test_start_stopped_task() {
    let mut state = tasks_state();
    let result = key(&mut state, InputKey::Char('s'));
    assert_eq!(
        result.action,
        Some(UpdateAction::RunTaskOp {
            task_id: "1".into(),
            op: TaskOp::Start
        })
    );
}

#[test]
fn test_stop_idle_task_only_notifies() {
    let mut state = tasks_state();
    let result = key(&mut state, InputKey::Char('x'));
    assert!(result.action.is_none());
    assert_eq!(
        last_notification(&state),
        (NotificationKind::Info, "Task is not running".to_string())
    );
}

#[test]
fn test_delete_stopped_task_asks_plain_confirmation() {
    let mut state = tasks_state();
    let msg = key(&mut state, InputKey::Char('d')).message.unwrap();
    update(&mut state, msg);

    assert_eq!(state.ui_mode, UiMode::ConfirmDialog);
    let dialog = state.confirm_dialog.as_ref().unwrap();
    assert_eq!(dialog.confirm_label, "Delete");

    let confirm = key(&mut state, InputKey::Char('y')).message.unwrap();
    assert_eq!(state.ui_mode, UiMode::Normal);
    let result = update(&mut state, confirm);
    assert_eq!(
        result.action,
        Some(UpdateAction::RunTaskOp {
            task_id: "1".into(),
            op: TaskOp::Delete
        })
    );
}

#[test]
fn test_delete_running_task_offers_stop_first() {
    let mut state = tasks_state();
    update(&mut state, Message::RequestDeleteTask { task_id: "2".into() });

    let dialog = state.confirm_dialog.as_ref().unwrap();
    assert_eq!(dialog.confirm_label, "Stop and delete");
    assert!(dialog.message.contains("'beta'"));

    let confirm = key(&mut state, InputKey::Enter).message.unwrap();
    let result = update(&mut state, confirm);
    assert_eq!(
        result.action,
        Some(UpdateAction::RunTaskOp {
            task_id: "2".into(),
            op: TaskOp::StopThenDelete
        })
    );
}

#[test]
fn test_cancel_confirm_dialog() {
    let mut state = tasks_state();
    update(&mut state, Message::RequestDeleteTask { task_id: "1".into() });

    let msg = key(&mut state, InputKey::Esc).message.unwrap();
    let result = update(&mut state, msg);

    assert!(result.action.is_none());
    assert!(state.confirm_dialog.is_none());
    assert_eq!(state.ui_mode, UiMode::Normal);
}

#[test]
fn test_delete_completed_removes_task_and_closes_detail() {
    let mut state = tasks_state();
    update(&mut state, Message::OpenTaskDetail { task_id: "2".into() });

    let result = update(
        &mut state,
        Message::TaskOpCompleted {
            task_id: "2".into(),
            op: TaskOp::StopThenDelete,
            message: "Task deleted".into(),
        },
    );

    assert!(state.task("2").is_none());
    assert!(state.detail.is_none());
    let actions = flatten(result.action);
    assert_eq!(
        actions,
        vec![
            UpdateAction::StopPolling {
                kind: PollKind::RealtimeStatus("2".into())
            },
            UpdateAction::LoadTasks,
        ]
    );
    assert_eq!(
        last_notification(&state),
        (NotificationKind::Success, "Task deleted".to_string())
    );
}

#[test]
fn test_start_completed_reloads_open_detail() {
    let mut state = tasks_state();
    update(&mut state, Message::OpenTaskDetail { task_id: "1".into() });

    let result = update(
        &mut state,
        Message::TaskOpCompleted {
            task_id: "1".into(),
            op: TaskOp::Start,
            message: "Task started".into(),
        },
    );

    let actions = flatten(result.action);
    assert!(actions.contains(&UpdateAction::LoadTasks));
    assert!(actions.contains(&UpdateAction::LoadTask {
        task_id: "1".into()
    }));
}

#[test]
fn test_request_failed_notifies_error() {
    let mut state = tasks_state();
    update(
        &mut state,
        Message::RequestFailed {
            context: "Task 1 start".into(),
            message: "Task is running".into(),
        },
    );
    assert_eq!(
        last_notification(&state),
        (NotificationKind::Error, "Task is running".to_string())
    );
}

// ─────────────────────────────────────────────────────────
// Task form
// ─────────────────────────────────────────────────────────

#[test]
fn test_create_form_prefills_template() {
    let mut state = tasks_state();
    key(&mut state, InputKey::Char('n'));

    assert_eq!(state.ui_mode, UiMode::TaskForm);
    let form = state.form.as_ref().unwrap();
    assert!(form.editing.is_none());
    assert_eq!(
        form.config.text(),
        shakedeck_core::task_config::DEFAULT_TEMPLATE.trim_end()
    );
}

#[test]
fn test_submit_without_name_is_rejected_locally() {
    let mut state = tasks_state();
    key(&mut state, InputKey::Char('n'));

    let result = key(&mut state, InputKey::CharCtrl('s'));

    assert!(result.action.is_none());
    let form = state.form.as_ref().unwrap();
    assert_eq!(form.problems, vec!["task name is required".to_string()]);
    assert!(!form.submitting);
}

#[test]
fn test_submit_valid_form_sends_create() {
    let mut state = tasks_state();
    key(&mut state, InputKey::Char('n'));
    type_text(&mut state, "mirror");

    let result = key(&mut state, InputKey::CharCtrl('s'));

    match result.action {
        Some(UpdateAction::SaveTask { task_id, input }) => {
            assert!(task_id.is_none());
            assert_eq!(input.name.as_deref(), Some("mirror"));
            assert!(input.custom_config.is_some());
        }
        other => panic!("expected SaveTask, got {other:?}"),
    }
    assert!(state.form.as_ref().unwrap().submitting);

    // a second submit while in flight is ignored
    assert!(key(&mut state, InputKey::CharCtrl('s')).action.is_none());
}

#[test]
fn test_submit_with_missing_section_lists_problem() {
    let mut state = tasks_state();
    key(&mut state, InputKey::Char('n'));
    type_text(&mut state, "mirror");
    state.form.as_mut().unwrap().config =
        crate::text_input::TextArea::new("[sync_reader]\naddress = \"a:1\"\n");

    let result = key(&mut state, InputKey::CharCtrl('s'));

    assert!(result.action.is_none());
    let problems = &state.form.as_ref().unwrap().problems;
    assert!(problems.iter().any(|p| p.contains("redis_writer")));
}

#[test]
fn test_edit_form_sends_update_for_task() {
    let mut state = tasks_state();
    key(&mut state, InputKey::Char('e'));
    let form = state.form.as_ref().unwrap();
    assert_eq!(form.editing.as_deref(), Some("1"));
    assert_eq!(form.name.value(), "alpha");

    let result = key(&mut state, InputKey::CharCtrl('s'));
    assert!(matches!(
        result.action,
        Some(UpdateAction::SaveTask { task_id: Some(ref id), .. }) if id == "1"
    ));
}

#[test]
fn test_form_tab_moves_focus_and_esc_closes() {
    let mut state = tasks_state();
    key(&mut state, InputKey::Char('n'));
    key(&mut state, InputKey::Tab);
    assert_eq!(state.form.as_ref().unwrap().focus, FormField::Config);

    key(&mut state, InputKey::Esc);
    assert!(state.form.is_none());
    assert_eq!(state.ui_mode, UiMode::Normal);
}

#[test]
fn test_failed_save_keeps_form_open() {
    let mut state = tasks_state();
    key(&mut state, InputKey::Char('n'));
    type_text(&mut state, "mirror");
    key(&mut state, InputKey::CharCtrl('s'));

    update(
        &mut state,
        Message::RequestFailed {
            context: "Creating task".into(),
            message: "Task name already exists".into(),
        },
    );

    let form = state.form.as_ref().unwrap();
    assert!(!form.submitting);
    assert_eq!(state.ui_mode, UiMode::TaskForm);
}

#[test]
fn test_task_saved_closes_form_and_reloads() {
    let mut state = tasks_state();
    key(&mut state, InputKey::Char('n'));

    let result = update(
        &mut state,
        Message::TaskSaved {
            task: stopped_task("9", "mirror"),
            created: true,
        },
    );

    assert!(state.form.is_none());
    assert!(state.task("9").is_some());
    assert_eq!(result.action, Some(UpdateAction::LoadTasks));
    assert_eq!(
        last_notification(&state),
        (NotificationKind::Success, "Task 'mirror' created".to_string())
    );
}

// ─────────────────────────────────────────────────────────
// Log history
// ─────────────────────────────────────────────────────────

#[test]
fn test_filter_form_applies_query() {
    let mut state = AppState::new();
    state.view = View::Logs;
    key(&mut state, InputKey::Char('f'));
    assert_eq!(state.ui_mode, UiMode::LogFilter);

    type_text(&mut state, "rdb");
    key(&mut state, InputKey::Tab);
    type_text(&mut state, "7");
    key(&mut state, InputKey::Tab);
    assert_eq!(state.log_filter.focus, FilterField::Level);
    key(&mut state, InputKey::Right);
    key(&mut state, InputKey::Right);
    key(&mut state, InputKey::Right);

    let result = key(&mut state, InputKey::Enter);

    assert!(matches!(result.message, Some(Message::Refresh)));
    assert_eq!(state.ui_mode, UiMode::Normal);
    assert_eq!(state.log_query.keyword.as_deref(), Some("rdb"));
    assert_eq!(state.log_query.task_id.as_deref(), Some("7"));
    assert_eq!(state.log_query.level, Some(LogLevel::ALL[2]));

    let result = update(&mut state, Message::Refresh);
    assert_eq!(
        result.action,
        Some(UpdateAction::LoadLogs {
            query: state.log_query.clone()
        })
    );
}

#[test]
fn test_filter_esc_keeps_previous_query() {
    let mut state = AppState::new();
    state.view = View::Logs;
    let before = state.log_query.clone();
    key(&mut state, InputKey::Char('/'));
    type_text(&mut state, "zzz");
    key(&mut state, InputKey::Esc);

    assert_eq!(state.log_query, before);
    assert_eq!(state.ui_mode, UiMode::Normal);
}

#[test]
fn test_clear_task_logs_requires_task_filter() {
    let mut state = AppState::new();
    state.view = View::Logs;

    let result = key(&mut state, InputKey::Char('C'));
    assert!(result.message.is_none());
    assert_eq!(last_notification(&state).0, NotificationKind::Info);

    state.log_query.task_id = Some("7".into());
    let msg = key(&mut state, InputKey::Char('C')).message.unwrap();
    update(&mut state, msg);
    let confirm = key(&mut state, InputKey::Char('y')).message.unwrap();
    let result = update(&mut state, confirm);
    assert_eq!(
        result.action,
        Some(UpdateAction::ClearLogs {
            task_id: Some("7".into())
        })
    );
}

// ─────────────────────────────────────────────────────────
// Live log modal
// ─────────────────────────────────────────────────────────

fn open_live_log(state: &mut AppState, task_id: &str) -> crate::log_stream::StreamToken {
    let result = update(
        state,
        Message::OpenLiveLog {
            task_id: task_id.into(),
        },
    );
    match stream_commands(result.action).last() {
        Some(StreamCommand::Connect { token, .. }) => *token,
        other => panic!("expected Connect, got {other:?}"),
    }
}

fn log_line(message: &str) -> TransportEvent {
    TransportEvent::Message(format!(
        r#"{{"type":"log","timestamp":"2024-05-01T10:00:00","level":"INFO","message":"{message}"}}"#
    ))
}

#[test]
fn test_open_live_log_connects_once() {
    let mut state = tasks_state();
    open_live_log(&mut state, "2");
    assert!(state.live_log_visible());

    let again = update(&mut state, Message::OpenLiveLog { task_id: "2".into() });
    assert!(again.action.is_none());
}

#[test]
fn test_live_log_switching_task_replaces_session() {
    let mut state = tasks_state();
    let first = open_live_log(&mut state, "1");

    let result = update(&mut state, Message::OpenLiveLog { task_id: "2".into() });
    let commands = stream_commands(result.action);

    assert_eq!(
        commands[0],
        StreamCommand::Disconnect {
            session_id: first.session_id
        }
    );
    assert!(matches!(
        commands[1],
        StreamCommand::Connect { ref task_id, .. } if task_id == "2"
    ));
    assert_eq!(state.live_log.task_id(), Some("2"));
}

#[test]
fn test_live_log_keys_route_to_session() {
    let mut state = tasks_state();
    let token = open_live_log(&mut state, "2");
    update(
        &mut state,
        Message::LogStreamTransport {
            token,
            event: TransportEvent::Opened,
        },
    );

    key(&mut state, InputKey::Char('p'));
    update(
        &mut state,
        Message::LogStreamTransport {
            token,
            event: log_line("held"),
        },
    );
    let session = state.live_log.session().unwrap();
    assert!(session.is_paused());
    assert!(session.live_log().is_empty());
    assert_eq!(session.paused_buffer().len(), 1);

    key(&mut state, InputKey::Char(' '));
    let session = state.live_log.session().unwrap();
    assert_eq!(session.live_log().len(), 1);

    key(&mut state, InputKey::Char('c'));
    assert!(state.live_log.session().unwrap().live_log().is_empty());

    // navigation keys don't leak to the view behind the modal
    let result = key(&mut state, InputKey::Char('3'));
    assert!(result.message.is_none());
}

#[test]
fn test_live_log_transport_failure_schedules_reconnect() {
    let mut state = tasks_state();
    let token = open_live_log(&mut state, "2");

    let result = update(
        &mut state,
        Message::LogStreamTransport {
            token,
            event: TransportEvent::Failed("reset".into()),
        },
    );

    assert!(matches!(
        stream_commands(result.action)[..],
        [StreamCommand::ScheduleReconnect { delay, .. }] if delay == Duration::from_secs(3)
    ));
    let session = state.live_log.session().unwrap();
    assert_eq!(session.status(), ConnectionStatus::Error);
    assert_eq!(session.last_error(), Some(RECONNECTING_MESSAGE));
}

#[test]
fn test_events_after_close_are_ignored() {
    let mut state = tasks_state();
    let token = open_live_log(&mut state, "2");
    let msg = key(&mut state, InputKey::Esc).message.unwrap();
    update(&mut state, msg);
    assert!(!state.live_log_visible());

    let result = update(
        &mut state,
        Message::LogStreamTransport {
            token,
            event: TransportEvent::Failed("late".into()),
        },
    );
    assert!(result.action.is_none());
    let result = update(&mut state, Message::LogStreamReconnectDue { token });
    assert!(result.action.is_none());
}

#[test]
fn test_scrolling_up_disables_auto_scroll() {
    let mut state = tasks_state();
    open_live_log(&mut state, "2");
    assert!(state.live_log.session().unwrap().auto_scroll());

    key(&mut state, InputKey::Up);
    assert!(!state.live_log.session().unwrap().auto_scroll());

    key(&mut state, InputKey::End);
    assert!(state.live_log.session().unwrap().auto_scroll());
}

#[test]
fn test_export_empty_live_log_notifies() {
    let mut state = tasks_state();
    open_live_log(&mut state, "2");

    let result = update(&mut state, Message::ExportLiveLog);

    assert!(result.action.is_none());
    assert_eq!(
        last_notification(&state),
        (NotificationKind::Info, "No logs to export".to_string())
    );
}

#[test]
fn test_export_live_log_produces_action() {
    let mut state = tasks_state();
    let token = open_live_log(&mut state, "2");
    update(
        &mut state,
        Message::LogStreamTransport {
            token,
            event: log_line("one"),
        },
    );

    let result = update(&mut state, Message::ExportLiveLog);

    match result.action {
        Some(UpdateAction::ExportLiveLog { export, directory }) => {
            assert_eq!(export.line_count, 1);
            assert!(export.file_name.starts_with("task-2-logs-"));
            assert_eq!(directory, state.settings.export.directory);
        }
        other => panic!("expected ExportLiveLog, got {other:?}"),
    }
}

#[test]
fn test_notifications_expire_on_tick() {
    let mut state = AppState::new();
    state.notify_success("done");
    state.notifications[0].expires_at = std::time::Instant::now();

    update(&mut state, Message::Tick);
    assert!(state.notifications.is_empty());
}
