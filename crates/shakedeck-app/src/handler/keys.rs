//! Key event handlers per UI mode

use shakedeck_core::task_config;

use super::{log_stream, tasks, UpdateResult};
use crate::input_key::InputKey;
use crate::message::Message;
use crate::state::{AppState, FilterField, FormField, UiMode, View};
use crate::text_input::TextArea;

/// Convert key events to messages or state changes based on the current mode
pub fn handle_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    if key.is_interrupt() {
        return UpdateResult::message(Message::Quit);
    }
    match state.ui_mode {
        UiMode::ConfirmDialog => handle_key_confirm_dialog(state, key),
        UiMode::TaskForm => handle_key_task_form(state, key),
        UiMode::LogFilter => handle_key_log_filter(state, key),
        UiMode::Normal if state.live_log_visible() => handle_key_live_log(state, key),
        UiMode::Normal if state.detail.is_some() => handle_key_task_detail(state, key),
        UiMode::Normal => handle_key_normal(state, key),
    }
}

// ─────────────────────────────────────────────────────────
// Overlays
// ─────────────────────────────────────────────────────────

fn handle_key_confirm_dialog(state: &mut AppState, key: InputKey) -> UpdateResult {
    match key {
        InputKey::Char('y') | InputKey::Char('Y') | InputKey::Enter => {
            let confirm = state.confirm_dialog.take().map(|d| d.confirm);
            state.hide_confirm_dialog();
            match confirm {
                Some(msg) => UpdateResult::message(msg),
                None => UpdateResult::none(),
            }
        }
        InputKey::Char('n') | InputKey::Char('N') | InputKey::Esc | InputKey::Char('q') => {
            UpdateResult::message(Message::CancelConfirm)
        }
        _ => UpdateResult::none(),
    }
}

fn handle_key_task_form(state: &mut AppState, key: InputKey) -> UpdateResult {
    let Some(form) = state.form.as_mut() else {
        state.ui_mode = UiMode::Normal;
        return UpdateResult::none();
    };
    match key {
        InputKey::Esc => {
            state.hide_task_form();
            UpdateResult::none()
        }
        InputKey::CharCtrl('s') => tasks::submit_form(state),
        InputKey::CharCtrl('t') => {
            form.config = TextArea::new(task_config::DEFAULT_TEMPLATE);
            form.problems.clear();
            UpdateResult::none()
        }
        InputKey::Tab | InputKey::BackTab => {
            form.toggle_focus();
            UpdateResult::none()
        }
        InputKey::Enter if form.focus == FormField::Name => {
            form.toggle_focus();
            UpdateResult::none()
        }
        other => {
            match form.focus {
                FormField::Name => form.name.handle_key(&other),
                FormField::Config => form.config.handle_key(&other),
            };
            UpdateResult::none()
        }
    }
}

fn handle_key_log_filter(state: &mut AppState, key: InputKey) -> UpdateResult {
    let filter = &mut state.log_filter;
    match key {
        InputKey::Esc => state.hide_log_filter(),
        InputKey::Enter => {
            state.log_query = filter.to_query();
            state.hide_log_filter();
            return UpdateResult::message(Message::Refresh);
        }
        InputKey::Tab | InputKey::Down => filter.focus_next(),
        InputKey::BackTab | InputKey::Up => filter.focus_previous(),
        InputKey::Left | InputKey::Right | InputKey::Char(' ')
            if filter.focus == FilterField::Level =>
        {
            filter.cycle_level()
        }
        InputKey::Backspace | InputKey::Delete if filter.focus == FilterField::Level => {
            filter.level = None
        }
        other => {
            if let Some(input) = filter.focused_input() {
                input.handle_key(&other);
            }
        }
    }
    UpdateResult::none()
}

fn handle_key_live_log(state: &mut AppState, key: InputKey) -> UpdateResult {
    match key {
        InputKey::Esc | InputKey::Char('q') => return UpdateResult::message(Message::CloseLiveLog),
        InputKey::Char('p') | InputKey::Char(' ') => log_stream::toggle_pause(state),
        InputKey::Char('c') => state.live_log.clear(),
        InputKey::Char('a') => state.live_log.toggle_auto_scroll(),
        InputKey::Char('e') => return UpdateResult::message(Message::ExportLiveLog),
        InputKey::Char('r') => return log_stream::reconnect(state),
        InputKey::Up | InputKey::Char('k') => log_stream::scroll_up(state, 1),
        InputKey::Down | InputKey::Char('j') => log_stream::scroll_down(state, 1),
        InputKey::PageUp => {
            let page = state.live_log_scroll.visible_lines.saturating_sub(2).max(1);
            log_stream::scroll_up(state, page);
        }
        InputKey::PageDown => state.live_log_scroll.page_down(),
        InputKey::Home | InputKey::Char('g') => {
            state.live_log_scroll.scroll_to_top();
            state.live_log.set_auto_scroll(false);
        }
        InputKey::End | InputKey::Char('G') => log_stream::scroll_to_bottom(state),
        _ => {}
    }
    UpdateResult::none()
}

// ─────────────────────────────────────────────────────────
// Task detail
// ─────────────────────────────────────────────────────────

fn handle_key_task_detail(state: &mut AppState, key: InputKey) -> UpdateResult {
    let Some(task_id) = state.detail.as_ref().map(|d| d.task_id.clone()) else {
        return UpdateResult::none();
    };
    match key {
        InputKey::Esc | InputKey::Backspace => UpdateResult::message(Message::CloseTaskDetail),
        InputKey::Char('q') => UpdateResult::message(Message::Quit),
        InputKey::Char('r') => UpdateResult::message(Message::Refresh),
        InputKey::Char('l') => UpdateResult::message(Message::OpenLiveLog { task_id }),
        InputKey::Char('s') => tasks::start_task(state, task_id),
        InputKey::Char('x') => tasks::stop_task(state, task_id),
        InputKey::Char('e') => tasks::open_edit_form(state, &task_id),
        InputKey::Char('d') => UpdateResult::message(Message::RequestDeleteTask { task_id }),
        _ => UpdateResult::none(),
    }
}

// ─────────────────────────────────────────────────────────
// Normal mode
// ─────────────────────────────────────────────────────────

fn handle_key_normal(state: &mut AppState, key: InputKey) -> UpdateResult {
    match key {
        InputKey::Char('q') => return UpdateResult::message(Message::Quit),
        InputKey::Tab => return UpdateResult::message(Message::SwitchView(state.view.next())),
        InputKey::BackTab => {
            return UpdateResult::message(Message::SwitchView(state.view.previous()))
        }
        InputKey::Char(c @ '1'..='3') => {
            let index = c as usize - '1' as usize;
            return UpdateResult::message(Message::SwitchView(View::ALL[index]));
        }
        InputKey::Char('r') => return UpdateResult::message(Message::Refresh),
        _ => {}
    }

    match state.view {
        View::Dashboard => UpdateResult::none(),
        View::Tasks => handle_key_tasks(state, key),
        View::Logs => handle_key_logs(state, key),
    }
}

fn handle_key_tasks(state: &mut AppState, key: InputKey) -> UpdateResult {
    if let InputKey::Char('n') = key {
        return tasks::open_create_form(state);
    }
    match key {
        InputKey::Down | InputKey::Char('j') => {
            state.select_next_task();
            return UpdateResult::none();
        }
        InputKey::Up | InputKey::Char('k') => {
            state.select_previous_task();
            return UpdateResult::none();
        }
        _ => {}
    }

    let Some(task_id) = state.selected_task().map(|t| t.id.clone()) else {
        return UpdateResult::none();
    };
    match key {
        InputKey::Enter => UpdateResult::message(Message::OpenTaskDetail { task_id }),
        InputKey::Char('l') => UpdateResult::message(Message::OpenLiveLog { task_id }),
        InputKey::Char('s') => tasks::start_task(state, task_id),
        InputKey::Char('x') => tasks::stop_task(state, task_id),
        InputKey::Char('e') => tasks::open_edit_form(state, &task_id),
        InputKey::Char('d') => UpdateResult::message(Message::RequestDeleteTask { task_id }),
        _ => UpdateResult::none(),
    }
}

fn handle_key_logs(state: &mut AppState, key: InputKey) -> UpdateResult {
    match key {
        InputKey::Char('f') | InputKey::Char('/') => state.show_log_filter(),
        InputKey::Char('c') => {
            return UpdateResult::message(Message::RequestClearLogs { task_id: None })
        }
        InputKey::Char('C') => {
            if let Some(task_id) = state.log_query.task_id.clone() {
                return UpdateResult::message(Message::RequestClearLogs {
                    task_id: Some(task_id),
                });
            }
            state.notify(
                crate::state::NotificationKind::Info,
                "Filter by a task first to clear only its logs",
            );
        }
        InputKey::Down | InputKey::Char('j') => state.log_scroll.scroll_down(1),
        InputKey::Up | InputKey::Char('k') => state.log_scroll.scroll_up(1),
        InputKey::PageDown => state.log_scroll.page_down(),
        InputKey::PageUp => state.log_scroll.page_up(),
        InputKey::Home | InputKey::Char('g') => state.log_scroll.scroll_to_top(),
        InputKey::End | InputKey::Char('G') => state.log_scroll.scroll_to_bottom(),
        _ => {}
    }
    UpdateResult::none()
}
