//! Main render/view function (View in TEA pattern)


use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

use shakedeck_app::state::{AppState, UiMode, View};

use super::{layout, widgets};
use crate::theme::palette;

/// Render the active view's body
fn render_body(frame: &mut Frame, area: ratatui::layout::Rect, state: &mut AppState) {
    // Task detail replaces the current view until closed
    if let Some(detail) = &state.detail {
        frame.render_widget(widgets::TaskDetail::new(detail, state.detail_task()), area);
        return;
    }

    match state.view {
        View::Dashboard => {
            frame.render_widget(widgets::Dashboard::new(state.statistics.as_ref()), area);
        }
        View::Tasks => {
            let table = widgets::TaskTable::new(&state.tasks, state.selected_task)
                .loaded(state.tasks_loaded)
                .focused(state.ui_mode == UiMode::Normal);
            frame.render_widget(table, area);
        }
        View::Logs => {
            let table = widgets::LogTable::new(&state.logs, &state.log_query);
            frame.render_stateful_widget(table, area, &mut state.log_scroll);
        }
    }
}

/// Render the live log modal on top of whatever view is underneath
fn render_live_log(frame: &mut Frame, state: &mut AppState) {
    let AppState {
        live_log,
        live_log_scroll,
        tasks,
        ..
    } = state;
    let Some(session) = live_log.session() else {
        return;
    };
    let task_name = tasks
        .iter()
        .find(|task| task.id == session.task_id())
        .map(|task| task.name.as_str());
    frame.render_stateful_widget(
        widgets::LiveLogModal::new(session).task_name(task_name),
        frame.area(),
        live_log_scroll,
    );
}

/// Render the complete UI (View function in TEA)
///
/// This is a pure rendering function - it should not modify state
/// except for widget state that tracks rendering info (scroll position).
pub fn view(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();

    // Fill entire terminal with deepest background color
    let bg_block = Block::default().style(Style::default().bg(palette::DEEPEST_BG));
    frame.render_widget(bg_block, area);

    let areas = layout::create(area);

    let poll_error = state.poll_error.as_ref().map(|(_, message)| message.as_str());
    let header = widgets::MainHeader::new(&state.settings.server.base_url, state.view)
        .poll_error(poll_error);
    frame.render_widget(header, areas.header);

    render_body(frame, areas.body, state);
    frame.render_widget(widgets::StatusBar::new(state), areas.footer);

    if state.live_log_visible() {
        render_live_log(frame, state);
    }

    // Render modal overlays based on UI mode
    match state.ui_mode {
        UiMode::Normal => {}
        UiMode::TaskForm => {
            if let Some(form) = &state.form {
                frame.render_widget(widgets::TaskForm::new(form), area);
            }
        }
        UiMode::LogFilter => {
            frame.render_widget(widgets::FilterForm::new(&state.log_filter), area);
        }
        UiMode::ConfirmDialog => {
            if let Some(dialog) = &state.confirm_dialog {
                frame.render_widget(widgets::ConfirmDialog::new(dialog), area);
            }
        }
    }

    // Toasts stay above every modal
    if !state.notifications.is_empty() {
        let toast_area = layout::notification_area(areas.body, state.notifications.len());
        frame.render_widget(widgets::Notifications::new(&state.notifications), toast_area);
    }
}
