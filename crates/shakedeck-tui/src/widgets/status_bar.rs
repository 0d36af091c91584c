//! Footer row with the key bindings of whatever currently has focus

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use shakedeck_app::state::{AppState, UiMode, View};

use crate::theme::styles;

type Hints = &'static [(&'static str, &'static str)];

const CONFIRM: Hints = &[("y", "confirm"), ("n/Esc", "cancel")];
const TASK_FORM: Hints = &[
    ("Tab", "switch field"),
    ("Ctrl+S", "save"),
    ("Ctrl+T", "template"),
    ("Esc", "cancel"),
];
const LOG_FILTER: Hints = &[
    ("Tab", "next field"),
    ("←/→", "level"),
    ("Enter", "apply"),
    ("Esc", "cancel"),
];
const LIVE_LOG: Hints = &[
    ("p", "pause"),
    ("c", "clear"),
    ("a", "auto-scroll"),
    ("e", "export"),
    ("r", "reconnect"),
    ("Esc", "close"),
];
const TASK_DETAIL: Hints = &[
    ("l", "live log"),
    ("s", "start"),
    ("x", "stop"),
    ("e", "edit"),
    ("d", "delete"),
    ("Esc", "back"),
];
const TASKS: Hints = &[
    ("↑↓", "select"),
    ("Enter", "details"),
    ("n", "new"),
    ("l", "live log"),
    ("s/x", "start/stop"),
    ("d", "delete"),
    ("q", "quit"),
];
const LOGS: Hints = &[
    ("f", "filter"),
    ("c", "clear all"),
    ("C", "clear task"),
    ("r", "refresh"),
    ("q", "quit"),
];
const DASHBOARD: Hints = &[("Tab/1-3", "views"), ("r", "refresh"), ("q", "quit")];

/// Key hints for the element that receives keys, mirroring the handler's
/// dispatch order.
pub fn key_hints(state: &AppState) -> Hints {
    match state.ui_mode {
        UiMode::ConfirmDialog => CONFIRM,
        UiMode::TaskForm => TASK_FORM,
        UiMode::LogFilter => LOG_FILTER,
        UiMode::Normal if state.live_log_visible() => LIVE_LOG,
        UiMode::Normal if state.detail.is_some() => TASK_DETAIL,
        UiMode::Normal => match state.view {
            View::Dashboard => DASHBOARD,
            View::Tasks => TASKS,
            View::Logs => LOGS,
        },
    }
}

pub struct StatusBar {
    hints: Hints,
}

impl StatusBar {
    pub fn new(state: &AppState) -> Self {
        Self {
            hints: key_hints(state),
        }
    }
}

impl Widget for StatusBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::raw(" ")];
        for (i, (key, action)) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" · ", styles::text_muted()));
            }
            spans.push(Span::styled(*key, styles::keybinding()));
            spans.push(Span::raw(" "));
            spans.push(Span::styled(*action, styles::text_secondary()));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_state, TestTerminal};
    use shakedeck_app::state::{ConfirmDialogState, TaskDetailState};
    use shakedeck_app::Message;

    #[test]
    fn test_hints_follow_view() {
        let mut state = create_test_state();
        assert_eq!(key_hints(&state), DASHBOARD);

        state.view = View::Tasks;
        assert_eq!(key_hints(&state), TASKS);

        state.view = View::Logs;
        assert_eq!(key_hints(&state), LOGS);
    }

    #[test]
    fn test_overlays_take_precedence() {
        let mut state = create_test_state();
        state.view = View::Tasks;
        state.detail = Some(TaskDetailState::new("t1".to_string(), 10));
        assert_eq!(key_hints(&state), TASK_DETAIL);

        let _ = state.live_log.show("t1");
        assert_eq!(key_hints(&state), LIVE_LOG);

        state.show_confirm_dialog(ConfirmDialogState::new(
            "Delete",
            "Delete task?",
            "Delete",
            Message::CancelConfirm,
        ));
        assert_eq!(key_hints(&state), CONFIRM);
    }

    #[test]
    fn test_status_bar_renders_hints() {
        let mut state = create_test_state();
        state.view = View::Logs;
        let mut term = TestTerminal::with_size(80, 1);
        term.render_widget(StatusBar::new(&state), term.area());

        assert!(term.buffer_contains("f filter"));
        assert!(term.buffer_contains("C clear task"));
    }
}
