//! Stored log history with the active filter in the title

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{
        Cell, Paragraph, Row, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget,
        Table, Widget,
    },
};

use shakedeck_app::scroll_state::ScrollState;
use shakedeck_core::{display_time, LogQuery, TaskLog};

use crate::theme::styles;

/// Header row plus its bottom margin
const HEADER_ROWS: u16 = 1;

pub struct LogTable<'a> {
    logs: &'a [TaskLog],
    query: &'a LogQuery,
}

impl<'a> LogTable<'a> {
    pub fn new(logs: &'a [TaskLog], query: &'a LogQuery) -> Self {
        Self { logs, query }
    }
}

/// Compact `key=value` summary of the active filter, or `None` when
/// nothing narrows the result.
pub fn filter_summary(query: &LogQuery) -> Option<String> {
    if !query.is_filtered() {
        return None;
    }
    let mut parts = Vec::new();
    if let Some(task_id) = &query.task_id {
        parts.push(format!("task={}", task_id));
    }
    if let Some(level) = query.level {
        parts.push(format!("level={}", level.as_str()));
    }
    if let Some(keyword) = &query.keyword {
        parts.push(format!("\"{}\"", keyword));
    }
    if let Some(start) = &query.start_time {
        parts.push(format!("from {}", start));
    }
    if let Some(end) = &query.end_time {
        parts.push(format!("to {}", end));
    }
    Some(parts.join(" "))
}

fn row(log: &TaskLog) -> Row<'_> {
    let (level_style, message_style) = styles::log_level_styles(log.level);
    let task = log.task_name.as_deref().unwrap_or(log.task_id.as_str());
    Row::new(vec![
        Cell::from(Span::styled(
            display_time(Some(log.timestamp.as_str())),
            styles::text_muted(),
        )),
        Cell::from(Span::styled(log.level.as_str(), level_style)),
        Cell::from(Span::styled(task, styles::text_secondary())),
        Cell::from(Span::styled(log.message.as_str(), message_style)),
    ])
}

impl StatefulWidget for LogTable<'_> {
    type State = ScrollState;

    fn render(self, area: Rect, buf: &mut Buffer, scroll: &mut ScrollState) {
        let mut title = vec![Span::styled(
            format!(" Log History ({}) ", self.logs.len()),
            styles::text_bright_bold(),
        )];
        if let Some(summary) = filter_summary(self.query) {
            title.push(Span::styled(format!("[{}] ", summary), styles::status_yellow()));
        }
        let block = styles::glass_block(true).title(Line::from(title));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.logs.is_empty() {
            scroll.update_content_size(0, 0, false);
            let text = if self.query.is_filtered() {
                "No logs match the current filter. Press f to change it."
            } else {
                "No logs recorded."
            };
            Paragraph::new(Line::from(Span::styled(text, styles::text_muted())).centered())
                .render(inner, buf);
            return;
        }

        let visible = inner.height.saturating_sub(HEADER_ROWS) as usize;
        scroll.update_content_size(self.logs.len(), visible, false);
        let (start, end) = scroll.visible_range();

        let table = Table::new(
            self.logs[start..end].iter().map(row),
            [
                Constraint::Length(19),
                Constraint::Length(5),
                Constraint::Length(14),
                Constraint::Fill(1),
            ],
        )
        .header(Row::new(vec!["Time", "Level", "Task", "Message"]).style(styles::accent_bold()));
        Widget::render(table, inner, buf);

        if self.logs.len() > visible {
            let mut bar = ScrollbarState::new(self.logs.len().saturating_sub(visible))
                .position(scroll.offset);
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None)
                .render(area, buf, &mut bar);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use shakedeck_core::LogLevel;

    fn log(i: usize, level: LogLevel) -> TaskLog {
        TaskLog {
            id: Some(i.to_string()),
            task_id: "t1".to_string(),
            task_name: Some("orders".to_string()),
            timestamp: "2024-05-01T10:00:00".to_string(),
            level,
            message: format!("message {}", i),
            source: None,
        }
    }

    #[test]
    fn test_renders_rows() {
        let logs = vec![log(1, LogLevel::Info), log(2, LogLevel::Error)];
        let query = LogQuery::default();
        let mut scroll = ScrollState::new();
        let mut term = TestTerminal::new();
        term.draw_with(|f| {
            f.render_stateful_widget(LogTable::new(&logs, &query), f.area(), &mut scroll)
        });

        assert!(term.buffer_contains("Log History (2)"));
        assert!(term.buffer_contains("message 1"));
        assert!(term.buffer_contains("ERROR"));
        assert!(term.buffer_contains("orders"));
    }

    #[test]
    fn test_scroll_window_follows_offset() {
        let logs: Vec<TaskLog> = (0..50).map(|i| log(i, LogLevel::Info)).collect();
        let query = LogQuery::default();
        let mut scroll = ScrollState::new();
        scroll.offset = 20;
        let mut term = TestTerminal::new();
        term.draw_with(|f| {
            f.render_stateful_widget(LogTable::new(&logs, &query), f.area(), &mut scroll)
        });

        // 24 rows - 2 border - 1 header
        assert_eq!(scroll.visible_lines, 21);
        assert_eq!(scroll.total_lines, 50);
        assert!(term.buffer_contains("message 20 "));
        assert!(!term.buffer_contains("message 19 "));
    }

    #[test]
    fn test_filtered_title_and_empty_state() {
        let query = LogQuery {
            level: Some(LogLevel::Error),
            keyword: Some("timeout".to_string()),
            ..Default::default()
        };
        let mut scroll = ScrollState::new();
        let mut term = TestTerminal::new();
        term.draw_with(|f| {
            f.render_stateful_widget(LogTable::new(&[], &query), f.area(), &mut scroll)
        });

        assert!(term.buffer_contains("level=ERROR"));
        assert!(term.buffer_contains("\"timeout\""));
        assert!(term.buffer_contains("No logs match"));
    }

    #[test]
    fn test_filter_summary_none_when_unfiltered() {
        let query = LogQuery {
            limit: Some(200),
            ..Default::default()
        };
        assert_eq!(filter_summary(&query), None);
    }
}
