//! Task list table

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, StatefulWidget, Table, TableState, Widget},
};

use shakedeck_core::{display_time, SyncTask};

use crate::theme::styles;

pub struct TaskTable<'a> {
    tasks: &'a [SyncTask],
    selected: usize,
    loaded: bool,
    focused: bool,
}

impl<'a> TaskTable<'a> {
    pub fn new(tasks: &'a [SyncTask], selected: usize) -> Self {
        Self {
            tasks,
            selected,
            loaded: true,
            focused: true,
        }
    }

    /// Whether the first task list response has arrived
    pub fn loaded(mut self, loaded: bool) -> Self {
        self.loaded = loaded;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn row(task: &SyncTask) -> Row<'_> {
        let (icon, status_style) = styles::task_status_indicator(task.status);
        let progress = match task.progress_percent() {
            Some(percent) => format!("{:>3}%", percent),
            None => "   -".to_string(),
        };
        Row::new(vec![
            Cell::from(Line::from(vec![
                Span::styled(icon, status_style),
                Span::raw(" "),
                Span::styled(task.status.label(), status_style),
            ])),
            Cell::from(Span::styled(task.name.as_str(), styles::text_primary())),
            Cell::from(Span::styled(progress, styles::text_secondary())),
            Cell::from(Span::styled(
                display_time(task.created_at.as_deref()),
                styles::text_muted(),
            )),
            Cell::from(Span::styled(task.id.as_str(), styles::text_muted())),
        ])
    }
}

impl Widget for TaskTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(self.focused)
            .title(format!(" Tasks ({}) ", self.tasks.len()))
            .title_style(styles::text_bright_bold());

        if self.tasks.is_empty() {
            let inner = block.inner(area);
            block.render(area, buf);
            let text = if self.loaded {
                "No tasks yet. Press n to create one."
            } else {
                "Loading tasks…"
            };
            Paragraph::new(Line::from(Span::styled(text, styles::text_muted())).centered())
                .render(inner, buf);
            return;
        }

        let header = Row::new(vec!["Status", "Name", "Done", "Created", "ID"])
            .style(styles::accent_bold())
            .bottom_margin(1);

        let table = Table::new(
            self.tasks.iter().map(Self::row),
            [
                Constraint::Length(12),
                Constraint::Fill(2),
                Constraint::Length(5),
                Constraint::Length(19),
                Constraint::Fill(1),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(styles::focused_selected())
        .highlight_symbol("▶ ")
        .style(Style::default());

        let mut table_state = TableState::default().with_selected(Some(self.selected));
        StatefulWidget::render(table, area, buf, &mut table_state);
    }
}
