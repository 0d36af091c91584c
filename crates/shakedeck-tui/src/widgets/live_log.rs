//! Live log modal
//!
//! Renders one [`LogStreamSession`]: connection health, the reconnect banner,
//! pause state and the followed log lines. One entry is one row, so the
//! scroll state maps rows to entries directly.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{
        Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};

use shakedeck_app::log_stream::{ConnectionStatus, LogStreamSession};
use shakedeck_app::scroll_state::ScrollState;
use shakedeck_core::LogEntry;

use crate::theme::styles;

use super::modal_overlay;

pub struct LiveLogModal<'a> {
    session: &'a LogStreamSession,
    task_name: Option<&'a str>,
}

impl<'a> LiveLogModal<'a> {
    pub fn new(session: &'a LogStreamSession) -> Self {
        Self {
            session,
            task_name: None,
        }
    }

    pub fn task_name(mut self, name: Option<&'a str>) -> Self {
        self.task_name = name;
        self
    }

    fn title(&self) -> Line<'a> {
        let name = self.task_name.unwrap_or(self.session.task_id());
        Line::from(vec![
            Span::styled(" Live log ", styles::text_bright_bold()),
            Span::styled("· ", styles::text_muted()),
            Span::styled(name, styles::accent()),
            Span::raw(" "),
        ])
    }

    fn status_line(&self) -> Line<'static> {
        let session = self.session;
        let (icon, style) = styles::connection_indicator(session.status());
        let separator = || Span::styled("  ·  ", styles::text_muted());

        let mut spans = vec![
            Span::raw(" "),
            Span::styled(icon, style),
            Span::raw(" "),
            Span::styled(session.status().label(), style),
            separator(),
            Span::styled(
                format!("{} lines", session.live_log().len()),
                styles::text_secondary(),
            ),
            separator(),
        ];
        spans.push(if session.auto_scroll() {
            Span::styled("auto-scroll on", styles::status_green())
        } else {
            Span::styled("auto-scroll off", styles::text_muted())
        });
        if session.is_paused() {
            spans.push(separator());
            spans.push(Span::styled(
                format!("PAUSED ({} buffered)", session.paused_buffer().len()),
                styles::status_yellow().add_modifier(Modifier::BOLD),
            ));
        }
        if session.malformed_count() > 0 {
            spans.push(separator());
            spans.push(Span::styled(
                format!("{} unreadable", session.malformed_count()),
                styles::text_muted(),
            ));
        }
        Line::from(spans)
    }

    /// Shown while the transport is down and a retry is scheduled
    fn banner(&self) -> Option<Line<'a>> {
        let error = self.session.last_error()?;
        let style = match self.session.status() {
            ConnectionStatus::Error => styles::status_red(),
            _ => styles::status_yellow(),
        };
        Some(Line::from(vec![
            Span::styled(" ⚠ ", style.add_modifier(Modifier::BOLD)),
            Span::styled(error, style),
        ]))
    }

    fn empty_text(&self) -> &'static str {
        match self.session.status() {
            ConnectionStatus::Connecting => "Connecting to log stream…",
            ConnectionStatus::Error => "Waiting to reconnect…",
            _ if self.session.is_paused() => "Paused. New lines are buffered.",
            _ => "Waiting for log output…",
        }
    }
}

/// One log entry as a single terminal row
pub fn entry_line(entry: &LogEntry) -> Line<'_> {
    let (level_style, message_style) = styles::log_level_styles(entry.level);
    Line::from(vec![
        Span::styled(entry.formatted_time(), styles::text_muted()),
        Span::raw(" "),
        Span::styled(format!("{:<5}", entry.level.as_str()), level_style),
        Span::raw(" "),
        Span::styled(entry.message.as_str(), message_style),
    ])
}

impl StatefulWidget for LiveLogModal<'_> {
    type State = ScrollState;

    fn render(self, area: Rect, buf: &mut Buffer, scroll: &mut ScrollState) {
        let modal = modal_overlay::centered_rect_percent(90, 85, area);
        modal_overlay::open_modal(buf, area, modal);

        let block = styles::modal_block(self.title());
        let inner = block.inner(modal);
        block.render(modal, buf);

        let banner = self.banner();
        let banner_height = u16::from(banner.is_some());
        let [status_area, banner_area, body] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(banner_height),
            Constraint::Min(0),
        ])
        .areas(inner);

        Paragraph::new(self.status_line()).render(status_area, buf);
        if let Some(banner) = banner {
            Paragraph::new(banner).render(banner_area, buf);
        }

        let entries = self.session.live_log();
        let visible = body.height as usize;
        scroll.update_content_size(entries.len(), visible, self.session.auto_scroll());

        if entries.is_empty() {
            Paragraph::new(
                Line::from(Span::styled(self.empty_text(), styles::text_muted())).centered(),
            )
            .render(body, buf);
            return;
        }

        let (start, end) = scroll.visible_range();
        let lines: Vec<Line> = entries[start..end].iter().map(entry_line).collect();
        Paragraph::new(lines).render(body, buf);

        if entries.len() > visible {
            let mut bar = ScrollbarState::new(entries.len().saturating_sub(visible))
                .position(scroll.offset);
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None)
                .render(body, buf, &mut bar);
        }
    }
}
