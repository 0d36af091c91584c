//! Header bar: app title, server address, refresh health and view tabs.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use shakedeck_app::state::View;

use crate::theme::{palette, styles};

use super::tabs::{truncate_name, ViewTabs};

pub struct MainHeader<'a> {
    server: &'a str,
    view: View,
    poll_error: Option<&'a str>,
}

impl<'a> MainHeader<'a> {
    pub fn new(server: &'a str, view: View) -> Self {
        Self {
            server,
            view,
            poll_error: None,
        }
    }

    /// Show the last background refresh failure on the title row
    pub fn poll_error(mut self, error: Option<&'a str>) -> Self {
        self.poll_error = error;
        self
    }

    fn render_title_row(&self, area: Rect, buf: &mut Buffer) {
        let (dot, dot_style) = match self.poll_error {
            Some(_) => ("●", styles::status_red()),
            None => ("●", styles::status_green()),
        };

        let left = Line::from(vec![
            Span::raw(" "),
            Span::styled(dot, dot_style),
            Span::raw(" "),
            Span::styled("shakedeck", styles::accent_bold()),
            Span::raw(" "),
            Span::styled("/", styles::text_muted()),
            Span::raw(" "),
            Span::styled(self.server, styles::text_secondary()),
        ]);
        let left_width = left.width() as u16;
        Paragraph::new(left).render(area, buf);

        if let Some(error) = self.poll_error {
            let room = area.width.saturating_sub(left_width + 4) as usize;
            if room < 8 {
                return;
            }
            let text = format!("⚠ {} ", truncate_name(error, room.saturating_sub(3)));
            let right = Line::from(Span::styled(text, styles::status_red())).right_aligned();
            Paragraph::new(right).render(area, buf);
        }
    }
}

impl Widget for MainHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false).style(Style::default().bg(palette::DEEPEST_BG));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        self.render_title_row(Rect { height: 1, ..inner }, buf);

        if inner.height >= 2 {
            let tabs_area = Rect {
                y: inner.y + 1,
                height: 1,
                ..inner
            };
            ViewTabs::new(self.view).render(tabs_area, buf);
        }
    }
}
