//! Toast stack in the top-right corner

use std::collections::VecDeque;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph, Widget},
};

use shakedeck_app::state::Notification;

use crate::theme::{palette, styles};

use super::tabs::truncate_name;

pub struct Notifications<'a> {
    items: &'a VecDeque<Notification>,
}

impl<'a> Notifications<'a> {
    pub fn new(items: &'a VecDeque<Notification>) -> Self {
        Self { items }
    }
}

impl Widget for Notifications<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // newest on top
        for (row, notification) in self.items.iter().rev().enumerate() {
            let y = area.y + row as u16;
            if y >= area.bottom() {
                break;
            }
            let line_area = Rect::new(area.x, y, area.width, 1);
            let (icon, style) = styles::notification_style(notification.kind);
            let text = truncate_name(&notification.message, area.width.saturating_sub(5) as usize);

            Clear.render(line_area, buf);
            Paragraph::new(Line::from(vec![
                Span::styled(format!(" {} ", icon), style),
                Span::styled(text, styles::text_primary()),
                Span::raw(" "),
            ]))
            .style(Style::default().bg(palette::POPUP_BG))
            .right_aligned()
            .render(line_area, buf);
        }
    }
}
