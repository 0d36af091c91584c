//! View tabs shown in the header

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Tabs, Widget},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use shakedeck_app::state::View;

use crate::theme::styles;

/// Numbered tabs for the top-level views
pub struct ViewTabs {
    selected: View,
}

impl ViewTabs {
    pub fn new(selected: View) -> Self {
        Self { selected }
    }

    fn titles() -> Vec<Line<'static>> {
        View::ALL
            .iter()
            .enumerate()
            .map(|(i, view)| Line::from(format!(" {} {} ", i + 1, view.title())))
            .collect()
    }
}

impl Widget for ViewTabs {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let selected = View::ALL
            .iter()
            .position(|v| *v == self.selected)
            .unwrap_or(0);

        Tabs::new(Self::titles())
            .select(selected)
            .style(styles::text_secondary())
            .highlight_style(styles::focused_selected())
            .divider("│")
            .render(area, buf);
    }
}

/// Truncate to `max_width` display columns, marking the cut with "…".
pub fn truncate_name(name: &str, max_width: usize) -> String {
    if name.width() <= max_width {
        return name.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in name.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
