//! Screen layout definitions for the TUI

use ratatui::layout::{Constraint, Layout, Rect};

/// Header height: top border + title row + tabs row + bottom border
pub const HEADER_HEIGHT: u16 = 4;

/// Screen areas for the main layout
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    /// Title, server address and view tabs
    pub header: Rect,
    /// Active view content
    pub body: Rect,
    /// Single-row key hints
    pub footer: Rect,
}

/// Create the main screen layout
pub fn create(area: Rect) -> ScreenAreas {
    let chunks = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .split(area);

    ScreenAreas {
        header: chunks[0],
        body: chunks[1],
        footer: chunks[2],
    }
}

/// Area in the top-right corner of `body` for stacked toasts.
pub fn notification_area(body: Rect, count: usize) -> Rect {
    let width = body.width.min(48);
    let height = (count as u16).min(body.height);
    Rect::new(body.right().saturating_sub(width), body.y, width, height)
}
