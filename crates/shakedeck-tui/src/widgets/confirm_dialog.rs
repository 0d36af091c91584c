//! Yes/no confirmation modal

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use shakedeck_app::state::ConfirmDialogState;

use crate::theme::{palette, styles};

use super::modal_overlay;

const DIALOG_WIDTH: u16 = 56;
const DIALOG_HEIGHT: u16 = 8;

pub struct ConfirmDialog<'a> {
    state: &'a ConfirmDialogState,
}

impl<'a> ConfirmDialog<'a> {
    pub fn new(state: &'a ConfirmDialogState) -> Self {
        Self { state }
    }

    fn buttons(&self) -> Line<'a> {
        Line::from(vec![
            Span::styled(
                format!(" y  {} ", self.state.confirm_label),
                styles::status_red()
                    .bg(palette::SURFACE)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            Span::styled(" n  Cancel ", styles::text_secondary().bg(palette::SURFACE)),
        ])
        .centered()
    }
}

impl Widget for ConfirmDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let modal = modal_overlay::centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
        modal_overlay::open_modal(buf, area, modal);

        let block = styles::modal_block(format!(" {} ", self.state.title));
        let inner = block.inner(modal);
        block.render(modal, buf);

        let [message, _, buttons] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        Paragraph::new(Span::styled(
            self.state.message.as_str(),
            styles::text_primary(),
        ))
        .wrap(Wrap { trim: true })
        .centered()
        .render(message, buf);
        Paragraph::new(self.buttons()).render(buttons, buf);
    }
}
