//! Log history filter modal

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use shakedeck_app::state::{FilterField, LogFilterForm};
use shakedeck_app::text_input::TextInput;

use crate::theme::styles;

use super::{input::input_line, modal_overlay};

const FORM_WIDTH: u16 = 60;
/// Fields plus a blank row and the time-format hint, inside borders
const FORM_HEIGHT: u16 = FilterField::ALL.len() as u16 + 4;

pub struct FilterForm<'a> {
    form: &'a LogFilterForm,
}

impl<'a> FilterForm<'a> {
    pub fn new(form: &'a LogFilterForm) -> Self {
        Self { form }
    }

    fn input(&self, field: FilterField) -> Option<&'a TextInput> {
        let form = self.form;
        match field {
            FilterField::Keyword => Some(&form.keyword),
            FilterField::TaskId => Some(&form.task_id),
            FilterField::Level => None,
            FilterField::StartTime => Some(&form.start_time),
            FilterField::EndTime => Some(&form.end_time),
            FilterField::Limit => Some(&form.limit),
        }
    }

    fn field_line(&self, field: FilterField) -> Line<'static> {
        let focused = self.form.focus == field;
        let label_style = if focused {
            styles::accent_bold()
        } else {
            styles::text_muted()
        };
        let marker = if focused { "▶ " } else { "  " };

        let mut line = match self.input(field) {
            Some(input) => input_line(input.value(), input.cursor(), focused),
            None => {
                let level = self.form.level.map(|l| l.as_str()).unwrap_or("any");
                let style = if focused {
                    styles::text_primary()
                } else {
                    styles::text_secondary()
                };
                Line::from(Span::styled(format!("◀ {} ▶", level), style))
            }
        };
        line.spans.insert(0, Span::styled(marker, styles::accent()));
        line.spans.insert(
            1,
            Span::styled(format!("{:<9}", field.label()), label_style),
        );
        line
    }
}

impl Widget for FilterForm<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let modal = modal_overlay::centered_rect(FORM_WIDTH, FORM_HEIGHT, area);
        modal_overlay::open_modal(buf, area, modal);

        let block = styles::modal_block(" Filter logs ");
        let inner = block.inner(modal);
        block.render(modal, buf);

        let mut lines: Vec<Line> = FilterField::ALL
            .iter()
            .map(|field| self.field_line(*field))
            .collect();
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "  Times: YYYY-MM-DD HH:MM:SS",
            styles::text_muted(),
        )));
        Paragraph::new(lines).render(inner, buf);
    }
}
