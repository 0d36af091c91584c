//! Create/edit task modal

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use shakedeck_app::state::{FormField, TaskFormState};
use shakedeck_app::text_input::TextArea;

use crate::theme::styles;

use super::{input::input_line, modal_overlay};

pub struct TaskForm<'a> {
    form: &'a TaskFormState,
}

impl<'a> TaskForm<'a> {
    pub fn new(form: &'a TaskFormState) -> Self {
        Self { form }
    }
}

/// First editor row to show so the cursor row stays in view
fn editor_offset(cursor_row: usize, height: usize) -> usize {
    if height == 0 {
        return 0;
    }
    cursor_row.saturating_sub(height - 1)
}

fn render_editor(editor: &TextArea, focused: bool, area: Rect, buf: &mut Buffer) {
    let height = area.height as usize;
    let (cursor_row, cursor_col) = editor.cursor();
    let offset = editor_offset(cursor_row, height);
    let gutter = editor.line_count().to_string().len();

    let lines: Vec<Line> = editor
        .lines()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(row, text)| {
            let mut line = input_line(text, cursor_col, focused && row == cursor_row);
            line.spans.insert(
                0,
                Span::styled(format!("{:>gutter$} ", row + 1), styles::text_muted()),
            );
            line
        })
        .collect();
    Paragraph::new(lines).render(area, buf);
}

impl Widget for TaskForm<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let form = self.form;
        let modal = modal_overlay::centered_rect_percent(80, 85, area);
        modal_overlay::open_modal(buf, area, modal);

        let block = styles::modal_block(format!(" {} ", form.title()));
        let inner = block.inner(modal);
        block.render(modal, buf);

        let problem_rows = form.problems.len() as u16 + u16::from(form.submitting);
        let [name_area, config_area, problems_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(problem_rows),
        ])
        .areas(inner);

        let name_focused = form.focus == FormField::Name;
        let name_block = styles::glass_block(name_focused).title(" Name ");
        let name_inner = name_block.inner(name_area);
        name_block.render(name_area, buf);
        Paragraph::new(input_line(form.name.value(), form.name.cursor(), name_focused))
            .render(name_inner, buf);

        let config_focused = form.focus == FormField::Config;
        let config_block = styles::glass_block(config_focused).title(" Configuration ");
        let config_inner = config_block.inner(config_area);
        config_block.render(config_area, buf);
        render_editor(&form.config, config_focused, config_inner, buf);

        let mut lines: Vec<Line> = form
            .problems
            .iter()
            .map(|p| {
                Line::from(vec![
                    Span::styled(" ✗ ", styles::status_red()),
                    Span::styled(p.as_str(), styles::status_red()),
                ])
            })
            .collect();
        if form.submitting {
            lines.push(Line::from(Span::styled(" Saving…", styles::status_yellow())));
        }
        Paragraph::new(lines).render(problems_area, buf);
    }
}
