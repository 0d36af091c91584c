//! Text field rendering shared by the task form and the log filter

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::theme::styles;

fn cursor_style() -> Style {
    styles::text_primary().add_modifier(Modifier::REVERSED)
}

/// Render `value` with a block cursor at char index `cursor` when focused.
pub fn input_line(value: &str, cursor: usize, focused: bool) -> Line<'static> {
    if !focused {
        return Line::from(Span::styled(value.to_string(), styles::text_secondary()));
    }
    let (head, rest) = split_at_char(value, cursor);
    let mut chars = rest.chars();
    let at = chars.next().map(String::from).unwrap_or_else(|| " ".to_string());
    Line::from(vec![
        Span::styled(head.to_string(), styles::text_primary()),
        Span::styled(at, cursor_style()),
        Span::styled(chars.as_str().to_string(), styles::text_primary()),
    ])
}

fn split_at_char(value: &str, index: usize) -> (&str, &str) {
    let byte = value
        .char_indices()
        .nth(index)
        .map(|(i, _)| i)
        .unwrap_or(value.len());
    value.split_at(byte)
}
