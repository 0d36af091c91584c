//! Semantic style builders.

use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders};
use shakedeck_app::log_stream::ConnectionStatus;
use shakedeck_app::state::NotificationKind;
use shakedeck_core::{LogLevel, TaskStatus};

use super::palette;

// --- Text styles ---
pub fn text_primary() -> Style {
    Style::default().fg(palette::TEXT_PRIMARY)
}

pub fn text_secondary() -> Style {
    Style::default().fg(palette::TEXT_SECONDARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(palette::TEXT_MUTED)
}

pub fn text_bright_bold() -> Style {
    Style::default()
        .fg(palette::TEXT_BRIGHT)
        .add_modifier(Modifier::BOLD)
}

// --- Border styles ---
pub fn border_inactive() -> Style {
    Style::default().fg(palette::BORDER_DIM)
}

pub fn border_active() -> Style {
    Style::default().fg(palette::BORDER_ACTIVE)
}

// --- Accent styles ---
pub fn accent() -> Style {
    Style::default().fg(palette::ACCENT)
}

pub fn accent_bold() -> Style {
    Style::default()
        .fg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

// --- Status styles ---
pub fn status_green() -> Style {
    Style::default().fg(palette::STATUS_GREEN)
}

pub fn status_red() -> Style {
    Style::default().fg(palette::STATUS_RED)
}

pub fn status_yellow() -> Style {
    Style::default().fg(palette::STATUS_YELLOW)
}

// --- Keybinding hint style ---
pub fn keybinding() -> Style {
    Style::default().fg(palette::STATUS_YELLOW)
}

/// "Black on Cyan" - used for focused+selected items across widgets
pub fn focused_selected() -> Style {
    Style::default()
        .fg(palette::CONTRAST_FG)
        .bg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

// --- Block builders ---
pub fn glass_block(focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            border_active()
        } else {
            border_inactive()
        })
}

pub fn modal_block<'a>(title: impl Into<Line<'a>>) -> Block<'a> {
    Block::default()
        .title(title)
        .title_style(text_bright_bold())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_active())
        .style(Style::default().bg(palette::POPUP_BG))
}

// --- Indicators ---

/// Task status indicator for tables and detail headers.
///
/// Returns `(icon_char, Style)`; the label comes from [`TaskStatus::label`].
pub fn task_status_indicator(status: TaskStatus) -> (&'static str, Style) {
    match status {
        TaskStatus::Running => (
            "●",
            Style::default()
                .fg(palette::STATUS_GREEN)
                .add_modifier(Modifier::BOLD),
        ),
        TaskStatus::Pending => ("◌", Style::default().fg(palette::STATUS_YELLOW)),
        TaskStatus::Completed => ("✓", Style::default().fg(palette::STATUS_BLUE)),
        TaskStatus::Failed => (
            "✗",
            Style::default()
                .fg(palette::STATUS_RED)
                .add_modifier(Modifier::BOLD),
        ),
        TaskStatus::Stopped => ("○", Style::default().fg(palette::TEXT_MUTED)),
        TaskStatus::Unknown => ("?", Style::default().fg(palette::TEXT_MUTED)),
    }
}

/// Live stream connection indicator.
pub fn connection_indicator(status: ConnectionStatus) -> (&'static str, Style) {
    match status {
        ConnectionStatus::Connected => ("●", status_green()),
        ConnectionStatus::Connecting => ("↻", status_yellow()),
        ConnectionStatus::Disconnected => ("○", text_muted()),
        ConnectionStatus::Error => ("✗", status_red()),
    }
}

/// Style for a log level - returns (level_style, message_style)
pub fn log_level_styles(level: LogLevel) -> (Style, Style) {
    match level {
        LogLevel::Fatal => (
            Style::default()
                .fg(palette::LOG_FATAL)
                .add_modifier(Modifier::BOLD),
            Style::default()
                .fg(palette::LOG_ERROR_MSG)
                .add_modifier(Modifier::BOLD),
        ),
        LogLevel::Error => (
            Style::default()
                .fg(palette::LOG_ERROR)
                .add_modifier(Modifier::BOLD),
            Style::default().fg(palette::LOG_ERROR_MSG),
        ),
        LogLevel::Warn => (
            Style::default().fg(palette::LOG_WARNING),
            Style::default().fg(palette::LOG_WARNING_MSG),
        ),
        LogLevel::Info => (
            Style::default().fg(palette::LOG_INFO),
            Style::default().fg(palette::LOG_INFO_MSG),
        ),
        LogLevel::Debug => (
            Style::default().fg(palette::LOG_DEBUG),
            Style::default().fg(palette::LOG_DEBUG_MSG),
        ),
    }
}

/// Toast style and prefix for a notification kind.
pub fn notification_style(kind: NotificationKind) -> (&'static str, Style) {
    match kind {
        NotificationKind::Success => ("✓", status_green()),
        NotificationKind::Error => ("✗", status_red()),
        NotificationKind::Info => ("i", accent()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_styles_have_correct_colors() {
        assert_eq!(text_primary().fg, Some(palette::TEXT_PRIMARY));
        assert_eq!(text_secondary().fg, Some(palette::TEXT_SECONDARY));
        assert_eq!(text_muted().fg, Some(palette::TEXT_MUTED));
    }

    #[test]
    fn test_border_styles_have_correct_colors() {
        assert_eq!(border_inactive().fg, Some(palette::BORDER_DIM));
        assert_eq!(border_active().fg, Some(palette::BORDER_ACTIVE));
    }

    #[test]
    fn test_focused_selected_is_inverted_accent() {
        let s = focused_selected();
        assert_eq!(s.fg, Some(palette::CONTRAST_FG));
        assert_eq!(s.bg, Some(palette::ACCENT));
        assert!(s.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_modal_block_uses_popup_background() {
        let block = modal_block(" Confirm ");
        let mut buf = ratatui::buffer::Buffer::empty(ratatui::layout::Rect::new(0, 0, 20, 3));
        ratatui::widgets::Widget::render(block, buf.area, &mut buf);
        assert_eq!(buf[(5, 1)].bg, palette::POPUP_BG);
    }

    #[test]
    fn test_task_status_indicator_running_is_green() {
        let (icon, style) = task_status_indicator(TaskStatus::Running);
        assert_eq!(icon, "●");
        assert_eq!(style.fg, Some(palette::STATUS_GREEN));
    }

    #[test]
    fn test_task_status_indicator_failed_is_red() {
        let (icon, style) = task_status_indicator(TaskStatus::Failed);
        assert_eq!(icon, "✗");
        assert_eq!(style.fg, Some(palette::STATUS_RED));
    }

    #[test]
    fn test_connection_indicator_covers_all_states() {
        assert_eq!(
            connection_indicator(ConnectionStatus::Connected).1.fg,
            Some(palette::STATUS_GREEN)
        );
        assert_eq!(
            connection_indicator(ConnectionStatus::Connecting).1.fg,
            Some(palette::STATUS_YELLOW)
        );
        assert_eq!(
            connection_indicator(ConnectionStatus::Error).1.fg,
            Some(palette::STATUS_RED)
        );
        assert_eq!(
            connection_indicator(ConnectionStatus::Disconnected).1.fg,
            Some(palette::TEXT_MUTED)
        );
    }

    #[test]
    fn test_error_levels_are_bold() {
        let (level, _) = log_level_styles(LogLevel::Error);
        assert!(level.add_modifier.contains(Modifier::BOLD));
        let (level, message) = log_level_styles(LogLevel::Fatal);
        assert!(level.add_modifier.contains(Modifier::BOLD));
        assert!(message.add_modifier.contains(Modifier::BOLD));
    }
}
