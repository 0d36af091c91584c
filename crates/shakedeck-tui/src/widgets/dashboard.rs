//! Dashboard: task counts, key totals and recently created tasks

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Cell, Gauge, Paragraph, Row, Table, Widget},
};

use shakedeck_core::{display_time, TaskStatistics};

use crate::theme::{palette, styles};

pub struct Dashboard<'a> {
    statistics: Option<&'a TaskStatistics>,
}

impl<'a> Dashboard<'a> {
    pub fn new(statistics: Option<&'a TaskStatistics>) -> Self {
        Self { statistics }
    }
}

/// Processed share of all known keys, 0.0..=1.0
fn key_ratio(stats: &TaskStatistics) -> f64 {
    if stats.total_keys == 0 {
        return 0.0;
    }
    (stats.processed_keys.min(stats.total_keys) as f64) / stats.total_keys as f64
}

fn render_card(area: Rect, buf: &mut Buffer, label: &str, value: u64, style: Style) {
    let block = styles::glass_block(false);
    let inner = block.inner(area);
    block.render(area, buf);
    Paragraph::new(vec![
        Line::from(Span::styled(value.to_string(), style)).centered(),
        Line::from(Span::styled(label, styles::text_muted())).centered(),
    ])
    .render(inner, buf);
}

impl Dashboard<'_> {
    fn render_cards(stats: &TaskStatistics, area: Rect, buf: &mut Buffer) {
        let cards: [(&str, u64, Style); 4] = [
            ("total", stats.total, styles::text_bright_bold()),
            ("running", stats.running, styles::status_green()),
            ("stopped", stats.stopped, styles::text_secondary()),
            ("failed", stats.failed, styles::status_red()),
        ];
        let areas = Layout::horizontal([Constraint::Fill(1); 4]).split(area);
        for ((label, value, style), card_area) in cards.into_iter().zip(areas.iter()) {
            render_card(*card_area, buf, label, value, style);
        }
    }

    fn render_keys(stats: &TaskStatistics, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false)
            .title(" Keys ")
            .title_style(styles::text_bright_bold());
        let inner = block.inner(area);
        block.render(area, buf);

        let [counts, gauge] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(inner);
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{} processed", stats.processed_keys), styles::text_primary()),
            Span::styled(" / ", styles::text_muted()),
            Span::styled(format!("{} total", stats.total_keys), styles::text_secondary()),
            Span::styled(" / ", styles::text_muted()),
            Span::styled(format!("{} failed", stats.failed_keys), styles::status_red()),
        ]))
        .render(counts, buf);

        Gauge::default()
            .gauge_style(Style::default().fg(palette::ACCENT).bg(palette::SURFACE))
            .ratio(key_ratio(stats))
            .render(gauge, buf);
    }

    fn render_recent(stats: &TaskStatistics, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false)
            .title(" Recent tasks ")
            .title_style(styles::text_bright_bold());

        if stats.recent_tasks.is_empty() {
            let inner = block.inner(area);
            block.render(area, buf);
            Paragraph::new(Span::styled("No tasks yet", styles::text_muted())).render(inner, buf);
            return;
        }

        let rows = stats.recent_tasks.iter().map(|task| {
            let (icon, style) = styles::task_status_indicator(task.status);
            Row::new(vec![
                Cell::from(Line::from(vec![
                    Span::styled(icon, style),
                    Span::raw(" "),
                    Span::styled(task.status.label(), style),
                ])),
                Cell::from(Span::styled(task.name.as_str(), styles::text_primary())),
                Cell::from(Span::styled(
                    task.processed_keys.to_string(),
                    styles::text_secondary(),
                )),
                Cell::from(Span::styled(
                    display_time(task.created_at.as_deref()),
                    styles::text_muted(),
                )),
            ])
        });
        Table::new(
            rows,
            [
                Constraint::Length(12),
                Constraint::Fill(1),
                Constraint::Length(10),
                Constraint::Length(19),
            ],
        )
        .header(Row::new(vec!["Status", "Name", "Keys", "Created"]).style(styles::accent_bold()))
        .block(block)
        .render(area, buf);
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(stats) = self.statistics else {
            let block = styles::glass_block(false);
            let inner = block.inner(area);
            block.render(area, buf);
            Paragraph::new(Line::from(Span::styled("Loading statistics…", styles::text_muted())).centered())
                .render(inner, buf);
            return;
        };

        let [cards, keys, recent] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(3),
        ])
        .areas(area);

        Self::render_cards(stats, cards, buf);
        Self::render_keys(stats, keys, buf);
        Self::render_recent(stats, recent, buf);
    }
}
