//! Task detail panel with realtime replication status

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Sparkline, Widget, Wrap},
};

use shakedeck_app::state::TaskDetailState;
use shakedeck_core::{display_time, OpsHistory, RealtimeStatus, SyncTask};

use crate::theme::{palette, styles};

/// Commands listed under the throughput chart
const TOP_COMMANDS: usize = 5;

pub struct TaskDetail<'a> {
    detail: &'a TaskDetailState,
    task: Option<&'a SyncTask>,
}

impl<'a> TaskDetail<'a> {
    pub fn new(detail: &'a TaskDetailState, task: Option<&'a SyncTask>) -> Self {
        Self { detail, task }
    }
}

fn field<'a>(label: &'a str, value: impl Into<String>) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<12}", label), styles::text_muted()),
        Span::styled(value.into(), styles::text_primary()),
    ])
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Whole ops/s values for the sparklines, oldest first.
pub fn ops_series(history: &OpsHistory) -> (Vec<u64>, Vec<u64>) {
    history
        .iter()
        .map(|s| (s.read_ops.max(0.0).round() as u64, s.write_ops.max(0.0).round() as u64))
        .unzip()
}

fn task_lines(task: &SyncTask) -> Vec<Line<'_>> {
    let (icon, status_style) = styles::task_status_indicator(task.status);
    let mut lines = vec![
        Line::from(vec![
            Span::styled(task.name.as_str(), styles::text_bright_bold()),
            Span::raw("  "),
            Span::styled(icon, status_style),
            Span::raw(" "),
            Span::styled(task.status.label(), status_style),
        ]),
        Line::raw(""),
        field("ID", task.id.as_str()),
        field("Created", display_time(task.created_at.as_deref())),
        field("Started", display_time(task.started_at.as_deref())),
        field("Completed", display_time(task.completed_at.as_deref())),
        field("PID", optional(task.process_id)),
        field("Status port", optional(task.status_port)),
        field(
            "Keys",
            format!(
                "{} processed / {} total / {} failed",
                optional(task.processed_keys),
                optional(task.total_keys),
                optional(task.failed_keys)
            ),
        ),
    ];
    if let Some(percent) = task.progress_percent() {
        lines.push(field("Progress", format!("{}%", percent)));
    }
    if let Some(error) = task.error_message.as_deref().filter(|e| !e.is_empty()) {
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::styled("Error: ", styles::status_red()),
            Span::styled(error, styles::text_primary()),
        ]));
    }
    lines
}

fn realtime_summary(status: &RealtimeStatus) -> Vec<Line<'_>> {
    let totals = &status.total_entries_count;
    let consistent = match status.consistent {
        Some(true) => Span::styled("consistent", styles::status_green()),
        Some(false) => Span::styled("catching up", styles::status_yellow()),
        None => Span::styled("-", styles::text_muted()),
    };
    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("{:<12}", "State"), styles::text_muted()),
            consistent,
        ]),
        field("Since", display_time(status.start_time.as_deref())),
        field(
            "Read",
            format!("{} entries ({:.1}/s)", totals.read_count, totals.read_ops),
        ),
        field(
            "Written",
            format!("{} entries ({:.1}/s)", totals.write_count, totals.write_ops),
        ),
        Line::raw(""),
        Line::from(Span::styled("Top commands", styles::accent_bold())),
    ];
    let top = status.top_commands(TOP_COMMANDS);
    if top.is_empty() {
        lines.push(Line::from(Span::styled("  none yet", styles::text_muted())));
    }
    for (name, count) in top {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<10}", name), styles::text_primary()),
            Span::styled(count.to_string(), styles::text_secondary()),
        ]));
    }
    lines
}

impl TaskDetail<'_> {
    fn render_realtime(&self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false)
            .title(" Realtime ")
            .title_style(styles::text_bright_bold());
        let inner = block.inner(area);
        block.render(area, buf);

        let running = self.task.map(|t| t.status.is_running()).unwrap_or(false);
        let Some(status) = self.detail.realtime.as_ref() else {
            let text = if running {
                "Waiting for replication status…"
            } else {
                "Realtime status is available while the task runs."
            };
            Paragraph::new(Span::styled(text, styles::text_muted()))
                .wrap(Wrap { trim: true })
                .render(inner, buf);
            return;
        };

        let [chart_area, summary_area] =
            Layout::vertical([Constraint::Length(5), Constraint::Min(0)]).areas(inner);
        let [read_label, read_chart, write_label, write_chart, _] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(chart_area);

        let (reads, writes) = ops_series(&self.detail.history);
        Paragraph::new(Span::styled("read ops/s", styles::text_muted())).render(read_label, buf);
        Sparkline::default()
            .data(&reads)
            .style(Style::default().fg(palette::CHART_READ))
            .render(read_chart, buf);
        Paragraph::new(Span::styled("write ops/s", styles::text_muted()))
            .render(write_label, buf);
        Sparkline::default()
            .data(&writes)
            .style(Style::default().fg(palette::CHART_WRITE))
            .render(write_chart, buf);

        Paragraph::new(realtime_summary(status)).render(summary_area, buf);
    }
}

impl Widget for TaskDetail<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [info_area, realtime_area] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .areas(area);

        let block = styles::glass_block(true)
            .title(" Task ")
            .title_style(styles::text_bright_bold());
        let inner = block.inner(info_area);
        block.render(info_area, buf);

        match self.task {
            Some(task) => Paragraph::new(task_lines(task))
                .wrap(Wrap { trim: false })
                .render(inner, buf),
            None => Paragraph::new(Span::styled(
                format!("Loading task {}…", self.detail.task_id),
                styles::text_muted(),
            ))
            .render(inner, buf),
        }

        self.render_realtime(realtime_area, buf);
    }
}
