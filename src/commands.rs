//! One-shot subcommands that talk to the task server and exit

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use shakedeck_app::config::{self, Settings};
use shakedeck_client::{ApiClient, TaskGateway};
use shakedeck_core::prelude::*;
use shakedeck_core::{
    display_time, task_config, LogLevel, LogQuery, RealtimeStatus, SyncTask, TaskInput,
    TaskLog, TaskStatistics,
};

use crate::cli::{ConfigCommand, LogCommand, LogFilterArgs, TaskCommand};

/// Pause between stopping a running task and deleting it
const STOP_BEFORE_DELETE: Duration = Duration::from_secs(1);

/// How many commands the status view lists
const TOP_COMMANDS: usize = 10;

/// Output switch shared by every command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Table,
    Json,
}

impl Output {
    fn print<T: Serialize>(self, value: &T, table: impl FnOnce(&T) -> String) -> Result<()> {
        let text = match self {
            Output::Json => serde_json::to_string_pretty(value)?,
            Output::Table => table(value),
        };
        println!("{}", text);
        Ok(())
    }
}

fn client(settings: &Settings) -> Result<ApiClient> {
    ApiClient::new(
        &settings.server.base_url,
        settings.server.request_timeout(),
    )
}

/// Read a configuration file, `-` meaning stdin
fn read_config(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        return Ok(io::read_to_string(io::stdin())?);
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Ask a yes/no question on the terminal; anything but `y` declines.
fn confirm(prompt: &str) -> Result<bool> {
    eprint!("{} [y/N] ", prompt);
    io::stderr().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

// ─────────────────────────────────────────────────────────
// Tasks
// ─────────────────────────────────────────────────────────

pub async fn run_tasks(settings: &Settings, command: TaskCommand, output: Output) -> Result<()> {
    if let TaskCommand::Template = command {
        println!("{}", task_config::DEFAULT_TEMPLATE.trim_end());
        return Ok(());
    }

    let api = client(settings)?;
    match command {
        TaskCommand::List => {
            let tasks = api.list_tasks().await?;
            output.print(&tasks, |tasks| format_task_table(tasks))
        }
        TaskCommand::Show { task_id } => {
            let task = api.get_task(&task_id).await?;
            output.print(&task, format_task_detail)
        }
        TaskCommand::Create { name, file } => {
            let custom_config = read_config(&file)?;
            task_config::validate(&custom_config)?;
            let task = api
                .create_task(&TaskInput::create(name, custom_config))
                .await?;
            info!("Created task {} ({})", task.id, task.name);
            output.print(&task, |task| format!("Created task {} ({})", task.id, task.name))
        }
        TaskCommand::Update {
            task_id,
            name,
            file,
        } => {
            let custom_config = file.as_deref().map(read_config).transpose()?;
            if let Some(custom_config) = &custom_config {
                task_config::validate(custom_config)?;
            }
            let input = TaskInput {
                name,
                custom_config,
            };
            if input.is_empty() {
                return Err(Error::Validation {
                    problems: vec!["nothing to update: pass --name or --file".to_string()],
                });
            }
            let task = api.update_task(&task_id, &input).await?;
            output.print(&task, |task| format!("Updated task {} ({})", task.id, task.name))
        }
        TaskCommand::Delete { task_id, yes } => delete_task(&api, &task_id, yes).await,
        TaskCommand::Start { task_id } => {
            println!("{}", api.start_task(&task_id).await?);
            Ok(())
        }
        TaskCommand::Stop { task_id } => {
            println!("{}", api.stop_task(&task_id).await?);
            Ok(())
        }
        TaskCommand::Template => Ok(()),
    }
}

/// Delete `task_id`, stopping it first when it is running.
async fn delete_task<G: TaskGateway>(api: &G, task_id: &str, yes: bool) -> Result<()> {
    let task = api.get_task(task_id).await?;
    let running = task.status.is_running();
    let prompt = if running {
        format!("Task '{}' is running. Stop and delete it?", task.name)
    } else {
        format!("Delete task '{}'?", task.name)
    };
    if !yes && !confirm(&prompt)? {
        eprintln!("Cancelled.");
        return Ok(());
    }

    if running {
        println!("{}", api.stop_task(task_id).await?);
        tokio::time::sleep(STOP_BEFORE_DELETE).await;
    }
    println!("{}", api.delete_task(task_id).await?);
    Ok(())
}

pub fn format_task_table(tasks: &[SyncTask]) -> String {
    if tasks.is_empty() {
        return "No tasks.".to_string();
    }
    let id_width = tasks.iter().map(|t| t.id.len()).max().unwrap_or(2).max(2);
    let name_width = tasks.iter().map(|t| t.name.len()).max().unwrap_or(4).max(4);

    let mut out = format!(
        "{:<id_width$}  {:<name_width$}  {:<9}  {:>8}  CREATED",
        "ID", "NAME", "STATUS", "PROGRESS"
    );
    for task in tasks {
        let progress = task
            .progress_percent()
            .map(|p| format!("{}%", p))
            .unwrap_or_else(|| "-".to_string());
        out.push('\n');
        out.push_str(&format!(
            "{:<id_width$}  {:<name_width$}  {:<9}  {:>8}  {}",
            task.id,
            task.name,
            task.status.label(),
            progress,
            display_time(task.created_at.as_deref()),
        ));
    }
    out
}

pub fn format_task_detail(task: &SyncTask) -> String {
    let count = |value: Option<u64>| value.map(|v| v.to_string()).unwrap_or_else(|| "-".into());
    let mut lines = vec![
        format!("ID:        {}", task.id),
        format!("Name:      {}", task.name),
        format!("Status:    {}", task.status.label()),
        format!("Created:   {}", display_time(task.created_at.as_deref())),
        format!("Started:   {}", display_time(task.started_at.as_deref())),
        format!("Completed: {}", display_time(task.completed_at.as_deref())),
        format!(
            "Keys:      {} processed / {} total / {} failed",
            count(task.processed_keys),
            count(task.total_keys),
            count(task.failed_keys)
        ),
    ];
    if let Some(pid) = task.process_id {
        lines.push(format!("PID:       {}", pid));
    }
    if let Some(error) = &task.error_message {
        lines.push(format!("Error:     {}", error));
    }
    lines.push(String::new());
    lines.push(task.custom_config.trim_end().to_string());
    lines.join("\n")
}

// ─────────────────────────────────────────────────────────
// Statistics and realtime status
// ─────────────────────────────────────────────────────────

pub async fn run_stats(settings: &Settings, output: Output) -> Result<()> {
    let stats = client(settings)?.statistics().await?;
    output.print(&stats, format_statistics)
}

pub async fn run_status(settings: &Settings, task_id: &str, output: Output) -> Result<()> {
    let status = client(settings)?.realtime_status(task_id).await?;
    output.print(&status, format_realtime)
}

pub fn format_statistics(stats: &TaskStatistics) -> String {
    let mut lines = vec![
        format!(
            "Tasks: {} total, {} running, {} stopped, {} failed",
            stats.total, stats.running, stats.stopped, stats.failed
        ),
        format!(
            "Keys:  {} processed / {} total / {} failed",
            stats.processed_keys, stats.total_keys, stats.failed_keys
        ),
    ];
    if !stats.recent_tasks.is_empty() {
        lines.push(String::new());
        lines.push("Recent tasks:".to_string());
        for task in &stats.recent_tasks {
            lines.push(format!(
                "  {:<9} {}  ({})",
                task.status.label(),
                task.name,
                display_time(task.created_at.as_deref())
            ));
        }
    }
    lines.join("\n")
}

pub fn format_realtime(status: &RealtimeStatus) -> String {
    let totals = status.total_entries_count;
    let mut lines = vec![
        format!("Started:    {}", display_time(status.start_time.as_deref())),
        format!(
            "Consistent: {}",
            match status.consistent {
                Some(true) => "yes",
                Some(false) => "no",
                None => "-",
            }
        ),
        format!(
            "Entries:    {} read / {} written ({:.1} / {:.1} ops/s)",
            totals.read_count, totals.write_count, totals.read_ops, totals.write_ops
        ),
    ];
    let top = status.top_commands(TOP_COMMANDS);
    if !top.is_empty() {
        lines.push(String::new());
        for (command, reads) in top {
            lines.push(format!("  {:<12} {}", command, reads));
        }
    }
    lines.join("\n")
}

// ─────────────────────────────────────────────────────────
// Stored logs
// ─────────────────────────────────────────────────────────

pub async fn run_logs(settings: &Settings, command: LogCommand, output: Output) -> Result<()> {
    let api = client(settings)?;
    match command {
        LogCommand::List(filter) => {
            let logs = api.list_logs(&log_query(filter)).await?;
            output.print(&logs, |logs| format_log_lines(logs))
        }
        LogCommand::Clear { task, yes } => {
            let prompt = match &task {
                Some(task_id) => format!("Delete all stored logs of task {}?", task_id),
                None => "Delete ALL stored logs?".to_string(),
            };
            if !yes && !confirm(&prompt)? {
                eprintln!("Cancelled.");
                return Ok(());
            }
            let message = match task {
                Some(task_id) => api.clear_task_logs(&task_id).await?,
                None => api.clear_logs().await?,
            };
            println!("{}", message);
            Ok(())
        }
    }
}

pub fn log_query(args: LogFilterArgs) -> LogQuery {
    LogQuery {
        task_id: args.task,
        level: args.level.as_deref().map(LogLevel::parse_lenient),
        keyword: args.keyword,
        start_time: args.since,
        end_time: args.until,
        limit: Some(args.limit),
    }
}

pub fn format_log_lines(logs: &[TaskLog]) -> String {
    logs.iter()
        .map(|log| {
            format!(
                "{} {:<5} [{}] {}",
                display_time(Some(log.timestamp.as_str())),
                log.level.as_str(),
                log.task_name.as_deref().unwrap_or(log.task_id.as_str()),
                log.message
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ─────────────────────────────────────────────────────────
// Config
// ─────────────────────────────────────────────────────────

pub fn run_config(command: ConfigCommand, settings: &Settings, path: Option<&Path>) -> Result<()> {
    match command {
        ConfigCommand::Init => {
            let path = match path {
                Some(p) => p.to_path_buf(),
                None => config::default_config_path()
                    .ok_or_else(|| Error::config("no config directory on this platform"))?,
            };
            if path.exists() {
                println!("Config already exists at {}", path.display());
                return Ok(());
            }
            config::init_config_file(&path)?;
            println!("Wrote {}", path.display());
            Ok(())
        }
        ConfigCommand::Show => {
            print!("{}", config::settings_to_toml(settings)?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakedeck_core::{EntryCounts, TaskStatus};

    fn task(id: &str, name: &str, status: TaskStatus) -> SyncTask {
        SyncTask {
            id: id.to_string(),
            name: name.to_string(),
            status,
            created_at: Some("2024-05-01T10:00:00".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_task_table_columns() {
        let mut orders = task("1", "orders", TaskStatus::Running);
        orders.total_keys = Some(200);
        orders.processed_keys = Some(50);
        let table = format_task_table(&[orders, task("22", "sessions", TaskStatus::Stopped)]);

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID  NAME"));
        assert!(lines[1].contains("running"));
        assert!(lines[1].contains("25%"));
        assert!(lines[1].contains("2024-05-01 10:00:00"));
        assert!(lines[2].starts_with("22  sessions"));
    }

    #[test]
    fn test_empty_task_table() {
        assert_eq!(format_task_table(&[]), "No tasks.");
    }

    #[test]
    fn test_task_detail_ends_with_config() {
        let mut t = task("1", "orders", TaskStatus::Failed);
        t.custom_config = "[sync_reader]\naddress = \"a:1\"\n".to_string();
        t.error_message = Some("auth failed".to_string());
        let detail = format_task_detail(&t);

        assert!(detail.contains("Status:    failed"));
        assert!(detail.contains("Error:     auth failed"));
        assert!(detail.ends_with("address = \"a:1\""));
    }

    #[test]
    fn test_statistics_summary() {
        let stats = TaskStatistics {
            total: 4,
            running: 2,
            failed: 1,
            ..Default::default()
        };
        let text = format_statistics(&stats);
        assert!(text.starts_with("Tasks: 4 total, 2 running, 0 stopped, 1 failed"));
        assert!(!text.contains("Recent tasks"));
    }

    #[test]
    fn test_realtime_lists_top_commands() {
        let mut status = RealtimeStatus {
            consistent: Some(true),
            ..Default::default()
        };
        status.per_cmd_entries_count.insert(
            "SET".to_string(),
            EntryCounts {
                read_count: 90,
                ..Default::default()
            },
        );
        let text = format_realtime(&status);
        assert!(text.contains("Consistent: yes"));
        assert!(text.contains("SET"));
        assert!(text.contains("90"));
    }

    #[test]
    fn test_log_query_from_args() {
        let query = log_query(LogFilterArgs {
            task: Some("7".to_string()),
            level: Some("warning".to_string()),
            limit: 50,
            ..Default::default()
        });
        assert_eq!(query.task_id.as_deref(), Some("7"));
        assert_eq!(query.level, Some(LogLevel::Warn));
        assert_eq!(query.limit, Some(50));
    }

    #[test]
    fn test_log_lines_prefer_task_name() {
        let logs = vec![TaskLog {
            id: None,
            task_id: "7".to_string(),
            task_name: Some("orders".to_string()),
            timestamp: "2024-05-01T10:00:00".to_string(),
            level: LogLevel::Error,
            message: "boom".to_string(),
            source: None,
        }];
        assert_eq!(
            format_log_lines(&logs),
            "2024-05-01 10:00:00 ERROR [orders] boom"
        );
    }

    #[test]
    fn test_config_show_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        run_config(ConfigCommand::Init, &Settings::default(), Some(&path)).unwrap();
        assert!(path.exists());
        // second init leaves the file alone
        std::fs::write(&path, "# edited\n").unwrap();
        run_config(ConfigCommand::Init, &Settings::default(), Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# edited\n");
    }
}
