//! Command-line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// shakedeck - terminal console for redis-shake sync task servers
#[derive(Parser, Debug)]
#[command(name = "shakedeck", version)]
#[command(about = "Terminal console for redis-shake sync task servers", long_about = None)]
pub struct Cli {
    /// Task server base URL (overrides config and SHAKEDECK_SERVER)
    #[arg(long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Path to config.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print raw JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Without a command, the interactive console starts
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage sync tasks
    #[command(subcommand)]
    Tasks(TaskCommand),

    /// Show aggregate task statistics
    Stats,

    /// Show realtime replication status of a running task
    Status {
        #[arg(value_name = "TASK_ID")]
        task_id: String,
    },

    /// Browse or clear stored logs
    #[command(subcommand)]
    Logs(LogCommand),

    /// Follow a task's live log on stdout
    Tail {
        #[arg(value_name = "TASK_ID")]
        task_id: String,

        /// Write the collected lines to the export directory on exit
        #[arg(long)]
        export_on_exit: bool,
    },

    /// Inspect or create the config file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// List all tasks
    List,
    /// Show one task including its configuration
    Show { task_id: String },
    /// Create a task from a TOML configuration file
    Create {
        #[arg(long)]
        name: String,
        /// redis-shake configuration; `-` reads stdin
        #[arg(long, short = 'f', value_name = "FILE")]
        file: PathBuf,
    },
    /// Rename a task or replace its configuration
    Update {
        task_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, short = 'f', value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Delete a task, stopping it first when running
    Delete {
        task_id: String,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Start a task
    Start { task_id: String },
    /// Stop a running task
    Stop { task_id: String },
    /// Print the default redis-shake configuration template
    Template,
}

#[derive(Subcommand, Debug)]
pub enum LogCommand {
    /// List stored logs
    List(LogFilterArgs),
    /// Delete stored logs, for one task or all of them
    Clear {
        #[arg(long, value_name = "TASK_ID")]
        task: Option<String>,
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct LogFilterArgs {
    #[arg(long, value_name = "TASK_ID")]
    pub task: Option<String>,
    /// DEBUG, INFO, WARN, ERROR or FATAL
    #[arg(long)]
    pub level: Option<String>,
    #[arg(long)]
    pub keyword: Option<String>,
    /// `YYYY-MM-DD HH:MM:SS`
    #[arg(long, value_name = "TIME")]
    pub since: Option<String>,
    #[arg(long, value_name = "TIME")]
    pub until: Option<String>,
    #[arg(long, default_value_t = 100)]
    pub limit: u32,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write the default config file if none exists
    Init,
    /// Print the effective settings
    Show,
}
