//! shakedeck - terminal console for redis-shake sync task servers
//!
//! The binary parses the command line here and hands off to one of three
//! front ends: the ratatui console (`shakedeck-tui`), one-shot commands that
//! print and exit, or the headless live log tail.

pub mod cli;
pub mod commands;
pub mod headless;

use shakedeck_app::config::{self, Settings};
use shakedeck_core::prelude::*;

use cli::{Cli, Command};
use commands::Output;

/// Settings from the config file and environment, then the `--server` flag
pub fn effective_settings(cli: &Cli) -> Settings {
    let mut settings = config::resolve_settings(cli.config.as_deref());
    if let Some(server) = &cli.server {
        settings.server.base_url = server.clone();
    }
    settings
}

/// Application entry point
pub async fn run(cli: Cli) -> Result<()> {
    // Initialize error handling
    color_eyre::install().map_err(|e| Error::terminal(e.to_string()))?;

    // Initialize logging (to file, since the TUI owns stdout)
    shakedeck_core::logging::init()?;

    let settings = effective_settings(&cli);
    info!("Task server: {}", settings.server.base_url);

    let output = if cli.json {
        Output::Json
    } else {
        Output::Table
    };

    let result = match cli.command {
        None => shakedeck_tui::run(settings).await,
        Some(Command::Tasks(command)) => commands::run_tasks(&settings, command, output).await,
        Some(Command::Stats) => commands::run_stats(&settings, output).await,
        Some(Command::Status { task_id }) => {
            commands::run_status(&settings, &task_id, output).await
        }
        Some(Command::Logs(command)) => commands::run_logs(&settings, command, output).await,
        Some(Command::Tail {
            task_id,
            export_on_exit,
        }) => headless::run_tail(settings, &task_id, export_on_exit, cli.json).await,
        Some(Command::Config(command)) => {
            commands::run_config(command, &settings, cli.config.as_deref())
        }
    };

    if let Err(ref e) = result {
        error!("Application error: {:?}", e);
    }

    info!("shakedeck exiting");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_server_flag_beats_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nbase_url = \"http://from-file:1\"\n").unwrap();
        std::env::remove_var(config::SERVER_ENV_VAR);

        let path_arg = path.to_string_lossy().to_string();
        let cli = Cli::try_parse_from(["shakedeck", "--config", &path_arg, "stats"]).unwrap();
        assert_eq!(effective_settings(&cli).server.base_url, "http://from-file:1");

        let cli = Cli::try_parse_from([
            "shakedeck",
            "--config",
            &path_arg,
            "--server",
            "http://flag:2",
            "stats",
        ])
        .unwrap();
        assert_eq!(effective_settings(&cli).server.base_url, "http://flag:2");
    }
}
