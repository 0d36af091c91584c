//! Settings loader for `config.toml`

use std::path::{Path, PathBuf};

use super::types::Settings;
use shakedeck_core::prelude::*;

const CONFIG_FILENAME: &str = "config.toml";
const APP_DIR: &str = "shakedeck";

/// Environment variable overriding `server.base_url`.
pub const SERVER_ENV_VAR: &str = "SHAKEDECK_SERVER";

const DEFAULT_CONFIG: &str = r#"# shakedeck configuration

[server]
# Task server address; /api/v1 is appended to every request
base_url = "http://localhost:8000"
request_timeout_ms = 10000

[stream]
# Wait before reconnecting a dropped live log stream
reconnect_delay_ms = 3000

[polling]
task_list_ms = 10000
statistics_ms = 10000
realtime_status_ms = 2000

[ui]
auto_scroll = true
# Throughput samples shown in the task detail chart
status_history = 20

[export]
# Directory for exported live logs
directory = "."
"#;

/// `<config_dir>/shakedeck/config.toml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILENAME))
}

/// Load settings from `config_path`, falling back to defaults on any problem.
pub fn load_settings(config_path: &Path) -> Settings {
    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Apply environment overrides on top of file settings.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(server) = std::env::var(SERVER_ENV_VAR) {
        let server = server.trim();
        if !server.is_empty() {
            debug!("Server overridden by {}: {}", SERVER_ENV_VAR, server);
            settings.server.base_url = server.to_string();
        }
    }
}

/// Resolve settings the way the binary does: file (explicit or default
/// location), then environment.
pub fn resolve_settings(explicit: Option<&Path>) -> Settings {
    let mut settings = match explicit.map(Path::to_path_buf).or_else(default_config_path) {
        Some(path) => load_settings(&path),
        None => Settings::default(),
    };
    apply_env_overrides(&mut settings);
    settings
}

/// Write the commented default configuration. Refuses to overwrite.
pub fn init_config_file(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        return Err(Error::config(format!(
            "{} already exists",
            config_path.display()
        )));
    }
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::config(format!("Failed to create {}: {}", parent.display(), e)))?;
    }
    std::fs::write(config_path, DEFAULT_CONFIG)
        .context(format!("Failed to write {}", config_path.display()))?;
    info!("Created config file at {:?}", config_path);
    Ok(())
}

/// Render effective settings as TOML.
pub fn settings_to_toml(settings: &Settings) -> Result<String> {
    toml::to_string_pretty(settings)
        .map_err(|e| Error::config(format!("Failed to serialize settings: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn test_load_settings_defaults() {
        let temp = tempdir().unwrap();
        let settings = load_settings(&temp.path().join(CONFIG_FILENAME));

        assert_eq!(settings.server.base_url, "http://localhost:8000");
        assert_eq!(settings.server.request_timeout_ms, 10_000);
        assert_eq!(settings.stream.reconnect_delay_ms, 3_000);
        assert_eq!(settings.polling.realtime_status_ms, 2_000);
        assert!(settings.ui.auto_scroll);
    }

    #[test]
    fn test_load_settings_partial() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            r#"
[server]
base_url = "http://shake.internal:9000"

[ui]
auto_scroll = false
"#,
        )
        .unwrap();

        let settings = load_settings(&path);
        assert_eq!(settings.server.base_url, "http://shake.internal:9000");
        assert_eq!(settings.server.request_timeout_ms, 10_000);
        assert!(!settings.ui.auto_scroll);
        assert_eq!(settings.ui.status_history, 20);
        assert_eq!(settings.polling.task_list_ms, 10_000);
    }

    #[test]
    fn test_load_settings_invalid_toml() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[server\nbase_url = ").unwrap();

        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn test_default_config_matches_defaults() {
        let parsed: Settings = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn test_init_config_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join(CONFIG_FILENAME);

        init_config_file(&path).unwrap();
        assert_eq!(load_settings(&path), Settings::default());

        // second call refuses to clobber
        assert!(matches!(init_config_file(&path), Err(Error::Config { .. })));
    }

    #[test]
    fn test_settings_to_toml_roundtrip() {
        let mut settings = Settings::default();
        settings.stream.reconnect_delay_ms = 500;
        let text = settings_to_toml(&settings).unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    #[serial]
    fn test_env_override() {
        std::env::set_var(SERVER_ENV_VAR, "http://from-env:8000");
        let mut settings = Settings::default();
        apply_env_overrides(&mut settings);
        std::env::remove_var(SERVER_ENV_VAR);

        assert_eq!(settings.server.base_url, "http://from-env:8000");
    }

    #[test]
    #[serial]
    fn test_blank_env_is_ignored() {
        std::env::set_var(SERVER_ENV_VAR, "   ");
        let mut settings = Settings::default();
        apply_env_overrides(&mut settings);
        std::env::remove_var(SERVER_ENV_VAR);

        assert_eq!(settings.server.base_url, "http://localhost:8000");
    }

    #[test]
    #[serial]
    fn test_resolve_settings_explicit_path() {
        std::env::remove_var(SERVER_ENV_VAR);
        let temp = tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[polling]\ntask_list_ms = 5000\n").unwrap();

        let settings = resolve_settings(Some(&path));
        assert_eq!(settings.polling.task_list_ms, 5_000);
    }
}
