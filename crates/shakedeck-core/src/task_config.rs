//! Client-side checks for redis-shake task configuration text

use crate::error::{Error, Result};

/// Sections every task configuration must define, each with an `address`.
pub const REQUIRED_SECTIONS: [&str; 2] = ["sync_reader", "redis_writer"];

/// Starting point offered when creating a task.
pub const DEFAULT_TEMPLATE: &str = r#"[sync_reader]
cluster = false
address = "127.0.0.1:6379"
username = ""
password = ""
tls = false
sync_rdb = true
sync_aof = true
prefer_replica = false
try_diskless = false

[redis_writer]
cluster = false
address = "127.0.0.1:6380"
username = ""
password = ""
tls = false
off_reply = false

[filter]
allow_keys = []
allow_key_prefix = []
allow_key_suffix = []
allow_key_regex = []
block_keys = []
block_key_prefix = []
block_key_suffix = []
block_key_regex = []
allow_db = []
block_db = []
allow_command = []
block_command = []
allow_command_group = []
block_command_group = []
function = ""

[advanced]
dir = "data"
ncpu = 0
pprof_port = 0
status_port = 0
log_file = "shake.log"
log_level = "info"
log_interval = 5
log_rotation = true
log_max_size = 512
log_max_age = 7
log_max_backups = 3
log_compress = true
rdb_restore_command_behavior = "panic"
pipeline_count_limit = 1024
target_redis_client_max_querybuf_len = 1073741824
target_redis_proto_max_bulk_len = 512_000_000
aws_psync = ""
empty_db_before_sync = false

[module]
target_mbbloom_version = 20603
"#;

/// List every problem with a task configuration. Empty means valid.
pub fn check(config: &str) -> Vec<String> {
    if config.trim().is_empty() {
        return vec!["configuration is empty".to_string()];
    }

    let table: toml::Table = match toml::from_str(config) {
        Ok(table) => table,
        Err(e) => return vec![format!("TOML syntax error: {}", e.message())],
    };

    let mut problems = Vec::new();
    for section in REQUIRED_SECTIONS {
        match table.get(section) {
            None => problems.push(format!("missing required section [{section}]")),
            Some(toml::Value::Table(body)) => match body.get("address") {
                Some(toml::Value::String(addr)) if !addr.trim().is_empty() => {}
                _ => problems.push(format!("[{section}] requires an 'address' entry")),
            },
            Some(_) => problems.push(format!("'{section}' must be a table")),
        }
    }
    problems
}

/// Validate a configuration, converting problems into [`Error::Validation`].
pub fn validate(config: &str) -> Result<()> {
    let problems = check(config);
    if problems.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation { problems })
    }
}
