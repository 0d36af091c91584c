//! Configuration file parsing for shakedeck
//!
//! Settings live in `<config_dir>/shakedeck/config.toml` (or a path given on
//! the command line); `SHAKEDECK_SERVER` overrides the server address.

pub mod settings;
pub mod types;

pub use settings::{
    apply_env_overrides, default_config_path, init_config_file, load_settings, resolve_settings,
    settings_to_toml, SERVER_ENV_VAR,
};
pub use types::*;
