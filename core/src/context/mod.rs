//! Configuration loading
//!
//! Settings live in the platform config directory via `confy`; tools can
//! also point at an explicit TOML file. The status table is a separate
//! TOML sheet of `[[status]]` entries.

mod config;

pub use config::{
    ConfigError, config_path, default_status_table_path, load_config, load_config_file,
    load_status_table, save_config_file, store_config,
};
