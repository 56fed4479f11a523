use std::fs;
use std::path::{Path, PathBuf};

use deathrecap_types::RecapConfig;
use thiserror::Error;

use crate::game_data::{StatusTable, StatusTableFile};

const APP_NAME: &str = "deathrecap";

/// Errors that can occur while loading or saving settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to serialize {path:?}: {source}")]
    Serialize {
        path: PathBuf,
        source: toml::ser::Error,
    },

    #[error("config store error: {0}")]
    Confy(#[from] confy::ConfyError),
}

/// Load settings from the platform config directory.
///
/// A missing file yields defaults (and is created by confy); an unreadable
/// one is logged and replaced by defaults for this run.
pub fn load_config() -> RecapConfig {
    match confy::load(APP_NAME, None) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to load config, using defaults: {}", err);
            RecapConfig::default()
        }
    }
}

pub fn store_config(config: &RecapConfig) -> Result<(), ConfigError> {
    confy::store(APP_NAME, None, config)?;
    Ok(())
}

/// Location of the confy-managed config file
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(confy::get_configuration_file_path(APP_NAME, None)?)
}

/// Load settings from an explicit TOML file.
pub fn load_config_file(path: &Path) -> Result<RecapConfig, ConfigError> {
    let contents = read(path)?;
    toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

pub fn save_config_file(path: &Path, config: &RecapConfig) -> Result<(), ConfigError> {
    let contents = toml::to_string_pretty(config).map_err(|e| ConfigError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;

    fs::write(path, contents).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load a `[[status]]` sheet. Duplicate ids keep the last entry.
pub fn load_status_table(path: &Path) -> Result<StatusTable, ConfigError> {
    let contents = read(path)?;
    let file: StatusTableFile = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut table = StatusTable::new();
    let duplicates = table.extend_from_file(file);
    if !duplicates.is_empty() {
        tracing::warn!(?duplicates, "Duplicate status ids in {:?}", path);
    }
    Ok(table)
}

/// Default status sheet location (`<config dir>/deathrecap/statuses.toml`)
pub fn default_status_table_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_NAME).join("statuses.toml"))
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
