//! Configuration management for phrasewav.
//!
//! Settings are layered:
//! 1. Default values
//! 2. Config file (`--config`, `./phrasewav.toml`, or the user config dir)
//! 3. Environment variables
//! 4. Command-line flags (applied by the caller)

mod schema;

pub use schema::{AppConfig, IssueLevel};

use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "phrasewav.toml";

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    /// TOML serialization error.
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    /// Invalid value.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Get the per-user config directory.
#[must_use]
pub fn default_config_dir() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("phrasewav")
}

/// Get the per-user config file path.
#[must_use]
pub fn user_config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Path that `config init` writes to and `config path` reports.
///
/// An explicit path always wins; otherwise an existing local file, then the
/// per-user location.
#[must_use]
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return local;
    }
    user_config_path()
}

/// Load the layered configuration (file, then environment).
///
/// A missing explicit file is an error; missing implicit files fall back to
/// defaults.
pub async fn load_config(explicit: Option<&Path>) -> ConfigResult<AppConfig> {
    let path = config_path(explicit);
    if explicit.is_some() && !path.exists() {
        return Err(ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("config file {} does not exist", path.display()),
        )));
    }
    Ok(load_config_from(path).await?.with_env())
}

/// Load configuration from a specific path.
pub async fn load_config_from(path: PathBuf) -> ConfigResult<AppConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    let content = tokio::fs::read_to_string(&path).await?;
    let config: AppConfig = toml::from_str(&content)?;
    debug!(path = %path.display(), "loaded config file");

    Ok(config)
}

/// Save configuration to a specific path.
pub async fn save_config_to(config: &AppConfig, path: PathBuf) -> ConfigResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    let content = toml::to_string_pretty(config)?;
    tokio::fs::write(&path, content).await?;
    info!(path = %path.display(), "saved config file");

    Ok(())
}

/// Write a default config file, refusing to clobber one unless `force`.
pub async fn init_config(path: PathBuf, force: bool) -> ConfigResult<PathBuf> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    save_config_to(&AppConfig::default(), path.clone()).await?;
    Ok(path)
}
