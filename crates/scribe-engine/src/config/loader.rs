use super::schema::ScribeConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File name looked up in the working directory.
pub const LOCAL_CONFIG: &str = "scribe.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolve the configuration for a run.
    ///
    /// An explicit path must exist. Without one, the first existing file in
    /// [`ConfigLoader::search_paths`] is used, and built-in defaults apply
    /// when none exists.
    pub async fn load(explicit: Option<&Path>) -> Result<ScribeConfig, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path).await;
        }
        Self::load_default().await
    }

    pub async fn load_default() -> Result<ScribeConfig, ConfigError> {
        for candidate in Self::search_paths() {
            if candidate.exists() {
                return Self::load_from(&candidate).await;
            }
        }
        debug!("No config file found, using defaults");
        Ok(ScribeConfig::default())
    }

    /// `./scribe.yaml`, then `~/.scribe/config.yaml` when a home directory is
    /// known.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".").join(LOCAL_CONFIG)];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".scribe").join("config.yaml"));
        }
        paths
    }

    pub async fn load_from(path: &Path) -> Result<ScribeConfig, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        debug!("Loading config from {}", path.display());
        Self::parse(&content)
    }

    /// An empty document yields the defaults.
    pub fn parse(content: &str) -> Result<ScribeConfig, ConfigError> {
        let config = if content.trim().is_empty() {
            ScribeConfig::default()
        } else {
            serde_yaml::from_str(content)?
        };
        Self::validate(&config)?;
        Ok(config)
    }

    fn validate(config: &ScribeConfig) -> Result<(), ConfigError> {
        if config.reader.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "reader.poll_interval_ms",
                reason: "must be greater than zero",
            });
        }
        if config.oracle.enabled && config.oracle.timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "oracle.timeout_ms",
                reason: "must be greater than zero",
            });
        }
        if config.paths.log_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "paths.log_file",
                reason: "must not be empty",
            });
        }
        Ok(())
    }
}
