use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScribeConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub reader: ReaderConfig,
    #[serde(default)]
    pub correlation: CorrelationConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    #[serde(default = "default_registry_file")]
    pub registry_file: PathBuf,
    #[serde(default = "default_steps_file")]
    pub steps_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            registry_file: default_registry_file(),
            steps_file: default_steps_file(),
        }
    }
}

fn default_log_file() -> PathBuf {
    PathBuf::from("appium.log")
}

fn default_registry_file() -> PathBuf {
    PathBuf::from("locators.json")
}

fn default_steps_file() -> PathBuf {
    PathBuf::from("steps.txt")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    100
}

/// What happens to the armed type target once a text payload consumed it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTargetPolicy {
    /// Cleared by the text event that used it.
    #[default]
    OneShot,
    /// Kept until the next value target replaces it.
    Sticky,
}

/// What happens when a generated name is already taken by another locator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// The newer locator replaces the older one under the same name.
    Overwrite,
    /// The newer locator is stored as `Name_2`, `Name_3`, ...
    #[default]
    Suffix,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrelationConfig {
    #[serde(default)]
    pub type_target_policy: TypeTargetPolicy,
    #[serde(default)]
    pub collision_policy: CollisionPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    #[serde(default = "default_oracle_enabled")]
    pub enabled: bool,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_oracle_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            enabled: default_oracle_enabled(),
            model: default_model(),
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            timeout_ms: default_oracle_timeout_ms(),
        }
    }
}

fn default_oracle_enabled() -> bool {
    true
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_oracle_timeout_ms() -> u64 {
    10000
}
