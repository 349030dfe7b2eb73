use crate::client::{GeminiClient, GeminiError};
use async_trait::async_trait;
use scribe_engine::config::OracleConfig;
use scribe_engine::naming::{NamingError, NamingOracle, OfflineOracle};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub fn naming_prompt(locator: &str) -> String {
    format!(
        "Return a PascalCase variable name for this iOS Appium XPath. \
         Append 'Button', 'Field', etc. Return ONLY the string. XPath: {}",
        locator
    )
}

/// Names locators by asking a Gemini model.
pub struct GeminiOracle {
    client: GeminiClient,
}

impl GeminiOracle {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NamingOracle for GeminiOracle {
    async fn suggest_name(&self, locator: &str) -> Result<String, NamingError> {
        self.client
            .generate(&naming_prompt(locator))
            .await
            .map(|text| text.trim().to_string())
            .map_err(|e| match e {
                e if e.is_timeout() => NamingError::Timeout,
                GeminiError::EmptyResponse => {
                    NamingError::MalformedResponse("no text in response".into())
                }
                other => NamingError::Request(other.to_string()),
            })
    }
}

/// Build the configured oracle. The API key is read from the environment
/// variable named in `config`; without it the oracle is offline.
pub fn oracle_from_config(config: &OracleConfig) -> Arc<dyn NamingOracle> {
    if !config.enabled {
        info!("Naming oracle disabled; names come from locators");
        return Arc::new(OfflineOracle);
    }

    let api_key = match std::env::var(&config.api_key_env) {
        Ok(key) if !key.trim().is_empty() => key,
        _ => {
            warn!(
                "{} is not set; naming oracle offline, names come from locators",
                config.api_key_env
            );
            return Arc::new(OfflineOracle);
        }
    };

    match GeminiClient::new(
        &config.endpoint,
        &config.model,
        api_key,
        Duration::from_millis(config.timeout_ms),
    ) {
        Ok(client) => {
            info!("Naming oracle: {}", client.model());
            Arc::new(GeminiOracle::new(client))
        }
        Err(e) => {
            warn!("Failed to build Gemini client: {}; naming oracle offline", e);
            Arc::new(OfflineOracle)
        }
    }
}
