//! Configuration loader for YAML files and environment overrides

use std::env;
use std::path::Path;
use tokio::fs;

use crate::config::types::ClientConfig;
use crate::errors::ClientError;

pub const ENV_BASE_URL: &str = "AGORA_BASE_URL";
pub const ENV_SESSION_ID: &str = "AGORA_SESSION_ID";
pub const ENV_TOPIC: &str = "AGORA_TOPIC";
pub const ENV_TIMEOUT_SECS: &str = "AGORA_TIMEOUT_SECS";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<ClientConfig, ClientError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).await.map_err(|e| {
            ClientError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_str(&content)
    }

    /// Like [`ConfigLoader::from_file`], but a missing file yields the defaults
    /// (still subject to environment overrides).
    pub async fn from_file_or_default<P: AsRef<Path>>(
        path: P,
    ) -> Result<ClientConfig, ClientError> {
        let path = path.as_ref();
        if fs::try_exists(path).await.unwrap_or(false) {
            return Self::from_file(path).await;
        }

        log::debug!("No config file at {}, using defaults", path.display());
        Self::finish(ClientConfig::default())
    }

    /// Load configuration from a YAML string
    pub fn from_str(content: &str) -> Result<ClientConfig, ClientError> {
        let config: ClientConfig = if content.trim().is_empty() {
            ClientConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| {
                ClientError::Config(format!("Failed to parse YAML config: {}", e))
            })?
        };

        Self::finish(config)
    }

    fn finish(mut config: ClientConfig) -> Result<ClientConfig, ClientError> {
        Self::apply_environment(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Environment variables win over file values.
    pub fn apply_environment(config: &mut ClientConfig) -> Result<(), ClientError> {
        if let Some(base_url) = non_empty_var(ENV_BASE_URL) {
            config.backend.base_url = base_url;
        }

        if let Some(session_id) = non_empty_var(ENV_SESSION_ID) {
            config.session.id = Some(session_id);
        }

        if let Some(topic) = non_empty_var(ENV_TOPIC) {
            config.session.topic = Some(topic);
        }

        if let Some(timeout) = non_empty_var(ENV_TIMEOUT_SECS) {
            config.backend.timeout_secs = timeout.parse().map_err(|_| {
                ClientError::Config(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_TIMEOUT_SECS, timeout
                ))
            })?;
        }

        Ok(())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
