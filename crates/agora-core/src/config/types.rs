//! Configuration type definitions for the conversation client
//!
//! Every field has a default, so an empty YAML document is a valid
//! configuration that talks to a backend on `localhost:5000`.

use serde::{Deserialize, Serialize};

use crate::errors::ClientError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Fixed session id. Generated at startup when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Dialogue topic forwarded to the backend with messages and restarts.
    #[serde(default)]
    pub topic: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BehaviorConfig {
    #[serde(default)]
    pub ordering: RequestOrdering,
    #[serde(default)]
    pub restart_policy: RestartPolicy,
}

/// How AI replies are ordered when sends overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestOrdering {
    /// Replies are appended as their requests complete.
    #[default]
    Completion,
    /// One send in flight at a time; replies land in issue order.
    Sequential,
}

/// Whether a restart needs the backend's confirmation before the local log is reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartPolicy {
    #[default]
    Always,
    RequireBackend,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl ClientConfig {
    pub fn validate(&self) -> Result<(), ClientError> {
        let base_url = self.backend.base_url.trim();
        if base_url.is_empty() {
            return Err(ClientError::Config(
                "Backend base_url cannot be empty".to_string(),
            ));
        }

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::Config(format!(
                "Backend base_url must start with http:// or https://, got '{}'",
                base_url
            )));
        }

        if self.backend.timeout_secs == 0 {
            return Err(ClientError::Config(
                "Backend timeout_secs must be greater than 0".to_string(),
            ));
        }

        if let Some(id) = &self.session.id {
            if id.trim().is_empty() {
                return Err(ClientError::Config(
                    "Session id cannot be blank".to_string(),
                ));
            }
        }

        Ok(())
    }
}
