//! Error types for the conversation client
//!
//! Failures are grouped by where they come from: the transport (the request
//! never produced a usable response), the payload (the response was not the
//! JSON the contract promises), the backend (it answered, but said no), and
//! configuration.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Could not decode backend response: {0}")]
    Decode(String),
    #[error("Backend returned HTTP {status}: {message}")]
    Backend { status: u16, message: String },
    #[error("Backend rejected the request: {0}")]
    Rejected(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// True when the request never produced a decodable response.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_) | ClientError::Decode(_))
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<serde_yaml::Error> for ClientError {
    fn from(err: serde_yaml::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}
