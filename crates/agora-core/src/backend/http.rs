use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;

use super::{ConversationBackend, MessageReply, MessageRequest, RestartReply, SessionRequest, Summary};
use crate::config::BackendConfig;
use crate::errors::ClientError;

/// HTTP client for the dialogue backend's JSON API
pub struct HttpBackend {
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(config.base_url.as_str()).with_timeout(Duration::from_secs(config.timeout_secs))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Response, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                log::error!("Request to {} failed: {}", url, e);
                ClientError::Transport(e.to_string())
            })?;

        Ok(response)
    }

    async fn error_for_status(response: Response) -> ClientError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());
        log::error!("Backend returned HTTP {}: {}", status, message);
        ClientError::Backend { status, message }
    }
}

#[async_trait]
impl ConversationBackend for HttpBackend {
    async fn send_message(&self, request: MessageRequest) -> Result<MessageReply, ClientError> {
        let response = self.post("/message", &request).await?;

        // Error statuses still carry a JSON body whose `error` field is shown to the user.
        let status = response.status();
        if !status.is_success() {
            log::warn!("Backend answered /message with HTTP {}", status.as_u16());
        }

        let reply = response.json::<MessageReply>().await.map_err(|e| {
            log::error!("Undecodable /message reply: {}", e);
            ClientError::Decode(e.to_string())
        })?;

        Ok(reply)
    }

    async fn restart(&self, request: SessionRequest) -> Result<RestartReply, ClientError> {
        let response = self.post("/restart", &request).await?;
        if !response.status().is_success() {
            return Err(Self::error_for_status(response).await);
        }

        let body = response.text().await?;
        let reply = serde_json::from_str::<RestartReply>(&body).unwrap_or_else(|e| {
            log::debug!("Ignoring undecodable /restart body: {}", e);
            RestartReply::default()
        });

        Ok(reply)
    }

    async fn summary(&self, request: SessionRequest) -> Result<Summary, ClientError> {
        let response = self.post("/summary", &request).await?;
        if !response.status().is_success() {
            return Err(Self::error_for_status(response).await);
        }

        let summary = response.json::<Summary>().await.map_err(|e| {
            log::error!("Undecodable /summary reply: {}", e);
            ClientError::Decode(e.to_string())
        })?;

        Ok(summary)
    }
}
