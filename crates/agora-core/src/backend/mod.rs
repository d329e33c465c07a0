//! Transport seam between the conversation client and the dialogue backend
//!
//! [`ConversationBackend`] is the contract the client depends on; the HTTP
//! implementation lives in [`http`], and tests substitute scripted backends.

use async_trait::async_trait;

use crate::errors::ClientError;

pub mod http;
pub mod types;

pub use http::HttpBackend;
pub use types::*;

#[async_trait]
pub trait ConversationBackend: Send + Sync {
    /// Forward one user message and return the backend's reply.
    async fn send_message(&self, request: MessageRequest) -> Result<MessageReply, ClientError>;

    /// Ask the backend to start the session over.
    async fn restart(&self, request: SessionRequest) -> Result<RestartReply, ClientError>;

    /// Fetch the session's progress summary.
    async fn summary(&self, request: SessionRequest) -> Result<Summary, ClientError>;
}
