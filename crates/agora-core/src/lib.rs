//! Client core for conversing with an Agora dialogue backend.
//!
//! The crate keeps the client side of a dialogue session: an ordered log of
//! user and AI messages, a typing indicator, and the three backend calls that
//! drive them (send a message, restart the session, fetch a progress summary).
//! Rendering is delegated to an injected [`MessageRenderer`], so the log-update
//! logic runs the same under a terminal front end or headless in tests.
//!
//! # Architecture Overview
//!
//! - **Conversation state**: [`ConversationClient`] owns the session id and log
//! - **Backend transport**: the [`ConversationBackend`] trait and its HTTP implementation
//! - **Rendering surface**: [`MessageRenderer`] receives every log mutation in order
//! - **Configuration system**: YAML files with environment overrides and validation

pub mod backend;
pub mod client;
pub mod config;
pub mod core_types;
pub mod errors;
pub mod renderer;

pub use backend::{ConversationBackend, HttpBackend};
pub use client::{ClientOptions, ConversationClient, SendOutcome};
pub use config::*;
pub use core_types::{Message, Sender, SessionId, SessionState};
pub use errors::ClientError;
pub use renderer::{MessageRenderer, NullRenderer};

#[cfg(test)]
pub mod test_utils;
