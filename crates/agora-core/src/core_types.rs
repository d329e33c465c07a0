//! Conversation data model: who said what, and the session it belongs to.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::Display;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// One displayed line of the conversation. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    sender: Sender,
    text: String,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self::new(Sender::Ai, text)
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Client-chosen session identifier. Never negotiated with the backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh id of the form `session_<8 hex chars>`.
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(format!("session_{}", &hex[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub session_id: SessionId,
    pub messages: Vec<Message>,
    pub is_waiting_for_reply: bool,
}

impl SessionState {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            messages: Vec::new(),
            is_waiting_for_reply: false,
        }
    }

    /// Drop the log and the typing flag. The session id survives.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.is_waiting_for_reply = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_display_matches_wire_names() {
        assert_eq!(Sender::User.to_string(), "user");
        assert_eq!(Sender::Ai.to_string(), "ai");
        assert_eq!(serde_json::to_string(&Sender::Ai).unwrap(), "\"ai\"");
    }

    #[test]
    fn test_generated_session_id_shape() {
        let id = SessionId::generate();
        let suffix = id.as_str().strip_prefix("session_").unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, SessionId::generate());
    }

    #[test]
    fn test_reset_keeps_session_id() {
        let mut state = SessionState::new(SessionId::from("hackathon_user_1"));
        state.messages.push(Message::user("hello"));
        state.is_waiting_for_reply = true;

        state.reset();

        assert!(state.messages.is_empty());
        assert!(!state.is_waiting_for_reply);
        assert_eq!(state.session_id.as_str(), "hackathon_user_1");
    }
}
