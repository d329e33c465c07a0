use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core_types::SessionId;

/// Shown when a reply carries neither `ai_response` nor `error`.
pub const MISSING_REPLY_TEXT: &str = "Error.";

/// Body of `POST /message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRequest {
    pub session_id: SessionId,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

/// Body of `POST /restart` and `POST /summary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequest {
    pub session_id: SessionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

impl SessionRequest {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            topic: None,
        }
    }
}

/// Reply to `POST /message`. Anything else the backend sends is ignored.
///
/// Both fields accept any JSON value; non-string values are shown as compact JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageReply {
    #[serde(default)]
    pub ai_response: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl MessageReply {
    pub fn ai_response(text: impl Into<String>) -> Self {
        Self {
            ai_response: Some(Value::String(text.into())),
            error: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            ai_response: None,
            error: Some(Value::String(text.into())),
        }
    }

    /// The text to show as the AI's turn: the response, else the error, else a fixed marker.
    /// Null, `false`, zero and empty strings count as absent.
    pub fn display_text(&self) -> String {
        [&self.ai_response, &self.error]
            .into_iter()
            .flatten()
            .find_map(shown_text)
            .unwrap_or_else(|| MISSING_REPLY_TEXT.to_string())
    }
}

fn shown_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RestartReply {
    #[serde(default)]
    pub status: Option<String>,
}

impl RestartReply {
    /// A missing status counts as success; only an explicit non-"ok" value is a refusal.
    pub fn is_ok(&self) -> bool {
        self.status.as_deref().map_or(true, |status| status == "ok")
    }
}

/// Reply to `POST /summary`. Only `progress` is read; it is opaque and displayed as-is.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub progress: Value,
}

impl Summary {
    pub fn progress_notice(&self) -> String {
        format!("Progress: {}", self.progress)
    }
}
