use chrono::Utc;
use serde::Serialize;

/// Shown in place of a reply when the agent cannot be reached.
pub const FALLBACK_MESSAGE: &str =
    "Sorry, I'm having trouble connecting right now. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub content: String,
    pub is_from_user: bool,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::now(content.into(), true)
    }

    pub fn agent(content: impl Into<String>) -> Self {
        Self::now(content.into(), false)
    }

    fn now(content: String, is_from_user: bool) -> Self {
        Self {
            content,
            is_from_user,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChatSessionState {
    /// Append-only until the session is cleared.
    pub messages: Vec<ChatMessage>,
    pub draft: String,
    pub is_loading: bool,
    pub last_error: Option<String>,
}
