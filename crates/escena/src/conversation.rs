//! Ephemeral per-turn view of the conversation: the most recent user and
//! assistant texts, scanned backward from the newest message.

use crate::models::message::{ChatMessage, Role};

/// Maximum length of the scene hint injected into the system prompt.
const HINT_CHARS: usize = 300;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationContext {
    pub last_user: Option<String>,
    pub last_assistant: Option<String>,
}

impl ConversationContext {
    /// Scan history from the most recent message backward until both roles
    /// have been seen once.
    pub fn from_history(history: &[ChatMessage]) -> Self {
        let mut last_user = None;
        let mut last_assistant = None;
        for message in history.iter().rev() {
            if last_assistant.is_none()
                && message.role == Role::Assistant
                && !message.content.is_empty()
            {
                last_assistant = Some(message.content.clone());
            }
            if last_user.is_none() && message.role == Role::User && !message.content.is_empty() {
                last_user = Some(message.content.clone());
            }
            if last_user.is_some() && last_assistant.is_some() {
                break;
            }
        }
        ConversationContext {
            last_user,
            last_assistant,
        }
    }

    /// A short single-line scene hint from the last exchange, preferring the
    /// assistant's text. Empty when there is no context yet.
    pub fn hint(&self) -> String {
        let base = self
            .last_assistant
            .as_deref()
            .or(self.last_user.as_deref())
            .unwrap_or_default();
        let cleaned = base.replace(['\n', '\r'], " ").replace(['"', '\''], "");
        cleaned.trim().chars().take(HINT_CHARS).collect()
    }
}
