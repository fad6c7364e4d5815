use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel clients send to request the opening narrative turn.
/// It is never stored and never forwarded as history.
pub const INITIAL_GREETING: &str = "__INITIAL_GREETING__";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A stored chat message. Immutable once created, except for the IMAGEN
/// portion of `content` which the edit-prompt flow may rewrite in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub agent_id: String,
    pub created: i64,
}

impl ChatMessage {
    fn new<S: Into<String>, T: Into<String>>(role: Role, agent_id: S, content: T) -> Self {
        ChatMessage {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            agent_id: agent_id.into(),
            created: Utc::now().timestamp(),
        }
    }

    /// Create a new user message with the current timestamp
    pub fn user<S: Into<String>, T: Into<String>>(agent_id: S, content: T) -> Self {
        Self::new(Role::User, agent_id, content)
    }

    /// Create a new assistant message with the current timestamp
    pub fn assistant<S: Into<String>, T: Into<String>>(agent_id: S, content: T) -> Self {
        Self::new(Role::Assistant, agent_id, content)
    }

    pub fn is_initial_greeting(&self) -> bool {
        self.content == INITIAL_GREETING
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }

    #[test]
    fn test_message_constructors() {
        let message = ChatMessage::user("agent-1", "hola");
        assert!(matches!(message.role, Role::User));
        assert_eq!(message.agent_id, "agent-1");
        assert_eq!(message.content, "hola");
        assert!(!message.is_initial_greeting());

        let greeting = ChatMessage::user("agent-1", INITIAL_GREETING);
        assert!(greeting.is_initial_greeting());
    }

    #[test]
    fn test_message_camel_case_wire_format() {
        let message = ChatMessage::assistant("agent-1", "hola");
        let value = serde_json::to_value(&message).unwrap();
        assert!(value.get("agentId").is_some());
        assert!(value.get("agent_id").is_none());
    }
}
