//! Message persistence seam. The engine only needs simple read/write
//! operations; the in-memory implementation backs tests and the CLI, while a
//! real deployment plugs a database behind the same trait.

use std::sync::Mutex;

use crate::errors::{EscenaError, EscenaResult};
use crate::models::message::ChatMessage;

pub trait MessageStore: Send + Sync {
    /// Append a message to an agent's conversation.
    fn append(&self, message: ChatMessage) -> EscenaResult<()>;

    /// Fetch a single message by id.
    fn get(&self, id: &str) -> EscenaResult<ChatMessage>;

    /// Creation-ordered history for an agent, greeting sentinel excluded.
    fn history(&self, agent_id: &str) -> EscenaResult<Vec<ChatMessage>>;

    /// Rewrite a stored message's content (the edit-prompt path).
    fn update_content(&self, id: &str, content: &str) -> EscenaResult<ChatMessage>;

    /// Delete an agent's entire conversation.
    fn clear(&self, agent_id: &str) -> EscenaResult<()>;
}

#[derive(Default)]
pub struct InMemoryMessageStore {
    messages: Mutex<Vec<ChatMessage>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MessageStore for InMemoryMessageStore {
    fn append(&self, message: ChatMessage) -> EscenaResult<()> {
        self.messages.lock().unwrap().push(message);
        Ok(())
    }

    fn get(&self, id: &str) -> EscenaResult<ChatMessage> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| EscenaError::MessageNotFound(id.to_string()))
    }

    fn history(&self, agent_id: &str) -> EscenaResult<Vec<ChatMessage>> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.agent_id == agent_id && !m.is_initial_greeting())
            .cloned()
            .collect())
    }

    fn update_content(&self, id: &str, content: &str) -> EscenaResult<ChatMessage> {
        let mut messages = self.messages.lock().unwrap();
        let message = messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| EscenaError::MessageNotFound(id.to_string()))?;
        message.content = content.to_string();
        Ok(message.clone())
    }

    fn clear(&self, agent_id: &str) -> EscenaResult<()> {
        self.messages
            .lock()
            .unwrap()
            .retain(|m| m.agent_id != agent_id);
        Ok(())
    }
}
