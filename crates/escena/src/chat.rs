//! One chat turn end-to-end: persist the user message, build conversation
//! context, call the completion backend, post-process the reply, persist it.
//!
//! Turns for the same agent conversation are expected to run sequentially;
//! the serialization discipline (request handler, per-agent mutex) belongs to
//! the caller.

use tracing::{debug, info};

use crate::conversation::ConversationContext;
use crate::errors::{EscenaError, EscenaResult};
use crate::models::agent::Agent;
use crate::models::message::{ChatMessage, Role, INITIAL_GREETING};
use crate::pipeline::{self, TurnContext};
use crate::providers::base::Provider;
use crate::store::MessageStore;

/// Trailing history messages forwarded to the completion backend.
const CONTEXT_WINDOW: usize = 10;

/// Drives chat turns against a completion backend and a message store.
pub struct ChatService<S: MessageStore> {
    provider: Box<dyn Provider>,
    store: S,
}

impl<S: MessageStore> ChatService<S> {
    pub fn new(provider: Box<dyn Provider>, store: S) -> Self {
        Self { provider, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one chat turn and return the stored assistant message.
    ///
    /// `text` may be the greeting sentinel, in which case no user message is
    /// stored and the turn only runs when the conversation is still empty;
    /// the opening instruction is expected to live in `system_prompt`.
    pub async fn reply(
        &self,
        agent: &Agent,
        system_prompt: &str,
        user_name: Option<&str>,
        text: &str,
    ) -> EscenaResult<ChatMessage> {
        let is_greeting = text == INITIAL_GREETING;
        if is_greeting && !self.store.history(&agent.id)?.is_empty() {
            return Err(EscenaError::GreetingSkipped);
        }
        if !is_greeting {
            self.store.append(ChatMessage::user(&agent.id, text))?;
        }

        let full_history = self.store.history(&agent.id)?;
        let start = full_history.len().saturating_sub(CONTEXT_WINDOW);
        let history = &full_history[start..];
        let context = ConversationContext::from_history(history);

        let mut system = system_prompt.to_string();
        let hint = context.hint();
        if !hint.is_empty() {
            system = format!(
                "{}\n\nContexto conversacional (para escena e IMAGEN): {}",
                system, hint
            );
        }

        let (raw, usage) = self
            .provider
            .complete(&system, history)
            .await
            .map_err(|e| EscenaError::Provider(e.to_string()))?;
        if raw.is_empty() {
            return Err(EscenaError::EmptyCompletion);
        }
        debug!(total_tokens = ?usage.total_tokens, "raw reply received");

        let processed = pipeline::process(
            &raw,
            &TurnContext {
                agent_name: &agent.name,
                user_name,
                character_name: agent.character_name.as_deref(),
                image_prompt_master: agent.image_prompt_master.as_deref(),
                last_user: context.last_user.as_deref(),
                last_assistant: context.last_assistant.as_deref(),
            },
        );

        let message = ChatMessage::assistant(&agent.id, processed);
        self.store.append(message.clone())?;
        info!(agent = %agent.name, message = %message.id, "assistant reply stored");
        Ok(message)
    }

    /// Replace the IMAGEN line of a stored assistant message with a
    /// caller-supplied prompt, then re-sanitize. The rest of the message is
    /// untouched.
    pub fn edit_image_prompt(
        &self,
        message_id: &str,
        new_prompt: &str,
        agent: &Agent,
        user_name: Option<&str>,
    ) -> EscenaResult<ChatMessage> {
        let message = self.store.get(message_id)?;
        if message.role != Role::Assistant {
            return Err(EscenaError::NotEditable(message_id.to_string()));
        }
        let updated = pipeline::apply_prompt_edit(
            &message.content,
            new_prompt,
            &agent.name,
            user_name,
            agent.character_name.as_deref(),
        );
        self.store.update_content(message_id, &updated)
    }

    /// Drop the whole conversation for an agent.
    pub fn clear_history(&self, agent_id: &str) -> EscenaResult<()> {
        self.store.clear(agent_id)
    }
}
