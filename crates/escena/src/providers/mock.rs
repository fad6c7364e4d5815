use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::Mutex;

use crate::models::message::ChatMessage;
use crate::providers::base::{Provider, Usage};

/// Scripted completion backend for tests. Replies are consumed in order and
/// every system prompt received is recorded, so tests can assert what the
/// service actually sent (context hints included) without a network.
#[derive(Clone, Default)]
pub struct MockProvider {
    replies: Arc<Mutex<Vec<String>>>,
    seen_systems: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a mock provider with a sequence of raw replies
    pub fn new(replies: Vec<String>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies)),
            seen_systems: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Single-reply shorthand for one-turn tests.
    pub fn with_reply(reply: &str) -> Self {
        Self::new(vec![reply.to_string()])
    }

    /// System prompts received so far, in call order.
    pub fn seen_systems(&self) -> Vec<String> {
        self.seen_systems.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, system: &str, _messages: &[ChatMessage]) -> Result<(String, Usage)> {
        self.seen_systems.lock().unwrap().push(system.to_string());
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            // Return empty text once the script is exhausted
            Ok((String::new(), Usage::default()))
        } else {
            Ok((replies.remove(0), Usage::default()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replies_consumed_in_order_then_empty() {
        let provider = MockProvider::new(vec!["uno".to_string(), "dos".to_string()]);
        assert_eq!(provider.complete("s", &[]).await.unwrap().0, "uno");
        assert_eq!(provider.complete("s", &[]).await.unwrap().0, "dos");
        assert_eq!(provider.complete("s", &[]).await.unwrap().0, "");
    }

    #[tokio::test]
    async fn test_clones_share_script_and_recordings() {
        let provider = MockProvider::with_reply("hola");
        let handle = provider.clone();
        provider.complete("primer sistema", &[]).await.unwrap();
        assert_eq!(handle.seen_systems(), vec!["primer sistema"]);
        assert_eq!(handle.complete("s", &[]).await.unwrap().0, "");
    }
}
