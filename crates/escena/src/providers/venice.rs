use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use super::base::{Provider, Usage};
use crate::models::message::ChatMessage;

pub const DEFAULT_HOST: &str = "https://api.venice.ai";
pub const DEFAULT_MODEL: &str = "venice-uncensored";

#[derive(Debug, Clone)]
pub struct VeniceProviderConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
}

impl VeniceProviderConfig {
    pub fn new<S: Into<String>, T: Into<String>>(host: S, api_key: T) -> Self {
        Self {
            host: host.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: Some(0.7),
            max_tokens: Some(1000),
        }
    }
}

pub struct VeniceProvider {
    client: Client,
    config: VeniceProviderConfig,
}

impl VeniceProvider {
    pub fn new(config: VeniceProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a provider from `VENICE_API_KEY`, `VENICE_HOST` and
    /// `VENICE_MODEL` environment variables.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("VENICE_API_KEY")
            .map_err(|_| anyhow!("VENICE_API_KEY is not configured"))?;
        let host = std::env::var("VENICE_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let mut config = VeniceProviderConfig::new(host, api_key);
        if let Ok(model) = std::env::var("VENICE_MODEL") {
            config.model = model;
        }
        Self::new(config)
    }

    fn get_usage(data: &Value) -> Usage {
        let usage = match data.get("usage") {
            Some(usage) => usage,
            None => return Usage::default(),
        };

        let input_tokens = usage
            .get("prompt_tokens")
            .and_then(|v| v.as_i64())
            .map(|v| v as i32);

        let output_tokens = usage
            .get("completion_tokens")
            .and_then(|v| v.as_i64())
            .map(|v| v as i32);

        let total_tokens = usage
            .get("total_tokens")
            .and_then(|v| v.as_i64())
            .map(|v| v as i32)
            .or_else(|| match (input_tokens, output_tokens) {
                (Some(input), Some(output)) => Some(input + output),
                _ => None,
            });

        Usage::new(input_tokens, output_tokens, total_tokens)
    }

    async fn post(&self, payload: Value) -> Result<Value> {
        let url = format!(
            "{}/api/v1/chat/completions",
            self.config.host.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&payload)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            status if status == StatusCode::TOO_MANY_REQUESTS || status.as_u16() >= 500 => {
                Err(anyhow!("Server error: {}", status))
            }
            status => Err(anyhow!("Venice API error {}: {}", status, response.text().await?)),
        }
    }
}

fn messages_to_spec(system: &str, messages: &[ChatMessage]) -> Vec<Value> {
    let mut spec = vec![json!({
        "role": "system",
        "content": system,
    })];
    for message in messages {
        spec.push(json!({
            "role": message.role,
            "content": message.content,
        }));
    }
    spec
}

#[async_trait]
impl Provider for VeniceProvider {
    async fn complete(&self, system: &str, messages: &[ChatMessage]) -> Result<(String, Usage)> {
        let payload = json!({
            "model": self.config.model,
            "messages": messages_to_spec(system, messages),
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
            "stream": false,
        });

        let response = self.post(payload).await?;

        if let Some(error) = response.get("error") {
            return Err(anyhow!("Venice API error: {}", error));
        }

        let text = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow!("No response from AI"))?
            .to_string();
        let usage = Self::get_usage(&response);
        debug!(model = %self.config.model, total_tokens = ?usage.total_tokens, "completion received");

        Ok((text, usage))
    }
}
