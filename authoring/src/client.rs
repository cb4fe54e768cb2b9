//! Chat-completion client for OpenAI-compatible endpoints.

use async_trait::async_trait;
use tracing::debug;

use crate::config::{AuthoringConfig, API_KEY_VAR};
use crate::error::{AuthoringError, AuthoringResult};

/// Trait for prompt-to-text backends. Jobs depend on this, not on a
/// concrete HTTP client, so tests can substitute scripted fakes.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce a completion for a fully rendered prompt.
    async fn generate(&self, prompt: &str) -> AuthoringResult<String>;
}

/// Live generator backed by the `/chat/completions` endpoint.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiGenerator {
    /// Build a generator from configuration. Fails when no API key is
    /// configured rather than sending doomed requests later.
    pub fn from_config(config: &AuthoringConfig) -> AuthoringResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AuthoringError::missing_api_key(API_KEY_VAR))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AuthoringError::generation(format!("build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &str) -> AuthoringResult<String> {
        let request_body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "user", "content": prompt}
            ],
        });

        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %self.model, prompt_len = prompt.len(), "Requesting completion");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AuthoringError::generation(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthoringError::generation(format!(
                "API error ({}): {}",
                status, body
            )));
        }

        let resp_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AuthoringError::generation(format!("parse response: {e}")))?;

        let content = resp_json["choices"][0]["message"]["content"]
            .as_str()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .ok_or(AuthoringError::EmptyCompletion)?;

        Ok(content.to_string())
    }
}
