// src/llm/provider/groq.rs
// Groq chat-completions provider (OpenAI-compatible)

use super::{ChatMessage, LlmProvider, ProviderMetadata, ProviderResponse};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::error::{Result, TutorError};

pub struct GroqProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GroqProvider {
    /// `timeout_secs == 0` leaves the request unbounded.
    pub fn new(api_key: String, model: String, base_url: String, timeout_secs: u64) -> Result<Self> {
        let mut builder = Client::builder();
        if timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }

        Ok(Self {
            client: builder.build()?,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// Pull the reply text and usage out of a chat-completions body.
fn parse_completion(raw: &Value, model: &str, latency_ms: i64) -> Result<ProviderResponse> {
    let content = raw["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| TutorError::upstream("No content in chat completion response"))?
        .to_string();

    let usage = &raw["usage"];
    let metadata = ProviderMetadata {
        model_version: raw["model"].as_str().unwrap_or(model).to_string(),
        input_tokens: usage["prompt_tokens"].as_i64(),
        output_tokens: usage["completion_tokens"].as_i64(),
        total_tokens: usage["total_tokens"].as_i64(),
        latency_ms,
        finish_reason: raw["choices"][0]["finish_reason"]
            .as_str()
            .map(|s| s.to_string()),
    };

    Ok(ProviderResponse { content, metadata })
}

#[async_trait]
impl LlmProvider for GroqProvider {
    fn name(&self) -> &'static str {
        "groq"
    }

    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<ProviderResponse> {
        let start = Instant::now();

        let body = json!({
            "model": self.model,
            "messages": &messages,
        });

        debug!("Groq request: model={}, messages={}", self.model, messages.len());

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TutorError::upstream(format!("Groq request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!("Groq API error {}: {}", status, error_text);
            return Err(TutorError::upstream(format!("Groq API error {status}: {error_text}")));
        }

        let raw = response
            .json::<Value>()
            .await
            .map_err(|e| TutorError::upstream(format!("Invalid Groq response body: {e}")))?;
        let latency_ms = start.elapsed().as_millis() as i64;

        let parsed = parse_completion(&raw, &self.model, latency_ms)?;
        debug!(
            "Groq reply: {} chars, {:?} tokens, {}ms",
            parsed.content.len(),
            parsed.metadata.total_tokens,
            latency_ms
        );
        Ok(parsed)
    }
}
