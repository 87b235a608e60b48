// src/llm/provider/mod.rs
// LLM provider trait and the message types it speaks
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod groq;

pub use groq::GroqProvider;

/// Role-tagged message as sent to the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// Generated text plus what the provider reported about the call
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub content: String,
    pub metadata: ProviderMetadata,
}

#[derive(Debug, Clone, Default)]
pub struct ProviderMetadata {
    pub model_version: String,
    pub input_tokens: Option<i64>,
    pub output_tokens: Option<i64>,
    pub total_tokens: Option<i64>,
    pub latency_ms: i64,
    pub finish_reason: Option<String>,
}

/// Opaque completion collaborator: role-tagged messages in, text out.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging/debugging
    fn name(&self) -> &'static str;

    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<ProviderResponse>;
}
