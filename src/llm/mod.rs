// src/llm/mod.rs
// LLM collaborator: provider trait and the hosted implementation

pub mod provider;

pub use provider::{ChatMessage, GroqProvider, LlmProvider, ProviderMetadata, ProviderResponse};
