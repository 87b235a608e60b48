// src/services/summarization.rs
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{SummaryTrigger, TutorConfig};
use crate::error::Result;
use crate::llm::LlmProvider;
use crate::memory::assembler::truncate_summary;
use crate::memory::{Conversation, SessionStore};
use crate::prompt::build_summary_messages;

/// When to regenerate the rolling summary.
#[derive(Debug, Clone, Copy)]
pub struct SummaryPolicy {
    /// Interval; 0 disables summarization.
    pub every: usize,
    pub trigger: SummaryTrigger,
    pub max_chars: usize,
}

impl SummaryPolicy {
    pub fn from_config(config: &TutorConfig) -> Self {
        Self {
            every: config.summary_every,
            trigger: config.summary_trigger,
            max_chars: config.summary_max_chars,
        }
    }

    /// `recent_len` is the size of the window loaded before this exchange;
    /// `turns` is the persisted user-turn count after saving the question.
    ///
    /// The windowed form approximates the user-turn count from the window and
    /// stops firing once the window is full.
    pub fn should_summarize(&self, recent_len: usize, turns: i64) -> bool {
        if self.every == 0 {
            return false;
        }
        match self.trigger {
            SummaryTrigger::Windowed => ((recent_len + 1) / 2 + 1) % self.every == 0,
            SummaryTrigger::Turns => turns > 0 && (turns as usize) % self.every == 0,
        }
    }
}

pub struct SummarizationService {
    provider: Arc<dyn LlmProvider>,
    store: Arc<dyn SessionStore>,
    policy: SummaryPolicy,
}

impl SummarizationService {
    pub fn new(provider: Arc<dyn LlmProvider>, store: Arc<dyn SessionStore>, policy: SummaryPolicy) -> Self {
        Self { provider, store, policy }
    }

    /// Regenerate the summary if the policy says so. Returns the new summary
    /// when one was written.
    pub async fn summarize_if_needed(
        &self,
        conversation: &Conversation,
        recent_len: usize,
        turns: i64,
        user_message: &str,
        assistant_message: &str,
    ) -> Result<Option<String>> {
        if !self.policy.should_summarize(recent_len, turns) {
            debug!(
                "No summary for conversation {} (window={}, turns={})",
                conversation.id, recent_len, turns
            );
            return Ok(None);
        }

        self.summarize(conversation, user_message, assistant_message)
            .await
            .map(Some)
    }

    /// Fold the latest exchange into the conversation's rolling summary.
    pub async fn summarize(
        &self,
        conversation: &Conversation,
        user_message: &str,
        assistant_message: &str,
    ) -> Result<String> {
        let messages = build_summary_messages(&conversation.summary, user_message, assistant_message);
        let response = self.provider.chat(messages).await?;

        let summary = truncate_summary(response.content.trim(), self.policy.max_chars);
        self.store.update_summary(conversation.id, &summary).await?;

        info!(
            "Updated rolling summary for conversation {} ({} chars)",
            conversation.id,
            summary.chars().count()
        );
        Ok(summary)
    }
}
