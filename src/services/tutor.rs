// src/services/tutor.rs
// One student exchange end to end: session, memory, prompt, reply, persistence.

use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{Result, TutorError};
use crate::llm::LlmProvider;
use crate::memory::{build_memory_block, Message, Role, SessionStore};
use crate::prompt::{build_tutor_messages, exam_focus_or_default, Mode};
use crate::services::summarization::SummarizationService;

#[derive(Debug, Clone, Default)]
pub struct AskRequest {
    pub question: String,
    pub mode: Option<String>,
    pub exam_focus: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AskOutcome {
    pub sid: String,
    /// True when a conversation was created for this request.
    pub new_session: bool,
    pub mode: Mode,
    pub answer: String,
    pub summarized: bool,
}

#[derive(Debug, Clone)]
pub struct HistoryView {
    pub sid: String,
    pub new_session: bool,
    pub summary: String,
    pub turns: i64,
    pub messages: Vec<Message>,
}

pub struct TutorService {
    store: Arc<dyn SessionStore>,
    provider: Arc<dyn LlmProvider>,
    summarizer: Arc<SummarizationService>,
    recent_limit: usize,
    history_limit: usize,
}

impl TutorService {
    pub fn new(
        store: Arc<dyn SessionStore>,
        provider: Arc<dyn LlmProvider>,
        summarizer: Arc<SummarizationService>,
        recent_limit: usize,
        history_limit: usize,
    ) -> Self {
        Self {
            store,
            provider,
            summarizer,
            recent_limit,
            history_limit,
        }
    }

    pub async fn ask(&self, sid: Option<&str>, request: AskRequest) -> Result<AskOutcome> {
        let question = request.question.trim();
        if question.is_empty() {
            return Err(TutorError::InvalidInput("question is required".to_string()));
        }
        let mode = Mode::from_request(request.mode.as_deref());
        let exam_focus = exam_focus_or_default(request.exam_focus.as_deref());

        let (conversation, new_session) = self.store.get_or_create(sid).await?;

        // Window is read before this exchange is saved
        let recent = self
            .store
            .recent_messages(conversation.id, self.recent_limit)
            .await?;
        let memory = build_memory_block(&conversation.summary, &recent);
        let messages = build_tutor_messages(mode, question, &exam_focus, &memory);

        let (_, turns) = self
            .store
            .append_message(conversation.id, Role::User, question)
            .await?;

        info!(
            "Asking {} for conversation {} (mode={}, window={})",
            self.provider.name(),
            conversation.id,
            mode,
            recent.len()
        );
        let response = self.provider.chat(messages).await?;
        let answer = response.content;
        info!(
            "Reply for conversation {}: {} chars in {}ms",
            conversation.id,
            answer.len(),
            response.metadata.latency_ms
        );

        self.store
            .append_message(conversation.id, Role::Assistant, &answer)
            .await?;

        let summarized = match self
            .summarizer
            .summarize_if_needed(&conversation, recent.len(), turns, question, &answer)
            .await
        {
            Ok(summary) => summary.is_some(),
            Err(e) => {
                warn!("Summary refresh failed for conversation {}: {}", conversation.id, e);
                false
            }
        };

        self.store
            .update_preferences(conversation.id, mode.as_str(), &exam_focus)
            .await?;

        Ok(AskOutcome {
            sid: conversation.sid,
            new_session,
            mode,
            answer,
            summarized,
        })
    }

    pub async fn history(&self, sid: Option<&str>) -> Result<HistoryView> {
        let (conversation, new_session) = self.store.get_or_create(sid).await?;
        let messages = self
            .store
            .recent_messages(conversation.id, self.history_limit)
            .await?;

        Ok(HistoryView {
            sid: conversation.sid,
            new_session,
            summary: conversation.summary,
            turns: conversation.turns,
            messages,
        })
    }
}
