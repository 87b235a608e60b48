// src/memory/traits.rs

//! Session store contract. Services only touch persistence through this trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::memory::types::{Conversation, Message, Role};

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Return the conversation for `sid`, creating one under a fresh token when
    /// `sid` is absent or unknown. The flag is true when a row was written.
    async fn get_or_create(&self, sid: Option<&str>) -> Result<(Conversation, bool)>;

    async fn get_conversation(&self, conversation_id: i64) -> Result<Option<Conversation>>;

    /// Insert a message. User messages also bump `turns`; the count as
    /// persisted by this write is returned alongside the message. Fails with
    /// `NotFound` when the conversation no longer exists.
    async fn append_message(&self, conversation_id: i64, role: Role, content: &str) -> Result<(Message, i64)>;

    /// The `limit` most recent messages, oldest first.
    async fn recent_messages(&self, conversation_id: i64, limit: usize) -> Result<Vec<Message>>;

    /// Overwrite the rolling summary. Text over the cap is truncated with a marker.
    async fn update_summary(&self, conversation_id: i64, text: &str) -> Result<()>;

    /// Remember the mode and exam focus used most recently.
    async fn update_preferences(&self, conversation_id: i64, mode: &str, exam_focus: &str) -> Result<()>;

    /// Remove a conversation and, by cascade, its messages.
    async fn delete_conversation(&self, conversation_id: i64) -> Result<()>;
}
