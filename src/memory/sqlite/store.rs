//! Implements SessionStore for SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Result, TutorError};
use crate::memory::assembler::{truncate_summary, DEFAULT_SUMMARY_MAX_CHARS};
use crate::memory::sqlite::migration::run_migrations;
use crate::memory::traits::SessionStore;
use crate::memory::types::{Conversation, Message, Role};

const CONVERSATION_COLUMNS: &str =
    "id, sid, mode, exam_focus, summary, turns, created_at, updated_at";

pub struct SqliteSessionStore {
    pub pool: SqlitePool,
    summary_max_chars: usize,
}

impl SqliteSessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            summary_max_chars: DEFAULT_SUMMARY_MAX_CHARS,
        }
    }

    pub fn with_summary_cap(mut self, max_chars: usize) -> Self {
        self.summary_max_chars = max_chars;
        self
    }

    /// Open (creating if needed) the database at `url` and run migrations.
    /// In-memory databases are pinned to a single long-lived connection so
    /// every query sees the same data.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let in_memory = url.contains(":memory:");
        let mut pool_options = SqlitePoolOptions::new();
        pool_options = if in_memory {
            pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await?;
        run_migrations(&pool).await?;
        info!("Session store ready ({})", if in_memory { "in-memory" } else { url });

        Ok(Self::new(pool))
    }

    async fn find_by_sid(&self, sid: &str) -> Result<Option<Conversation>> {
        let row = sqlx::query(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE sid = ?"
        ))
        .bind(sid)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_conversation).transpose()
    }
}

fn row_to_conversation(row: &SqliteRow) -> Result<Conversation> {
    Ok(Conversation {
        id: row.try_get("id")?,
        sid: row.try_get("sid")?,
        mode: row.try_get("mode")?,
        exam_focus: row.try_get("exam_focus")?,
        summary: row.try_get("summary")?,
        turns: row.try_get("turns")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

fn row_to_message(row: &SqliteRow) -> Result<Message> {
    let role: String = row.try_get("role")?;
    Ok(Message {
        id: row.try_get("id")?,
        conversation_id: row.try_get("conversation_id")?,
        role: role.parse()?,
        content: row.try_get("content")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn get_or_create(&self, sid: Option<&str>) -> Result<(Conversation, bool)> {
        if let Some(sid) = sid.filter(|s| !s.is_empty()) {
            if let Some(conversation) = self.find_by_sid(sid).await? {
                return Ok((conversation, false));
            }
            debug!("Unknown session token presented, issuing a fresh one");
        }

        let sid = Uuid::new_v4().to_string();
        let now = Utc::now();
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO conversations (sid, created_at, updated_at)
            VALUES (?, ?, ?)
            RETURNING {CONVERSATION_COLUMNS}
            "#
        ))
        .bind(&sid)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        let conversation = row_to_conversation(&row)?;
        info!("Created conversation {} for new session", conversation.id);
        Ok((conversation, true))
    }

    async fn get_conversation(&self, conversation_id: i64) -> Result<Option<Conversation>> {
        let row = sqlx::query(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE id = ?"
        ))
        .bind(conversation_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_conversation).transpose()
    }

    async fn append_message(&self, conversation_id: i64, role: Role, content: &str) -> Result<(Message, i64)> {
        let now = Utc::now();
        let bump: i64 = if role == Role::User { 1 } else { 0 };

        let mut tx = self.pool.begin().await?;

        let turns: i64 = sqlx::query_scalar(
            "UPDATE conversations SET turns = turns + ?, updated_at = ? WHERE id = ? RETURNING turns",
        )
        .bind(bump)
        .bind(now)
        .bind(conversation_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| TutorError::not_found(format!("conversation {conversation_id}")))?;

        let row = sqlx::query(
            r#"
            INSERT INTO messages (conversation_id, role, content, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(conversation_id)
        .bind(role.as_str())
        .bind(content)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        let message = Message {
            id: row.try_get("id")?,
            conversation_id,
            role,
            content: content.to_string(),
            created_at: now,
        };
        Ok((message, turns))
    }

    async fn recent_messages(&self, conversation_id: i64, limit: usize) -> Result<Vec<Message>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        // Newest first so LIMIT keeps the tail, then flip to chronological.
        let rows = sqlx::query(
            r#"
            SELECT id, conversation_id, role, content, created_at
            FROM messages
            WHERE conversation_id = ?
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(conversation_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        let mut messages = rows.iter().map(row_to_message).collect::<Result<Vec<_>>>()?;
        messages.reverse();
        Ok(messages)
    }

    async fn update_summary(&self, conversation_id: i64, text: &str) -> Result<()> {
        let summary = truncate_summary(text, self.summary_max_chars);

        let updated = sqlx::query(
            "UPDATE conversations SET summary = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&summary)
        .bind(Utc::now())
        .bind(conversation_id)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(TutorError::not_found(format!("conversation {conversation_id}")));
        }
        Ok(())
    }

    async fn update_preferences(&self, conversation_id: i64, mode: &str, exam_focus: &str) -> Result<()> {
        let updated = sqlx::query(
            "UPDATE conversations SET mode = ?, exam_focus = ?, updated_at = ? WHERE id = ?",
        )
        .bind(mode)
        .bind(exam_focus)
        .bind(Utc::now())
        .bind(conversation_id)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(TutorError::not_found(format!("conversation {conversation_id}")));
        }
        Ok(())
    }

    async fn delete_conversation(&self, conversation_id: i64) -> Result<()> {
        let deleted = sqlx::query("DELETE FROM conversations WHERE id = ?")
            .bind(conversation_id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(TutorError::not_found(format!("conversation {conversation_id}")));
        }
        Ok(())
    }
}
