// src/memory/sqlite/migration.rs
//! Ensures the conversation tables exist. Safe to run at every startup.
use sqlx::{Executor, SqlitePool};

use crate::error::Result;

const CREATE_CONVERSATIONS: &str = r#"
CREATE TABLE IF NOT EXISTS conversations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    sid TEXT NOT NULL UNIQUE,
    mode TEXT NOT NULL DEFAULT 'explain',
    exam_focus TEXT NOT NULL DEFAULT 'Final MBBS',
    summary TEXT NOT NULL DEFAULT '',
    turns INTEGER NOT NULL DEFAULT 0,
    created_at DATETIME NOT NULL,
    updated_at DATETIME NOT NULL
);
"#;

const CREATE_MESSAGES: &str = r#"
CREATE TABLE IF NOT EXISTS messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    conversation_id INTEGER NOT NULL,
    role TEXT NOT NULL CHECK (role IN ('user', 'assistant')),
    content TEXT NOT NULL,
    created_at DATETIME NOT NULL,
    FOREIGN KEY (conversation_id) REFERENCES conversations(id) ON DELETE CASCADE
);
"#;

const CREATE_INDICES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_messages_conversation ON messages(conversation_id, id);
"#;

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    pool.execute(CREATE_CONVERSATIONS).await?;
    pool.execute(CREATE_MESSAGES).await?;
    pool.execute(CREATE_INDICES).await?;
    Ok(())
}
