// src/config/mod.rs
// Environment-driven configuration, loaded once in main and passed down.

use std::str::FromStr;
use tracing::warn;

use crate::error::{Result, TutorError};

const DEFAULT_SECRET_KEY: &str = "dev-secret-change-me";

/// How the summarization trigger counts turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryTrigger {
    /// Approximate user-turn count derived from the recent-message window.
    /// Stops firing once the window is full.
    Windowed,
    /// Exact count taken from the conversation's persisted `turns`.
    Turns,
}

impl FromStr for SummaryTrigger {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "windowed" | "window" => Ok(SummaryTrigger::Windowed),
            "turns" | "exact" => Ok(SummaryTrigger::Turns),
            other => Err(format!("unknown summary trigger '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TutorConfig {
    // ── LLM provider
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub llm_timeout_secs: u64,

    // ── Database
    pub database_url: String,
    pub sqlite_max_connections: u32,

    // ── Memory
    pub recent_limit: usize,
    pub summary_every: usize,
    pub summary_trigger: SummaryTrigger,
    pub summary_max_chars: usize,
    pub history_limit: usize,

    // ── Server
    pub secret_key: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

// Handles values with trailing comments and extra whitespace.
fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    warn!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        Err(_) => default,
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required_env(key: &str) -> Result<String> {
    non_empty_env(key)
        .ok_or_else(|| TutorError::Config(format!("Missing {key} in environment or .env")))
}

impl TutorConfig {
    /// Loads `.env` (if present) and then reads the process environment.
    /// Fails when the provider credential is missing.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let api_key = required_env("GROQ_API_KEY")?;

        let secret_key = non_empty_env("TUTOR_SECRET_KEY")
            .unwrap_or_else(|| DEFAULT_SECRET_KEY.to_string());

        Ok(Self {
            api_key,
            model: env_var_or("GROQ_MODEL", "Gemma2-9b-It".to_string()),
            base_url: env_var_or(
                "GROQ_BASE_URL",
                "https://api.groq.com/openai/v1".to_string(),
            ),
            llm_timeout_secs: env_var_or("LLM_TIMEOUT_SECS", 120),
            database_url: env_var_or("DATABASE_URL", "sqlite://local.db".to_string()),
            sqlite_max_connections: env_var_or("SQLITE_MAX_CONNECTIONS", 5),
            recent_limit: env_var_or("RECENT_LIMIT", 12),
            summary_every: env_var_or("SUMMARY_EVERY", 6),
            summary_trigger: env_var_or("SUMMARY_TRIGGER", SummaryTrigger::Windowed),
            summary_max_chars: env_var_or("SUMMARY_MAX_CHARS", 4000),
            history_limit: env_var_or("HISTORY_LIMIT", 100),
            secret_key,
            host: env_var_or("TUTOR_HOST", "0.0.0.0".to_string()),
            port: env_var_or("TUTOR_PORT", 5000),
            log_level: env_var_or("LOG_LEVEL", "info".to_string()),
        })
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Config with the built-in defaults and a caller-provided key; for tests
    /// and embedding.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "Gemma2-9b-It".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            llm_timeout_secs: 120,
            database_url: "sqlite::memory:".to_string(),
            sqlite_max_connections: 1,
            recent_limit: 12,
            summary_every: 6,
            summary_trigger: SummaryTrigger::Windowed,
            summary_max_chars: 4000,
            history_limit: 100,
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            host: "127.0.0.1".to_string(),
            port: 5000,
            log_level: "info".to_string(),
        }
    }
}
