//! Conversation memory: persisted sessions, the recent window, and the
//! rolling summary injected into prompts.

pub mod assembler;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use self::assembler::{build_memory_block, format_dialogue, truncate_summary};
pub use self::sqlite::SqliteSessionStore;
pub use self::traits::SessionStore;
pub use self::types::{Conversation, Message, Role};
