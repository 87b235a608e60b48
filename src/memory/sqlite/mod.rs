// src/memory/sqlite/mod.rs

//! SQLite-backed session store: conversations, their messages, and the
//! rolling summary.

pub mod migration;
pub mod store;

pub use store::SqliteSessionStore;
