// src/lib.rs

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod memory;
pub mod prompt;
pub mod services;
pub mod state;

pub use config::TutorConfig;
pub use error::{Result, TutorError};
pub use state::{create_app_state, AppState};
