// src/prompt/mod.rs
// Prompt templates and the mode-dispatching builder

pub mod builder;
pub mod templates;

pub use builder::{build_summary_messages, build_tutor_messages, exam_focus_or_default, Mode};
