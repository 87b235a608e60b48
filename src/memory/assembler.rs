// src/memory/assembler.rs
//! Turns the rolling summary and the recent window into the memory block
//! that is prepended to every prompt.

use crate::memory::types::Message;
use crate::prompt::templates::{fill, MEMORY_PREAMBLE};

pub const DEFAULT_SUMMARY_MAX_CHARS: usize = 4000;
pub const TRUNCATION_MARKER: &str = " ...";

const EMPTY_SUMMARY: &str = "(none yet)";
const EMPTY_DIALOGUE: &str = "(no recent messages)";

/// `Student: ...` / `Tutor: ...` lines, oldest to newest.
pub fn format_dialogue(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role.speaker(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_memory_block(summary: &str, recent: &[Message]) -> String {
    let summary = if summary.is_empty() { EMPTY_SUMMARY } else { summary };
    let dialogue = format_dialogue(recent);
    let dialogue = if dialogue.is_empty() { EMPTY_DIALOGUE } else { dialogue.as_str() };

    fill(MEMORY_PREAMBLE, &[("summary", summary), ("recent_dialogue", dialogue)])
}

/// Cap `text` at `max_chars` characters, appending a marker when cut.
pub fn truncate_summary(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}
