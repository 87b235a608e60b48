// src/prompt/builder.rs
//! Chooses a template by interaction mode and produces the message list sent
//! to the provider.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::llm::ChatMessage;
use crate::prompt::templates::{
    fill, FLASHCARD_TEMPLATE, SUMMARIZE_TEMPLATE, SYSTEM_PROMPT, USER_TASK_TEMPLATE,
};

pub const DEFAULT_EXAM_FOCUS: &str = "Final MBBS";

/// Requested interaction type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Explain,
    Quiz,
    Flashcards,
    Osce,
}

impl Mode {
    /// Lenient parse for request input: blank or unrecognized falls back to `Explain`.
    pub fn from_request(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Explain => "explain",
            Mode::Quiz => "quiz",
            Mode::Flashcards => "flashcards",
            Mode::Osce => "osce",
        }
    }

    /// Tag prefixed to the question so the model can branch on mode.
    pub fn tag(&self) -> String {
        format!("[MODE: {}]", self.as_str().to_uppercase())
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "explain" => Ok(Mode::Explain),
            "quiz" => Ok(Mode::Quiz),
            "flashcards" => Ok(Mode::Flashcards),
            "osce" => Ok(Mode::Osce),
            _ => Err(()),
        }
    }
}

/// Exam focus from request input, defaulting when blank.
pub fn exam_focus_or_default(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_EXAM_FOCUS)
        .to_string()
}

/// System instruction followed by one user turn: memory block, then the task.
pub fn build_tutor_messages(mode: Mode, question: &str, exam_focus: &str, memory: &str) -> Vec<ChatMessage> {
    let task = match mode {
        Mode::Flashcards => fill(FLASHCARD_TEMPLATE, &[("topic", question)]),
        Mode::Explain | Mode::Quiz | Mode::Osce => {
            let tagged = format!("{}\n{}", mode.tag(), question);
            fill(USER_TASK_TEMPLATE, &[("question", &tagged), ("exam_focus", exam_focus)])
        }
    };

    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(format!("{memory}\n\n{task}")),
    ]
}

/// Single-message compression prompt for the rolling summary.
pub fn build_summary_messages(current_summary: &str, user_message: &str, assistant_message: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::user(fill(
        SUMMARIZE_TEMPLATE,
        &[
            ("current_summary", current_summary),
            ("user_message", user_message),
            ("assistant_message", assistant_message),
        ],
    ))]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing_defaults_to_explain() {
        assert_eq!(Mode::from_request(Some("quiz")), Mode::Quiz);
        assert_eq!(Mode::from_request(Some("  OSCE ")), Mode::Osce);
        assert_eq!(Mode::from_request(Some("Flashcards")), Mode::Flashcards);
        assert_eq!(Mode::from_request(Some("summary")), Mode::Explain);
        assert_eq!(Mode::from_request(Some("")), Mode::Explain);
        assert_eq!(Mode::from_request(None), Mode::Explain);
    }

    #[test]
    fn test_flashcards_use_topic_template() {
        let messages = build_tutor_messages(Mode::Flashcards, "Renal physiology", "Final MBBS", "MEM");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, SYSTEM_PROMPT);

        let user = &messages[1].content;
        assert!(user.starts_with("MEM\n\n"));
        assert!(user.contains("Create 10 high-yield MBBS flashcards on: Renal physiology"));
        assert!(!user.contains("Student request:"));
        assert!(!user.contains("[MODE:"));
    }

    #[test]
    fn test_other_modes_embed_tag_and_focus() {
        for (mode, tag) in [
            (Mode::Explain, "[MODE: EXPLAIN]"),
            (Mode::Quiz, "[MODE: QUIZ]"),
            (Mode::Osce, "[MODE: OSCE]"),
        ] {
            let messages = build_tutor_messages(mode, "Chest pain", "Second Prof", "MEM");
            let user = &messages[1].content;
            assert!(user.contains(&format!("Student request: {tag}\nChest pain")));
            assert!(user.contains("Exam focus: Second Prof"));
            assert!(!user.contains("high-yield MBBS flashcards"));
        }
    }

    #[test]
    fn test_system_prompt_keeps_refusal_rule() {
        assert!(SYSTEM_PROMPT.contains("refuse and redirect to qualified supervisors"));
    }

    #[test]
    fn test_exam_focus_default() {
        assert_eq!(exam_focus_or_default(None), "Final MBBS");
        assert_eq!(exam_focus_or_default(Some("   ")), "Final MBBS");
        assert_eq!(exam_focus_or_default(Some(" USMLE Step 1 ")), "USMLE Step 1");
    }

    #[test]
    fn test_summary_prompt_carries_exchange() {
        let messages = build_summary_messages("- glycolysis", "What is ATP?", "Energy currency.");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "user");
        let body = &messages[0].content;
        assert!(body.contains("---\n- glycolysis\n---"));
        assert!(body.contains("Student: What is ATP?"));
        assert!(body.contains("Tutor: Energy currency."));
    }
}
