// src/prompt/templates.rs
// Fixed prompt text. Placeholders are `{name}` and filled by the builder.

/// Persona, tone, and the patient-advice refusal rule.
pub const SYSTEM_PROMPT: &str = r#"You are an mbbs Tutor Assistant for undergraduate medical students.
You teach and explain (not clinical care).
Be exam-oriented and concise with bullet points where possible.
Structure (when relevant): definition, etiology, pathophysiology, clinical features,
investigations, differentials with discriminators, management principles (framework level),
mnemonics, OSCE checklist. For calculations, show steps. Tone: supportive and clear.
If asked for real patient-specific treatment advice, refuse and redirect to qualified supervisors."#;

/// Shared template for explain / quiz / osce; the mode travels as a tag in `{question}`.
pub const USER_TASK_TEMPLATE: &str = r#"Student request: {question}
Student level: MBBS (undergraduate)
Exam focus: {exam_focus}

If the student asked for a quiz, generate 5 MCQs (A–E) with correct answer and 2-line rationale.
If flashcards: produce 10 Q/A pairs.
If OSCE: history checklist, physical exam checklist, investigations to ask for, counseling points & red flags.
"#;

pub const FLASHCARD_TEMPLATE: &str = r#"Create 10 high-yield MBBS flashcards on: {topic}
Format:
Q: ...
A: ...
Keep answers short and exam-ready."#;

pub const SUMMARIZE_TEMPLATE: &str = r#"You are compressing a chat between a student and an MBBS tutor.
Current long-term summary (may be empty):
---
{current_summary}
---
New exchange:
Student: {user_message}
Tutor: {assistant_message}

Update the long-term summary in <= 10 bullet points, focusing on:
- topics covered and conclusions
- unresolved questions
- agreed mnemonics/frameworks
- any exam focus/preferences

Return ONLY the updated summary (no preface)."#;

pub const MEMORY_PREAMBLE: &str = r#"Long-term context summary (do not repeat unless asked):
{summary}

Recent conversation (oldest to newest):
{recent_dialogue}

Now continue with the new student request."#;

/// Substitute `{key}` placeholders in one pass, so values that themselves
/// contain braces are left untouched. Unknown placeholders stay literal.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let replaced = after.find('}').and_then(|end| {
            let key = &after[..end];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (*value, end))
        });

        match replaced {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
