// src/services/mod.rs

pub mod summarization;
pub mod tutor;

pub use summarization::{SummarizationService, SummaryPolicy};
pub use tutor::{AskOutcome, AskRequest, HistoryView, TutorService};
