// src/state.rs
// Shared application state, built once at startup and handed to the router.

use std::sync::Arc;

use crate::api::http::SessionCookies;
use crate::config::TutorConfig;
use crate::llm::LlmProvider;
use crate::memory::SessionStore;
use crate::services::{SummarizationService, SummaryPolicy, TutorService};

#[derive(Clone)]
pub struct AppState {
    // -------- Services --------
    pub tutor: Arc<TutorService>,

    // -------- Session --------
    pub cookies: SessionCookies,
}

/// Wire services around an already-opened store and provider.
pub fn create_app_state(
    config: TutorConfig,
    store: Arc<dyn SessionStore>,
    provider: Arc<dyn LlmProvider>,
) -> AppState {
    let summarizer = Arc::new(SummarizationService::new(
        provider.clone(),
        store.clone(),
        SummaryPolicy::from_config(&config),
    ));

    let tutor = Arc::new(TutorService::new(
        store,
        provider,
        summarizer,
        config.recent_limit,
        config.history_limit,
    ));

    AppState {
        tutor,
        cookies: SessionCookies::new(config.secret_key),
    }
}
