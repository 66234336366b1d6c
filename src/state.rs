//! # state
//!
//! Shared application state injected into every Axum handler.
//!
//! Everything in here is read-only after startup: configuration-derived
//! collaborators and the pooled `reqwest::Client`. Per-request working data
//! (the parameter map, the rendered document) lives on the request's stack,
//! so concurrent requests never share mutable state.

use std::sync::Arc;

use crate::ai::{build_llm, LlmClient};
use crate::config::Config;
use crate::engine::ParameterExtractor;
use crate::service::StrategyService;

// ─── AppState ─────────────────────────────────────────────────────────────────

/// Top-level shared state.
///
/// Clone this via `Arc::clone`, which is O(1).
pub struct AppState {
    /// Extractor → Validator → Generator.
    pub service: Arc<StrategyService>,
}

impl AppState {
    /// Wire the pipeline from configuration.
    pub fn from_config(config: &Config, http: &reqwest::Client) -> Self {
        let llm = build_llm(http, config.ai.as_ref()).map(|c| Arc::new(c) as Arc<dyn LlmClient>);
        Self::with_extractor(ParameterExtractor::new(llm))
    }

    /// Wire the pipeline around a ready-made extractor (tests inject a canned LLM).
    pub fn with_extractor(extractor: ParameterExtractor) -> Self {
        Self { service: Arc::new(StrategyService::new(extractor)) }
    }
}

/// Convenience type alias so callers can write `SharedState` instead of the
/// full generic form.
pub type SharedState = Arc<AppState>;

/// Construct the shared application state and wrap it in an `Arc` ready for
/// injection into the Axum router.
pub fn build_state(config: &Config, http: &reqwest::Client) -> SharedState {
    Arc::new(AppState::from_config(config, http))
}
