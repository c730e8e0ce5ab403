//! Command implementations.

pub mod citations;
pub mod classify;
pub mod hypothesis;
pub mod papers;
pub mod reclassify;
pub mod stats;
pub mod summary;

pub use self::citations::execute_citations;
pub use self::classify::execute_classify;
pub use self::hypothesis::execute_hypothesis;
pub use self::papers::execute_papers;
pub use self::reclassify::execute_reclassify;
pub use self::stats::execute_stats;
pub use self::summary::execute_summary;

use crate::error::Result;
use astrolit_classifier::{CitationClassifier, ClassifierConfig};
use astrolit_llm::OpenAiProvider;
use tracing::{info, warn};

/// Build the orchestrator for the configured mode.
///
/// No provider is created without a credential; model mode then falls back
/// to patterns for every pair.
pub fn build_classifier(config: &ClassifierConfig) -> Result<CitationClassifier<OpenAiProvider>> {
    config.validate()?;

    let provider = if config.mode.uses_model() && config.has_credentials() {
        Some(OpenAiProvider::with_timeout(
            config.endpoint.clone(),
            config.model.clone(),
            config.api_key.clone(),
            config.request_timeout(),
        )?)
    } else {
        if config.mode.uses_model() {
            warn!("No completion-service credential configured");
        }
        None
    };

    info!(mode = %config.mode, model = %config.model, "Classifier ready");
    Ok(CitationClassifier::new(config.clone(), provider))
}
