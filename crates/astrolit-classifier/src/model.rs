//! Model classifier: one completion call per pair

use crate::parser::parse_model_response;
use crate::prompt::PromptBuilder;
use crate::types::{Classification, ClassificationMethod, ClassificationRequest, ModelOutcome};
use astrolit_domain::{CompletionProvider, Confidence};
use std::fmt::Display;
use tracing::debug;

/// Classifies pairs by asking a completion service
pub struct ModelClassifier<P> {
    provider: P,
    temperature: f32,
    max_tokens: u32,
}

impl<P> ModelClassifier<P>
where
    P: CompletionProvider,
    P::Error: Display,
{
    /// Create a model classifier
    pub fn new(provider: P, temperature: f32, max_tokens: u32) -> Self {
        Self {
            provider,
            temperature,
            max_tokens,
        }
    }

    /// Model identifier of the underlying provider
    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Borrow the provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Classify one pair
    ///
    /// Any provider error is reported as `Unavailable` so the caller can
    /// fall back; it is never turned into a NEUTRAL answer here.
    pub fn classify(&self, citing_abstract: &str, request: &ClassificationRequest) -> ModelOutcome {
        let completion = PromptBuilder::new(citing_abstract)
            .with_cited_abstract(request.cited_abstract.as_deref())
            .with_cited_title(request.cited_title.as_deref())
            .build(self.temperature, self.max_tokens);

        debug!(
            model = %self.provider.model_name(),
            prompt_len = completion.user.len(),
            "Requesting model classification"
        );

        let raw = match self.provider.complete(&completion) {
            Ok(raw) => raw,
            Err(e) => return ModelOutcome::Unavailable(e.to_string()),
        };

        match parse_model_response(&raw) {
            Ok(parsed) => ModelOutcome::Classified(Classification {
                category: parsed.category,
                confidence: Confidence::clamped(parsed.confidence),
                reasoning: parsed.reasoning,
                method: ClassificationMethod::Model,
            }),
            Err(reason) => ModelOutcome::Invalid { raw, reason },
        }
    }
}
