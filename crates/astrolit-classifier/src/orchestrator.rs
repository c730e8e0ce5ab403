//! Classifier orchestrator: mode dispatch and the model → pattern fallback

use crate::config::{ClassifierConfig, ClassifierMode};
use crate::error::ClassifierError;
use crate::model::ModelClassifier;
use crate::parser::COERCED_CONFIDENCE;
use crate::pattern::{topic_overlap, PatternClassifier};
use crate::types::{Classification, ClassificationMethod, ClassificationRequest, ModelOutcome};
use astrolit_domain::{Category, CompletionProvider, Confidence, Paper};
use std::fmt::Display;
use tracing::{debug, warn};

/// Reasoning prefix on pattern results that stood in for the model
pub const FALLBACK_MARKER: &str = "(regex fallback)";

/// Reasoning prefix on pattern results chosen explicitly
pub const PATTERN_MARKER: &str = "(regex)";

/// Reasoning for pairs without a citing abstract
pub const NO_ABSTRACT_REASONING: &str = "No citing abstract available";

const TOPIC_OVERLAP_LIMIT: usize = 5;

/// Chooses a classifier per pair and normalizes its output
///
/// `provider` is `None` when no credential is configured. In model mode that
/// means every pair falls back to the pattern classifier.
pub struct CitationClassifier<P> {
    config: ClassifierConfig,
    pattern: PatternClassifier,
    model: Option<ModelClassifier<P>>,
}

impl<P> CitationClassifier<P>
where
    P: CompletionProvider,
    P::Error: Display,
{
    /// Create an orchestrator
    pub fn new(config: ClassifierConfig, provider: Option<P>) -> Self {
        let model = provider
            .map(|p| ModelClassifier::new(p, config.temperature, config.max_tokens));
        Self {
            config,
            pattern: PatternClassifier::new(),
            model,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classifier mode
    pub fn mode(&self) -> ClassifierMode {
        self.config.mode
    }

    /// Model identifier, when a provider is configured
    pub fn model_name(&self) -> Option<&str> {
        self.model.as_ref().map(|m| m.model_name())
    }

    /// True when classifying `request` would call the completion service
    pub fn calls_model_for(&self, request: &ClassificationRequest) -> bool {
        self.config.mode.uses_model() && self.model.is_some() && request.citing_text().is_some()
    }

    /// Classify one pair
    ///
    /// # Errors
    ///
    /// Only in `ModelOnly` mode, when the model cannot be used. Every other
    /// mode always yields a classification.
    pub fn classify(&self, request: &ClassificationRequest) -> Result<Classification, ClassifierError> {
        let Some(citing) = request.citing_text() else {
            debug!("No citing abstract, skipping classifier");
            return Ok(Classification {
                category: Category::Neutral,
                confidence: Confidence::ZERO,
                reasoning: NO_ABSTRACT_REASONING.to_string(),
                method: ClassificationMethod::Skipped,
            });
        };

        match self.config.mode {
            ClassifierMode::Pattern => Ok(self.classify_by_pattern(citing, request, PATTERN_MARKER)),
            ClassifierMode::Model => match self.try_model(citing, request) {
                Ok(classification) => Ok(classification),
                Err(reason) => {
                    warn!("Model classification unavailable, falling back to patterns: {}", reason);
                    Ok(self.classify_by_pattern(citing, request, FALLBACK_MARKER))
                }
            },
            ClassifierMode::ModelOnly => self
                .try_model(citing, request)
                .map_err(ClassifierError::Unavailable),
        }
    }

    /// Classify a citing paper against a cited paper
    pub fn classify_pair(
        &self,
        citing: &Paper,
        cited: Option<&Paper>,
    ) -> Result<Classification, ClassifierError> {
        self.classify(&ClassificationRequest::from_papers(citing, cited))
    }

    /// Run the model; `Err` carries the unavailability reason
    fn try_model(&self, citing: &str, request: &ClassificationRequest) -> Result<Classification, String> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| "no completion provider configured".to_string())?;

        match model.classify(citing, request) {
            ModelOutcome::Classified(classification) => Ok(classification),
            ModelOutcome::Unavailable(reason) => Err(reason),
            ModelOutcome::Invalid { raw, reason } => {
                warn!("Unusable model answer ({} chars): {}", raw.len(), reason);
                Ok(Classification {
                    category: Category::Neutral,
                    confidence: Confidence::clamped(COERCED_CONFIDENCE),
                    reasoning: format!("Failed to parse LLM response: {}", reason),
                    method: ClassificationMethod::Model,
                })
            }
        }
    }

    fn classify_by_pattern(
        &self,
        citing: &str,
        request: &ClassificationRequest,
        marker: &str,
    ) -> Classification {
        let verdict = self.pattern.classify(citing);

        let mut reasoning = vec![marker.to_string()];
        if verdict.matched_patterns() > 0 {
            reasoning.push(format!("Matched patterns: {}", verdict.matched_patterns()));
        }
        let overlap = request
            .cited_title
            .as_deref()
            .map(|title| topic_overlap(title, citing, TOPIC_OVERLAP_LIMIT))
            .unwrap_or_default();
        if !overlap.is_empty() {
            reasoning.push(format!("Topic overlap: {}", overlap.join(", ")));
        }

        let method = if marker == FALLBACK_MARKER {
            ClassificationMethod::PatternFallback
        } else {
            ClassificationMethod::Pattern
        };

        Classification {
            category: verdict.category,
            confidence: verdict.confidence,
            reasoning: reasoning.join("; "),
            method,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use astrolit_llm::MockProvider;

    fn request(citing: &str) -> ClassificationRequest {
        ClassificationRequest {
            citing_abstract: Some(citing.to_string()),
            cited_abstract: Some("We propose a binary companion.".to_string()),
            cited_title: Some("A Binary Companion".to_string()),
        }
    }

    fn config(mode: ClassifierMode) -> ClassifierConfig {
        ClassifierConfig {
            mode,
            request_delay_ms: 0,
            ..ClassifierConfig::default()
        }
    }

    #[test]
    fn test_missing_abstract_skips_classifiers() {
        let provider = MockProvider::new("{}");
        let classifier = CitationClassifier::new(config(ClassifierMode::Model), Some(provider.clone()));

        let result = classifier.classify(&ClassificationRequest::default()).unwrap();
        assert_eq!(result.category, Category::Neutral);
        assert_eq!(result.confidence, Confidence::ZERO);
        assert_eq!(result.reasoning, NO_ABSTRACT_REASONING);
        assert_eq!(result.method, ClassificationMethod::Skipped);
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_model_mode_uses_model() {
        let provider = MockProvider::new(
            r#"{"classification": "SUPPORTING", "confidence": 0.8, "reasoning": "agrees"}"#,
        );
        let classifier = CitationClassifier::new(config(ClassifierMode::Model), Some(provider));

        let result = classifier.classify(&request("Anything at all.")).unwrap();
        assert_eq!(result.category, Category::Supporting);
        assert_eq!(result.method, ClassificationMethod::Model);
        assert_eq!(result.reasoning, "agrees");
    }

    #[test]
    fn test_pattern_mode_never_calls_model() {
        let provider = MockProvider::new("{}");
        let classifier =
            CitationClassifier::new(config(ClassifierMode::Pattern), Some(provider.clone()));

        let result = classifier.classify(&request("We confirm the binary companion.")).unwrap();
        assert_eq!(result.category, Category::Supporting);
        assert_eq!(result.method, ClassificationMethod::Pattern);
        assert!(result.reasoning.starts_with(PATTERN_MARKER));
        assert!(!result.reasoning.contains(FALLBACK_MARKER));
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_pattern_reasoning_lists_matches_and_overlap() {
        let classifier = CitationClassifier::<MockProvider>::new(config(ClassifierMode::Model), None);

        let result = classifier
            .classify(&request("We confirm the binary companion and extend the orbit."))
            .unwrap();
        assert_eq!(
            result.reasoning,
            "(regex fallback); Matched patterns: 2; Topic overlap: binary, companion"
        );
    }

    #[test]
    fn test_invalid_answer_becomes_low_confidence_neutral() {
        let provider = MockProvider::new("I refuse to answer.");
        let classifier = CitationClassifier::new(config(ClassifierMode::ModelOnly), Some(provider));

        let result = classifier.classify(&request("We confirm it.")).unwrap();
        assert_eq!(result.category, Category::Neutral);
        assert_eq!(result.confidence.value(), COERCED_CONFIDENCE);
        assert_eq!(result.method, ClassificationMethod::Model);
    }

    #[test]
    fn test_calls_model_for() {
        let classifier = CitationClassifier::new(
            config(ClassifierMode::Model),
            Some(MockProvider::new("{}")),
        );
        assert!(classifier.calls_model_for(&request("text")));
        assert!(!classifier.calls_model_for(&ClassificationRequest::default()));

        let offline = CitationClassifier::<MockProvider>::new(config(ClassifierMode::Model), None);
        assert!(!offline.calls_model_for(&request("text")));
    }
}
