//! Astrolit Classifier
//!
//! Assigns each citing/cited paper pair one of six relationship categories.
//!
//! # Overview
//!
//! Two classifiers sit behind one orchestrator. The pattern classifier scores
//! the citing abstract against fixed regular-expression lists and never fails.
//! The model classifier asks a completion service and parses its JSON answer.
//! The orchestrator picks one per pair according to [`ClassifierMode`]:
//!
//! - `Model`: try the model, fall back to patterns when it is unavailable
//! - `Pattern`: patterns only, no network traffic
//! - `ModelOnly`: model or error
//!
//! # Architecture
//!
//! ```text
//! Paper pair → CitationClassifier ─┬→ ModelClassifier → parser → Classification
//!                                  └→ PatternClassifier ───────→ Classification
//! ```
//!
//! # Example Usage
//!
//! ```
//! use astrolit_classifier::{CitationClassifier, ClassifierConfig, ClassificationRequest};
//! use astrolit_domain::Category;
//! use astrolit_llm::MockProvider;
//!
//! let classifier = CitationClassifier::<MockProvider>::new(ClassifierConfig::offline(), None);
//!
//! let request = ClassificationRequest {
//!     citing_abstract: Some("We rule out the planet at 5 sigma.".to_string()),
//!     ..Default::default()
//! };
//!
//! let result = classifier.classify(&request).unwrap();
//! assert_eq!(result.category, Category::Refuting);
//! ```

#![warn(missing_docs)]

mod batch;
mod config;
mod error;
mod model;
mod orchestrator;
mod parser;
mod pattern;
mod prompt;
mod types;

#[cfg(test)]
mod tests;

pub use batch::{summarize_batch, BatchEntry, CategoryChange, ReclassifyReport, Reclassifier};
pub use config::{
    ClassifierConfig, ClassifierMode, ENV_API_KEY, ENV_BASE_URL, ENV_CLASSIFIER, ENV_MODEL,
};
pub use error::ClassifierError;
pub use model::ModelClassifier;
pub use orchestrator::{CitationClassifier, FALLBACK_MARKER, NO_ABSTRACT_REASONING, PATTERN_MARKER};
pub use parser::{
    parse_model_response, ParsedResponse, COERCED_CONFIDENCE, DEFAULT_MODEL_CONFIDENCE,
    MAX_MODEL_CONFIDENCE,
};
pub use pattern::{topic_overlap, PatternClassifier, PatternVerdict, MAX_PATTERN_CONFIDENCE};
pub use prompt::PromptBuilder;
pub use types::{Classification, ClassificationMethod, ClassificationRequest, ModelOutcome};
