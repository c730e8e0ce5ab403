//! Request and result types for classification

use astrolit_domain::{AnalyzedBy, Category, Citation, Confidence, DomainError, Paper};
use std::fmt;

/// Inputs for classifying one citing/cited pair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationRequest {
    /// Abstract of the citing paper
    pub citing_abstract: Option<String>,

    /// Abstract of the cited paper
    pub cited_abstract: Option<String>,

    /// Title of the cited paper
    pub cited_title: Option<String>,
}

impl ClassificationRequest {
    /// Build a request from stored papers; the cited paper may be unknown
    pub fn from_papers(citing: &Paper, cited: Option<&Paper>) -> Self {
        Self {
            citing_abstract: citing.abstract_str().map(str::to_string),
            cited_abstract: cited.and_then(|p| p.abstract_str()).map(str::to_string),
            cited_title: cited.and_then(|p| p.title.clone()),
        }
    }

    /// Citing abstract, treating blank text as missing
    pub fn citing_text(&self) -> Option<&str> {
        self.citing_abstract
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

/// How a classification was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassificationMethod {
    /// The completion service answered
    Model,

    /// Pattern classifier was selected explicitly
    Pattern,

    /// Pattern classifier stood in for an unavailable model
    PatternFallback,

    /// No citing abstract, so no classifier ran
    Skipped,
}

impl ClassificationMethod {
    /// Stored classifier identity
    pub fn analyzed_by(&self) -> AnalyzedBy {
        match self {
            ClassificationMethod::Model => AnalyzedBy::Llm,
            ClassificationMethod::Pattern
            | ClassificationMethod::PatternFallback
            | ClassificationMethod::Skipped => AnalyzedBy::Regex,
        }
    }

    /// Short label
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationMethod::Model => "model",
            ClassificationMethod::Pattern => "pattern",
            ClassificationMethod::PatternFallback => "pattern-fallback",
            ClassificationMethod::Skipped => "skipped",
        }
    }
}

impl fmt::Display for ClassificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The normalized result of classifying one pair
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Assigned category
    pub category: Category,

    /// Confidence in [0, 1]
    pub confidence: Confidence,

    /// Justification; pattern fallbacks start with `(regex fallback)`
    pub reasoning: String,

    /// Which path produced it
    pub method: ClassificationMethod,
}

impl Classification {
    /// Turn this result into a storable citation
    pub fn into_citation(
        self,
        citing_bibcode: &str,
        cited_bibcode: &str,
        analyzed_by: AnalyzedBy,
    ) -> Result<Citation, DomainError> {
        Citation::new(
            citing_bibcode,
            cited_bibcode,
            self.category,
            self.confidence.value(),
            self.reasoning,
            analyzed_by,
        )
    }
}

/// What the model path produced for one pair
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutcome {
    /// A usable classification (possibly coerced or keyword-extracted)
    Classified(Classification),

    /// The service could not be reached, refused the credential, or failed
    Unavailable(String),

    /// The service answered but nothing usable could be read from the answer
    Invalid {
        /// Response text as received
        raw: String,
        /// Why it was rejected
        reason: String,
    },
}
