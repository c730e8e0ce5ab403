//! Citation module - classified edges between papers

use crate::{current_timestamp, Category, Confidence, DomainError};
use std::fmt;

/// Which classifier (or person) produced a stored classification
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnalyzedBy {
    /// The model-based classifier
    Llm,

    /// The pattern-based classifier, including model fallbacks
    Regex,

    /// Entered by hand
    Manual,

    /// Model result written by a reclassification pass
    LlmReclassify,

    /// Pattern result written by a reclassification pass
    RegexReclassify,

    /// Any other agent identifier
    Other(String),
}

impl AnalyzedBy {
    /// Tag as stored
    pub fn as_str(&self) -> &str {
        match self {
            AnalyzedBy::Llm => "llm",
            AnalyzedBy::Regex => "regex",
            AnalyzedBy::Manual => "manual",
            AnalyzedBy::LlmReclassify => "llm-reclassify",
            AnalyzedBy::RegexReclassify => "regex-reclassify",
            AnalyzedBy::Other(tag) => tag,
        }
    }

    /// Parse a stored tag; unknown tags are kept verbatim
    pub fn parse(s: &str) -> Self {
        match s {
            "llm" => AnalyzedBy::Llm,
            "regex" => AnalyzedBy::Regex,
            "manual" => AnalyzedBy::Manual,
            "llm-reclassify" => AnalyzedBy::LlmReclassify,
            "regex-reclassify" => AnalyzedBy::RegexReclassify,
            other => AnalyzedBy::Other(other.to_string()),
        }
    }

    /// The matching reclassification tag
    pub fn reclassified(&self) -> Self {
        match self {
            AnalyzedBy::Llm | AnalyzedBy::LlmReclassify => AnalyzedBy::LlmReclassify,
            AnalyzedBy::Regex | AnalyzedBy::RegexReclassify => AnalyzedBy::RegexReclassify,
            AnalyzedBy::Manual => AnalyzedBy::Manual,
            AnalyzedBy::Other(tag) => AnalyzedBy::Other(format!("{}-reclassify", tag)),
        }
    }
}

impl fmt::Display for AnalyzedBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified citation from `citing_bibcode` to `cited_bibcode`
///
/// The ordered pair is the identity: storing a citation for a pair that
/// already exists replaces the earlier classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Citation {
    /// Paper making the reference
    pub citing_bibcode: String,

    /// Paper being referenced
    pub cited_bibcode: String,

    /// Relationship category
    pub category: Category,

    /// Classifier confidence
    pub confidence: Confidence,

    /// Free-text justification
    pub reasoning: String,

    /// Classifier identity
    pub analyzed_by: AnalyzedBy,

    /// When the classification was made (seconds since Unix epoch)
    pub analyzed_at: u64,
}

impl Citation {
    /// Create a citation stamped with the current time
    ///
    /// # Errors
    ///
    /// Fails when either bibcode is empty, when the pair is a self-citation,
    /// or when `confidence` lies outside [0, 1].
    pub fn new(
        citing_bibcode: impl Into<String>,
        cited_bibcode: impl Into<String>,
        category: Category,
        confidence: f64,
        reasoning: impl Into<String>,
        analyzed_by: AnalyzedBy,
    ) -> Result<Self, DomainError> {
        let citing_bibcode = citing_bibcode.into().trim().to_string();
        let cited_bibcode = cited_bibcode.into().trim().to_string();

        if citing_bibcode.is_empty() || cited_bibcode.is_empty() {
            return Err(DomainError::EmptyBibcode);
        }
        if citing_bibcode == cited_bibcode {
            return Err(DomainError::SelfCitation(citing_bibcode));
        }

        Ok(Self {
            citing_bibcode,
            cited_bibcode,
            category,
            confidence: Confidence::new(confidence)?,
            reasoning: reasoning.into(),
            analyzed_by,
            analyzed_at: current_timestamp(),
        })
    }

    /// Override the analysis timestamp
    pub fn with_analyzed_at(mut self, analyzed_at: u64) -> Self {
        self.analyzed_at = analyzed_at;
        self
    }

    /// The `(citing, cited)` key
    pub fn key(&self) -> (&str, &str) {
        (&self.citing_bibcode, &self.cited_bibcode)
    }
}
