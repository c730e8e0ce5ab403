//! Validation errors raised by domain constructors

use std::fmt;

/// Errors produced when a domain value fails validation
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// A bibcode was empty or whitespace
    EmptyBibcode,

    /// A citation pointed from a paper to itself
    SelfCitation(String),

    /// A confidence value outside the closed unit interval
    ConfidenceOutOfRange(f64),

    /// A label that is not one of the six citation categories
    UnknownCategory(String),

    /// A label that is not one of the curated hypothesis statuses
    UnknownHypothesisStatus(String),

    /// A hypothesis without a name
    EmptyHypothesisName,
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::EmptyBibcode => write!(f, "bibcode must not be empty"),
            DomainError::SelfCitation(bibcode) => {
                write!(f, "paper {} cannot cite itself", bibcode)
            }
            DomainError::ConfidenceOutOfRange(value) => {
                write!(f, "confidence {} is outside [0.0, 1.0]", value)
            }
            DomainError::UnknownCategory(label) => {
                write!(f, "unknown citation category '{}'", label)
            }
            DomainError::UnknownHypothesisStatus(label) => {
                write!(f, "unknown hypothesis status '{}'", label)
            }
            DomainError::EmptyHypothesisName => write!(f, "hypothesis name must not be empty"),
        }
    }
}

impl std::error::Error for DomainError {}
