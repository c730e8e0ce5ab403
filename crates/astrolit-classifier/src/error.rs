//! Error types for the classifier

use astrolit_domain::DomainError;
use thiserror::Error;

/// Errors that can occur during classification
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// The completion service could not be used and no fallback was allowed
    #[error("Classifier unavailable: {0}")]
    Unavailable(String),

    /// Citation store error
    #[error("Store error: {0}")]
    Store(String),

    /// A domain value failed validation
    #[error("Invalid record: {0}")]
    Domain(#[from] DomainError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
