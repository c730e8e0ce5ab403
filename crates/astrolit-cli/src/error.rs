//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] astrolit_store::StoreError),

    /// Classifier error
    #[error("{0}")]
    Classifier(#[from] astrolit_classifier::ClassifierError),

    /// Completion provider setup error
    #[error("Provider error: {0}")]
    Provider(#[from] astrolit_llm::LlmError),

    /// Domain validation error
    #[error("Invalid record: {0}")]
    Domain(#[from] astrolit_domain::DomainError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}
