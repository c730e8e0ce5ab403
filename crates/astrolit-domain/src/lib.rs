//! Astrolit Domain Layer
//!
//! Core value types and pure decision logic for citation-relationship analysis.
//! Every other crate in the workspace depends on this one. It carries no
//! external dependencies and defines the trait seams that infrastructure crates
//! implement.
//!
//! ## Key Concepts
//!
//! - **Paper**: a publication identified by its bibcode
//! - **Citation**: a directed, classified edge from a citing paper to a cited paper
//! - **Category**: the closed six-member set of citation relationships
//! - **Aggregation**: per-paper or corpus-wide statistics over classified citations
//! - **Hypothesis signal**: a derived, non-persisted hint computed from refutations
//! - **Hypothesis**: a curated record whose status only changes by explicit action
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Constructors validate closed enums and numeric ranges
//! - `CitationStore` and `CompletionProvider` are implemented elsewhere

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregation;
pub mod category;
pub mod citation;
pub mod confidence;
pub mod error;
pub mod hypothesis;
pub mod paper;
pub mod signal;
pub mod traits;

// Re-exports for convenience
pub use aggregation::{describe_consensus, summarize, CitationSummary, ClassifiedCitation};
pub use category::{Category, CategoryMap};
pub use citation::{AnalyzedBy, Citation};
pub use confidence::Confidence;
pub use error::DomainError;
pub use hypothesis::{Hypothesis, HypothesisId, HypothesisStatus, HypothesisUpdate, NewHypothesis};
pub use paper::Paper;
pub use signal::{derive_hypothesis_signal, HypothesisSignal};
pub use traits::{
    CitationQuery, CitationStore, CompletionProvider, CompletionRequest, HypothesisQuery,
    PaperQuery, StoreCounts,
};

/// Current timestamp in seconds since the Unix epoch
///
/// Clocks set before 1970 report 0 rather than failing.
pub fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
