//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{
    Category, Citation, Hypothesis, HypothesisId, HypothesisStatus, HypothesisUpdate,
    NewHypothesis, Paper,
};

/// Trait for storing and retrieving papers, citations, and hypotheses
///
/// Implemented by the infrastructure layer (astrolit-store)
pub trait CitationStore {
    /// Error type for store operations
    type Error;

    /// Insert or refresh a paper by bibcode
    fn upsert_paper(&mut self, paper: &Paper) -> Result<(), Self::Error>;

    /// Get a paper by bibcode
    fn get_paper(&self, bibcode: &str) -> Result<Option<Paper>, Self::Error>;

    /// Query papers matching criteria
    fn query_papers(&self, query: &PaperQuery) -> Result<Vec<Paper>, Self::Error>;

    /// Insert a citation, replacing any earlier one for the same pair
    fn upsert_citation(&mut self, citation: &Citation) -> Result<(), Self::Error>;

    /// Get the citation for an ordered pair
    fn get_citation(&self, citing: &str, cited: &str) -> Result<Option<Citation>, Self::Error>;

    /// Query citations matching criteria
    fn query_citations(&self, query: &CitationQuery) -> Result<Vec<Citation>, Self::Error>;

    /// Record a new hypothesis
    fn add_hypothesis(&mut self, hypothesis: &NewHypothesis) -> Result<HypothesisId, Self::Error>;

    /// Get a hypothesis by id
    fn get_hypothesis(&self, id: HypothesisId) -> Result<Option<Hypothesis>, Self::Error>;

    /// Apply a partial update to a hypothesis
    fn update_hypothesis(
        &mut self,
        id: HypothesisId,
        update: &HypothesisUpdate,
    ) -> Result<Hypothesis, Self::Error>;

    /// Query hypotheses matching criteria
    fn query_hypotheses(&self, query: &HypothesisQuery) -> Result<Vec<Hypothesis>, Self::Error>;

    /// Row counts
    fn counts(&self) -> Result<StoreCounts, Self::Error>;
}

/// Query criteria for retrieving papers
#[derive(Debug, Clone, Default)]
pub struct PaperQuery {
    /// Filter by publication year
    pub year: Option<i32>,

    /// Maximum results to return
    pub limit: Option<usize>,
}

/// Query criteria for retrieving citations
#[derive(Debug, Clone, Default)]
pub struct CitationQuery {
    /// Either side of the edge equals this bibcode
    pub bibcode: Option<String>,

    /// Filter by citing paper
    pub citing: Option<String>,

    /// Filter by cited paper
    pub cited: Option<String>,

    /// Filter by category
    pub category: Option<Category>,

    /// Maximum results to return
    pub limit: Option<usize>,
}

impl CitationQuery {
    /// All citations pointing at `bibcode`
    pub fn cited_by(bibcode: impl Into<String>) -> Self {
        Self {
            cited: Some(bibcode.into()),
            ..Default::default()
        }
    }
}

/// Query criteria for retrieving hypotheses
#[derive(Debug, Clone, Default)]
pub struct HypothesisQuery {
    /// Filter by curated status
    pub status: Option<HypothesisStatus>,
}

/// Number of stored records per table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounts {
    /// Papers
    pub papers: usize,

    /// Citations
    pub citations: usize,

    /// Hypotheses
    pub hypotheses: usize,
}

/// A single chat-style completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System instruction
    pub system: String,

    /// User message
    pub user: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

/// Trait for text-completion services
///
/// Implemented by the infrastructure layer (astrolit-llm)
pub trait CompletionProvider {
    /// Error type for completion calls
    type Error;

    /// Run one completion and return the raw response text
    fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error>;

    /// Model identifier used for requests
    fn model_name(&self) -> &str;
}
