//! Hypothesis module - manually curated hypotheses and their lifecycle
//!
//! A hypothesis status changes only by explicit action. The aggregator's
//! [`HypothesisSignal`](crate::HypothesisSignal) is a separate, computed hint
//! and never writes here.

use crate::{current_timestamp, DomainError};
use std::fmt;

/// Store-assigned hypothesis identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HypothesisId(pub i64);

impl fmt::Display for HypothesisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Curated lifecycle status of a hypothesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HypothesisStatus {
    /// Still viable
    Active,

    /// Excluded by evidence
    RuledOut,

    /// Replaced by another hypothesis
    Superseded,

    /// Not yet assessed
    #[default]
    Uncertain,
}

impl HypothesisStatus {
    /// Upper-case label as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            HypothesisStatus::Active => "ACTIVE",
            HypothesisStatus::RuledOut => "RULED_OUT",
            HypothesisStatus::Superseded => "SUPERSEDED",
            HypothesisStatus::Uncertain => "UNCERTAIN",
        }
    }

    /// Parse a label in any case; `-` is accepted in place of `_`
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "ACTIVE" => Some(HypothesisStatus::Active),
            "RULED_OUT" => Some(HypothesisStatus::RuledOut),
            "SUPERSEDED" => Some(HypothesisStatus::Superseded),
            "UNCERTAIN" => Some(HypothesisStatus::Uncertain),
            _ => None,
        }
    }
}

impl fmt::Display for HypothesisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HypothesisStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HypothesisStatus::parse(s).ok_or_else(|| DomainError::UnknownHypothesisStatus(s.to_string()))
    }
}

/// A stored hypothesis
#[derive(Debug, Clone, PartialEq)]
pub struct Hypothesis {
    /// Identifier
    pub id: HypothesisId,

    /// Short name
    pub name: String,

    /// Longer description
    pub description: Option<String>,

    /// Curated status
    pub status: HypothesisStatus,

    /// Paper that proposed the hypothesis
    pub originating_bibcode: Option<String>,

    /// Paper that settled it
    pub ruling_bibcode: Option<String>,

    /// Why it was ruled out
    pub ruled_out_reason: Option<String>,

    /// Name of the hypothesis that replaced it
    pub superseded_by: Option<String>,

    /// Creation time (seconds since Unix epoch)
    pub created_at: u64,

    /// Last update time (seconds since Unix epoch)
    pub updated_at: u64,
}

impl Hypothesis {
    /// Apply a partial update, bumping `updated_at`
    pub fn apply(&mut self, update: &HypothesisUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(ref bibcode) = update.ruling_bibcode {
            self.ruling_bibcode = Some(bibcode.clone());
        }
        if let Some(ref reason) = update.ruled_out_reason {
            self.ruled_out_reason = Some(reason.clone());
        }
        if let Some(ref name) = update.superseded_by {
            self.superseded_by = Some(name.clone());
        }
        self.updated_at = current_timestamp();
    }
}

/// Fields needed to record a new hypothesis
#[derive(Debug, Clone, PartialEq)]
pub struct NewHypothesis {
    /// Short name
    pub name: String,

    /// Longer description
    pub description: Option<String>,

    /// Initial status
    pub status: HypothesisStatus,

    /// Paper that proposed the hypothesis
    pub originating_bibcode: Option<String>,
}

impl NewHypothesis {
    /// Start a new hypothesis with status UNCERTAIN
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::EmptyHypothesisName);
        }
        Ok(Self {
            name,
            description: None,
            status: HypothesisStatus::default(),
            originating_bibcode: None,
        })
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the initial status
    pub fn with_status(mut self, status: HypothesisStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the originating paper
    pub fn with_originating_bibcode(mut self, bibcode: impl Into<String>) -> Self {
        self.originating_bibcode = Some(bibcode.into());
        self
    }
}

/// A partial update; `None` fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HypothesisUpdate {
    /// New status
    pub status: Option<HypothesisStatus>,

    /// Paper that settled the hypothesis
    pub ruling_bibcode: Option<String>,

    /// Why it was ruled out
    pub ruled_out_reason: Option<String>,

    /// Replacement hypothesis
    pub superseded_by: Option<String>,
}

impl HypothesisUpdate {
    /// Mark a hypothesis ruled out by a paper
    pub fn ruled_out(ruling_bibcode: impl Into<String>, reason: Option<String>) -> Self {
        Self {
            status: Some(HypothesisStatus::RuledOut),
            ruling_bibcode: Some(ruling_bibcode.into()),
            ruled_out_reason: reason,
            superseded_by: None,
        }
    }

    /// True when nothing would change
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.ruling_bibcode.is_none()
            && self.ruled_out_reason.is_none()
            && self.superseded_by.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Hypothesis {
        Hypothesis {
            id: HypothesisId(1),
            name: "binary companion".to_string(),
            description: None,
            status: HypothesisStatus::Active,
            originating_bibcode: Some("2015ApJ...800...1A".to_string()),
            ruling_bibcode: None,
            ruled_out_reason: None,
            superseded_by: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(HypothesisStatus::parse("ruled_out"), Some(HypothesisStatus::RuledOut));
        assert_eq!(HypothesisStatus::parse("ruled-out"), Some(HypothesisStatus::RuledOut));
        assert_eq!(HypothesisStatus::parse("LIKELY_RULED_OUT"), None);
        assert_eq!(HypothesisStatus::default(), HypothesisStatus::Uncertain);
    }

    #[test]
    fn test_new_hypothesis_requires_name() {
        assert_eq!(NewHypothesis::new("  "), Err(DomainError::EmptyHypothesisName));
        let new = NewHypothesis::new("dark photon").unwrap();
        assert_eq!(new.status, HypothesisStatus::Uncertain);
    }

    #[test]
    fn test_apply_ruled_out() {
        let mut hypothesis = sample();
        let update = HypothesisUpdate::ruled_out("2021MNRAS.500.1C", Some("excluded at 5 sigma".into()));
        hypothesis.apply(&update);

        assert_eq!(hypothesis.status, HypothesisStatus::RuledOut);
        assert_eq!(hypothesis.ruling_bibcode.as_deref(), Some("2021MNRAS.500.1C"));
        assert_eq!(hypothesis.ruled_out_reason.as_deref(), Some("excluded at 5 sigma"));
        assert!(hypothesis.updated_at > 0);
    }

    #[test]
    fn test_empty_update_keeps_fields() {
        let mut hypothesis = sample();
        let update = HypothesisUpdate::default();
        assert!(update.is_empty());
        hypothesis.apply(&update);
        assert_eq!(hypothesis.status, HypothesisStatus::Active);
        assert_eq!(hypothesis.originating_bibcode.as_deref(), Some("2015ApJ...800...1A"));
    }
}
