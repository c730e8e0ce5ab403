//! Hypothesis-status derivation from refutation counts
//!
//! This is a threshold heuristic, not a statistical test. Two refuting
//! citations do not prove a hypothesis wrong; they flag it for a human to
//! review. The result is never persisted and never touches a curated
//! [`Hypothesis`](crate::Hypothesis) record.

use std::fmt;

/// Computed viability hint for the hypothesis of a cited paper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HypothesisSignal {
    /// No refuting citations
    Active,

    /// Exactly one refuting citation
    PossiblyRuledOut,

    /// Two or more refuting citations
    LikelyRuledOut,
}

impl HypothesisSignal {
    /// Upper-case label
    pub fn as_str(&self) -> &'static str {
        match self {
            HypothesisSignal::Active => "ACTIVE",
            HypothesisSignal::PossiblyRuledOut => "POSSIBLY_RULED_OUT",
            HypothesisSignal::LikelyRuledOut => "LIKELY_RULED_OUT",
        }
    }
}

impl fmt::Display for HypothesisSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a REFUTING count to a signal
///
/// # Examples
///
/// ```
/// use astrolit_domain::{derive_hypothesis_signal, HypothesisSignal};
///
/// assert_eq!(derive_hypothesis_signal(0), HypothesisSignal::Active);
/// assert_eq!(derive_hypothesis_signal(1), HypothesisSignal::PossiblyRuledOut);
/// assert_eq!(derive_hypothesis_signal(7), HypothesisSignal::LikelyRuledOut);
/// ```
pub fn derive_hypothesis_signal(refuting_count: usize) -> HypothesisSignal {
    match refuting_count {
        0 => HypothesisSignal::Active,
        1 => HypothesisSignal::PossiblyRuledOut,
        _ => HypothesisSignal::LikelyRuledOut,
    }
}
