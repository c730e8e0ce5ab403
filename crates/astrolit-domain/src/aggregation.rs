//! Aggregation of classified citations into consensus statistics
//!
//! The aggregator is pure: it reads a batch of classifications for one cited
//! paper (or the whole corpus) and never re-classifies or mutates anything.
//!
//! REFUTING weighs double against consensus, matching the double weight the
//! pattern classifier gives refuting matches.

use crate::{derive_hypothesis_signal, Category, CategoryMap, Citation, HypothesisSignal};
use std::collections::BTreeMap;

/// Confidence above which a classification counts as high confidence
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Weight of one REFUTING citation on the "against" side
pub const REFUTING_WEIGHT: usize = 2;

/// One classification result as seen by the aggregator
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedCitation {
    /// Paper making the reference
    pub citing_bibcode: String,

    /// Paper being referenced
    pub cited_bibcode: String,

    /// Assigned category
    pub category: Category,

    /// Assigned confidence
    pub confidence: f64,

    /// Publication year of the citing paper
    pub year: Option<i32>,
}

impl From<&Citation> for ClassifiedCitation {
    fn from(citation: &Citation) -> Self {
        Self {
            citing_bibcode: citation.citing_bibcode.clone(),
            cited_bibcode: citation.cited_bibcode.clone(),
            category: citation.category,
            confidence: citation.confidence.value(),
            year: None,
        }
    }
}

/// Statistics over a batch of classifications
#[derive(Debug, Clone, PartialEq)]
pub struct CitationSummary {
    /// Number of classifications in the batch
    pub total_citations: usize,

    /// Count per category
    pub counts: CategoryMap<usize>,

    /// Share per category in percent, one decimal
    pub percentages: CategoryMap<f64>,

    /// Classifications with confidence strictly above 0.7
    pub high_confidence_count: usize,

    /// Support versus opposition in [-1, 1], two decimals
    pub consensus_indicator: f64,

    /// Number of REFUTING classifications
    pub refuting_count: usize,

    /// Viability hint derived from `refuting_count`
    pub hypothesis_status: HypothesisSignal,

    /// Citations per citing-paper year, for the entries that carry a year
    pub by_year: BTreeMap<i32, usize>,

    /// Citing bibcodes of the REFUTING entries, in input order
    pub refuting_bibcodes: Vec<String>,
}

impl CitationSummary {
    /// Human label for the consensus indicator
    pub fn consensus_label(&self) -> &'static str {
        describe_consensus(self.consensus_indicator)
    }
}

/// Summarize a batch of classifications
///
/// An empty batch yields zero counts, zero percentages, zero consensus and
/// an ACTIVE signal.
///
/// # Examples
///
/// ```
/// use astrolit_domain::{summarize, Category, ClassifiedCitation, HypothesisSignal};
///
/// let batch: Vec<_> = [Category::Supporting, Category::Refuting]
///     .into_iter()
///     .enumerate()
///     .map(|(i, category)| ClassifiedCitation {
///         citing_bibcode: format!("citing-{}", i),
///         cited_bibcode: "cited".to_string(),
///         category,
///         confidence: 0.9,
///         year: None,
///     })
///     .collect();
///
/// let summary = summarize(&batch);
/// assert_eq!(summary.consensus_indicator, -0.33);
/// assert_eq!(summary.hypothesis_status, HypothesisSignal::PossiblyRuledOut);
/// ```
pub fn summarize(results: &[ClassifiedCitation]) -> CitationSummary {
    let total = results.len();
    let mut counts: CategoryMap<usize> = CategoryMap::default();
    let mut high_confidence_count = 0;
    let mut by_year = BTreeMap::new();
    let mut refuting_bibcodes = Vec::new();

    for result in results {
        counts[result.category] += 1;
        if result.confidence > HIGH_CONFIDENCE_THRESHOLD {
            high_confidence_count += 1;
        }
        if let Some(year) = result.year {
            *by_year.entry(year).or_insert(0) += 1;
        }
        if result.category == Category::Refuting {
            refuting_bibcodes.push(result.citing_bibcode.clone());
        }
    }

    let mut percentages: CategoryMap<f64> = CategoryMap::default();
    if total > 0 {
        for category in Category::ALL {
            percentages[category] = round_to(counts[category] as f64 / total as f64 * 100.0, 1);
        }
    }

    let refuting_count = counts[Category::Refuting];

    CitationSummary {
        total_citations: total,
        consensus_indicator: consensus_indicator(&counts),
        counts,
        percentages,
        high_confidence_count,
        refuting_count,
        hypothesis_status: derive_hypothesis_signal(refuting_count),
        by_year,
        refuting_bibcodes,
    }
}

/// Consensus over category counts
///
/// `against = contrasting + 2 * refuting`; returns 0 when there is neither
/// support nor opposition.
pub fn consensus_indicator(counts: &CategoryMap<usize>) -> f64 {
    let support = counts[Category::Supporting];
    let against = counts[Category::Contrasting] + REFUTING_WEIGHT * counts[Category::Refuting];
    let informative = support + against;
    if informative == 0 {
        return 0.0;
    }
    let raw = (support as f64 - against as f64) / informative as f64;
    round_to(raw, 2).clamp(-1.0, 1.0)
}

/// Human label for a consensus value
pub fn describe_consensus(consensus: f64) -> &'static str {
    if consensus > 0.5 {
        "Strong support in the literature"
    } else if consensus > 0.2 {
        "Generally supported"
    } else if consensus < -0.5 {
        "Significant disagreement/refutation in the literature"
    } else if consensus < -0.2 {
        "Some disagreement present"
    } else {
        "Mixed or neutral reception"
    }
}

/// Round half to even, so exact halves such as 0.125 go to 0.12
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn category_strategy() -> impl Strategy<Value = Category> {
        (0..Category::COUNT).prop_map(|i| Category::ALL[i])
    }

    proptest! {
        /// Property: consensus always lies in [-1, 1]
        #[test]
        fn test_consensus_bounded(categories in prop::collection::vec(category_strategy(), 0..50)) {
            let results: Vec<_> = categories
                .into_iter()
                .enumerate()
                .map(|(i, category)| ClassifiedCitation {
                    citing_bibcode: i.to_string(),
                    cited_bibcode: "cited".to_string(),
                    category,
                    confidence: 0.5,
                    year: None,
                })
                .collect();
            let summary = summarize(&results);
            prop_assert!((-1.0..=1.0).contains(&summary.consensus_indicator));
            prop_assert_eq!(
                summary.counts.iter().map(|(_, c)| *c).sum::<usize>(),
                summary.total_citations
            );
        }
    }
}
