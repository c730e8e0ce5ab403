//! Pattern classifier: category-weighted regex scoring over a citing abstract
//!
//! Each category owns an ordered set of patterns. A category's score is the
//! number of distinct patterns that match the lower-cased text, times the
//! category weight. REFUTING weighs 2 so that exclusion language beats mere
//! disagreement. NEUTRAL has no patterns; it is the answer when nothing
//! matches.

use astrolit_domain::{Category, CategoryMap, Confidence};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Tie-break order: when two categories share the top score, the one listed
/// first wins
pub const CATEGORY_PRIORITY: [Category; 5] = [
    Category::Supporting,
    Category::Contrasting,
    Category::Refuting,
    Category::Methodological,
    Category::Contextual,
];

/// Upper bound on pattern confidence
pub const MAX_PATTERN_CONFIDENCE: f64 = 0.95;

/// Runner-up share of the winning score that counts as a competing signal
const AMBIGUITY_RATIO: f64 = 0.7;

/// Multiplier applied when signals compete
const AMBIGUITY_PENALTY: f64 = 0.6;

/// Multiplier applied when two or more refuting patterns agree
const REFUTING_BOOST: f64 = 1.2;

const SUPPORTING_PATTERNS: &[&str] = &[
    r"\b(confirm|confirmed|confirms)\b",
    r"\b(agree|agreed|agrees|agreement)\b",
    r"\b(consistent|consistency)\s+with\b",
    r"\b(support|supported|supports|supporting)\b",
    r"\b(validate|validated|validates|validation)\b",
    r"\b(verify|verified|verifies|verification)\b",
    r"\bin\s+line\s+with\b",
    r"\b(corroborate|corroborated|corroborates)\b",
    r"\b(extend|extended|extends|extending)\b",
    r"\b(build|built|builds)\s+(on|upon)\b",
    r"\b(reinforce|reinforced|reinforces)\b",
    r"\b(demonstrate|demonstrated|demonstrates)\b.*\bsame\b",
    r"\bas\s+(shown|found|demonstrated|reported)\s+by\b",
    r"\b(similar\s+to|similar\s+results)\b",
];

const CONTRASTING_PATTERNS: &[&str] = &[
    r"\b(disagree|disagreed|disagrees|disagreement)\b",
    r"\b(contradict|contradicted|contradicts|contradiction)\b",
    r"\b(inconsistent|inconsistency)\b",
    r"\b(challenge|challenged|challenges|challenging)\b",
    r"\b(question|questioned|questions)\b",
    r"\b(contrary|contrast)\s+to\b",
    r"\b(unlike|different\s+from)\b",
    r"\b(however|although|but|yet)\b.*\b(found|showed|reported)\b",
    r"\b(alternative|alternatively)\b",
    r"\b(revise|revised|revises|revision)\b",
    r"\b(tension|discrepancy)\b",
    r"\b(not\s+support|does\s+not\s+support|do\s+not\s+support)\b",
    r"\b(failed\s+to|fails\s+to)\s+(confirm|reproduce|replicate)\b",
    r"\b(overestimate|underestimate)[sd]?\b",
    r"\bat\s+odds\s+with\b",
];

const REFUTING_PATTERNS: &[&str] = &[
    r"\b(rule[ds]?\s+out|ruling\s+out)\b",
    r"\b(exclude[ds]?|excluding)\b",
    r"\b(disprove[dns]?|disproven)\b",
    r"\b(refute[ds]?|refuting)\b",
    r"\b(reject|rejects|rejected|rejecting)\b",
    r"\bno\s+longer\s+(viable|tenable|valid)\b",
    r"\b(definitively|conclusively)\s+(shown|demonstrated|proved|proven)\b",
    r"\b(incompatible|irreconcilable)\s+with\b",
    r"\b(inconsistent|excluded)\s+at\s+\d+(\.\d+)?\s*(σ|sigma)",
    // ">Nσ" needs an exclusion verb earlier in the clause or an exclusion noun after it
    r"\b(rule[ds]?\s+out|ruling\s+out|exclud\w*|reject\w*|disfavou?r\w*)\b[^.;]*?(>|greater\s+than|more\s+than)\s*\d+(\.\d+)?\s*(σ|sigma)|(>|greater\s+than|more\s+than)\s*\d+(\.\d+)?\s*(σ|sigma)\s+(exclusion|tension)",
    r"\b(firmly|strongly)\s+(excluded|ruled\s+out|rejected)\b",
    r"\b(abandoned|discarded|superseded)\b",
    r"\b(obsolete|outdated)\s+(model|theory|hypothesis)\b",
    r"\b(fatal|insurmountable)\s+(flaw|problem)s?\b",
    r"\b(cannot|could\s+not)\s+(explain|account\s+for)\b.*\bobserv",
];

const METHODOLOGICAL_PATTERNS: &[&str] = &[
    r"\b(method|methods|methodology)\b.*\b(described|developed|introduced)\s+by\b",
    r"\b(technique|techniques)\b.*\bfrom\b",
    r"\b(code|software|pipeline|algorithm)\b.*\b(from|by)\b",
    r"\b(data|catalog|catalogue|survey)\b.*\b(from|by)\b",
    r"\b(following|follow)\s+the\s+(method|approach|procedure)\b",
    r"\b(using|used|use)\s+the\s+(method|code|software)\b",
    r"\b(adopted|adopt|adopting)\s+(from|the\s+method)\b",
    r"\bas\s+(implemented|described)\s+in\b",
];

const CONTEXTUAL_PATTERNS: &[&str] = &[
    r"\b(see|for\s+example|for\s+instance)\b|\be\.g\.",
    r"\b(review|reviews|reviewed)\s+(in|by)\b",
    r"\b(discovered|first\s+reported)\s+by\b",
    r"\b(originally|initially)\s+(proposed|suggested)\b",
    r"\bwell[\s-](known|established)\b",
    r"\b(theoretical\s+framework|model)\s+(of|from|by)\b",
    r"\b(history|historical|historically)\b",
    r"\b(seminal|pioneering|landmark)\b",
];

struct CategoryPatterns {
    category: Category,
    weight: usize,
    patterns: Vec<Regex>,
}

fn compile(category: Category, weight: usize, sources: &[&str]) -> CategoryPatterns {
    CategoryPatterns {
        category,
        weight,
        patterns: sources
            .iter()
            .filter_map(|source| Regex::new(&format!("(?i){}", source)).ok())
            .collect(),
    }
}

/// Category → compiled pattern set, in `CATEGORY_PRIORITY` order
static PATTERN_TABLE: LazyLock<Vec<CategoryPatterns>> = LazyLock::new(|| {
    vec![
        compile(Category::Supporting, 1, SUPPORTING_PATTERNS),
        compile(Category::Contrasting, 1, CONTRASTING_PATTERNS),
        compile(Category::Refuting, 2, REFUTING_PATTERNS),
        compile(Category::Methodological, 1, METHODOLOGICAL_PATTERNS),
        compile(Category::Contextual, 1, CONTEXTUAL_PATTERNS),
    ]
});

/// Result of pattern classification
#[derive(Debug, Clone, PartialEq)]
pub struct PatternVerdict {
    /// Winning category, NEUTRAL when nothing matched
    pub category: Category,

    /// Confidence in [0, 0.95]
    pub confidence: Confidence,

    /// Matched text of each winning pattern, in pattern order
    pub evidence: Vec<String>,

    /// Weighted score per category (NEUTRAL is always 0)
    pub scores: CategoryMap<usize>,
}

impl PatternVerdict {
    fn neutral() -> Self {
        Self {
            category: Category::Neutral,
            confidence: Confidence::ZERO,
            evidence: Vec::new(),
            scores: CategoryMap::default(),
        }
    }

    /// Number of distinct patterns behind the winning category
    pub fn matched_patterns(&self) -> usize {
        self.evidence.len()
    }
}

/// Deterministic, side-effect-free regex classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternClassifier;

impl PatternClassifier {
    /// Create a classifier
    pub fn new() -> Self {
        Self
    }

    /// Classify citing-abstract text
    ///
    /// # Examples
    ///
    /// ```
    /// use astrolit_classifier::PatternClassifier;
    /// use astrolit_domain::Category;
    ///
    /// let verdict = PatternClassifier::new()
    ///     .classify("Our data confirm the earlier detection.");
    /// assert_eq!(verdict.category, Category::Supporting);
    /// ```
    pub fn classify(&self, text: &str) -> PatternVerdict {
        if text.trim().is_empty() {
            return PatternVerdict::neutral();
        }

        let text = text.to_lowercase();
        let mut scores: CategoryMap<usize> = CategoryMap::default();
        let mut evidence: CategoryMap<Vec<String>> = CategoryMap::default();

        for set in PATTERN_TABLE.iter() {
            for pattern in &set.patterns {
                if let Some(m) = pattern.find(&text) {
                    scores[set.category] += set.weight;
                    evidence[set.category].push(m.as_str().trim().to_string());
                }
            }
        }

        let mut winner = CATEGORY_PRIORITY[0];
        for category in CATEGORY_PRIORITY {
            if scores[category] > scores[winner] {
                winner = category;
            }
        }

        let best = scores[winner];
        if best == 0 {
            return PatternVerdict::neutral();
        }

        let total: usize = CATEGORY_PRIORITY.iter().map(|c| scores[*c]).sum();
        let mut confidence = best as f64 / total as f64;

        let mut ranked: Vec<usize> = CATEGORY_PRIORITY.iter().map(|c| scores[*c]).collect();
        ranked.sort_unstable_by(|a, b| b.cmp(a));
        let runner_up = ranked[1];
        if runner_up > 0 && runner_up as f64 >= best as f64 * AMBIGUITY_RATIO {
            confidence *= AMBIGUITY_PENALTY;
        }

        let winning_evidence = std::mem::take(&mut evidence[winner]);
        if winner == Category::Refuting && winning_evidence.len() >= 2 {
            confidence *= REFUTING_BOOST;
        }

        PatternVerdict {
            category: winner,
            confidence: Confidence::clamped(confidence.min(MAX_PATTERN_CONFIDENCE)),
            evidence: winning_evidence,
            scores,
        }
    }
}

const STOPWORDS: &[&str] = &["the", "a", "an", "of", "in", "on", "for", "to", "and", "with"];

/// Title words (minus stopwords) that also appear in the abstract
///
/// Sorted and capped at `limit` so the reasoning text is reproducible.
pub fn topic_overlap(title: &str, abstract_text: &str, limit: usize) -> Vec<String> {
    let words = |text: &str| -> BTreeSet<String> {
        text.split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase()
            })
            .filter(|w| !w.is_empty())
            .collect()
    };

    let title_words = words(title);
    let abstract_words = words(abstract_text);

    title_words
        .intersection(&abstract_words)
        .filter(|w| !STOPWORDS.contains(&w.as_str()))
        .take(limit)
        .cloned()
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: confidence never exceeds the pattern cap
        #[test]
        fn test_confidence_capped(text in ".{0,200}") {
            let verdict = PatternClassifier::new().classify(&text);
            prop_assert!(verdict.confidence.value() >= 0.0);
            prop_assert!(verdict.confidence.value() <= MAX_PATTERN_CONFIDENCE);
        }

        /// Property: classification is a pure function of the text
        #[test]
        fn test_deterministic(words in prop::collection::vec(
            prop::sample::select(vec![
                "confirm", "refute", "ruled out", "unlike", "see", "data from", "the", "model",
            ]),
            0..12,
        )) {
            let text = words.join(" ");
            let classifier = PatternClassifier::new();
            prop_assert_eq!(classifier.classify(&text), classifier.classify(&text));
        }
    }
}
