//! Summary command implementation.

use crate::cli::SummaryArgs;
use crate::error::Result;
use crate::output::Formatter;
use astrolit_domain::{
    summarize, CitationQuery, CitationStore, CitationSummary, ClassifiedCitation,
};
use astrolit_store::SqliteStore;
use std::collections::HashMap;

/// Execute the summary command.
pub fn execute_summary(args: SummaryArgs, store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    if let Some(bibcode) = &args.bibcode {
        if let Some(paper) = store.get_paper(bibcode)? {
            if let Some(title) = &paper.title {
                eprintln!("{}", formatter.info(&format!("{} ({})", title, bibcode)));
            }
        }
    }

    let summary = stored_summary(store, args.bibcode.as_deref())?;
    println!("{}", formatter.format_summary(&summary)?);
    Ok(())
}

/// Summarize stored citations, optionally only those received by `cited`.
///
/// Citing-paper years come from the stored papers when known.
pub fn stored_summary(store: &SqliteStore, cited: Option<&str>) -> Result<CitationSummary> {
    let query = match cited {
        Some(bibcode) => CitationQuery::cited_by(bibcode),
        None => CitationQuery::default(),
    };
    let citations = store.query_citations(&query)?;

    let mut years: HashMap<String, Option<i32>> = HashMap::new();
    let mut classified = Vec::with_capacity(citations.len());
    for citation in &citations {
        let year = match years.get(&citation.citing_bibcode) {
            Some(year) => *year,
            None => {
                let year = store
                    .get_paper(&citation.citing_bibcode)?
                    .and_then(|p| p.year);
                years.insert(citation.citing_bibcode.clone(), year);
                year
            }
        };
        classified.push(ClassifiedCitation {
            year,
            ..ClassifiedCitation::from(citation)
        });
    }

    Ok(summarize(&classified))
}

#[cfg(test)]
mod tests {
    use super::*;
    use astrolit_domain::{AnalyzedBy, Category, Citation, HypothesisSignal, Paper};

    fn store() -> SqliteStore {
        let mut store = SqliteStore::new(":memory:").unwrap();
        for (citing, cited, category, year) in [
            ("c1", "target", Category::Supporting, 2019),
            ("c2", "target", Category::Refuting, 2020),
            ("c3", "target", Category::Refuting, 2020),
            ("c1", "other", Category::Supporting, 2019),
        ] {
            store
                .upsert_paper(&Paper::new(citing).unwrap().with_year(year))
                .unwrap();
            store
                .upsert_citation(
                    &Citation::new(citing, cited, category, 0.9, "", AnalyzedBy::Manual).unwrap(),
                )
                .unwrap();
        }
        store
    }

    #[test]
    fn test_summary_for_one_paper() {
        let summary = stored_summary(&store(), Some("target")).unwrap();
        assert_eq!(summary.total_citations, 3);
        assert_eq!(summary.refuting_count, 2);
        assert_eq!(summary.hypothesis_status, HypothesisSignal::LikelyRuledOut);
        assert_eq!(summary.by_year.get(&2020), Some(&2));
        assert_eq!(summary.by_year.get(&2019), Some(&1));
    }

    #[test]
    fn test_summary_for_everything() {
        let summary = stored_summary(&store(), None).unwrap();
        assert_eq!(summary.total_citations, 4);
        assert_eq!(summary.counts[Category::Supporting], 2);
    }

    #[test]
    fn test_empty_summary() {
        let store = SqliteStore::new(":memory:").unwrap();
        let summary = stored_summary(&store, Some("nothing")).unwrap();
        assert_eq!(summary.total_citations, 0);
        assert_eq!(summary.consensus_indicator, 0.0);
        assert_eq!(summary.hypothesis_status, HypothesisSignal::Active);
    }
}
