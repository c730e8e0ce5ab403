//! Citations command implementation.

use crate::cli::{CitationsAction, CitationsArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use astrolit_domain::{AnalyzedBy, Category, Citation, CitationQuery, CitationStore, Paper};
use astrolit_store::SqliteStore;

/// Execute the citations command.
pub fn execute_citations(
    args: CitationsArgs,
    store: &mut SqliteStore,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        CitationsAction::Add {
            citing,
            cited,
            category,
            confidence,
            reasoning,
        } => {
            let citation = add_citation(store, &citing, &cited, &category, confidence, &reasoning)?;
            println!(
                "{}",
                formatter.success(&format!(
                    "Recorded {} -> {} as {}",
                    citation.citing_bibcode, citation.cited_bibcode, citation.category
                ))
            );
        }
        CitationsAction::List {
            bibcode,
            citing,
            cited,
            category,
            limit,
        } => {
            let query = CitationQuery {
                bibcode,
                citing,
                cited,
                category: category.as_deref().map(parse_category).transpose()?,
                limit,
            };
            let citations = store.query_citations(&query)?;
            println!("{}", formatter.format_citations(&citations)?);
        }
    }
    Ok(())
}

/// Record a manual classification, creating bare paper rows as needed.
pub fn add_citation(
    store: &mut SqliteStore,
    citing: &str,
    cited: &str,
    category: &str,
    confidence: f64,
    reasoning: &str,
) -> Result<Citation> {
    let category = parse_category(category)?;
    let citation = Citation::new(citing, cited, category, confidence, reasoning, AnalyzedBy::Manual)?;

    for bibcode in [&citation.citing_bibcode, &citation.cited_bibcode] {
        if store.get_paper(bibcode)?.is_none() {
            store.upsert_paper(&Paper::new(bibcode.as_str())?)?;
        }
    }
    store.upsert_citation(&citation)?;
    Ok(citation)
}

fn parse_category(s: &str) -> Result<Category> {
    Category::parse(s).ok_or_else(|| {
        CliError::InvalidInput(format!(
            "Unknown category '{}'; expected one of {}",
            s,
            Category::ALL.map(|c| c.as_str()).join(", ")
        ))
    })
}
