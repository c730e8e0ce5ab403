//! Papers command implementation.

use crate::cli::{PapersAction, PapersArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use astrolit_domain::{CitationStore, Paper, PaperQuery};
use astrolit_store::SqliteStore;

/// Execute the papers command.
pub fn execute_papers(args: PapersArgs, store: &mut SqliteStore, formatter: &Formatter) -> Result<()> {
    match args.action {
        PapersAction::Add {
            bibcode,
            title,
            abstract_text,
            year,
            publication,
            citation_count,
        } => {
            let mut paper = Paper::new(bibcode)?.with_citation_count(citation_count);
            if let Some(title) = title {
                paper = paper.with_title(title);
            }
            if let Some(text) = abstract_text {
                paper = paper.with_abstract(text);
            }
            if let Some(year) = year {
                paper = paper.with_year(year);
            }
            if let Some(publication) = publication {
                paper = paper.with_publication(publication);
            }

            store.upsert_paper(&paper)?;
            println!("{}", formatter.success(&format!("Stored paper {}", paper.bibcode)));
        }
        PapersAction::Get { bibcode } => {
            let paper = store
                .get_paper(&bibcode)?
                .ok_or_else(|| CliError::NotFound(format!("paper {}", bibcode)))?;
            println!("{}", formatter.format_paper(&paper)?);
        }
        PapersAction::List { year, limit } => {
            let papers = store.query_papers(&PaperQuery { year, limit })?;
            println!("{}", formatter.format_papers(&papers)?);
        }
    }
    Ok(())
}
