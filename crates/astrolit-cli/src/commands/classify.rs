//! Classify command implementation.

use crate::cli::ClassifyArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use astrolit_classifier::{summarize_batch, BatchEntry, CitationClassifier, ClassificationRequest};
use astrolit_domain::{CitationStore, CompletionProvider, Paper};
use astrolit_store::SqliteStore;
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Citation network file: one cited paper and the papers citing it.
#[derive(Debug, Deserialize)]
pub struct NetworkFile {
    /// The cited paper
    pub target_paper: NetworkPaper,

    /// Papers citing it
    #[serde(default)]
    pub citing_papers: Vec<NetworkPaper>,
}

/// A paper record in a network file.
///
/// Title and year are accepted in the shapes search services return them:
/// a title may be a one-element list and a year may be a string.
#[derive(Debug, Deserialize)]
pub struct NetworkPaper {
    /// Bibcode
    pub bibcode: String,

    /// Title
    #[serde(default)]
    pub title: Option<Value>,

    /// Abstract
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,

    /// Publication year
    #[serde(default)]
    pub year: Option<Value>,

    /// Journal or venue
    #[serde(default, alias = "pub")]
    pub publication: Option<String>,

    /// Citation count
    #[serde(default)]
    pub citation_count: Option<u32>,
}

impl NetworkPaper {
    /// Convert to a domain paper.
    pub fn to_paper(&self) -> Result<Paper> {
        let mut paper = Paper::new(&self.bibcode)?;
        if let Some(title) = self.title.as_ref().and_then(text_value) {
            paper = paper.with_title(title);
        }
        if let Some(text) = self.abstract_text.as_deref().filter(|t| !t.trim().is_empty()) {
            paper = paper.with_abstract(text);
        }
        if let Some(year) = self.year.as_ref().and_then(year_value) {
            paper = paper.with_year(year);
        }
        if let Some(publication) = &self.publication {
            paper = paper.with_publication(publication.clone());
        }
        if let Some(count) = self.citation_count {
            paper = paper.with_citation_count(count);
        }
        Ok(paper)
    }
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(|v| v.as_str().map(str::to_string)),
        _ => None,
    }
}

fn year_value(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().get(..4).and_then(|y| y.parse().ok()),
        _ => None,
    }
}

/// Load a network file into the cited paper and its citing papers.
pub fn load_network(path: &Path) -> Result<(Paper, Vec<Paper>)> {
    let contents = fs::read_to_string(path)?;
    let network: NetworkFile = serde_json::from_str(&contents).map_err(|e| {
        CliError::InvalidInput(format!(
            "{}: expected an object with target_paper and citing_papers ({})",
            path.display(),
            e
        ))
    })?;

    let cited = network.target_paper.to_paper()?;
    let citing = network
        .citing_papers
        .iter()
        .map(NetworkPaper::to_paper)
        .collect::<Result<Vec<_>>>()?;
    Ok((cited, citing))
}

/// Execute the classify command.
pub fn execute_classify<P>(
    args: ClassifyArgs,
    classifier: &CitationClassifier<P>,
    store: Option<&mut SqliteStore>,
    formatter: &Formatter,
) -> Result<()>
where
    P: CompletionProvider,
    P::Error: Display,
{
    if let Some(citing_abstract) = args.citing_abstract {
        let request = ClassificationRequest {
            citing_abstract: Some(citing_abstract),
            cited_abstract: args.cited_abstract,
            cited_title: args.cited_title,
        };
        let classification = classifier.classify(&request)?;
        println!("{}", formatter.format_classification(&classification)?);
        return Ok(());
    }

    let input = args.input.ok_or_else(|| {
        CliError::InvalidInput("Either --input or --citing-abstract is required".to_string())
    })?;

    let (cited, citing) = load_network(&input)?;
    info!(cited = %cited.bibcode, citing = citing.len(), "Loaded citation network");

    let entries = classifier.classify_corpus(&cited, &citing);
    let summary = summarize_batch(&entries);

    if let Some(store) = store {
        let saved = persist(store, &cited, &citing, &entries)?;
        eprintln!("{}", formatter.success(&format!("Stored {} classification(s)", saved)));
    }

    println!("{}", formatter.format_batch(&cited, &entries, &summary)?);
    Ok(())
}

/// Store the network's papers and every successful classification.
///
/// Skipped pairs (no citing abstract) are not stored as citations.
pub fn persist(
    store: &mut SqliteStore,
    cited: &Paper,
    citing: &[Paper],
    entries: &[BatchEntry],
) -> Result<usize> {
    store.upsert_paper(cited)?;
    for paper in citing {
        store.upsert_paper(paper)?;
    }

    let mut saved = 0;
    for entry in entries {
        let skipped = entry
            .result
            .as_ref()
            .is_ok_and(|c| c.method == astrolit_classifier::ClassificationMethod::Skipped);
        if skipped {
            continue;
        }
        match entry.to_citation() {
            Some(Ok(citation)) => {
                store.upsert_citation(&citation)?;
                saved += 1;
            }
            Some(Err(e)) => warn!(citing = %entry.citing_bibcode, "Not stored: {}", e),
            None => {}
        }
    }
    Ok(saved)
}
