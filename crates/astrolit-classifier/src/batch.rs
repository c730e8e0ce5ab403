//! Corpus classification and store-backed reclassification
//!
//! Both walk pairs one at a time. After every call to the completion service
//! the loop sleeps for the configured request delay. Cancellation is checked
//! between pairs only.

use crate::error::ClassifierError;
use crate::orchestrator::CitationClassifier;
use crate::types::{Classification, ClassificationRequest};
use astrolit_domain::{
    summarize, Category, Citation, CitationQuery, CitationStore, CitationSummary,
    ClassifiedCitation, CompletionProvider, DomainError, Paper,
};
use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One pair's outcome in a corpus run
#[derive(Debug)]
pub struct BatchEntry {
    /// Citing paper
    pub citing_bibcode: String,

    /// Citing paper title, for reports
    pub citing_title: Option<String>,

    /// Citing paper year
    pub citing_year: Option<i32>,

    /// Cited paper
    pub cited_bibcode: String,

    /// Classification, or the error for this pair alone
    pub result: Result<Classification, ClassifierError>,
}

impl BatchEntry {
    /// Aggregator input, for successful entries
    pub fn classified(&self) -> Option<ClassifiedCitation> {
        self.result.as_ref().ok().map(|c| ClassifiedCitation {
            citing_bibcode: self.citing_bibcode.clone(),
            cited_bibcode: self.cited_bibcode.clone(),
            category: c.category,
            confidence: c.confidence.value(),
            year: self.citing_year,
        })
    }

    /// Storable citation, for successful entries
    pub fn to_citation(&self) -> Option<Result<Citation, DomainError>> {
        self.result.as_ref().ok().map(|c| {
            c.clone().into_citation(
                &self.citing_bibcode,
                &self.cited_bibcode,
                c.method.analyzed_by(),
            )
        })
    }
}

/// Summarize the successful entries of a corpus run
pub fn summarize_batch(entries: &[BatchEntry]) -> CitationSummary {
    let classified: Vec<_> = entries.iter().filter_map(BatchEntry::classified).collect();
    summarize(&classified)
}

impl<P> CitationClassifier<P>
where
    P: CompletionProvider,
    P::Error: Display,
{
    /// Classify every citing paper against `cited`
    ///
    /// Returns exactly one entry per citing paper, in input order.
    pub fn classify_corpus(&self, cited: &Paper, citing_papers: &[Paper]) -> Vec<BatchEntry> {
        info!(
            cited = %cited.bibcode,
            pairs = citing_papers.len(),
            mode = %self.mode(),
            "Classifying citation corpus"
        );

        citing_papers
            .iter()
            .map(|citing| {
                let request = ClassificationRequest::from_papers(citing, Some(cited));
                let remote = self.calls_model_for(&request);
                let result = self.classify(&request);
                if remote {
                    self.pause();
                }
                if let Err(ref e) = result {
                    warn!(citing = %citing.bibcode, "Classification failed: {}", e);
                }
                BatchEntry {
                    citing_bibcode: citing.bibcode.clone(),
                    citing_title: citing.title.clone(),
                    citing_year: citing.year,
                    cited_bibcode: cited.bibcode.clone(),
                    result,
                }
            })
            .collect()
    }

    fn pause(&self) {
        let delay = self.config().request_delay();
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

/// A category change found by a reclassification pass
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryChange {
    /// Citing paper
    pub citing_bibcode: String,

    /// Cited paper
    pub cited_bibcode: String,

    /// Stored category
    pub from: Category,

    /// New category
    pub to: Category,

    /// New confidence
    pub confidence: f64,
}

/// Tally of a reclassification pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReclassifyReport {
    /// Citations considered
    pub total: usize,

    /// Citations whose category changed (written unless dry run)
    pub updated: usize,

    /// Citations whose category stayed the same
    pub unchanged: usize,

    /// Citations without a citing abstract
    pub skipped: usize,

    /// Citations that failed to classify or to save
    pub errors: usize,

    /// True when the pass stopped early
    pub cancelled: bool,

    /// True when nothing was written
    pub dry_run: bool,

    /// The category changes, in processing order
    pub changes: Vec<CategoryChange>,
}

/// Re-runs the classifier over every stored citation
pub struct Reclassifier<'a, P> {
    classifier: &'a CitationClassifier<P>,
    dry_run: bool,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a, P> Reclassifier<'a, P>
where
    P: CompletionProvider,
    P::Error: Display,
{
    /// Create a reclassifier
    pub fn new(classifier: &'a CitationClassifier<P>) -> Self {
        Self {
            classifier,
            dry_run: false,
            cancel: None,
        }
    }

    /// Report changes without writing them
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Stop before the next pair once `flag` is set
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Run the pass
    ///
    /// # Errors
    ///
    /// Only when the citation list cannot be read. Failures on individual
    /// pairs are counted in the report and the pass continues.
    pub fn run<S>(&self, store: &mut S) -> Result<ReclassifyReport, ClassifierError>
    where
        S: CitationStore,
        S::Error: Display,
    {
        let citations = store
            .query_citations(&CitationQuery::default())
            .map_err(|e| ClassifierError::Store(e.to_string()))?;

        let mut report = ReclassifyReport {
            total: citations.len(),
            dry_run: self.dry_run,
            ..Default::default()
        };

        info!(
            total = report.total,
            mode = %self.classifier.mode(),
            dry_run = self.dry_run,
            "Reclassifying citations"
        );

        for (i, citation) in citations.iter().enumerate() {
            if self.cancelled() {
                warn!("Reclassification cancelled after {} of {} citations", i, report.total);
                report.cancelled = true;
                break;
            }

            match self.reclassify_one(store, citation) {
                Ok(Step::Skipped) => {
                    debug!(citing = %citation.citing_bibcode, "No citing abstract, skipped");
                    report.skipped += 1;
                }
                Ok(Step::Unchanged) => report.unchanged += 1,
                Ok(Step::Changed(change)) => {
                    info!(
                        "[{}/{}] {} -> {}: {} -> {}",
                        i + 1,
                        report.total,
                        change.citing_bibcode,
                        change.cited_bibcode,
                        change.from,
                        change.to
                    );
                    report.updated += 1;
                    report.changes.push(change);
                }
                Err(e) => {
                    warn!(
                        citing = %citation.citing_bibcode,
                        cited = %citation.cited_bibcode,
                        "Reclassification failed: {}",
                        e
                    );
                    report.errors += 1;
                }
            }
        }

        Ok(report)
    }

    fn reclassify_one<S>(&self, store: &mut S, citation: &Citation) -> Result<Step, ClassifierError>
    where
        S: CitationStore,
        S::Error: Display,
    {
        let store_err = |e: S::Error| ClassifierError::Store(e.to_string());

        let citing = store.get_paper(&citation.citing_bibcode).map_err(store_err)?;
        let Some(citing) = citing.filter(|p| p.abstract_str().is_some()) else {
            return Ok(Step::Skipped);
        };
        let cited = store.get_paper(&citation.cited_bibcode).map_err(store_err)?;

        let request = ClassificationRequest::from_papers(&citing, cited.as_ref());
        let remote = self.classifier.calls_model_for(&request);
        let result = self.classifier.classify(&request);
        if remote {
            self.classifier.pause();
        }
        let classification = result?;

        if classification.category == citation.category {
            return Ok(Step::Unchanged);
        }

        let change = CategoryChange {
            citing_bibcode: citation.citing_bibcode.clone(),
            cited_bibcode: citation.cited_bibcode.clone(),
            from: citation.category,
            to: classification.category,
            confidence: classification.confidence.value(),
        };

        if !self.dry_run {
            let analyzed_by = classification.method.analyzed_by().reclassified();
            let updated = classification.into_citation(
                &citation.citing_bibcode,
                &citation.cited_bibcode,
                analyzed_by,
            )?;
            store.upsert_citation(&updated).map_err(store_err)?;
        }

        Ok(Step::Changed(change))
    }
}

enum Step {
    Skipped,
    Unchanged,
    Changed(CategoryChange),
}
