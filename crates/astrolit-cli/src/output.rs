//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use astrolit_classifier::{BatchEntry, Classification, ReclassifyReport};
use astrolit_domain::{
    Category, Citation, CitationSummary, Hypothesis, HypothesisSignal, Paper, StoreCounts,
};
use colored::*;
use serde_json::{json, Value};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a single classification.
    pub fn format_classification(&self, classification: &Classification) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&classification_json(
                classification,
            ))?),
            OutputFormat::Quiet => Ok(classification.category.to_string()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Category", "Confidence", "Method", "Reasoning"]);
                builder.push_record([
                    self.category_cell(classification.category),
                    format!("{:.2}", classification.confidence.value()),
                    classification.method.to_string(),
                    classification.reasoning.clone(),
                ]);
                Ok(self.render(builder))
            }
        }
    }

    /// Format the result of classifying a citation network.
    pub fn format_batch(
        &self,
        cited: &Paper,
        entries: &[BatchEntry],
        summary: &CitationSummary,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let classifications: Vec<Value> = entries.iter().map(entry_json).collect();
                let output = json!({
                    "cited_paper": {
                        "bibcode": cited.bibcode,
                        "title": cited.title,
                    },
                    "summary": summary_json(summary),
                    "classifications": classifications,
                });
                Ok(serde_json::to_string_pretty(&output)?)
            }
            OutputFormat::Quiet => Ok(entries
                .iter()
                .map(|e| match &e.result {
                    Ok(c) => format!("{}\t{}", e.citing_bibcode, c.category),
                    Err(_) => format!("{}\tERROR", e.citing_bibcode),
                })
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut out = String::new();
                out.push_str(&format!(
                    "Cited paper: {} ({})\n\n",
                    cited.title.as_deref().unwrap_or("Unknown"),
                    cited.bibcode
                ));

                if !entries.is_empty() {
                    let mut builder = Builder::default();
                    builder.push_record(["Citing", "Year", "Category", "Confidence", "Reasoning"]);
                    for entry in entries {
                        let year = entry.citing_year.map(|y| y.to_string()).unwrap_or_default();
                        match &entry.result {
                            Ok(c) => builder.push_record([
                                entry.citing_bibcode.clone(),
                                year,
                                self.category_cell(c.category),
                                format!("{:.2}", c.confidence.value()),
                                truncate(&c.reasoning, 60),
                            ]),
                            Err(e) => builder.push_record([
                                entry.citing_bibcode.clone(),
                                year,
                                self.colorize("ERROR", "red"),
                                String::new(),
                                truncate(&e.to_string(), 60),
                            ]),
                        }
                    }
                    out.push_str(&self.render(builder));
                    out.push_str("\n\n");
                }

                out.push_str(&self.summary_table(summary));
                Ok(out)
            }
        }
    }

    /// Format an aggregate summary.
    pub fn format_summary(&self, summary: &CitationSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&summary_json(summary))?),
            OutputFormat::Quiet => Ok(format!(
                "{}\t{}",
                summary.consensus_indicator, summary.hypothesis_status
            )),
            OutputFormat::Table => Ok(self.summary_table(summary)),
        }
    }

    fn summary_table(&self, summary: &CitationSummary) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Category", "Count", "Percent"]);
        for category in Category::ALL {
            let mut count = summary.counts[category].to_string();
            if category == Category::Refuting && summary.refuting_count > 0 {
                count = self.colorize(&format!("{} ⚠", count), "red");
            }
            builder.push_record([
                category.to_string(),
                count,
                format!("{:.1}%", summary.percentages[category]),
            ]);
        }

        let mut out = self.render(builder);
        out.push_str(&format!(
            "\n\nTotal citations analyzed: {}\nHigh confidence (> 0.7): {}\nConsensus: {:+.2} ({})\nHypothesis signal: {}",
            summary.total_citations,
            summary.high_confidence_count,
            summary.consensus_indicator,
            summary.consensus_label(),
            self.signal_cell(summary.hypothesis_status),
        ));

        if !summary.refuting_bibcodes.is_empty() {
            out.push_str(&format!(
                "\nRefuting papers: {}",
                summary.refuting_bibcodes.join(", ")
            ));
        }

        if !summary.by_year.is_empty() {
            let years: Vec<String> = summary
                .by_year
                .iter()
                .map(|(year, count)| format!("{}: {}", year, count))
                .collect();
            out.push_str(&format!("\nBy year: {}", years.join(", ")));
        }

        out
    }

    /// Format stored citations.
    pub fn format_citations(&self, citations: &[Citation]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let values: Vec<Value> = citations.iter().map(citation_json).collect();
                Ok(serde_json::to_string_pretty(&values)?)
            }
            OutputFormat::Quiet => Ok(citations
                .iter()
                .map(|c| format!("{}\t{}", c.citing_bibcode, c.cited_bibcode))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if citations.is_empty() {
                    return Ok(self.colorize("No citations found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Citing", "Cited", "Category", "Confidence", "By"]);
                for c in citations {
                    builder.push_record([
                        c.citing_bibcode.clone(),
                        c.cited_bibcode.clone(),
                        self.category_cell(c.category),
                        format!("{:.2}", c.confidence.value()),
                        c.analyzed_by.to_string(),
                    ]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format papers.
    pub fn format_papers(&self, papers: &[Paper]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let values: Vec<Value> = papers.iter().map(paper_json).collect();
                Ok(serde_json::to_string_pretty(&values)?)
            }
            OutputFormat::Quiet => Ok(papers
                .iter()
                .map(|p| p.bibcode.clone())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if papers.is_empty() {
                    return Ok(self.colorize("No papers found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Bibcode", "Year", "Citations", "Title"]);
                for p in papers {
                    builder.push_record([
                        p.bibcode.clone(),
                        p.year.map(|y| y.to_string()).unwrap_or_default(),
                        p.citation_count.to_string(),
                        truncate(p.title.as_deref().unwrap_or(""), 60),
                    ]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format one paper with its abstract.
    pub fn format_paper(&self, paper: &Paper) -> Result<String> {
        match self.format {
            OutputFormat::Table => {
                let heading = if self.color_enabled {
                    paper.bibcode.bold().to_string()
                } else {
                    paper.bibcode.clone()
                };
                let mut out = format!("{}\n", heading);
                if let Some(title) = &paper.title {
                    out.push_str(&format!("Title:       {}\n", title));
                }
                if let Some(year) = paper.year {
                    out.push_str(&format!("Year:        {}\n", year));
                }
                if let Some(publication) = &paper.publication {
                    out.push_str(&format!("Publication: {}\n", publication));
                }
                out.push_str(&format!("Citations:   {}\n", paper.citation_count));
                if !paper.keywords.is_empty() {
                    out.push_str(&format!("Keywords:    {}\n", paper.keywords.join(", ")));
                }
                if let Some(text) = paper.abstract_str() {
                    out.push_str(&format!("\n{}\n", text));
                }
                Ok(out.trim_end().to_string())
            }
            _ => self.format_papers(std::slice::from_ref(paper)),
        }
    }

    /// Format hypotheses.
    pub fn format_hypotheses(&self, hypotheses: &[Hypothesis]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let values: Vec<Value> = hypotheses.iter().map(hypothesis_json).collect();
                Ok(serde_json::to_string_pretty(&values)?)
            }
            OutputFormat::Quiet => Ok(hypotheses
                .iter()
                .map(|h| h.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if hypotheses.is_empty() {
                    return Ok(self.colorize("No hypotheses found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["ID", "Name", "Status", "Origin", "Ruled out by"]);
                for h in hypotheses {
                    builder.push_record([
                        h.id.to_string(),
                        h.name.clone(),
                        h.status.to_string(),
                        h.originating_bibcode.clone().unwrap_or_default(),
                        h.ruling_bibcode.clone().unwrap_or_default(),
                    ]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format a reclassification report.
    pub fn format_report(&self, report: &ReclassifyReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let changes: Vec<Value> = report
                    .changes
                    .iter()
                    .map(|c| {
                        json!({
                            "citing_bibcode": c.citing_bibcode,
                            "cited_bibcode": c.cited_bibcode,
                            "from": c.from.as_str(),
                            "to": c.to.as_str(),
                            "confidence": c.confidence,
                        })
                    })
                    .collect();
                let output = json!({
                    "total": report.total,
                    "updated": report.updated,
                    "unchanged": report.unchanged,
                    "skipped": report.skipped,
                    "errors": report.errors,
                    "dry_run": report.dry_run,
                    "cancelled": report.cancelled,
                    "changes": changes,
                });
                Ok(serde_json::to_string_pretty(&output)?)
            }
            OutputFormat::Quiet => Ok(report.updated.to_string()),
            OutputFormat::Table => {
                let mut out = String::new();
                if !report.changes.is_empty() {
                    let mut builder = Builder::default();
                    builder.push_record(["Citing", "Cited", "From", "To", "Confidence"]);
                    for c in &report.changes {
                        builder.push_record([
                            c.citing_bibcode.clone(),
                            c.cited_bibcode.clone(),
                            c.from.to_string(),
                            self.category_cell(c.to),
                            format!("{:.2}", c.confidence),
                        ]);
                    }
                    out.push_str(&self.render(builder));
                    out.push_str("\n\n");
                }

                let verb = if report.dry_run { "Would update" } else { "Updated" };
                out.push_str(&format!(
                    "Total: {}  {}: {}  Unchanged: {}  Skipped: {}  Errors: {}",
                    report.total, verb, report.updated, report.unchanged, report.skipped, report.errors
                ));
                if report.cancelled {
                    out.push('\n');
                    out.push_str(&self.warning("Cancelled before all citations were processed"));
                }
                Ok(out)
            }
        }
    }

    /// Format store row counts.
    pub fn format_counts(&self, counts: &StoreCounts) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "papers": counts.papers,
                "citations": counts.citations,
                "hypotheses": counts.hypotheses,
            }))?),
            OutputFormat::Quiet => Ok(format!(
                "{}\t{}\t{}",
                counts.papers, counts.citations, counts.hypotheses
            )),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Papers", "Citations", "Hypotheses"]);
                builder.push_record([
                    counts.papers.to_string(),
                    counts.citations.to_string(),
                    counts.hypotheses.to_string(),
                ]);
                Ok(self.render(builder))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn render(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    fn category_cell(&self, category: Category) -> String {
        let color = match category {
            Category::Supporting => "green",
            Category::Contrasting => "yellow",
            Category::Refuting => "red",
            Category::Methodological => "cyan",
            Category::Contextual => "blue",
            Category::Neutral => "",
        };
        self.colorize(category.as_str(), color)
    }

    fn signal_cell(&self, signal: HypothesisSignal) -> String {
        let color = match signal {
            HypothesisSignal::Active => "green",
            HypothesisSignal::PossiblyRuledOut => "yellow",
            HypothesisSignal::LikelyRuledOut => "red",
        };
        self.colorize(signal.as_str(), color)
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

fn classification_json(c: &Classification) -> Value {
    json!({
        "classification": c.category.as_str(),
        "confidence": round3(c.confidence.value()),
        "reasoning": c.reasoning,
        "method": c.method.as_str(),
    })
}

fn entry_json(entry: &BatchEntry) -> Value {
    let mut value = json!({
        "citing_bibcode": entry.citing_bibcode,
        "citing_title": entry.citing_title,
        "citing_year": entry.citing_year,
        "cited_bibcode": entry.cited_bibcode,
    });
    if let Value::Object(ref mut obj) = value {
        match &entry.result {
            Ok(c) => {
                if let Value::Object(fields) = classification_json(c) {
                    obj.extend(fields);
                }
            }
            Err(e) => {
                obj.insert("error".to_string(), Value::String(e.to_string()));
            }
        }
    }
    value
}

fn summary_json(summary: &CitationSummary) -> Value {
    let counts: serde_json::Map<String, Value> = summary
        .counts
        .iter()
        .map(|(category, count)| (category.as_str().to_string(), json!(count)))
        .collect();
    let percentages: serde_json::Map<String, Value> = summary
        .percentages
        .iter()
        .map(|(category, pct)| (category.as_str().to_string(), json!(pct)))
        .collect();
    let by_year: serde_json::Map<String, Value> = summary
        .by_year
        .iter()
        .map(|(year, count)| (year.to_string(), json!(count)))
        .collect();

    json!({
        "total_citations": summary.total_citations,
        "counts": counts,
        "percentages": percentages,
        "high_confidence_count": summary.high_confidence_count,
        "consensus_indicator": summary.consensus_indicator,
        "consensus": summary.consensus_label(),
        "refuting_count": summary.refuting_count,
        "refuting_bibcodes": summary.refuting_bibcodes,
        "hypothesis_status": summary.hypothesis_status.as_str(),
        "by_year": by_year,
    })
}

fn citation_json(c: &Citation) -> Value {
    json!({
        "citing_bibcode": c.citing_bibcode,
        "cited_bibcode": c.cited_bibcode,
        "classification": c.category.as_str(),
        "confidence": c.confidence.value(),
        "reasoning": c.reasoning,
        "analyzed_by": c.analyzed_by.as_str(),
        "analyzed_at": c.analyzed_at,
    })
}

fn paper_json(p: &Paper) -> Value {
    json!({
        "bibcode": p.bibcode,
        "title": p.title,
        "abstract": p.abstract_text,
        "year": p.year,
        "publication": p.publication,
        "citation_count": p.citation_count,
        "references": p.references,
        "keywords": p.keywords,
    })
}

fn hypothesis_json(h: &Hypothesis) -> Value {
    json!({
        "id": h.id.0,
        "name": h.name,
        "description": h.description,
        "status": h.status.as_str(),
        "originating_bibcode": h.originating_bibcode,
        "ruling_bibcode": h.ruling_bibcode,
        "ruled_out_reason": h.ruled_out_reason,
        "superseded_by": h.superseded_by,
        "created_at": h.created_at,
        "updated_at": h.updated_at,
    })
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round_ties_even() / 1000.0
}
