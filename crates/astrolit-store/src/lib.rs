//! Astrolit Storage Layer
//!
//! Implements the `CitationStore` trait on SQLite.
//!
//! # Architecture
//!
//! - One table each for papers, citations, and hypotheses
//! - Citations are unique per `(citing, cited)` pair; writes upsert
//! - Reference and keyword lists are stored as JSON arrays
//!
//! # Examples
//!
//! ```no_run
//! use astrolit_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for citation operations
//! ```

#![warn(missing_docs)]

use astrolit_domain::{
    AnalyzedBy, Category, Citation, CitationQuery, CitationStore, Confidence, Hypothesis,
    HypothesisId, HypothesisQuery, HypothesisStatus, HypothesisUpdate, NewHypothesis, Paper,
    PaperQuery, StoreCounts,
};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// JSON column could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

const PAPER_COLUMNS: &str =
    "bibcode, title, abstract, year, publication, citation_count, refs, keywords";

const CITATION_COLUMNS: &str = "citing_bibcode, cited_bibcode, classification, confidence, \
     reasoning, analyzed_by, analyzed_at";

const HYPOTHESIS_COLUMNS: &str = "id, name, description, status, originating_bibcode, \
     ruling_bibcode, ruled_out_reason, superseded_by, created_at, updated_at";

/// SQLite-based implementation of `CitationStore`
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own SqliteStore instance.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a database at `path` and apply the schema
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use astrolit_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("literature.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    fn row_to_paper(row: &Row<'_>) -> rusqlite::Result<Paper> {
        let refs: String = row.get(6)?;
        let keywords: String = row.get(7)?;
        Ok(Paper {
            bibcode: row.get(0)?,
            title: row.get(1)?,
            abstract_text: row.get(2)?,
            year: row.get(3)?,
            publication: row.get(4)?,
            citation_count: row.get(5)?,
            references: decode_list(&refs, 6)?,
            keywords: decode_list(&keywords, 7)?,
        })
    }

    fn row_to_citation(row: &Row<'_>) -> rusqlite::Result<Citation> {
        let label: String = row.get(2)?;
        let category = Category::parse(&label).ok_or_else(|| {
            conversion_error(
                2,
                Type::Text,
                StoreError::InvalidData(format!("Unknown classification: {}", label)),
            )
        })?;

        let confidence =
            Confidence::new(row.get(3)?).map_err(|e| conversion_error(3, Type::Real, e))?;

        let analyzed_by: String = row.get(5)?;

        Ok(Citation {
            citing_bibcode: row.get(0)?,
            cited_bibcode: row.get(1)?,
            category,
            confidence,
            reasoning: row.get(4)?,
            analyzed_by: AnalyzedBy::parse(&analyzed_by),
            analyzed_at: row.get::<_, i64>(6)? as u64,
        })
    }

    fn row_to_hypothesis(row: &Row<'_>) -> rusqlite::Result<Hypothesis> {
        let label: String = row.get(3)?;
        let status = HypothesisStatus::parse(&label).ok_or_else(|| {
            conversion_error(
                3,
                Type::Text,
                StoreError::InvalidData(format!("Unknown hypothesis status: {}", label)),
            )
        })?;

        Ok(Hypothesis {
            id: HypothesisId(row.get(0)?),
            name: row.get(1)?,
            description: row.get(2)?,
            status,
            originating_bibcode: row.get(4)?,
            ruling_bibcode: row.get(5)?,
            ruled_out_reason: row.get(6)?,
            superseded_by: row.get(7)?,
            created_at: row.get::<_, i64>(8)? as u64,
            updated_at: row.get::<_, i64>(9)? as u64,
        })
    }
}

fn conversion_error<E>(column: usize, ty: Type, error: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, ty, Box::new(error))
}

fn decode_list(json: &str, column: usize) -> rusqlite::Result<Vec<String>> {
    serde_json::from_str(json).map_err(|e| conversion_error(column, Type::Text, e))
}

impl CitationStore for SqliteStore {
    type Error = StoreError;

    fn upsert_paper(&mut self, paper: &Paper) -> Result<(), Self::Error> {
        let refs = serde_json::to_string(&paper.references)?;
        let keywords = serde_json::to_string(&paper.keywords)?;

        // Metadata already on file is kept when the new record leaves it out
        self.conn.execute(
            "INSERT INTO papers (bibcode, title, abstract, year, publication, citation_count, refs, keywords)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(bibcode) DO UPDATE SET
             title = COALESCE(excluded.title, papers.title),
             abstract = COALESCE(excluded.abstract, papers.abstract),
             year = COALESCE(excluded.year, papers.year),
             publication = COALESCE(excluded.publication, papers.publication),
             citation_count = MAX(excluded.citation_count, papers.citation_count),
             refs = CASE WHEN excluded.refs = '[]' THEN papers.refs ELSE excluded.refs END,
             keywords = CASE WHEN excluded.keywords = '[]' THEN papers.keywords ELSE excluded.keywords END",
            params![
                &paper.bibcode,
                &paper.title,
                &paper.abstract_text,
                paper.year,
                &paper.publication,
                paper.citation_count,
                refs,
                keywords,
            ],
        )?;

        debug!(bibcode = %paper.bibcode, "Upserted paper");
        Ok(())
    }

    fn get_paper(&self, bibcode: &str) -> Result<Option<Paper>, Self::Error> {
        let sql = format!("SELECT {} FROM papers WHERE bibcode = ?1", PAPER_COLUMNS);
        let paper = self
            .conn
            .query_row(&sql, params![bibcode], Self::row_to_paper)
            .optional()?;
        Ok(paper)
    }

    fn query_papers(&self, query: &PaperQuery) -> Result<Vec<Paper>, Self::Error> {
        let mut sql = format!("SELECT {} FROM papers WHERE 1=1", PAPER_COLUMNS);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(year) = query.year {
            sql.push_str(" AND year = ?");
            params.push(Box::new(year));
        }

        sql.push_str(" ORDER BY citation_count DESC, bibcode ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            params.push(Box::new(limit as i64));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let papers = stmt
            .query_map(&param_refs[..], Self::row_to_paper)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(papers)
    }

    fn upsert_citation(&mut self, citation: &Citation) -> Result<(), Self::Error> {
        self.conn.execute(
            "INSERT INTO citations (citing_bibcode, cited_bibcode, classification, confidence, reasoning, analyzed_by, analyzed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(citing_bibcode, cited_bibcode) DO UPDATE SET
             classification = excluded.classification,
             confidence = excluded.confidence,
             reasoning = excluded.reasoning,
             analyzed_by = excluded.analyzed_by,
             analyzed_at = excluded.analyzed_at",
            params![
                &citation.citing_bibcode,
                &citation.cited_bibcode,
                citation.category.as_str(),
                citation.confidence.value(),
                &citation.reasoning,
                citation.analyzed_by.as_str(),
                citation.analyzed_at as i64,
            ],
        )?;

        debug!(
            citing = %citation.citing_bibcode,
            cited = %citation.cited_bibcode,
            category = %citation.category,
            "Upserted citation"
        );
        Ok(())
    }

    fn get_citation(&self, citing: &str, cited: &str) -> Result<Option<Citation>, Self::Error> {
        let sql = format!(
            "SELECT {} FROM citations WHERE citing_bibcode = ?1 AND cited_bibcode = ?2",
            CITATION_COLUMNS
        );
        let citation = self
            .conn
            .query_row(&sql, params![citing, cited], Self::row_to_citation)
            .optional()?;
        Ok(citation)
    }

    fn query_citations(&self, query: &CitationQuery) -> Result<Vec<Citation>, Self::Error> {
        let mut sql = format!("SELECT {} FROM citations WHERE 1=1", CITATION_COLUMNS);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(bibcode) = &query.bibcode {
            sql.push_str(" AND (citing_bibcode = ? OR cited_bibcode = ?)");
            params.push(Box::new(bibcode.clone()));
            params.push(Box::new(bibcode.clone()));
        }

        if let Some(citing) = &query.citing {
            sql.push_str(" AND citing_bibcode = ?");
            params.push(Box::new(citing.clone()));
        }

        if let Some(cited) = &query.cited {
            sql.push_str(" AND cited_bibcode = ?");
            params.push(Box::new(cited.clone()));
        }

        if let Some(category) = query.category {
            sql.push_str(" AND classification = ?");
            params.push(Box::new(category.as_str()));
        }

        sql.push_str(" ORDER BY analyzed_at DESC, id DESC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            params.push(Box::new(limit as i64));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let citations = stmt
            .query_map(&param_refs[..], Self::row_to_citation)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(citations)
    }

    fn add_hypothesis(&mut self, hypothesis: &NewHypothesis) -> Result<HypothesisId, Self::Error> {
        let now = astrolit_domain::current_timestamp() as i64;
        self.conn.execute(
            "INSERT INTO hypotheses (name, description, status, originating_bibcode, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![
                &hypothesis.name,
                &hypothesis.description,
                hypothesis.status.as_str(),
                &hypothesis.originating_bibcode,
                now,
            ],
        )?;

        let id = HypothesisId(self.conn.last_insert_rowid());
        debug!(id = %id, name = %hypothesis.name, "Added hypothesis");
        Ok(id)
    }

    fn get_hypothesis(&self, id: HypothesisId) -> Result<Option<Hypothesis>, Self::Error> {
        let sql = format!("SELECT {} FROM hypotheses WHERE id = ?1", HYPOTHESIS_COLUMNS);
        let hypothesis = self
            .conn
            .query_row(&sql, params![id.0], Self::row_to_hypothesis)
            .optional()?;
        Ok(hypothesis)
    }

    fn update_hypothesis(
        &mut self,
        id: HypothesisId,
        update: &HypothesisUpdate,
    ) -> Result<Hypothesis, Self::Error> {
        let mut hypothesis = self
            .get_hypothesis(id)?
            .ok_or_else(|| StoreError::NotFound(format!("hypothesis {}", id)))?;

        hypothesis.apply(update);

        self.conn.execute(
            "UPDATE hypotheses SET status = ?1, ruling_bibcode = ?2, ruled_out_reason = ?3,
             superseded_by = ?4, updated_at = ?5 WHERE id = ?6",
            params![
                hypothesis.status.as_str(),
                &hypothesis.ruling_bibcode,
                &hypothesis.ruled_out_reason,
                &hypothesis.superseded_by,
                hypothesis.updated_at as i64,
                id.0,
            ],
        )?;

        Ok(hypothesis)
    }

    fn query_hypotheses(&self, query: &HypothesisQuery) -> Result<Vec<Hypothesis>, Self::Error> {
        let mut sql = format!("SELECT {} FROM hypotheses", HYPOTHESIS_COLUMNS);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(status) = query.status {
            sql.push_str(" WHERE status = ?");
            params.push(Box::new(status.as_str()));
        }

        sql.push_str(" ORDER BY updated_at DESC, id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let hypotheses = stmt
            .query_map(&param_refs[..], Self::row_to_hypothesis)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(hypotheses)
    }

    fn counts(&self) -> Result<StoreCounts, Self::Error> {
        let count = |table: &str| -> Result<usize, StoreError> {
            let sql = format!("SELECT COUNT(*) FROM {}", table);
            let n: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
            Ok(n as usize)
        };

        Ok(StoreCounts {
            papers: count("papers")?,
            citations: count("citations")?,
            hypotheses: count("hypotheses")?,
        })
    }
}
