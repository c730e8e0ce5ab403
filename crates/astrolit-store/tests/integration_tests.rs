//! Integration tests for astrolit-store
//!
//! These tests cover the full cycle for papers, citations, and hypotheses.

use astrolit_domain::{
    AnalyzedBy, Category, Citation, CitationQuery, CitationStore, HypothesisId, HypothesisQuery,
    HypothesisStatus, HypothesisUpdate, NewHypothesis, Paper, PaperQuery,
};
use astrolit_store::{SqliteStore, StoreError};
use tempfile::TempDir;

fn citation(citing: &str, cited: &str, category: Category, confidence: f64) -> Citation {
    Citation::new(citing, cited, category, confidence, "test", AnalyzedBy::Manual).unwrap()
}

#[test]
fn test_store_initialization() {
    let store = SqliteStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
}

#[test]
fn test_upsert_and_get_paper() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let paper = Paper::new("2019ApJ...882L...2S")
        .unwrap()
        .with_title("A massive disk")
        .with_abstract("We measure the disk mass.")
        .with_year(2019)
        .with_citation_count(12)
        .with_references(vec!["2010ApJ...1A".to_string()])
        .with_keywords(vec!["disks".to_string(), "planets".to_string()]);

    store.upsert_paper(&paper).unwrap();

    let retrieved = store.get_paper("2019ApJ...882L...2S").unwrap();
    assert_eq!(retrieved, Some(paper));
    assert!(store.get_paper("missing").unwrap().is_none());
}

#[test]
fn test_paper_refresh_keeps_known_metadata() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let full = Paper::new("2019ApJ").unwrap().with_title("Title").with_year(2019);
    store.upsert_paper(&full).unwrap();

    // A bare sighting must not erase the title
    store.upsert_paper(&Paper::new("2019ApJ").unwrap()).unwrap();

    let retrieved = store.get_paper("2019ApJ").unwrap().unwrap();
    assert_eq!(retrieved.title.as_deref(), Some("Title"));
    assert_eq!(retrieved.year, Some(2019));

    // A refresh with an abstract back-fills it
    store
        .upsert_paper(&Paper::new("2019ApJ").unwrap().with_abstract("Later abstract"))
        .unwrap();
    let retrieved = store.get_paper("2019ApJ").unwrap().unwrap();
    assert_eq!(retrieved.abstract_text.as_deref(), Some("Later abstract"));
    assert_eq!(store.counts().unwrap().papers, 1);
}

#[test]
fn test_query_papers_by_year_ordered_by_citations() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    for (bibcode, year, count) in [("a", 2019, 5), ("b", 2019, 50), ("c", 2020, 100)] {
        let paper = Paper::new(bibcode).unwrap().with_year(year).with_citation_count(count);
        store.upsert_paper(&paper).unwrap();
    }

    let query = PaperQuery {
        year: Some(2019),
        limit: None,
    };
    let papers = store.query_papers(&query).unwrap();
    let bibcodes: Vec<_> = papers.iter().map(|p| p.bibcode.as_str()).collect();
    assert_eq!(bibcodes, vec!["b", "a"]);

    let query = PaperQuery {
        year: None,
        limit: Some(1),
    };
    assert_eq!(store.query_papers(&query).unwrap()[0].bibcode, "c");
}

#[test]
fn test_citation_upsert_is_idempotent() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let first = citation("citing", "cited", Category::Neutral, 0.3);
    let second = citation("citing", "cited", Category::Refuting, 0.9).with_analyzed_at(first.analyzed_at + 10);

    store.upsert_citation(&first).unwrap();
    store.upsert_citation(&second).unwrap();

    let all = store.query_citations(&CitationQuery::default()).unwrap();
    assert_eq!(all.len(), 1, "Pair must be stored exactly once");
    assert_eq!(all[0], second, "Second write wins");
}

#[test]
fn test_query_citations_filters() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    store.upsert_citation(&citation("p1", "target", Category::Supporting, 0.8)).unwrap();
    store.upsert_citation(&citation("p2", "target", Category::Refuting, 0.9)).unwrap();
    store.upsert_citation(&citation("target", "old", Category::Methodological, 0.6)).unwrap();

    let cited = store.query_citations(&CitationQuery::cited_by("target")).unwrap();
    assert_eq!(cited.len(), 2);

    let either = CitationQuery {
        bibcode: Some("target".to_string()),
        ..Default::default()
    };
    assert_eq!(store.query_citations(&either).unwrap().len(), 3);

    let refuting = CitationQuery {
        category: Some(Category::Refuting),
        ..Default::default()
    };
    let result = store.query_citations(&refuting).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].citing_bibcode, "p2");

    let limited = CitationQuery {
        limit: Some(2),
        ..Default::default()
    };
    assert_eq!(store.query_citations(&limited).unwrap().len(), 2);

    let by_citing = CitationQuery {
        citing: Some("target".to_string()),
        ..Default::default()
    };
    assert_eq!(store.query_citations(&by_citing).unwrap()[0].cited_bibcode, "old");
}

#[test]
fn test_citation_keeps_reclassify_tag() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let tagged = Citation::new("a", "b", Category::Contrasting, 0.55, "why", AnalyzedBy::RegexReclassify)
        .unwrap();
    store.upsert_citation(&tagged).unwrap();

    let retrieved = store.get_citation("a", "b").unwrap().unwrap();
    assert_eq!(retrieved.analyzed_by, AnalyzedBy::RegexReclassify);
    assert!(store.get_citation("b", "a").unwrap().is_none());
}

#[test]
fn test_hypothesis_lifecycle() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let new = NewHypothesis::new("binary companion")
        .unwrap()
        .with_description("An unseen companion drives the variability")
        .with_originating_bibcode("2015ApJ");
    let id = store.add_hypothesis(&new).unwrap();

    let stored = store.get_hypothesis(id).unwrap().unwrap();
    assert_eq!(stored.status, HypothesisStatus::Uncertain);
    assert_eq!(stored.originating_bibcode.as_deref(), Some("2015ApJ"));

    let update = HypothesisUpdate::ruled_out("2021MNRAS", Some("excluded at >5 sigma".to_string()));
    let updated = store.update_hypothesis(id, &update).unwrap();
    assert_eq!(updated.status, HypothesisStatus::RuledOut);

    let reloaded = store.get_hypothesis(id).unwrap().unwrap();
    assert_eq!(reloaded, updated);

    let ruled_out = HypothesisQuery {
        status: Some(HypothesisStatus::RuledOut),
    };
    assert_eq!(store.query_hypotheses(&ruled_out).unwrap().len(), 1);

    let active = HypothesisQuery {
        status: Some(HypothesisStatus::Active),
    };
    assert!(store.query_hypotheses(&active).unwrap().is_empty());
}

#[test]
fn test_update_missing_hypothesis() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let result = store.update_hypothesis(HypothesisId(42), &HypothesisUpdate::default());
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[test]
fn test_on_disk_database_persists() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("literature.db");

    {
        let mut store = SqliteStore::new(&path).unwrap();
        store.upsert_paper(&Paper::new("2019ApJ").unwrap()).unwrap();
        store.upsert_citation(&citation("2021A", "2019ApJ", Category::Supporting, 0.7)).unwrap();
    }

    let store = SqliteStore::new(&path).unwrap();
    let counts = store.counts().unwrap();
    assert_eq!(counts.papers, 1);
    assert_eq!(counts.citations, 1);
    assert_eq!(counts.hypotheses, 0);
}
