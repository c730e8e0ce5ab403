//! Paper module - publications identified by bibcode

use crate::DomainError;

/// A published paper
///
/// The bibcode is the immutable identity. Everything else may be back-filled
/// later: a paper is created on first sighting (often with only a bibcode)
/// and enriched when metadata is refreshed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paper {
    /// Unique bibliographic code
    pub bibcode: String,

    /// Title, if known
    pub title: Option<String>,

    /// Abstract text, if known
    pub abstract_text: Option<String>,

    /// Publication year
    pub year: Option<i32>,

    /// Journal or venue
    pub publication: Option<String>,

    /// Number of papers citing this one
    pub citation_count: u32,

    /// Bibcodes this paper references
    pub references: Vec<String>,

    /// Keywords attached by the bibliographic service
    pub keywords: Vec<String>,
}

impl Paper {
    /// Create a paper known only by its bibcode
    ///
    /// # Examples
    ///
    /// ```
    /// use astrolit_domain::Paper;
    ///
    /// let paper = Paper::new("2019ApJ...882L...2S").unwrap()
    ///     .with_title("A disk around a young star")
    ///     .with_year(2019);
    /// assert_eq!(paper.year, Some(2019));
    /// assert!(Paper::new("  ").is_err());
    /// ```
    pub fn new(bibcode: impl Into<String>) -> Result<Self, DomainError> {
        let bibcode = bibcode.into().trim().to_string();
        if bibcode.is_empty() {
            return Err(DomainError::EmptyBibcode);
        }
        Ok(Self {
            bibcode,
            ..Default::default()
        })
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the abstract
    pub fn with_abstract(mut self, text: impl Into<String>) -> Self {
        self.abstract_text = Some(text.into());
        self
    }

    /// Set the publication year
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Set the publication venue
    pub fn with_publication(mut self, publication: impl Into<String>) -> Self {
        self.publication = Some(publication.into());
        self
    }

    /// Set the citation count
    pub fn with_citation_count(mut self, count: u32) -> Self {
        self.citation_count = count;
        self
    }

    /// Set the reference list
    pub fn with_references(mut self, references: Vec<String>) -> Self {
        self.references = references;
        self
    }

    /// Set the keyword list
    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    /// Abstract text, treating blank abstracts as missing
    pub fn abstract_str(&self) -> Option<&str> {
        self.abstract_text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}
