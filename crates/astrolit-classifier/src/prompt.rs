//! Prompt contract for model-based citation classification

use astrolit_domain::CompletionRequest;

/// Builds the system instruction and user message for one pair
pub struct PromptBuilder<'a> {
    citing_abstract: &'a str,
    cited_abstract: Option<&'a str>,
    cited_title: Option<&'a str>,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(citing_abstract: &'a str) -> Self {
        Self {
            citing_abstract,
            cited_abstract: None,
            cited_title: None,
        }
    }

    /// Add the cited paper's abstract
    pub fn with_cited_abstract(mut self, text: Option<&'a str>) -> Self {
        self.cited_abstract = text.filter(|t| !t.trim().is_empty());
        self
    }

    /// Add the cited paper's title
    pub fn with_cited_title(mut self, title: Option<&'a str>) -> Self {
        self.cited_title = title.filter(|t| !t.trim().is_empty());
        self
    }

    /// The fixed system instruction
    pub fn system(&self) -> &'static str {
        CLASSIFICATION_INSTRUCTIONS
    }

    /// Build the user message
    pub fn user(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str("Analyze the relationship between these two papers:\n\n");

        prompt.push_str("CITED PAPER:\n");
        prompt.push_str(&format!("Title: {}\n", self.cited_title.unwrap_or("Unknown")));
        prompt.push_str(&format!(
            "Abstract: {}\n\n",
            self.cited_abstract.unwrap_or("No abstract available")
        ));

        prompt.push_str("CITING PAPER (the paper that cites the above):\n");
        prompt.push_str(&format!("Abstract: {}\n\n", self.citing_abstract));

        prompt.push_str(
            "Based on the citing paper's abstract, classify its relationship to the cited paper.",
        );

        prompt
    }

    /// Build the complete completion request
    pub fn build(&self, temperature: f32, max_tokens: u32) -> CompletionRequest {
        CompletionRequest {
            system: self.system().to_string(),
            user: self.user(),
            temperature,
            max_tokens,
        }
    }
}

const CLASSIFICATION_INSTRUCTIONS: &str = r#"You are an expert in analyzing scientific literature, particularly in astronomy and astrophysics. Your task is to classify the relationship between a citing paper and a cited paper based on their abstracts.

Classification categories:
- SUPPORTING: The citing paper agrees with, confirms, validates, builds upon, or extends the cited work's findings or conclusions.
- CONTRASTING: The citing paper disagrees with, challenges, questions, or presents alternative interpretations to the cited work. There is tension but not definitive refutation.
- REFUTING: The citing paper provides strong evidence that definitively rules out, disproves, or renders obsolete the cited work's hypothesis or conclusions. This includes statistical exclusions (e.g., "ruled out at 5σ"), experimental refutations, or clear demonstrations that a theory is no longer viable.
- CONTEXTUAL: The citing paper references the cited work for background, historical context, general statements, or as a review without taking a stance.
- METHODOLOGICAL: The citing paper references the cited work for its methods, data, tools, techniques, software, or observational data without commenting on its conclusions.
- NEUTRAL: Simple acknowledgment or citation without any clear stance or relationship.

Important distinctions:
- REFUTING is stronger than CONTRASTING. REFUTING means the hypothesis/theory is ruled out; CONTRASTING means there is disagreement but the matter is not settled.
- Be particularly careful to identify REFUTING cases, as these are critical for understanding scientific consensus.
- Look for statistical language like "excluded at Xσ", "ruled out", "refuted", "no longer viable".

Respond with a JSON object containing:
- "classification": One of the six categories above
- "confidence": A number between 0 and 1 indicating your confidence
- "reasoning": A brief explanation of why you chose this classification"#;
