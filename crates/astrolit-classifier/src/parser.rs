//! Parse completion-service output into a classification

use astrolit_domain::Category;
use serde_json::Value;
use tracing::{debug, warn};

/// Highest confidence a model answer may report
pub const MAX_MODEL_CONFIDENCE: f64 = 0.99;

/// Confidence assigned when the model omits one, or when the label is
/// recovered by keyword scan
pub const DEFAULT_MODEL_CONFIDENCE: f64 = 0.5;

/// Confidence assigned when an invalid label is coerced to NEUTRAL
pub const COERCED_CONFIDENCE: f64 = 0.3;

/// Keyword scan order for answers that are not JSON
const KEYWORD_PRIORITY: [Category; 6] = [
    Category::Refuting,
    Category::Supporting,
    Category::Contrasting,
    Category::Methodological,
    Category::Contextual,
    Category::Neutral,
];

/// A classification read out of a model answer
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    /// Category, always one of the six
    pub category: Category,

    /// Confidence in [0, 0.99]
    pub confidence: f64,

    /// Justification text
    pub reasoning: String,
}

/// Parse a model answer
///
/// Accepts a bare JSON object, one wrapped in a fenced code block, or one
/// embedded in prose. An unknown label is coerced to NEUTRAL at 0.3. When no
/// JSON object can be read, the raw text is scanned for a category keyword.
/// Returns the reason as `Err` when neither works.
pub fn parse_model_response(response: &str) -> Result<ParsedResponse, String> {
    let json_str = extract_json(response);

    match serde_json::from_str::<Value>(json_str) {
        Ok(Value::Object(obj)) => Ok(parse_object(&obj)),
        Ok(other) => {
            debug!("Model answer is JSON but not an object: {}", other);
            scan_keywords(response).ok_or_else(|| "expected a JSON object".to_string())
        }
        Err(e) => {
            debug!("Model answer is not JSON: {}", e);
            scan_keywords(response).ok_or_else(|| format!("JSON parse error: {}", e))
        }
    }
}

/// Extract the JSON payload, handling markdown code blocks and surrounding prose
fn extract_json(response: &str) -> &str {
    let body = fenced(response, "```json")
        .or_else(|| fenced(response, "```"))
        .unwrap_or(response);

    let trimmed = body.trim();
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

fn fenced<'a>(response: &'a str, opener: &str) -> Option<&'a str> {
    let start = response.find(opener)? + opener.len();
    let rest = &response[start..];
    let end = rest.find("```").unwrap_or(rest.len());
    Some(&rest[..end])
}

fn parse_object(obj: &serde_json::Map<String, Value>) -> ParsedResponse {
    let label = obj
        .get("classification")
        .map(|v| v.as_str().unwrap_or_default())
        .unwrap_or("NEUTRAL");

    let confidence = obj
        .get("confidence")
        .and_then(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
        .filter(|c| c.is_finite())
        .unwrap_or(DEFAULT_MODEL_CONFIDENCE);

    let reasoning = obj
        .get("reasoning")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("LLM classification")
        .to_string();

    match Category::parse(label) {
        Some(category) => ParsedResponse {
            category,
            confidence: confidence.clamp(0.0, MAX_MODEL_CONFIDENCE),
            reasoning,
        },
        None => {
            warn!("Model returned unknown category '{}', using NEUTRAL", label);
            ParsedResponse {
                category: Category::Neutral,
                confidence: COERCED_CONFIDENCE,
                reasoning,
            }
        }
    }
}

fn scan_keywords(response: &str) -> Option<ParsedResponse> {
    let upper = response.to_uppercase();
    KEYWORD_PRIORITY
        .iter()
        .find(|category| upper.contains(category.as_str()))
        .map(|category| ParsedResponse {
            category: *category,
            confidence: DEFAULT_MODEL_CONFIDENCE,
            reasoning: format!(
                "Extracted from non-JSON response: {}",
                response.trim().chars().take(100).collect::<String>()
            ),
        })
}
