//! Configuration for the citation classifier

use crate::error::ClassifierError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::warn;

/// Environment variable selecting the classifier mode
pub const ENV_CLASSIFIER: &str = "LITDB_CLASSIFIER";

/// Environment variable overriding the model identifier
pub const ENV_MODEL: &str = "LITDB_CLASSIFIER_MODEL";

/// Environment variable holding the completion-service credential
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";

/// Environment variable overriding the completion-service endpoint
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";

/// Which classifier handles a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ClassifierMode {
    /// Model first, pattern fallback when the model is unavailable
    #[default]
    Model,
    /// Pattern classifier only
    Pattern,
    /// Model only; unavailability is reported as an error
    ModelOnly,
}

impl ClassifierMode {
    /// Parse a mode name; `llm` and `regex` are accepted as aliases
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "model" | "llm" => Some(ClassifierMode::Model),
            "pattern" | "regex" => Some(ClassifierMode::Pattern),
            "model-only" | "model_only" | "llm-only" => Some(ClassifierMode::ModelOnly),
            _ => None,
        }
    }

    /// Canonical name
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierMode::Model => "model",
            ClassifierMode::Pattern => "pattern",
            ClassifierMode::ModelOnly => "model-only",
        }
    }

    /// True when this mode calls the completion service
    pub fn uses_model(&self) -> bool {
        !matches!(self, ClassifierMode::Pattern)
    }
}

impl fmt::Display for ClassifierMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Classifier mode
    pub mode: ClassifierMode,

    /// Model identifier sent to the completion service
    pub model: String,

    /// Completion-service base URL
    pub endpoint: String,

    /// Completion-service credential; read from the environment, never written out
    #[serde(skip)]
    pub api_key: Option<String>,

    /// Maximum time for a single completion call (seconds)
    pub request_timeout_secs: u64,

    /// Pause after each completion call in a batch (milliseconds)
    pub request_delay_ms: u64,

    /// Sampling temperature
    pub temperature: f32,

    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

impl Default for ClassifierConfig {
    /// Default configuration: model mode with low temperature
    fn default() -> Self {
        Self {
            mode: ClassifierMode::Model,
            model: "gpt-4.1-mini".to_string(),
            endpoint: "https://api.openai.com/v1".to_string(),
            api_key: None,
            request_timeout_secs: 30,
            request_delay_ms: 500,
            temperature: 0.1,
            max_tokens: 500,
        }
    }
}

impl ClassifierConfig {
    /// Offline preset: pattern classifier only, no pacing
    pub fn offline() -> Self {
        Self {
            mode: ClassifierMode::Pattern,
            request_delay_ms: 0,
            ..Self::default()
        }
    }

    /// Apply `LITDB_CLASSIFIER`, `LITDB_CLASSIFIER_MODEL`, `OPENAI_API_KEY`
    /// and `OPENAI_BASE_URL` when set
    ///
    /// An unrecognised, non-blank `LITDB_CLASSIFIER` selects the pattern
    /// classifier.
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    fn apply_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_CLASSIFIER).filter(|v| !v.trim().is_empty()) {
            self.mode = ClassifierMode::parse(&value).unwrap_or_else(|| {
                warn!(value = %value, "Unrecognised {}, using pattern classifier", ENV_CLASSIFIER);
                ClassifierMode::Pattern
            });
        }
        if let Some(model) = lookup(ENV_MODEL).filter(|v| !v.trim().is_empty()) {
            self.model = model;
        }
        if let Some(key) = lookup(ENV_API_KEY).filter(|v| !v.trim().is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.endpoint = url;
        }
    }

    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Get the inter-request delay as a Duration
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// True when a credential is available
    pub fn has_credentials(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ClassifierError> {
        let invalid = |msg: &str| Err(ClassifierError::Config(msg.to_string()));
        if self.request_timeout_secs == 0 {
            return invalid("request_timeout_secs must be greater than 0");
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return invalid("temperature must be between 0.0 and 2.0");
        }
        if self.max_tokens == 0 {
            return invalid("max_tokens must be greater than 0");
        }
        if self.mode.uses_model() && self.model.trim().is_empty() {
            return invalid("model must not be empty");
        }
        if self.mode.uses_model() && self.endpoint.trim().is_empty() {
            return invalid("endpoint must not be empty");
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ClassifierError> {
        toml::from_str(toml_str)
            .map_err(|e| ClassifierError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ClassifierError> {
        toml::to_string_pretty(self)
            .map_err(|e| ClassifierError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        let config = ClassifierConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mode, ClassifierMode::Model);
        assert_eq!(config.model, "gpt-4.1-mini");
        assert_eq!(config.request_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_offline_preset_is_valid() {
        let config = ClassifierConfig::offline();
        assert!(config.validate().is_ok());
        assert_eq!(config.mode, ClassifierMode::Pattern);
        assert!(config.request_delay().is_zero());
    }

    #[test]
    fn test_invalid_timeout() {
        let mut config = ClassifierConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_temperature() {
        let mut config = ClassifierConfig::default();
        config.temperature = 3.5;
        assert!(matches!(config.validate(), Err(ClassifierError::Config(_))));
    }

    #[test]
    fn test_empty_model_rejected_only_when_used() {
        let mut config = ClassifierConfig::default();
        config.model = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("model must not be empty"));

        config.mode = ClassifierMode::Pattern;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        assert!(matches!(
            ClassifierConfig::from_toml("mode = 7"),
            Err(ClassifierError::Config(_))
        ));
    }

    #[test]
    fn test_mode_aliases() {
        assert_eq!(ClassifierMode::parse("LLM"), Some(ClassifierMode::Model));
        assert_eq!(ClassifierMode::parse("regex"), Some(ClassifierMode::Pattern));
        assert_eq!(ClassifierMode::parse("model-only"), Some(ClassifierMode::ModelOnly));
        assert_eq!(ClassifierMode::parse("bayes"), None);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_CLASSIFIER, "regex"),
            (ENV_MODEL, "gpt-4o"),
            (ENV_API_KEY, "sk-test"),
        ]
        .into_iter()
        .collect();

        let mut config = ClassifierConfig::default();
        config.apply_vars(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.mode, ClassifierMode::Pattern);
        assert_eq!(config.model, "gpt-4o");
        assert!(config.has_credentials());
        assert_eq!(config.endpoint, "https://api.openai.com/v1");
    }

    #[test]
    fn test_unknown_env_mode_selects_pattern() {
        let mut config = ClassifierConfig::default();
        config.apply_vars(|name| (name == ENV_CLASSIFIER).then(|| "quantum".to_string()));
        assert_eq!(config.mode, ClassifierMode::Pattern);
    }

    #[test]
    fn test_blank_env_mode_keeps_default() {
        let mut config = ClassifierConfig::default();
        config.apply_vars(|name| (name == ENV_CLASSIFIER).then(|| " ".to_string()));
        assert_eq!(config.mode, ClassifierMode::Model);
    }

    #[test]
    fn test_toml_round_trip_skips_api_key() {
        let mut config = ClassifierConfig::default();
        config.api_key = Some("sk-secret".to_string());
        config.mode = ClassifierMode::ModelOnly;

        let toml_str = config.to_toml().unwrap();
        assert!(!toml_str.contains("sk-secret"));
        assert!(toml_str.contains("model-only"));

        let parsed = ClassifierConfig::from_toml(&toml_str).unwrap();
        assert_eq!(parsed.mode, ClassifierMode::ModelOnly);
        assert_eq!(parsed.api_key, None);
        assert_eq!(parsed.request_timeout_secs, config.request_timeout_secs);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = ClassifierConfig::from_toml("mode = \"pattern\"").unwrap();
        assert_eq!(parsed.mode, ClassifierMode::Pattern);
        assert_eq!(parsed.max_tokens, 500);
    }
}
