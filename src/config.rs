//! Configuration management for lekhashuddhi.
//!
//! Settings come from an optional TOML file; every field has a default
//! so the tool runs without any configuration at all. The vocabulary
//! and term-mapping tables are fixed for the duration of a run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default config file name, discovered in the working directory.
pub const CONFIG_FILE_NAME: &str = "lekhashuddhi.toml";

/// Vocabulary terms the curriculum template must contain.
const DEFAULT_VOCABULARY: &[&str] = &[
    "वयोगट",
    "कालावधी",
    "संकल्पना",
    "संकल्पनात्मक वेळ",
    "संवादाची वेळ",
    "मैदानी खेळ",
    "गणिताची वेळ",
    "भाषेची वेळ",
    "सर्जनशीलतेची वेळ",
    "अ‍ॅनिमेटेड व्हिडिओ/ऑडिओ/ डिजिटल फ्लॅशकार्ड",
    "मुद्रित संसाधने",
    "भौतिक संसाधने",
    "किटमधील साहित्य",
    "शिक्षकांकडून संकलित केलेले साहित्य",
    "अध्यान निष्पत्ती",
    "अध्यान क्षेत्रे",
    "३-४ वर्षे",
    "४-५ वर्षे",
    "५-६ वर्षे",
    "वर्ग कार्यपत्रक",
    "गृहपाठ",
    "आय-फेअर",
    "थीम",
    "समारोपाची वेळ",
    "शिकणाऱ्याला",
];

/// Non-standard terms and their standardized counterparts, in the
/// order replacement findings are reported.
const DEFAULT_REPLACEMENTS: &[(&str, &str)] = &[
    ("होमवर्क", "गृहपाठ"),
    ("वर्कशीट", "वर्ग कार्यपत्रक"),
    ("एज ग्रुप", "वयोगट"),
    ("टाईम टेबल", "वेळापत्रक"),
    ("आउटडोअर गेम्स", "मैदानी खेळ"),
    ("क्रिएटिव्हिटी", "सर्जनशीलता"),
    ("विद्यार्थ्याला", "शिकणाऱ्याला"),
];

/// A non-standard term and the standardized term that replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermPair {
    /// Non-standard form found in documents.
    pub from: String,
    /// Standardized form to suggest.
    pub to: String,
}

/// Configuration for the external grammar-review service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarConfig {
    /// Whether grammar review is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// OpenAI-compatible chat completions endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Model to use for grammar review.
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the API credential.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Maximum tokens in a single response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sentences per segment submitted for review.
    #[serde(default = "default_sentences_per_segment")]
    pub sentences_per_segment: usize,
    /// Retry attempts on transport or rate-limit errors.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}
fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}
fn default_max_tokens() -> u32 {
    1500
}
fn default_sentences_per_segment() -> usize {
    15
}
fn default_max_retries() -> u32 {
    3
}
fn default_timeout_secs() -> u64 {
    120
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            max_tokens: default_max_tokens(),
            sentences_per_segment: default_sentences_per_segment(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GrammarConfig {
    /// Resolve the API credential from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok()
    }
}

/// Settings for an audit run. Loaded once; read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Vocabulary terms to presence-check, in report order.
    #[serde(default = "default_vocabulary")]
    pub vocabulary: Vec<String>,
    /// Term mapping for replacement suggestions, in report order.
    #[serde(default = "default_replacements")]
    pub replacements: Vec<TermPair>,
    /// Directory holding the Hunspell dictionary (mr_IN.dic).
    #[serde(default = "default_dictionary_dir")]
    pub dictionary_dir: PathBuf,
    /// External grammar-review service.
    #[serde(default)]
    pub grammar: GrammarConfig,
}

fn default_vocabulary() -> Vec<String> {
    DEFAULT_VOCABULARY.iter().map(|s| s.to_string()).collect()
}

fn default_replacements() -> Vec<TermPair> {
    DEFAULT_REPLACEMENTS
        .iter()
        .map(|(from, to)| TermPair {
            from: from.to_string(),
            to: to.to_string(),
        })
        .collect()
}

fn default_dictionary_dir() -> PathBuf {
    PathBuf::from("resources/mr_IN")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vocabulary: default_vocabulary(),
            replacements: default_replacements(),
            dictionary_dir: default_dictionary_dir(),
            grammar: GrammarConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from an explicit path, or discover
    /// `lekhashuddhi.toml` in the working directory, or fall back to
    /// defaults when no file exists.
    pub fn load(path: Option<&Path>) -> anyhow::Result<(Self, Option<PathBuf>)> {
        let discovered;
        let path = match path {
            Some(p) => Some(p),
            None => {
                discovered = PathBuf::from(CONFIG_FILE_NAME);
                discovered.exists().then_some(discovered.as_path())
            }
        };

        match path {
            Some(p) => {
                let raw = fs::read_to_string(p)?;
                let settings: Settings = toml::from_str(&raw)?;
                Ok((settings, Some(p.to_path_buf())))
            }
            None => Ok((Settings::default(), None)),
        }
    }

    /// The standardized terms, used by the speller to skip tokens that
    /// were introduced intentionally.
    pub fn replacement_targets(&self) -> Vec<&str> {
        self.replacements.iter().map(|p| p.to.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(!settings.vocabulary.is_empty());
        assert!(settings.vocabulary.iter().any(|w| w == "गृहपाठ"));
        assert!(!settings.replacements.is_empty());
        assert_eq!(settings.grammar.sentences_per_segment, 15);
        assert_eq!(settings.grammar.max_tokens, 1500);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let raw = r#"
            [grammar]
            model = "gpt-4.1-mini"
            max_retries = 5
        "#;
        let settings: Settings = toml::from_str(raw).unwrap();
        assert_eq!(settings.grammar.model, "gpt-4.1-mini");
        assert_eq!(settings.grammar.max_retries, 5);
        assert_eq!(settings.grammar.max_tokens, 1500);
        assert!(!settings.vocabulary.is_empty());
    }

    #[test]
    fn test_replacement_targets() {
        let settings = Settings::default();
        let targets = settings.replacement_targets();
        assert!(targets.contains(&"गृहपाठ"));
    }
}
