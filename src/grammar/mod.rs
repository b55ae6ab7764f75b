//! Grammar review via an external language-model capability.
//!
//! The pipeline is decoupled from any specific provider: backends
//! implement [`GrammarBackend`] (submit one numbered segment, get raw
//! response text back), so the reviewer is testable with a
//! deterministic stub. Every submitted segment yields exactly one
//! report; malformed responses and exhausted retries are substituted
//! with a synthetic report carrying the raw content, never aborting
//! the pass.

mod openai;

pub use openai::OpenAiBackend;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

/// Errors from grammar backends.
#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("Backend not configured: {0}")]
    NotConfigured(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// One detected grammar issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarMistake {
    #[serde(default)]
    pub sentence: String,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub suggestion: String,
}

/// Per-segment report parsed from the backend's JSON response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarReport {
    #[serde(default)]
    pub block_number: u32,
    #[serde(default)]
    pub grammar_mistakes: Vec<GrammarMistake>,
}

impl GrammarReport {
    /// Fallback report substituted when a segment's response cannot be
    /// used, keeping the raw content for manual inspection.
    fn synthetic(block_number: u32, label: &str, raw: String) -> Self {
        Self {
            block_number,
            grammar_mistakes: vec![GrammarMistake {
                sentence: String::new(),
                error: label.to_string(),
                suggestion: raw,
            }],
        }
    }
}

/// External grammar-analysis capability: submit one numbered text
/// segment, receive raw response text expected to parse as a
/// [`GrammarReport`].
#[async_trait]
pub trait GrammarBackend: Send + Sync {
    /// Submit a segment for review. `block_number` is 1-based.
    async fn review(&self, block_number: u32, text: &str) -> Result<String, GrammarError>;

    /// Whether the backend can take requests (credential present etc).
    fn is_configured(&self) -> bool;
}

/// Review each segment in order, reporting progress after every
/// segment. Returns exactly one report per input segment.
pub async fn analyze_segments<F>(
    backend: &dyn GrammarBackend,
    segments: &[String],
    mut progress: F,
) -> Vec<GrammarReport>
where
    F: FnMut(usize, usize),
{
    let total = segments.len();
    info!("Starting grammar analysis of {} segments", total);

    let mut reports = Vec::with_capacity(total);
    for (idx, segment) in segments.iter().enumerate() {
        let block_number = (idx + 1) as u32;
        info!("Analyzing segment {}/{}", block_number, total);

        let report = match backend.review(block_number, segment).await {
            Ok(raw) => parse_report(block_number, &raw),
            Err(err) => {
                error!("Grammar service failed on segment {}: {}", block_number, err);
                GrammarReport::synthetic(block_number, "Service error", err.to_string())
            }
        };
        reports.push(report);
        progress(idx + 1, total);
    }

    info!("Grammar analysis complete");
    reports
}

/// Parse a backend response, tolerating Markdown code fences. On
/// failure the raw content is preserved in a synthetic report.
fn parse_report(block_number: u32, raw: &str) -> GrammarReport {
    let content = raw.replace("```json", "").replace("```", "");
    let content = content.trim();
    match serde_json::from_str::<GrammarReport>(content) {
        Ok(report) => report,
        Err(err) => {
            error!("JSON parse error in segment {}: {}", block_number, err);
            GrammarReport::synthetic(block_number, "Parse error", content.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scripted backend returning canned responses per block number.
    struct ScriptedBackend {
        responses: Vec<Result<String, ()>>,
    }

    #[async_trait]
    impl GrammarBackend for ScriptedBackend {
        async fn review(&self, block_number: u32, _text: &str) -> Result<String, GrammarError> {
            match &self.responses[(block_number - 1) as usize] {
                Ok(raw) => Ok(raw.clone()),
                Err(()) => Err(GrammarError::Connection("refused".to_string())),
            }
        }

        fn is_configured(&self) -> bool {
            true
        }
    }

    fn valid_response(block: u32) -> String {
        serde_json::to_string(&GrammarReport {
            block_number: block,
            grammar_mistakes: vec![GrammarMistake {
                sentence: "चुकीचे वाक्य".to_string(),
                error: "क्रियापद".to_string(),
                suggestion: "बरोबर वाक्य".to_string(),
            }],
        })
        .unwrap()
    }

    fn segments(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("मजकूर {}", i + 1)).collect()
    }

    #[tokio::test]
    async fn test_malformed_response_yields_synthetic_report() {
        let backend = ScriptedBackend {
            responses: vec![
                Ok(valid_response(1)),
                Ok("this is not json".to_string()),
                Ok(valid_response(3)),
            ],
        };
        let reports = analyze_segments(&backend, &segments(3), |_, _| {}).await;
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].block_number, 1);
        assert_eq!(reports[1].grammar_mistakes.len(), 1);
        assert_eq!(reports[1].grammar_mistakes[0].error, "Parse error");
        assert_eq!(reports[1].grammar_mistakes[0].suggestion, "this is not json");
        assert_eq!(reports[2].block_number, 3);
    }

    #[tokio::test]
    async fn test_code_fences_stripped_before_parse() {
        let fenced = format!("```json\n{}\n```", valid_response(1));
        let backend = ScriptedBackend {
            responses: vec![Ok(fenced)],
        };
        let reports = analyze_segments(&backend, &segments(1), |_, _| {}).await;
        assert_eq!(reports[0].grammar_mistakes[0].error, "क्रियापद");
    }

    #[tokio::test]
    async fn test_backend_failure_yields_synthetic_report() {
        let backend = ScriptedBackend {
            responses: vec![Err(())],
        };
        let reports = analyze_segments(&backend, &segments(1), |_, _| {}).await;
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].block_number, 1);
        assert_eq!(reports[0].grammar_mistakes[0].error, "Service error");
    }

    #[tokio::test]
    async fn test_progress_reported_per_segment() {
        let backend = ScriptedBackend {
            responses: vec![Ok(valid_response(1)), Ok(valid_response(2))],
        };
        let mut seen = Vec::new();
        analyze_segments(&backend, &segments(2), |done, total| seen.push((done, total))).await;
        assert_eq!(seen, vec![(1, 2), (2, 2)]);
    }
}
