//! OpenAI-compatible chat-completions grammar backend.
//!
//! Sends each segment with a fixed Marathi reviewer instruction,
//! deterministic sampling (temperature 0) and a bounded output budget.
//! Transport failures and rate limits are retried with exponential
//! backoff up to the configured budget.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::GrammarConfig;

use super::{GrammarBackend, GrammarError};

/// Reviewer instruction: examine each block, identify grammar errors,
/// and answer with a JSON report of block_number and grammar_mistakes.
const SYSTEM_PROMPT: &str = r#"आपण एक मराठी व्याकरण तज्ज्ञ आहात. खाली दिलेल्या मजकुरामधील प्रत्येक ब्लॉकचे सूक्ष्म
निरीक्षण करा आणि व्याकरणाच्या चुका शोधा. त्या चुका ओळखा आणि स्पष्ट करा.
प्रत्येक ब्लॉकसाठी एक JSON रिपोर्ट तयार करा ज्यात "block_number" आणि
"grammar_mistakes" ही फील्ड्स असाव्यात.
"grammar_mistakes" मध्ये प्रत्येक चुकीसाठी वाक्य, चूक कुठे आहे
(शब्द/वाक्यरचना), आणि योग्य पर्याय यांचा समावेश असावा.

रिपोर्ट फॉर्मॅट:
{
    "block_number": <ब्लॉक क्रमांक>,
    "grammar_mistakes": [
        {
            "sentence": "<चुकीचं वाक्य>",
            "error": "<त्रुटीचे वर्णन>",
            "suggestion": "<सुधारलेलं वाक्य>"
        },
        ...
    ]
}"#;

/// Base delay for exponential backoff, in milliseconds.
const BACKOFF_BASE_MS: u64 = 1000;

/// Cap on a single backoff sleep.
const BACKOFF_MAX: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Grammar backend speaking the OpenAI chat-completions protocol.
pub struct OpenAiBackend {
    config: GrammarConfig,
    api_key: Option<String>,
    client: Client,
}

impl OpenAiBackend {
    /// Create a backend from configuration; the credential comes from
    /// the configured environment variable.
    pub fn new(config: GrammarConfig) -> Result<Self, GrammarError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GrammarError::Connection(format!("Failed to create HTTP client: {}", e)))?;
        let api_key = config.api_key();
        Ok(Self {
            config,
            api_key,
            client,
        })
    }

    fn user_prompt(block_number: u32, text: &str) -> String {
        format!(
            "या दस्तऐवजाच्या ब्लॉक क्रमांक {} वरील मजकूर खाली दिला आहे:\n\n{}\n\nकृपया दिलेल्या पृष्ठातील मराठी व्याकरण तपासा.",
            block_number, text
        )
    }

    async fn call_once(&self, api_key: &str, request: &ChatRequest) -> Result<String, GrammarError> {
        let url = format!("{}/chat/completions", self.config.endpoint);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| GrammarError::Connection(e.to_string()))?;

        let status = resp.status();
        if status.as_u16() == 429 || status.is_server_error() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GrammarError::Api(format!("HTTP {}: {}", status, body)));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            // Client errors (bad key, bad model) will not improve on
            // retry; fail the segment immediately.
            return Err(GrammarError::NotConfigured(format!("HTTP {}: {}", status, body)));
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| GrammarError::Parse(e.to_string()))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| GrammarError::Parse("Empty completion response".to_string()))
    }
}

/// Exponential backoff delay for the given attempt.
fn backoff_delay(attempt: u32) -> Duration {
    let millis = BACKOFF_BASE_MS.saturating_mul(1u64 << attempt.min(16));
    Duration::from_millis(millis).min(BACKOFF_MAX)
}

#[async_trait]
impl GrammarBackend for OpenAiBackend {
    async fn review(&self, block_number: u32, text: &str) -> Result<String, GrammarError> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            GrammarError::NotConfigured(format!(
                "{} not set in the environment",
                self.config.api_key_env
            ))
        })?;

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: Self::user_prompt(block_number, text),
                },
            ],
            temperature: 0.0,
            max_tokens: self.config.max_tokens,
        };

        debug!("Submitting block {} ({} chars)", block_number, text.len());
        let mut attempt = 0;
        loop {
            match self.call_once(api_key, &request).await {
                Ok(content) => return Ok(content),
                Err(err @ GrammarError::NotConfigured(_)) | Err(err @ GrammarError::Parse(_)) => {
                    return Err(err)
                }
                Err(err) => {
                    if attempt >= self.config.max_retries {
                        return Err(err);
                    }
                    let wait = backoff_delay(attempt);
                    warn!(
                        "Grammar request failed (attempt {}): {}; retrying in {:?}",
                        attempt + 1,
                        err,
                        wait
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
            }
        }
    }

    fn is_configured(&self) -> bool {
        self.config.enabled && self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_and_caps() {
        assert_eq!(backoff_delay(0), Duration::from_millis(1000));
        assert_eq!(backoff_delay(1), Duration::from_millis(2000));
        assert_eq!(backoff_delay(2), Duration::from_millis(4000));
        assert_eq!(backoff_delay(10), BACKOFF_MAX);
    }

    #[test]
    fn test_user_prompt_carries_ordinal_and_text() {
        let prompt = OpenAiBackend::user_prompt(3, "नमुना मजकूर");
        assert!(prompt.contains("ब्लॉक क्रमांक 3"));
        assert!(prompt.contains("नमुना मजकूर"));
    }

    #[test]
    fn test_unconfigured_without_api_key() {
        let mut config = GrammarConfig::default();
        config.api_key_env = "LEKHA_TEST_MISSING_KEY".to_string();
        let backend = OpenAiBackend::new(config).unwrap();
        assert!(!backend.is_configured());
    }

    #[tokio::test]
    async fn test_review_without_key_fails_fast() {
        let mut config = GrammarConfig::default();
        config.api_key_env = "LEKHA_TEST_MISSING_KEY".to_string();
        let backend = OpenAiBackend::new(config).unwrap();
        let err = backend.review(1, "मजकूर").await.unwrap_err();
        assert!(matches!(err, GrammarError::NotConfigured(_)));
    }

    #[test]
    fn test_debug_prints_marathi_prompt() {
        assert!(SYSTEM_PROMPT.contains("block_number"));
        assert!(SYSTEM_PROMPT.contains("grammar_mistakes"));
    }
}
