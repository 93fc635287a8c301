/// LLM Client — the single point of entry for all Gemini API calls in CareerBoost.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All generation goes through a `GenerationClient`, and the production
/// implementation lives here.
///
/// The model is fixed when the client is built. There is no per-request model switch.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content (reason: {reason:?})")]
    EmptyContent { reason: Option<String> },
}

/// One ordered piece of a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentPart {
    pub text: String,
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Text produced by one generation call, plus token accounting when the provider reports it.
#[derive(Debug, Clone)]
pub struct Generated {
    pub text: String,
    pub input_tokens: Option<u32>,
    pub output_tokens: Option<u32>,
}

/// The generation seam. Implement this to swap providers (or to mock them in tests)
/// without touching the router or the handlers.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Submits the ordered parts as a single user turn and returns the generated text.
    async fn submit(&self, parts: &[ContentPart]) -> Result<Generated, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: &'a [ContentPart],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

impl GenerateContentResponse {
    /// Joins the text parts of the first candidate.
    fn into_generated(self) -> Result<Generated, LlmError> {
        let input_tokens = self
            .usage_metadata
            .as_ref()
            .and_then(|u| u.prompt_token_count);
        let output_tokens = self
            .usage_metadata
            .as_ref()
            .and_then(|u| u.candidates_token_count);

        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(LlmError::EmptyContent {
                reason: self.prompt_feedback.and_then(|f| f.block_reason),
            });
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(LlmError::EmptyContent {
                reason: candidate.finish_reason,
            });
        }

        Ok(Generated {
            text,
            input_tokens,
            output_tokens,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// GeminiClient — production implementation
// ────────────────────────────────────────────────────────────────────────────

/// Wraps the Gemini `generateContent` endpoint for a single configured model.
/// One HTTP call per `submit`; failures are returned to the caller, never retried.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key: config.google_api_key.clone(),
            endpoint: generate_content_url(&config.gemini_api_url, &config.gemini_model),
            model: config.gemini_model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn submit(&self, parts: &[ContentPart]) -> Result<Generated, LlmError> {
        let request_body = GenerateContentRequest {
            contents: vec![RequestContent { role: "user", parts }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        let parsed: GenerateContentResponse = serde_json::from_slice(&body)?;
        let generated = parsed.into_generated()?;

        debug!(
            "Gemini call succeeded: model={}, input_tokens={:?}, output_tokens={:?}",
            self.model, generated.input_tokens, generated.output_tokens
        );

        Ok(generated)
    }
}

fn generate_content_url(api_url: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        api_url.trim_end_matches('/'),
        model
    )
}
