//! Brief generation through the Gemini `generateContent` API
//!
//! The adapter turns a free-text project idea into a [`GeneratedBrief`].
//! Prompts are validated locally first: a blank prompt never reaches the
//! network. Every provider, transport and decoding failure collapses into
//! [`BriefError::GenerationFailed`]; the details are logged, not returned.

use async_trait::async_trait;
use folio_common::content::GeneratedBrief;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const USER_AGENT: &str = concat!("folio-web/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Brief generation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BriefError {
    #[error("Prompt is empty")]
    EmptyPrompt,

    #[error("Could not generate a valid brief")]
    GenerationFailed,
}

/// Anything that can turn a validated prompt into a brief
#[async_trait]
pub trait BriefGenerator: Send + Sync {
    /// Generate a brief for an already trimmed, non-empty prompt
    async fn generate(&self, prompt: &str) -> Result<GeneratedBrief, BriefError>;
}

/// Trim a prompt, rejecting blank input
pub fn validate_prompt(prompt: &str) -> Result<&str, BriefError> {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return Err(BriefError::EmptyPrompt);
    }
    Ok(trimmed)
}

/// Validate then generate
///
/// Blank prompts are rejected without calling the generator.
pub async fn generate_brief(
    generator: &dyn BriefGenerator,
    prompt: &str,
) -> Result<GeneratedBrief, BriefError> {
    let prompt = validate_prompt(prompt)?;
    debug!(chars = prompt.len(), "Generating brief");
    generator.generate(prompt).await
}

/// Instruction sent to the model around the user's idea
pub fn brief_instruction(prompt: &str) -> String {
    format!(
        "Generate a structured UX design brief for the following project idea: \"{}\". \
         The brief should include a clear problem statement, a potential solution, \
         a primary user persona, and 4 key features.",
        prompt
    )
}

/// Request body asking for JSON output matching [`GeneratedBrief`]
pub fn request_body(prompt: &str) -> serde_json::Value {
    json!({
        "contents": [{
            "parts": [{ "text": brief_instruction(prompt) }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "problem": { "type": "STRING" },
                    "solution": { "type": "STRING" },
                    "persona": { "type": "STRING" },
                    "keyFeatures": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" }
                    }
                },
                "required": ["problem", "solution", "persona", "keyFeatures"]
            }
        }
    })
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Extract the brief from a raw `generateContent` response body
pub fn parse_response(body: &str) -> Result<GeneratedBrief, BriefError> {
    let response: GenerateContentResponse = serde_json::from_str(body).map_err(|e| {
        warn!("Brief response is not valid JSON: {}", e);
        BriefError::GenerationFailed
    })?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        warn!("Brief response contained no candidate text");
        return Err(BriefError::GenerationFailed);
    }

    serde_json::from_str(text.trim()).map_err(|e| {
        warn!("Failed to parse brief: {}", e);
        BriefError::GenerationFailed
    })
}

/// Gemini API client
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Result<Self, BriefError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                warn!("Failed to build HTTP client: {}", e);
                BriefError::GenerationFailed
            })?;

        Ok(Self {
            http_client,
            api_key,
            model,
            base_url: GEMINI_BASE_URL.to_string(),
        })
    }

    /// Point the client at another endpoint root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl BriefGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<GeneratedBrief, BriefError> {
        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(prompt))
            .send()
            .await
            .map_err(|e| {
                warn!("Brief request failed: {}", e);
                BriefError::GenerationFailed
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            warn!("Failed to read brief response: {}", e);
            BriefError::GenerationFailed
        })?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Brief provider returned an error");
            debug!("Provider error body: {}", body);
            return Err(BriefError::GenerationFailed);
        }

        let brief = parse_response(&body)?;
        info!(
            model = %self.model,
            features = brief.key_features.len(),
            "Brief generated"
        );
        Ok(brief)
    }
}

/// Stand-in used when no credential is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledBriefGenerator;

#[async_trait]
impl BriefGenerator for DisabledBriefGenerator {
    async fn generate(&self, _prompt: &str) -> Result<GeneratedBrief, BriefError> {
        warn!("Brief requested but no Gemini API key is configured");
        Err(BriefError::GenerationFailed)
    }
}
