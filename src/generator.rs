//! Generative rewriting of card definitions.
//!
//! Callers only ever see one failure signal, [`GenerationError`], and are
//! expected to fall back to the raw definition when they get it.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::constants::CONTENT_TYPE_RAW;

/// Why a generation attempt failed. Callers treat every variant the same.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("Content generation is not configured")]
    Disabled,

    #[error("Request failed: {0}")]
    Request(reqwest::Error),

    #[error("Generator returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("Generator returned no content")]
    EmptyResponse,
}

impl From<reqwest::Error> for GenerationError {
    /// Drops the request URL so nothing from it reaches the logs
    fn from(e: reqwest::Error) -> Self {
        GenerationError::Request(e.without_url())
    }
}

/// Source of generated card content
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Rewrite `definition` in the style named by `content_type`
    async fn generate(&self, definition: &str, content_type: &str)
        -> Result<String, GenerationError>;
}

/// Content styles the generator knows how to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentStyle {
    Summary,
    Explanation,
    Example,
    Mnemonic,
    Code,
}

impl ContentStyle {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "summary" => Some(Self::Summary),
            "explanation" => Some(Self::Explanation),
            "example" => Some(Self::Example),
            "mnemonic" => Some(Self::Mnemonic),
            "code" => Some(Self::Code),
            _ => None,
        }
    }

    fn instruction(self) -> &'static str {
        match self {
            Self::Summary => {
                "Condense the following definition into one or two clear sentences a student can memorize."
            }
            Self::Explanation => {
                "Explain the following concept in simple terms for a beginner, in at most four sentences."
            }
            Self::Example => {
                "Restate the following definition in one sentence, then give one short concrete example."
            }
            Self::Mnemonic => {
                "Restate the following definition in one sentence, then add a short memorable mnemonic."
            }
            Self::Code => {
                "Explain the following programming concept in two sentences, then show a minimal code snippet illustrating it."
            }
        }
    }

    /// Full prompt sent to the model
    pub fn prompt(self, definition: &str) -> String {
        format!(
            "{}\nReturn only the flashcard back text, without markdown headings or preamble.\n\nDefinition:\n{}",
            self.instruction(),
            definition
        )
    }
}

/// Back side of a card before it is persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardBack {
    /// Generator output
    Generated(String),
    /// Raw definition, either by request or because generation failed
    Fallback(String),
}

impl CardBack {
    pub fn into_text(self) -> String {
        match self {
            CardBack::Generated(text) | CardBack::Fallback(text) => text,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, CardBack::Generated(_))
    }
}

/// Whether a content type skips generation
pub fn is_raw(content_type: Option<&str>) -> bool {
    match content_type.map(str::trim) {
        None | Some("") => true,
        Some(tag) => tag.eq_ignore_ascii_case(CONTENT_TYPE_RAW),
    }
}

/// Compute a card's back side, never failing
///
/// Raw mode never calls the generator. Any generator error is logged and
/// replaced by the raw definition.
pub async fn resolve_back(
    generator: &dyn ContentGenerator,
    definition: &str,
    content_type: Option<&str>,
) -> CardBack {
    let tag = match content_type {
        Some(tag) if !is_raw(Some(tag)) => tag,
        _ => return CardBack::Fallback(definition.to_string()),
    };

    match generator.generate(definition, tag).await {
        Ok(text) => CardBack::Generated(text),
        Err(e) => {
            tracing::warn!(content_type = tag, "Generation failed, using raw definition: {}", e);
            CardBack::Fallback(definition.to_string())
        }
    }
}

/// Generator used when no API key is configured; always fails
pub struct DisabledGenerator;

#[async_trait]
impl ContentGenerator for DisabledGenerator {
    async fn generate(&self, _definition: &str, _content_type: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Disabled)
    }
}

// =============================================================================
// Gemini
// =============================================================================

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

impl GeminiResponse {
    /// Text of the first candidate, trimmed
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().map(|part| part.text).collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

/// Content generator backed by the Gemini `generateContent` endpoint
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiGenerator {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model,
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ContentGenerator for GeminiGenerator {
    async fn generate(&self, definition: &str, content_type: &str) -> Result<String, GenerationError> {
        let style = ContentStyle::from_tag(content_type)
            .ok_or_else(|| GenerationError::UnsupportedContentType(content_type.to_string()))?;

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: style.prompt(definition),
                }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerationError::Status(response.status()));
        }

        let body: GeminiResponse = response.json().await?;
        body.into_text().ok_or(GenerationError::EmptyResponse)
    }
}

/// Build the generator selected by configuration
pub fn from_config(config: &Config) -> Box<dyn ContentGenerator> {
    let Some(api_key) = config.gemini_api_key.clone() else {
        tracing::warn!("GEMINI_API_KEY not set; cards will use raw definitions");
        return Box::new(DisabledGenerator);
    };

    let timeout = Duration::from_secs(config.generator_timeout_secs);
    match GeminiGenerator::new(api_key, config.gemini_model.clone(), timeout) {
        Ok(generator) => {
            tracing::info!("Content generation enabled with model {}", config.gemini_model);
            Box::new(generator)
        }
        Err(e) => {
            tracing::error!("Failed to build generator client, disabling generation: {}", e);
            Box::new(DisabledGenerator)
        }
    }
}
