//! Generative completion service abstraction plus the Gemini-backed
//! implementation used in production.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::CompleterError;

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
const MAX_OUTPUT_TOKENS: u32 = 200;
const TEMPERATURE: f32 = 0.4;

/// Abstraction over a generative text endpoint so tests can plug in
/// deterministic implementations.
#[async_trait]
pub trait TextCompleter: Send + Sync {
    /// Complete `prompt` to a short text answer.
    async fn complete(&self, prompt: &str) -> Result<String, CompleterError>;
}

/// Configuration for the Gemini REST completer.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

/// Completer backed by the Gemini `generateContent` REST endpoint.
pub struct GeminiCompleter {
    client: Client,
    config: GeminiConfig,
}

impl GeminiCompleter {
    pub fn new(config: GeminiConfig) -> Result<Self, CompleterError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| CompleterError::Transport(format!("failed to build HTTP client: {err}")))?;
        Ok(Self { client, config })
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl TextCompleter for GeminiCompleter {
    async fn complete(&self, prompt: &str) -> Result<String, CompleterError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.api_base.trim_end_matches('/'),
            self.config.model,
            self.config.api_key,
        );

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: MAX_OUTPUT_TOKENS,
                temperature: TEMPERATURE,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    CompleterError::Timeout
                } else {
                    CompleterError::Transport(err.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<response unavailable>".to_string());
            warn!(target: "completer", %status, "completion endpoint rejected request");
            return Err(CompleterError::Transport(format!(
                "endpoint returned {status}: {text}"
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|err| CompleterError::Malformed(err.to_string()))?;

        let text = parsed
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| CompleterError::Malformed("no candidate text in response".into()))?;

        Ok(text)
    }
}

/// Deterministic completer used for tests and offline development.
#[derive(Debug, Default)]
pub struct MockCompleter {
    answer: String,
    calls: Mutex<Vec<String>>,
}

impl MockCompleter {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }
}

#[async_trait]
impl TextCompleter for MockCompleter {
    async fn complete(&self, prompt: &str) -> Result<String, CompleterError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(prompt.to_string());
        }
        Ok(self.answer.clone())
    }
}

/// Completer that always fails, for exercising the best-effort paths.
#[derive(Debug, Default)]
pub struct FailingCompleter;

#[async_trait]
impl TextCompleter for FailingCompleter {
    async fn complete(&self, _prompt: &str) -> Result<String, CompleterError> {
        Err(CompleterError::Timeout)
    }
}
