// src/ai.rs
//! AI endpoint adapter: provider abstraction over the text-generation call.
//! The model output is always treated as an untrusted string; the calling
//! stage owns parsing and its documented fallback.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::FetchError;

const GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";

/// One capability: turn a prompt into free text. Implemented by the real
/// Gemini client, a disabled stub (no credential), and test mocks.
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, FetchError>;
    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}

pub type DynTextModel = Arc<dyn TextModel>;

/// Factory: real client when a key is configured, disabled stub otherwise.
pub fn build_model(cfg: &AppConfig) -> DynTextModel {
    match &cfg.ai_key {
        Some(key) => Arc::new(GeminiModel::new(key.clone())),
        None => Arc::new(DisabledModel),
    }
}

/// Google Gemini `generateContent` client.
pub struct GeminiModel {
    http: reqwest::Client,
    api_key: String,
}

#[derive(Serialize)]
struct GenPart<'a> {
    text: &'a str,
}
#[derive(Serialize)]
struct GenContent<'a> {
    parts: Vec<GenPart<'a>>,
}
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenRequest<'a> {
    contents: Vec<GenContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Deserialize)]
struct GenResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}
#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
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

impl GeminiModel {
    pub fn new(api_key: String) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("sixg-intel/0.1")
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(60))
            .build()
            .expect("reqwest client");
        Self { http, api_key }
    }
}

#[async_trait]
impl TextModel for GeminiModel {
    async fn generate(&self, prompt: &str) -> Result<String, FetchError> {
        let req = GenRequest {
            contents: vec![GenContent {
                parts: vec![GenPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.3,
                top_k: 40,
                top_p: 0.95,
                max_output_tokens: 8192,
            },
        };

        let resp = self
            .http
            .post(GEMINI_ENDPOINT)
            .query(&[("key", self.api_key.as_str())])
            .json(&req)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::from_status(status, "gemini"));
        }

        let body: GenResponse = resp
            .json()
            .await
            .map_err(|e| FetchError::Parse(format!("gemini response body: {e}")))?;

        let text = body
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .map(|p| p.text.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(FetchError::Parse("gemini returned no candidate text".into()));
        }
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

/// Used when `AI_KEY` is absent; every stage then takes its fallback path.
pub struct DisabledModel;

#[async_trait]
impl TextModel for DisabledModel {
    async fn generate(&self, _prompt: &str) -> Result<String, FetchError> {
        Err(FetchError::Auth("AI_KEY not configured".into()))
    }
    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Deterministic model for tests: replays canned responses in order.
pub struct MockModel {
    responses: std::sync::Mutex<std::collections::VecDeque<Result<String, FetchError>>>,
}

impl MockModel {
    pub fn new(responses: Vec<Result<String, FetchError>>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses.into()),
        }
    }

    pub fn always(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }
}

#[async_trait]
impl TextModel for MockModel {
    async fn generate(&self, _prompt: &str) -> Result<String, FetchError> {
        let mut g = self.responses.lock().expect("poisoned mock queue");
        match g.pop_front() {
            Some(r) => r,
            // Once the queue is drained, keep failing like a dead endpoint.
            None => Err(FetchError::Network("mock queue exhausted".into())),
        }
    }
    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Strip fenced code block delimiters and any leading/trailing wrapper text
/// down to the outermost JSON value. This is the only repair applied before a
/// strict parse; anything else goes through the documented fallback.
pub fn extract_json(raw: &str) -> &str {
    let trimmed = raw.trim();
    let defenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .map(|s| s.strip_suffix("```").unwrap_or(s))
        .unwrap_or(trimmed)
        .trim();

    // Wrapper prose around the JSON body: cut to the outermost bracket pair.
    let open = defenced.find(['{', '[']);
    let close = defenced.rfind(['}', ']']);
    match (open, close) {
        (Some(a), Some(b)) if a < b => &defenced[a..=b],
        _ => defenced,
    }
}

/// Escape raw control characters that appear inside JSON string literals
/// (line breaks the model forgot to escape). Deterministic, applied only
/// after a strict parse has already failed.
pub fn escape_control_chars_in_strings(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_string = false;
    let mut escaped = false;
    for ch in raw.chars() {
        if in_string {
            if escaped {
                out.push(ch);
                escaped = false;
                continue;
            }
            match ch {
                '\\' => {
                    out.push(ch);
                    escaped = true;
                }
                '"' => {
                    out.push(ch);
                    in_string = false;
                }
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if (c as u32) < 0x20 => {
                    out.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => out.push(c),
            }
        } else {
            if ch == '"' {
                in_string = true;
            }
            out.push(ch);
        }
    }
    out
}
