//! LLM completion client.
//!
//! Wraps a DeepSeek-compatible chat-completions API behind two call
//! modes: buffered ([`DeepSeekClient::complete`]) and streaming
//! ([`DeepSeekClient::stream`], invoking a callback per content delta).

use thiserror::Error;

pub mod deepseek;

pub use deepseek::DeepSeekClient;

/// Default completion API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";
/// Default model identifier.
pub const DEFAULT_MODEL: &str = "deepseek-chat";
/// Default per-request timeout. Matches the 5-minute abort budget the
/// HTTP-facing caller works with.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Errors surfaced by the completion client.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API key is not configured; set QUILL_API_KEY or run `quill init`")]
    MissingApiKey,

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("malformed completion response: {0}")]
    Malformed(String),
}

/// Connection and sampling settings for the completion client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// Config with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}
