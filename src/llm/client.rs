//! Cache-backed gateway to the hosted language model
//!
//! Every model request in the crate goes through this client. It owns three
//! responsibilities: enable/disable gating (no credential means every call
//! is skipped, deterministically), an exact-match response cache keyed on
//! the full request payload, and failure isolation — transport and API
//! errors surface as a skipped empty completion, never as an error type.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use crate::core::config::ModelConfig;

/// A single completion request. Every field participates in the cache key.
#[derive(Clone, Debug, Serialize)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// The prompt demands structured (JSON) output
    pub structured: bool,
}

/// Outcome of a completion. `skipped` covers both the disabled client and
/// any transport/model failure; callers never see the underlying error.
#[derive(Clone, Debug, Default)]
pub struct Completion {
    pub text: String,
    pub cached: bool,
    pub skipped: bool,
}

impl Completion {
    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }
}

/// Gateway for model calls: gating, caching, transport
pub struct LlmClient {
    client: Client,
    config: ModelConfig,
    cache: Mutex<ahash::AHashMap<String, String>>,
}

impl LlmClient {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            cache: Mutex::new(ahash::AHashMap::new()),
        }
    }

    /// Whether calls will actually reach the model
    pub fn enabled(&self) -> bool {
        self.config.enabled && !self.config.api_key.is_empty() && !self.config.model.is_empty()
    }

    /// Build a request with this client's sampling parameters
    pub fn request(&self, system_prompt: &str, prompt: &str, structured: bool) -> CompletionRequest {
        CompletionRequest {
            system_prompt: system_prompt.to_string(),
            prompt: prompt.to_string(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            structured,
        }
    }

    /// Seed the response cache with a known completion for a request.
    ///
    /// Subsequent identical requests return the seeded text with
    /// `cached = true` and issue no outbound call. Used for replaying
    /// recorded responses.
    pub fn seed_cache(&self, request: &CompletionRequest, text: impl Into<String>) {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.insert(Self::cache_key(request), text.into());
    }

    /// Issue a completion, consulting the cache first.
    ///
    /// Disabled client: immediately skipped, no side effects. Cache hit:
    /// cached text, no outbound call. Miss: one outbound call; a non-empty
    /// result is cached for the rest of the run. Any failure: skipped.
    pub async fn complete(&self, request: &CompletionRequest) -> Completion {
        if !self.enabled() {
            return Completion::skipped();
        }

        let key = Self::cache_key(request);
        {
            let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(text) = cache.get(&key) {
                return Completion {
                    text: text.clone(),
                    cached: true,
                    skipped: false,
                };
            }
        }

        match self.dispatch(request).await {
            Ok(text) => {
                if !text.is_empty() {
                    let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
                    cache.insert(key, text.clone());
                }
                Completion {
                    text,
                    cached: false,
                    skipped: false,
                }
            }
            Err(message) => {
                tracing::warn!("model call failed, continuing without: {}", message);
                Completion::skipped()
            }
        }
    }

    /// Deterministic digest of the full request payload. Distinct in any
    /// field means a distinct key; identical payloads always collide.
    fn cache_key(request: &CompletionRequest) -> String {
        format!(
            "{}\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{}",
            request.system_prompt,
            request.prompt,
            request.max_tokens,
            request.temperature,
            request.structured
        )
    }

    async fn dispatch(&self, request: &CompletionRequest) -> Result<String, String> {
        let body = ApiRequest {
            model: self.config.model.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: request.system_prompt.clone(),
            messages: vec![Message {
                role: "user".into(),
                content: request.prompt.clone(),
            }],
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(format!("API error: {}", error_text));
        }

        let completion: ApiResponse = response.json().await.map_err(|e| e.to_string())?;

        // Concatenate all returned text segments
        let text: String = completion
            .content
            .iter()
            .map(|block| block.text.as_str())
            .collect();

        Ok(text)
    }
}

#[derive(Serialize)]
struct ApiRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}
