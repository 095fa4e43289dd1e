// ============================================
// LLM Provider Layer
// ============================================
//
// HTTP clients for the external language-model APIs used by the
// semantic ranker and the bio improver. Providers are constructed once
// at startup from config and injected as `Arc<dyn LlmProvider>` so
// tests can substitute a fake without network access.
//
// Supported providers: Anthropic Claude, OpenAI

use crate::config::LlmConfig;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Sampling temperature for every completion. Ranking and rewriting
/// want consistency, not creativity.
const TEMPERATURE: f32 = 0.2;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("provider returned an empty completion")]
    EmptyCompletion,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for `prompt`, bounded by `max_tokens`.
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}

/// Build the configured provider, or `None` when the LLM path is
/// disabled (missing key or `LLM_ENABLED=false`). Callers degrade to
/// their deterministic behavior in that case.
pub fn from_config(config: &LlmConfig) -> Option<Arc<dyn LlmProvider>> {
    if !config.enabled {
        info!("LLM provider disabled by configuration");
        return None;
    }
    if config.api_key.is_empty() {
        warn!("LLM_API_KEY not set, running without a semantic provider");
        return None;
    }

    let timeout = Duration::from_secs(config.timeout_secs);
    let provider: Arc<dyn LlmProvider> = match config.provider.as_str() {
        "anthropic" => Arc::new(AnthropicProvider::new(&config.api_key, &config.model, timeout)),
        "openai" => Arc::new(OpenAIProvider::new(&config.api_key, &config.model, timeout)),
        other => {
            warn!(provider = %other, "Unknown LLM provider, using Anthropic");
            Arc::new(AnthropicProvider::new(&config.api_key, &config.model, timeout))
        }
    };

    info!(
        provider = provider.name(),
        model = %config.model,
        timeout_secs = config.timeout_secs,
        "LLM provider initialized"
    );

    Some(provider)
}

/// Strip a Markdown code fence from a completion. Models regularly wrap
/// the requested JSON in ```json blocks despite instructions not to.
pub fn extract_json_block(response: &str) -> &str {
    if response.contains("```json") {
        response
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .unwrap_or(response)
    } else if response.contains("```") {
        response.split("```").nth(1).unwrap_or(response)
    } else {
        response
    }
}

// ============================================
// Anthropic Claude Provider
// ============================================

pub struct AnthropicProvider {
    client: HttpClient,
    api_key: String,
    model: String,
}

impl AnthropicProvider {
    pub fn new(api_key: &str, model: &str, timeout: Duration) -> Self {
        let client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<AnthropicMessage>,
}

#[derive(Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Deserialize)]
struct AnthropicContent {
    text: String,
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens,
            temperature: TEMPERATURE,
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        let result: AnthropicResponse = response.json().await?;

        result
            .content
            .first()
            .map(|c| c.text.clone())
            .ok_or(LlmError::EmptyCompletion)
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

// ============================================
// OpenAI Provider
// ============================================

pub struct OpenAIProvider {
    client: HttpClient,
    api_key: String,
    model: String,
}

impl OpenAIProvider {
    pub fn new(api_key: &str, model: &str, timeout: Duration) -> Self {
        let client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[derive(Serialize)]
struct OpenAICompletionRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAICompletionResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Deserialize)]
struct OpenAIResponseMessage {
    content: String,
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        let request = OpenAICompletionRequest {
            model: self.model.clone(),
            messages: vec![OpenAIMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        let result: OpenAICompletionResponse = response.json().await?;

        result
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or(LlmError::EmptyCompletion)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
