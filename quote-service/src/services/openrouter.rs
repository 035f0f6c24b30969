//! OpenRouter chat-completion client.
//!
//! One quote is one `POST {base_url}/chat/completions`. Rate limiting (429)
//! and server errors (5xx) are retried once after a short pause; every other
//! failure ends the call immediately. The outcome of each call sets the
//! `openrouter_up` gauge.

use super::{QuoteGenerator, QuoteMetrics};
use crate::config::OpenRouterConfig;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use std::time::Duration;
use thiserror::Error;

const SYSTEM_PROMPT: &str = "You are a wise philosopher who creates short, meaningful quotes. \
Always respond with only the quote text, nothing else.";

const TEMPERATURE: f64 = 0.8;
const MAX_TOKENS: u32 = 150;
/// Shortest reply accepted as a quote, in characters.
const MIN_QUOTE_CHARS: usize = 10;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("request failed: {0}")]
    Network(String),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("no choices returned from API")]
    NoChoices,

    #[error("generated quote is invalid or too short")]
    TooShort,
}

impl GenerationError {
    /// Only rate limiting and server-side failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationError::Http { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }
}

/// Attempts per call and the pause between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            delay: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

impl ChatMessage {
    fn new(role: &str, content: String) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

fn user_prompt(tag: &str) -> String {
    format!(
        "Generate a meaningful inspirational quote about {}. \
The quote should be 1-2 sentences, insightful, and motivational. \
Only return the quote text itself without any introduction or explanation.",
        tag
    )
}

pub struct OpenRouterClient {
    config: OpenRouterConfig,
    client: Client,
    retry: RetryPolicy,
    metrics: QuoteMetrics,
}

impl OpenRouterClient {
    pub fn new(config: OpenRouterConfig, metrics: QuoteMetrics) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                AppError::InternalError(anyhow::anyhow!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            config,
            client,
            retry: RetryPolicy::default(),
            metrics,
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// One round trip to the completions endpoint.
    async fn request_quote(
        &self,
        request: &ChatCompletionRequest<'_>,
    ) -> Result<String, GenerationError> {
        let url = self.completions_url();

        tracing::debug!(url = %url, model = %self.config.model, "Calling OpenRouter API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), body = %body, "OpenRouter API error");
            return Err(GenerationError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(|e| GenerationError::Decode(e.to_string()))?;

        if let Some(err) = parsed.error {
            return Err(GenerationError::Api(err.message));
        }

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(GenerationError::NoChoices)?;
        let quote = choice.message.content.unwrap_or_default();

        if quote.chars().count() < MIN_QUOTE_CHARS {
            tracing::warn!(quote = %quote, "Generated quote is too short or empty");
            return Err(GenerationError::TooShort);
        }

        Ok(quote)
    }
}

#[async_trait]
impl QuoteGenerator for OpenRouterClient {
    async fn generate_quote(&self, tag: &str) -> Result<String, GenerationError> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage::new("system", SYSTEM_PROMPT.to_string()),
                ChatMessage::new("user", user_prompt(tag)),
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.request_quote(&request).await {
                Ok(quote) => {
                    self.metrics.set_openrouter_status(true);
                    tracing::info!(tag = %tag, attempt, "Generated quote");
                    return Ok(quote);
                }
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    tracing::warn!(error = %e, attempt, "Retrying OpenRouter request");
                    tokio::time::sleep(self.retry.delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    self.metrics.set_openrouter_status(false);
                    tracing::error!(error = %e, attempt, tag = %tag, "Quote generation failed");
                    return Err(e);
                }
            }
        }
    }
}
