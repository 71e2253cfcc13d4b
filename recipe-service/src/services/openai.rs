//! OpenAI chat-completions client.
//!
//! Issues one bounded outbound request per relay call and normalizes the
//! provider's failure modes into [`ProviderError`].

use crate::config::OpenAiSettings;
use recipe_core::error::AppError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Fixed system instruction describing the desired recipe format.
pub const SYSTEM_PROMPT: &str = "You are a professional chef. Create concise but complete recipes with: dish name, ingredients (with amounts), numbered steps, and one quick tip. Keep it under 500 words.";

// Fixed generation parameters.
const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 800;
const PRESENCE_PENALTY: f64 = 0.1;
const FREQUENCY_PENALTY: f64 = 0.1;

/// Client for the upstream chat-completions API.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    config: OpenAiSettings,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("upstream call exceeded the {0}s deadline")]
    Timeout(u64),

    #[error("upstream rate limit hit")]
    RateLimited,

    #[error("upstream rejected the API credential")]
    Unauthorized,

    #[error("upstream returned status {status}")]
    Api {
        status: u16,
        message: Option<String>,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),
}

impl OpenAiClient {
    pub fn new(config: OpenAiSettings) -> Result<Self, AppError> {
        // The client-level timeout covers the whole exchange including body
        // read; on expiry reqwest drops the connection, aborting the socket.
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    /// Send one chat-completion request carrying the fixed system instruction
    /// and the user's prompt verbatim, and extract the generated recipe text.
    pub async fn generate_recipe(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            presence_penalty: PRESENCE_PENALTY,
            frequency_penalty: FREQUENCY_PENALTY,
        };

        let url = format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        );

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending request to OpenAI API"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            tracing::warn!(status = %status, "OpenAI API returned an error");

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }
            if status.as_u16() == 401 {
                return Err(ProviderError::Unauthorized);
            }

            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: extract_error_message(&error_text),
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                ProviderError::MalformedResponse("completion has no choices".to_string())
            })?;

        if content.trim().is_empty() {
            return Err(ProviderError::MalformedResponse(
                "completion message is empty".to_string(),
            ));
        }

        Ok(content)
    }

    fn classify_transport_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.config.timeout_secs)
        } else if err.is_decode() {
            ProviderError::MalformedResponse(err.to_string())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

/// Pull the human-readable message out of an OpenAI error body, falling back
/// to the raw body text.
fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|b| b.error.message)
        .or_else(|| (!body.trim().is_empty()).then(|| body.to_string()))
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Timeout(_) => AppError::GatewayTimeout(
                "Request timeout. The recipe provider took too long to respond. Please try again."
                    .to_string(),
            ),
            ProviderError::RateLimited => AppError::TooManyRequests(
                "Rate limit exceeded. Please wait a moment and try again.".to_string(),
                None,
            ),
            ProviderError::Unauthorized => AppError::Unauthorized(anyhow::anyhow!(
                "Invalid API key. Please check the OPENAI_API_KEY environment variable."
            )),
            ProviderError::Api { status, message } => AppError::UpstreamError {
                status,
                details: message,
            },
            ProviderError::Network(msg) => {
                AppError::InternalError(anyhow::anyhow!("upstream network error: {}", msg))
            }
            ProviderError::MalformedResponse(msg) => {
                AppError::InternalError(anyhow::anyhow!("malformed upstream response: {}", msg))
            }
        }
    }
}

// ============================================================================
// OpenAI API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
    presence_penalty: f64,
    frequency_penalty: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}
