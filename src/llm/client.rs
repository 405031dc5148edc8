//! OpenRouter API client
//!
//! Direct HTTP client for the OpenAI-compatible chat-completions endpoint.
//! The planner uses it in JSON mode; the narrator uses it for free text.

use crate::config::LlmConfig;
use crate::error::AppError;
use crate::llm::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ResponseFormat,
};
use crate::llm::{LanguageModel, LlmError};
use async_trait::async_trait;

/// Chat-completions client bound to one model
#[derive(Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for OpenRouterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenRouterClient {
    /// Create a client
    ///
    /// # Errors
    /// * `LlmError::MissingApiKey` if `api_key` is empty
    pub fn new(
        http: reqwest::Client,
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        Ok(Self {
            http,
            api_key,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Build a client from application configuration
    ///
    /// # Errors
    /// * `AppError::MissingConfig` if `GEMINI_API_KEY` was not set
    pub fn from_config(http: reqwest::Client, config: &LlmConfig) -> Result<Self, AppError> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            AppError::MissingConfig("GEMINI_API_KEY not found in environment variables".into())
        })?;

        Self::new(http, api_key, config.model.clone(), config.base_url.clone()).map_err(|_| {
            AppError::MissingConfig("GEMINI_API_KEY not found in environment variables".into())
        })
    }

    /// Model name this client sends
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LanguageModel for OpenRouterClient {
    async fn complete(&self, prompt: &str, json_mode: bool) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);

        let request_body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            response_format: json_mode.then(ResponseFormat::json_object),
        };

        tracing::debug!(
            url = %url,
            model = %self.model,
            json_mode,
            prompt_len = prompt.len(),
            "Calling language model"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Request(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            tracing::error!(
                status_code = status.as_u16(),
                error_body = %error_body,
                "Language model returned error status"
            );

            if status.as_u16() == 429 {
                return Err(LlmError::RateLimited(error_body));
            }

            return Err(LlmError::Status {
                status: status.as_u16(),
                body: error_body,
            });
        }

        let response_body = response
            .text()
            .await
            .map_err(|e| LlmError::Request(e.without_url().to_string()))?;

        let parsed: ChatCompletionResponse = serde_json::from_str(&response_body)
            .map_err(|e| LlmError::Parse(format!("{} - Response body: {}", e, response_body)))?;

        if let Some(error) = parsed.error {
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: error.message,
            });
        }

        let choice = parsed.choices.into_iter().next().ok_or(LlmError::EmptyResponse)?;
        let text = choice
            .message
            .content
            .filter(|t| !t.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        tracing::debug!(
            response_len = text.len(),
            finish_reason = ?choice.finish_reason,
            "Received language model response"
        );

        Ok(text)
    }
}
