//! Language-model backend
//!
//! The planner and narrator talk to the model through the [`LanguageModel`]
//! trait. The production implementation is [`OpenRouterClient`]; tests swap in
//! scripted doubles.

pub mod client;
pub mod types;

pub use client::OpenRouterClient;

use async_trait::async_trait;
use thiserror::Error;

/// Returned in JSON mode when the backend fails or answers with nothing
pub const JSON_FALLBACK: &str = "[]";

/// Returned in text mode when the backend fails or answers with nothing
pub const TEXT_FALLBACK: &str =
    "I'm sorry, I couldn't generate a response for that request right now. Could you try again in a moment?";

/// Errors raised by a language-model backend
#[derive(Error, Debug)]
pub enum LlmError {
    /// No API key was configured
    #[error("API key is empty")]
    MissingApiKey,

    /// The HTTP request could not be sent or the body could not be read
    #[error("Failed to reach language model backend: {0}")]
    Request(String),

    /// HTTP 429 from the backend
    #[error("Language model rate limit exceeded (HTTP 429): {0}")]
    RateLimited(String),

    /// Any other non-success HTTP status, or an in-band error object
    #[error("Language model backend returned error status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or in-band error message
        body: String,
    },

    /// The response body was not the expected JSON shape
    #[error("Failed to parse JSON response from language model backend: {0}")]
    Parse(String),

    /// The backend answered without any usable text
    #[error("Language model response contains no content")]
    EmptyResponse,
}

/// A text generator behind an opaque request/response interface
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Run one completion, reporting failures as [`LlmError`]
    async fn complete(&self, prompt: &str, json_mode: bool) -> Result<String, LlmError>;

    /// Run one completion and never fail
    ///
    /// Backend failures and empty answers collapse to [`JSON_FALLBACK`] in JSON
    /// mode and to [`TEXT_FALLBACK`] otherwise.
    async fn generate_response(&self, prompt: &str, json_mode: bool) -> String {
        match self.complete(prompt, json_mode).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                tracing::warn!(json_mode, "Language model returned an empty response");
                fallback_for(json_mode)
            }
            Err(e) => {
                tracing::error!(error = %e, json_mode, "Language model call failed");
                fallback_for(json_mode)
            }
        }
    }
}

fn fallback_for(json_mode: bool) -> String {
    if json_mode {
        JSON_FALLBACK.to_string()
    } else {
        TEXT_FALLBACK.to_string()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted model for unit tests

    use super::{LanguageModel, LlmError};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays queued responses in order and records every prompt it receives
    #[derive(Default)]
    pub struct ScriptedModel {
        responses: Mutex<VecDeque<Result<String, LlmError>>>,
        prompts: Mutex<Vec<(String, bool)>>,
    }

    impl ScriptedModel {
        pub fn new<I, S>(responses: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                responses: Mutex::new(responses.into_iter().map(|r| Ok(r.into())).collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(error: LlmError) -> Self {
            let model = Self::default();
            model.responses.lock().unwrap().push_back(Err(error));
            model
        }

        pub fn prompts(&self) -> Vec<(String, bool)> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn complete(&self, prompt: &str, json_mode: bool) -> Result<String, LlmError> {
            self.prompts
                .lock()
                .unwrap()
                .push((prompt.to_string(), json_mode));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyResponse))
        }
    }
}
