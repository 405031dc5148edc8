//! Chat-completions wire types
//!
//! Structs that mirror the OpenAI-compatible JSON format spoken by OpenRouter.

use serde::{Deserialize, Serialize};

/// Request body for `POST /chat/completions`
#[derive(Serialize, Debug)]
pub struct ChatCompletionRequest {
    /// Model identifier (e.g., "google/gemini-2.0-flash-001")
    pub model: String,
    /// Conversation sent to the model; we always send a single user message
    pub messages: Vec<ChatMessage>,
    /// Forces a JSON object response when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

/// A single chat message
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChatMessage {
    /// "user", "assistant" or "system"
    pub role: String,
    /// Message text
    pub content: String,
}

/// Response format selector
#[derive(Serialize, Debug)]
pub struct ResponseFormat {
    /// "json_object" for JSON mode
    #[serde(rename = "type")]
    pub kind: String,
}

impl ResponseFormat {
    /// JSON-only output
    pub fn json_object() -> Self {
        Self {
            kind: "json_object".to_string(),
        }
    }
}

/// Top-level response body
#[derive(Deserialize, Debug)]
pub struct ChatCompletionResponse {
    /// Candidate completions; may be empty
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// OpenRouter reports some upstream failures in-band with a 200 status
    #[serde(default)]
    pub error: Option<ApiError>,
}

/// A single completion choice
#[derive(Deserialize, Debug)]
pub struct Choice {
    /// The generated message
    pub message: ChoiceMessage,
    /// Why the model stopped generating
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message payload of a choice
#[derive(Deserialize, Debug)]
pub struct ChoiceMessage {
    /// Generated text; null when the model produced nothing
    #[serde(default)]
    pub content: Option<String>,
}

/// In-band error object
#[derive(Deserialize, Debug)]
pub struct ApiError {
    /// Human-readable message
    pub message: String,
    /// Provider error code, when given
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}
