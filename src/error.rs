//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting.
//!
//! Tool and planning failures never reach this type: they are folded into step
//! results and empty plans. `AppError` covers what is left over, such as missing
//! configuration at startup or a request the chat endpoint cannot accept.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// A required configuration value is missing
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// The request body was rejected before any agent ran
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MissingConfig(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_request_maps_to_bad_request() {
        let response = AppError::InvalidRequest("Query cannot be empty".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["status"], 400);
        assert_eq!(body["error"], "Invalid request: Query cannot be empty");
    }

    #[tokio::test]
    async fn test_internal_error_maps_to_500_with_message() {
        let response = AppError::Internal(anyhow!("pipeline task panicked")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("pipeline task panicked"));
    }

    #[test]
    fn test_missing_config_message() {
        let err = AppError::MissingConfig("GEMINI_API_KEY".into());
        assert_eq!(err.to_string(), "Missing configuration: GEMINI_API_KEY");
    }
}
