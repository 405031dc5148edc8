//! Chat API
//!
//! `POST /api/chat` runs one request through the planner, executor and
//! narrator and returns every intermediate artifact alongside the answer.
//! History is supplied by the caller on each request and echoed back; nothing
//! is stored server-side.

use crate::agents::ConversationTurn;
use crate::api::utils::validate_query;
use crate::api::SharedOrchestrator;
use crate::error::AppError;
use crate::orchestrator::RunOutcome;
use anyhow::anyhow;
use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

/// Chat request body
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's request
    pub query: String,
    /// Earlier turns of the conversation, oldest first
    #[serde(default)]
    pub history: Option<Vec<ConversationTurn>>,
}

/// POST /api/chat
///
/// # Returns
/// * `Ok(Json<RunOutcome>)` - `status` is "success" or "no_plan"
/// * `Err(AppError)` - invalid query, or the pipeline task died
pub async fn chat(
    State(orchestrator): State<SharedOrchestrator>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<RunOutcome>, AppError> {
    validate_query(&request.query)?;

    let query = request.query;
    let history = request.history.unwrap_or_default();

    info!(
        query_len = query.len(),
        history_len = history.len(),
        "Chat request received"
    );

    // Panics in the pipeline come back as a JoinError
    let outcome = tokio::spawn(async move { orchestrator.run(&query, history).await })
        .await
        .map_err(|e| AppError::Internal(anyhow!("Chat pipeline failed: {}", e)))?;

    info!(
        status = ?outcome.status,
        num_steps = outcome.plan.len(),
        "Chat request completed"
    );

    Ok(Json(outcome))
}
