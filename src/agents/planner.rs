//! Plan generator
//!
//! Sends a planning prompt to the language model in JSON mode and turns the
//! answer into a [`Plan`]. Unparsable answers become an empty plan: the caller
//! sees "nothing to do", and the raw answer goes to the log.

use crate::agents::types::{format_history, ConversationTurn, Plan, PlanStep};
use crate::llm::LanguageModel;
use crate::tools::TOOL_CATALOG;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Why a model answer could not be read as a plan
#[derive(Error, Debug)]
pub enum PlanParseError {
    /// The text is not JSON
    #[error("planner response is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// JSON, but neither an array nor an object
    #[error("planner response is a JSON {0}, expected an array of steps")]
    UnexpectedShape(&'static str),

    /// An array element is not a step object
    #[error("planner response contains an invalid step: {0}")]
    InvalidStep(#[source] serde_json::Error),
}

/// Turns requests into plans
#[derive(Clone)]
pub struct PlanGenerator {
    llm: Arc<dyn LanguageModel>,
}

impl PlanGenerator {
    /// Create a planner on top of a language model
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    /// Plan the tool calls for `user_prompt`
    ///
    /// Never fails: a response that cannot be parsed yields an empty plan.
    pub async fn create_plan(&self, user_prompt: &str, history: &[ConversationTurn]) -> Plan {
        let prompt = build_planner_prompt(user_prompt, history);

        tracing::debug!(
            prompt_len = prompt.len(),
            history_len = history.len(),
            "Requesting plan"
        );

        let response = self.llm.generate_response(&prompt, true).await;

        match parse_plan(&response) {
            Ok(plan) => {
                tracing::info!(num_steps = plan.len(), "Planner produced plan");
                plan
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    raw_response = %response,
                    "Planner response could not be parsed, using empty plan"
                );
                Vec::new()
            }
        }
    }
}

/// Build the planning prompt: catalog, argument rules, history and request
pub fn build_planner_prompt(user_prompt: &str, history: &[ConversationTurn]) -> String {
    format!(
        r#"You are the AssistOps planner. Translate the user's request into precise calls to the tools listed below.

ARGUMENT RULES:
- Every argument must be a concrete value taken from the request or the conversation history.
- Never emit placeholders such as "{{repo_name}}", "user_repo_owner", "<username>" or any value wrapped in braces or angle brackets.
- Never invent a repository name the user did not state.
- When the request is about a person's repositories, projects or skills, call list_user_repositories(username="<their GitHub login>") first. Only call get_repo_details for repositories the user named explicitly.
- If nothing in the request maps to a tool, return an empty array.

CONTEXT:
Resolve pronouns and follow-up questions using the conversation history.{history}

AVAILABLE TOOLS:
{catalog}

OUTPUT FORMAT (JSON array only, no prose):
[
    {{"tool": "tool_name", "args": {{"arg1": "value1"}}, "reason": "Why this call is needed"}}
]

Current User Request: {user_prompt}

Plan (JSON Array):"#,
        history = format_history(history),
        catalog = TOOL_CATALOG,
        user_prompt = user_prompt,
    )
}

/// Remove a surrounding Markdown code fence, including a `json` language tag
pub fn strip_code_fence(text: &str) -> &str {
    let Some(inner) = text.split("```").nth(1) else {
        return text.trim();
    };

    inner.strip_prefix("json").unwrap_or(inner).trim()
}

/// Parse a model answer into a plan
///
/// A single step object is accepted and treated as a one-step plan.
///
/// # Errors
/// Returns [`PlanParseError`] when the answer is not a step or list of steps.
pub fn parse_plan(text: &str) -> Result<Plan, PlanParseError> {
    let cleaned = strip_code_fence(text);
    let value: Value = serde_json::from_str(cleaned).map_err(PlanParseError::InvalidJson)?;

    let items = match value {
        Value::Array(items) => items,
        object @ Value::Object(_) => {
            tracing::debug!("Planner returned a single object, wrapping it in a list");
            vec![object]
        }
        Value::Null => return Err(PlanParseError::UnexpectedShape("null")),
        Value::Bool(_) => return Err(PlanParseError::UnexpectedShape("boolean")),
        Value::Number(_) => return Err(PlanParseError::UnexpectedShape("number")),
        Value::String(_) => return Err(PlanParseError::UnexpectedShape("string")),
    };

    items
        .into_iter()
        .map(serde_json::from_value::<PlanStep>)
        .collect::<Result<Plan, _>>()
        .map_err(PlanParseError::InvalidStep)
}
