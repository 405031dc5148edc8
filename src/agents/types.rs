//! Data shared by the planner, executor and narrator

use crate::tools::ToolEnvelope;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One turn of caller-supplied conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// "user" or "assistant"
    pub role: String,
    /// Turn text
    pub content: String,
}

impl ConversationTurn {
    /// Create a turn
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// One tool invocation proposed by the planner
///
/// Decoding is lenient: `null` or missing fields fall back to defaults, and
/// `args` stays raw JSON until the executor resolves it, so one sloppy step
/// cannot invalidate the rest of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    /// Tool name; resolved against the catalog only at execution time
    #[serde(default, deserialize_with = "null_as_default")]
    pub tool: String,
    /// Tool arguments, passed through exactly as the model wrote them
    #[serde(default = "empty_args")]
    pub args: Value,
    /// Why the planner chose this step
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
}

impl Default for PlanStep {
    fn default() -> Self {
        Self {
            tool: String::new(),
            args: empty_args(),
            reason: String::new(),
        }
    }
}

fn empty_args() -> Value {
    Value::Object(Map::new())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Ordered tool invocations for one request; empty means "nothing to do"
pub type Plan = Vec<PlanStep>;

/// Outcome of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// The tool ran and reported success
    Success,
    /// The tool was unknown, rejected its arguments, or reported a failure
    Failed,
}

/// Outcome record for one executed step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    /// The step exactly as planned
    pub step: PlanStep,
    /// The tool's envelope, when the tool ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<ToolEnvelope>,
    /// Failure message, when the step failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// "success" or "failed"
    pub status: StepStatus,
}

impl StepResult {
    /// A step that never reached a tool
    pub fn failed(step: PlanStep, error: impl Into<String>) -> Self {
        Self {
            step,
            output: None,
            error: Some(error.into()),
            status: StepStatus::Failed,
        }
    }

    /// A step whose tool ran; a failed envelope fails the step with the same message
    pub fn from_envelope(step: PlanStep, envelope: ToolEnvelope) -> Self {
        let (status, error) = match envelope.error() {
            Some(message) => (StepStatus::Failed, Some(message.to_string())),
            None => (StepStatus::Success, None),
        };

        Self {
            step,
            output: Some(envelope),
            error,
            status,
        }
    }

    /// Whether the step succeeded
    pub fn is_success(&self) -> bool {
        self.status == StepStatus::Success
    }
}

/// Render history as prompt lines, or an empty string when there is none
pub fn format_history(history: &[ConversationTurn]) -> String {
    if history.is_empty() {
        return String::new();
    }

    let lines: Vec<String> = history
        .iter()
        .map(|turn| format!("{}: {}", turn.role, turn.content))
        .collect();
    format!("\nConversation History:\n{}", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolError;
    use serde_json::json;

    #[test]
    fn test_plan_step_defaults_missing_fields() {
        let step: PlanStep = serde_json::from_value(json!({"tool": "get_weather"})).unwrap();
        assert_eq!(step.tool, "get_weather");
        assert_eq!(step.args, json!({}));
        assert_eq!(step.reason, "");
    }

    #[test]
    fn test_plan_step_tolerates_nulls() {
        let step: PlanStep = serde_json::from_value(json!({
            "tool": "get_weather",
            "args": {"city": "London"},
            "reason": null
        }))
        .unwrap();
        assert_eq!(step.reason, "");
        assert_eq!(step.args["city"], "London");

        // A null `args` is kept so the executor can fail that step alone
        let step: PlanStep =
            serde_json::from_value(json!({"tool": null, "args": null})).unwrap();
        assert_eq!(step.tool, "");
        assert_eq!(step.args, Value::Null);
    }

    #[test]
    fn test_failed_result_serialization_skips_output() {
        let result = StepResult::failed(PlanStep::default(), "Tool '' not found.");
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["status"], "failed");
        assert_eq!(value["error"], "Tool '' not found.");
        assert!(value.get("output").is_none());
    }

    #[test]
    fn test_failed_envelope_fails_step() {
        let envelope = ToolEnvelope::from(Err::<crate::tools::WeatherReport, _>(
            ToolError::CityNotFound,
        ));
        let result = StepResult::from_envelope(PlanStep::default(), envelope);

        assert!(!result.is_success());
        assert_eq!(result.error.as_deref(), Some("City not found"));
        assert!(result.output.is_some());
    }

    #[test]
    fn test_format_history() {
        assert_eq!(format_history(&[]), "");

        let history = vec![
            ConversationTurn::new("user", "Who is octocat?"),
            ConversationTurn::new("assistant", "A GitHub mascot account."),
        ];
        assert_eq!(
            format_history(&history),
            "\nConversation History:\nuser: Who is octocat?\nassistant: A GitHub mascot account."
        );
    }
}
