//! Step executor
//!
//! Runs every step of a plan in order against the [`Toolbox`]. A failing step
//! is recorded and execution moves on; the batch itself cannot fail.

use crate::agents::types::{PlanStep, StepResult};
use crate::tools::{ToolCall, Toolbox};

/// Runs plans against the tool catalog
#[derive(Debug, Clone)]
pub struct StepExecutor {
    toolbox: Toolbox,
}

impl StepExecutor {
    /// Create an executor over a toolbox
    pub fn new(toolbox: Toolbox) -> Self {
        Self { toolbox }
    }

    /// Execute `plan`, returning exactly one result per step in plan order
    pub async fn execute(&self, plan: &[PlanStep]) -> Vec<StepResult> {
        let mut results = Vec::with_capacity(plan.len());

        for (index, step) in plan.iter().enumerate() {
            let reason = if step.reason.is_empty() {
                "Executing step"
            } else {
                step.reason.as_str()
            };
            tracing::info!(step = index + 1, tool = %step.tool, reason = %reason, "Running step");

            let result = self.execute_step(step).await;

            if let Some(error) = &result.error {
                tracing::warn!(step = index + 1, tool = %step.tool, error = %error, "Step failed");
            }
            results.push(result);
        }

        results
    }

    async fn execute_step(&self, step: &PlanStep) -> StepResult {
        match ToolCall::from_parts(&step.tool, &step.args) {
            Ok(call) => {
                let envelope = self.toolbox.invoke(&call).await;
                StepResult::from_envelope(step.clone(), envelope)
            }
            Err(e) => StepResult::failed(step.clone(), e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::types::StepStatus;
    use crate::tools::{GithubClient, WeatherClient};
    use mockito::{Matcher, Server};
    use serde_json::{json, Value};

    fn step(tool: &str, args: Value) -> PlanStep {
        PlanStep {
            tool: tool.to_string(),
            args,
            reason: format!("test {}", tool),
        }
    }

    fn offline_executor() -> StepExecutor {
        let http = reqwest::Client::new();
        StepExecutor::new(Toolbox::new(
            WeatherClient::new(http.clone(), None, "http://127.0.0.1:1"),
            GithubClient::new(http, None, "http://127.0.0.1:1"),
        ))
    }

    fn executor_for(server: &Server) -> StepExecutor {
        let http = reqwest::Client::new();
        StepExecutor::new(Toolbox::new(
            WeatherClient::new(http.clone(), Some("owm-key".into()), server.url()),
            GithubClient::new(http, None, server.url()),
        ))
    }

    #[tokio::test]
    async fn test_empty_plan_yields_no_results() {
        assert!(offline_executor().execute(&[]).await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_tool_fails_step_with_name() {
        let plan = vec![step("book_flight", json!({"to": "Paris"}))];
        let results = offline_executor().execute(&plan).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, StepStatus::Failed);
        assert!(results[0].error.as_deref().unwrap().contains("book_flight"));
        assert!(results[0].output.is_none());
    }

    #[tokio::test]
    async fn test_bad_arguments_fail_step() {
        let plan = vec![step("get_weather", json!({"town": "London"}))];
        let results = offline_executor().execute(&plan).await;

        assert_eq!(results[0].status, StepStatus::Failed);
        assert!(results[0].error.as_deref().unwrap().contains("city"));
    }

    #[tokio::test]
    async fn test_non_object_arguments_fail_only_their_step() {
        let plan = vec![
            step("get_weather", Value::Null),
            step("get_repo_details", json!(["octocat", "hello-world"])),
            step("send_email", json!({})),
        ];
        let results = offline_executor().execute(&plan).await;

        assert_eq!(results.len(), 3);
        for result in &results[..2] {
            assert_eq!(result.status, StepStatus::Failed);
            assert!(result
                .error
                .as_deref()
                .unwrap()
                .starts_with("Invalid arguments"));
            assert!(result.output.is_none());
        }
        // Later steps still ran
        assert_eq!(
            results[2].error.as_deref(),
            Some("Tool 'send_email' not found.")
        );
    }

    #[tokio::test]
    async fn test_failures_do_not_short_circuit_and_order_is_kept() {
        let plan = vec![
            step("nope", json!({})),
            step("get_weather", json!({"city": "London"})),
            step("search_repositories", json!({"query": "rust"})),
        ];
        let results = offline_executor().execute(&plan).await;

        assert_eq!(results.len(), plan.len());
        for (result, planned) in results.iter().zip(&plan) {
            assert_eq!(&result.step, planned);
            assert_eq!(result.status, StepStatus::Failed);
            assert!(!result.error.as_deref().unwrap_or_default().is_empty());
        }
        // The weather adapter reports a missing key, not a transport failure.
        assert_eq!(
            results[1].error.as_deref(),
            Some("OPENWEATHERMAP_API_KEY not set.")
        );
    }

    #[tokio::test]
    async fn test_successful_weather_step_carries_envelope() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/data/2.5/weather")
            .match_query(Matcher::UrlEncoded("q".into(), "London".into()))
            .with_status(200)
            .with_body(
                r#"{"name": "London", "main": {"temp": 11.0, "humidity": 80},
                    "weather": [{"description": "drizzle"}], "wind": {"speed": 3.6}}"#,
            )
            .create_async()
            .await;

        let plan = vec![step("get_weather", json!({"city": "London"}))];
        let results = executor_for(&server).execute(&plan).await;

        mock.assert_async().await;
        assert_eq!(results.len(), 1);
        assert!(results[0].is_success());
        assert!(results[0].error.is_none());

        let value = serde_json::to_value(&results[0]).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["output"]["status"], "success");
        assert_eq!(value["output"]["temperature"], 11.0);
    }

    #[tokio::test]
    async fn test_adapter_reported_failure_matches_step_failure() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/data/2.5/weather")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let plan = vec![step("get_weather", json!({"city": "Nowhereville"}))];
        let results = executor_for(&server).execute(&plan).await;

        mock.assert_async().await;
        assert_eq!(results[0].status, StepStatus::Failed);
        assert_eq!(results[0].error.as_deref(), Some("City not found"));

        let value = serde_json::to_value(&results[0]).unwrap();
        assert_eq!(
            value["output"],
            json!({"error": "City not found", "status": "failed"})
        );
    }

    #[tokio::test]
    async fn test_mixed_plan_runs_every_step() {
        let mut server = Server::new_async().await;
        let search = server
            .mock("GET", "/search/repositories")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"items": []}"#)
            .create_async()
            .await;
        let details = server
            .mock("GET", "/repos/ghost/missing")
            .with_status(404)
            .create_async()
            .await;

        let plan = vec![
            step("get_repo_details", json!({"owner": "ghost", "repo": "missing"})),
            step("search_repositories", json!({"query": "tokio", "limit": 2})),
        ];
        let results = executor_for(&server).execute(&plan).await;

        search.assert_async().await;
        details.assert_async().await;
        assert_eq!(results[0].status, StepStatus::Failed);
        assert_eq!(results[1].status, StepStatus::Success);
    }
}
