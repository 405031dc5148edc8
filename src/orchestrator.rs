//! Orchestrator
//!
//! Sequences plan → execute → narrate for one request. Each phase runs once,
//! in order; there is no re-planning and no partial re-execution.

use crate::agents::{
    ConversationTurn, Plan, PlanGenerator, PlanStep, ResultNarrator, StepExecutor, StepResult,
};
use crate::config::Config;
use crate::error::AppError;
use crate::llm::{LanguageModel, OpenRouterClient};
use crate::tools::Toolbox;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Overall outcome of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// A plan was produced and executed
    Success,
    /// The planner found nothing actionable; only narration ran
    NoPlan,
}

/// Everything a request produced, in the shape the chat endpoint returns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    /// The request as received
    pub query: String,
    /// The plan that was executed
    pub plan: Plan,
    /// One result per plan step
    pub results: Vec<StepResult>,
    /// Narrated answer
    pub verified_output: String,
    /// "success" or "no_plan"
    pub status: RunStatus,
    /// Caller-supplied history, echoed back unchanged
    pub history: Vec<ConversationTurn>,
}

/// The three agents wired together
#[derive(Clone)]
pub struct Orchestrator {
    planner: PlanGenerator,
    executor: StepExecutor,
    narrator: ResultNarrator,
}

impl Orchestrator {
    /// Wire the agents around an existing model and toolbox
    pub fn new(llm: Arc<dyn LanguageModel>, toolbox: Toolbox) -> Self {
        Self {
            planner: PlanGenerator::new(llm.clone()),
            executor: StepExecutor::new(toolbox),
            narrator: ResultNarrator::new(llm),
        }
    }

    /// Build the production model client and toolbox from configuration
    ///
    /// # Errors
    /// * `AppError::MissingConfig` if the model credential is absent
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::new();
        let llm = OpenRouterClient::from_config(http.clone(), &config.llm)?;

        tracing::info!(
            model = %llm.model(),
            github_authenticated = config.tools.github_token.is_some(),
            weather_configured = config.tools.weather_api_key.is_some(),
            "Orchestrator initialized"
        );

        Ok(Self::new(
            Arc::new(llm),
            Toolbox::from_config(http, &config.tools),
        ))
    }

    /// Planning phase
    pub async fn plan(&self, query: &str, history: &[ConversationTurn]) -> Plan {
        self.planner.create_plan(query, history).await
    }

    /// Execution phase
    pub async fn execute(&self, plan: &[PlanStep]) -> Vec<StepResult> {
        self.executor.execute(plan).await
    }

    /// Narration phase
    pub async fn narrate(
        &self,
        query: &str,
        results: &[StepResult],
        history: &[ConversationTurn],
    ) -> String {
        self.narrator
            .verify_and_finalize(query, results, history)
            .await
    }

    /// Run all phases for one request
    pub async fn run(&self, query: &str, history: Vec<ConversationTurn>) -> RunOutcome {
        let plan = self.plan(query, &history).await;

        if plan.is_empty() {
            tracing::info!("No actionable plan, asking for clarification");
            let verified_output = self.narrate(query, &[], &history).await;
            return RunOutcome {
                query: query.to_string(),
                plan: Vec::new(),
                results: Vec::new(),
                verified_output,
                status: RunStatus::NoPlan,
                history,
            };
        }

        let results = self.execute(&plan).await;
        let failed = results.iter().filter(|r| !r.is_success()).count();
        tracing::info!(
            num_steps = results.len(),
            failed_steps = failed,
            "Plan executed"
        );

        let verified_output = self.narrate(query, &results, &history).await;

        RunOutcome {
            query: query.to_string(),
            plan,
            results,
            verified_output,
            status: RunStatus::Success,
            history,
        }
    }
}
