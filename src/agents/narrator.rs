//! Result narrator
//!
//! Turns the execution trace into the answer the user reads. The model's text
//! is returned verbatim.

use crate::agents::types::{format_history, ConversationTurn, StepResult};
use crate::llm::LanguageModel;
use std::sync::Arc;

const STYLE_RULES: &str = r#"FORMATTING AND TONE:
1. No bullet points. Never start a line with '*' or '-'.
2. When listing several items (repositories, skills, cities), number them: 1., 2., 3.
3. Highlight project names and key terms with **bold** only. Do not put a colon after a bolded name when a description follows on the same line, e.g. "1. **ClubHub** is a club management platform."
4. Never talk about your own process: no "execution logs", "tool results", "I have reviewed" or "verified answer".
5. Open directly with the answer.
6. When repositories carry topics or descriptions, summarize what they say about the owner's skills and tech stack.
7. When a repository has is_fork = true, explain where it comes from using its parent data.
8. Finish with one concrete recommendation or next step.
9. If a step failed, do not repeat error messages, status codes or field names. Say in plain words what could not be found and ask the user a friendly clarifying question."#;

const NO_RESULTS_GUIDANCE: &str = "No tools were run because the request could not be matched to an action. \
Briefly say what you can help with (current weather for a city, searching GitHub repositories, \
describing a repository, or summarizing a GitHub user's projects and skills) and ask the user to rephrase or add details.";

/// Narrates execution results for the user
#[derive(Clone)]
pub struct ResultNarrator {
    llm: Arc<dyn LanguageModel>,
}

impl ResultNarrator {
    /// Create a narrator on top of a language model
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    /// Produce the final answer for `user_prompt` from `results`
    ///
    /// An empty `results` slice produces a clarification request.
    pub async fn verify_and_finalize(
        &self,
        user_prompt: &str,
        results: &[StepResult],
        history: &[ConversationTurn],
    ) -> String {
        let prompt = build_narrator_prompt(user_prompt, results, history);

        tracing::debug!(
            prompt_len = prompt.len(),
            num_results = results.len(),
            "Requesting narration"
        );

        self.llm.generate_response(&prompt, false).await
    }
}

/// Build the narration prompt: persona, style rules, trace and request
pub fn build_narrator_prompt(
    user_prompt: &str,
    results: &[StepResult],
    history: &[ConversationTurn],
) -> String {
    let trace = serde_json::to_string_pretty(results).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to serialize execution results");
        "[]".to_string()
    });

    let mut prompt = String::from(
        "You are the AssistOps assistant. Speak to the user like a friendly, expert colleague.\n",
    );
    prompt.push_str(&format_history(history));
    prompt.push_str("\n\n");
    prompt.push_str(STYLE_RULES);

    if results.is_empty() {
        prompt.push_str("\n\n");
        prompt.push_str(NO_RESULTS_GUIDANCE);
    }

    prompt.push_str(&format!(
        "\n\nCurrent Query: {}\n\nExecution Results: {}\n\nFinal Answer (direct and actionable):",
        user_prompt, trace
    ));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::types::PlanStep;
    use crate::llm::testing::ScriptedModel;
    use crate::llm::{LlmError, TEXT_FALLBACK};
    use serde_json::json;

    fn weather_result() -> StepResult {
        StepResult::failed(
            PlanStep {
                tool: "get_weather".into(),
                args: json!({"city": "Atlantis"}),
                reason: "weather".into(),
            },
            "City not found",
        )
    }

    #[tokio::test]
    async fn test_returns_model_text_verbatim() {
        let model = Arc::new(ScriptedModel::new(["The weather in London is clear."]));
        let narrator = ResultNarrator::new(model.clone());

        let text = narrator
            .verify_and_finalize("Weather in London", &[], &[])
            .await;

        assert_eq!(text, "The weather in London is clear.");
        let prompts = model.prompts();
        assert!(!prompts[0].1, "narration uses text mode");
    }

    #[tokio::test]
    async fn test_backend_failure_still_yields_text() {
        let model = Arc::new(ScriptedModel::failing(LlmError::Status {
            status: 503,
            body: "overloaded".into(),
        }));
        let narrator = ResultNarrator::new(model);

        let text = narrator.verify_and_finalize("anything", &[], &[]).await;

        assert_eq!(text, TEXT_FALLBACK);
    }

    #[test]
    fn test_prompt_contains_trace_and_query() {
        let prompt = build_narrator_prompt("Weather in Atlantis?", &[weather_result()], &[]);

        assert!(prompt.contains("Current Query: Weather in Atlantis?"));
        assert!(prompt.contains("\"error\": \"City not found\""));
        assert!(prompt.contains("\"status\": \"failed\""));
        assert!(!prompt.contains(NO_RESULTS_GUIDANCE));
        assert!(prompt.ends_with("Final Answer (direct and actionable):"));
    }

    #[test]
    fn test_prompt_asks_for_clarification_without_results() {
        let prompt = build_narrator_prompt("blorp", &[], &[]);

        assert!(prompt.contains(NO_RESULTS_GUIDANCE));
        assert!(prompt.contains("Execution Results: []"));
    }

    #[test]
    fn test_prompt_includes_history() {
        let history = vec![ConversationTurn::new("user", "I live in Leeds")];
        let prompt = build_narrator_prompt("Will it rain?", &[], &history);

        assert!(prompt.contains("user: I live in Leeds"));
    }
}
