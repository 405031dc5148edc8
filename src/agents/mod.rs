//! Agents
//!
//! The three stages of a request: [`PlanGenerator`] picks tool calls,
//! [`StepExecutor`] runs them, [`ResultNarrator`] writes the answer.

pub mod executor;
pub mod narrator;
pub mod planner;
pub mod types;

pub use executor::StepExecutor;
pub use narrator::ResultNarrator;
pub use planner::{parse_plan, PlanGenerator, PlanParseError};
pub use types::{ConversationTurn, Plan, PlanStep, StepResult, StepStatus};
