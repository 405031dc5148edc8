//! AssistOps Library
//!
//! A natural-language request is planned into tool calls by a language model,
//! the calls run against weather and GitHub APIs, and the model narrates the
//! results. The binaries in `src/main.rs` (HTTP server) and `src/bin/cli.rs`
//! (one-shot CLI) are thin wrappers around [`orchestrator::Orchestrator`].

pub mod agents;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod orchestrator;
pub mod telemetry;
pub mod tools;
