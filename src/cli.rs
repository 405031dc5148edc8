//! Command-line interface
//!
//! One-shot mode: plan, execute and narrate a single request, printing the
//! plan size and then the answer.

use crate::orchestrator::Orchestrator;
use clap::Parser;
use std::io::Write;

/// AssistOps: AI operations assistant
#[derive(Parser, Debug)]
#[command(name = "assistops-cli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// The request to answer, e.g. "What's the weather in London?"
    pub query: String,

    /// Print the full outcome (plan, results, answer) as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run one request and write the result to `out`
///
/// When no plan can be formed the text output is a short notice and the
/// function still returns `Ok`.
pub async fn run<W: Write>(
    cli: &Cli,
    orchestrator: &Orchestrator,
    out: &mut W,
) -> anyhow::Result<()> {
    if cli.json {
        let outcome = orchestrator.run(&cli.query, Vec::new()).await;
        writeln!(out, "{}", serde_json::to_string_pretty(&outcome)?)?;
        return Ok(());
    }

    writeln!(out, "Task: {}", cli.query)?;

    let plan = orchestrator.plan(&cli.query, &[]).await;
    if plan.is_empty() {
        writeln!(out, "Planner could not generate a plan for this request.")?;
        return Ok(());
    }
    writeln!(out, "Plan ready (Steps: {})", plan.len())?;

    let results = orchestrator.execute(&plan).await;
    let answer = orchestrator.narrate(&cli.query, &results, &[]).await;

    render_answer(out, &answer)
}

fn render_answer<W: Write>(out: &mut W, answer: &str) -> anyhow::Result<()> {
    writeln!(out, "\n--- FINAL ANSWER ---")?;
    writeln!(out, "{}", answer)?;
    writeln!(out, "--------------------")?;
    Ok(())
}
