//! AssistOps CLI
//!
//! `assistops-cli "What's the weather in London?"` runs one request and
//! prints the answer. Logs go to stderr.

use assistops::cli::{self, Cli};
use assistops::{config::Config, orchestrator::Orchestrator, telemetry};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    telemetry::init_tracing_stderr();

    let config = Config::from_env();
    let orchestrator = Orchestrator::from_config(&config)?;

    cli::run(&args, &orchestrator, &mut std::io::stdout()).await
}
