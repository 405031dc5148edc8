//! Tracing setup
//!
//! `RUST_LOG` takes priority; without it everything logs at `info`.

use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize tracing for the server (logs to stdout)
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .try_init()
        .ok();
}

/// Initialize tracing for the CLI (logs to stderr, keeping stdout for the answer)
pub fn init_tracing_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}
