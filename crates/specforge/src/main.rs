//! specforge CLI - prompt-driven authoring of engineering artifacts.
//!
//! Entry point: initializes tracing, parses CLI arguments, and dispatches
//! to the appropriate command handler.

use anyhow::Result;
use clap::Parser;

use specforge::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries command reports and documents.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    Cli::parse().run().await
}
