//! pdf-preview - Entry point
//!
//! Runs one PDF operation and previews its output.

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    let default_filter = if cli.verbose {
        "pdf_preview=debug"
    } else {
        "pdf_preview=info"
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting pdf-preview");

    match app::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = ?err, "pdf-preview failed");
            eprintln!("error: {}", app::user_message(&err));
            ExitCode::FAILURE
        }
    }
}
