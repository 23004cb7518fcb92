//! Omtale CLI entry point.

use anyhow::Result;
use clap::Parser;
use omtale::cli::{commands, Cli, Commands};
use omtale::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("omtale={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Execute command
    match &cli.command {
        Commands::Summarize {
            name,
            product_type,
            reviews,
        } => {
            commands::run_summarize(name, product_type, *reviews, settings).await?;
        }

        Commands::Prompt {
            name,
            product_type,
            reviews,
        } => {
            commands::run_prompt(name, product_type, *reviews, settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }
    }

    Ok(())
}
