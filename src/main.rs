//! Lektor CLI entry point.

use anyhow::Result;
use clap::Parser;
use lektor::cli::{commands, Cli, Commands};
use lektor::config::Settings;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.as_ref().map(PathBuf::from);
    let settings = Settings::load_from(config_path.as_ref())?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| settings.log_directive(cli.verbose)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    std::fs::create_dir_all(settings.data_dir())?;

    match cli.command {
        Commands::Ask {
            query,
            k,
            model,
            sections,
            no_fragments,
        } => {
            commands::run_ask(
                &query,
                k.map(usize::from),
                model,
                sections,
                !no_fragments,
                settings,
            )
            .await?;
        }

        Commands::Summarize {
            url,
            mode,
            timestamps,
            show_transcript,
        } => {
            commands::run_summarize(&url, mode, timestamps, show_transcript, settings).await?;
        }

        Commands::Transcript { url, timestamps } => {
            commands::run_transcript(&url, timestamps, settings).await?;
        }

        Commands::Modes => {
            commands::run_modes();
        }

        Commands::Serve { host, port } => {
            commands::run_serve(&host, port, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, settings, config_path)?;
        }
    }

    Ok(())
}
