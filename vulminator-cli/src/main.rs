//! Vulminator CLI
//!
//! Submits repositories to the Vulminator scan backend and follows the
//! resulting runs until they finish.

mod commands;
mod config;
mod error;
mod render;
mod scheduler;
mod session;

#[cfg(test)]
mod testing;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "vulminator")]
#[command(about = "Vulminator repository scan CLI", long_about = None)]
struct Cli {
    /// Scan backend URL
    #[arg(
        long,
        env = "VULMINATOR_BACKEND_URL",
        default_value = vulminator_client::DEFAULT_BACKEND_URL
    )]
    backend_url: String,

    /// Milliseconds between two fetches of an active run
    #[arg(long, env = "VULMINATOR_POLL_INTERVAL_MS", default_value_t = 2500)]
    poll_interval_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout is reserved for rendered output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vulminator_cli=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::new(cli.backend_url)
        .with_poll_interval(Duration::from_millis(cli.poll_interval_ms));
    config.validate()?;
    debug!("Loaded configuration: {:?}", config);

    handle_command(cli.command, &config).await
}
