//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod follow;
mod health;
mod scan;
mod status;
mod watch;

pub use scan::ScanArgs;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Submit a repository and follow the run until it finishes
    Scan(ScanArgs),
    /// Follow an existing run until it finishes
    Watch {
        /// Run ID returned by a previous scan
        run_id: String,
    },
    /// Fetch the current state of a run once
    Status {
        /// Run ID returned by a previous scan
        run_id: String,

        /// Print the raw backend response as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that the backend is reachable
    Health,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Scan(args) => scan::handle_scan_command(args, config).await,
        Commands::Watch { run_id } => watch::handle_watch_command(&run_id, config).await,
        Commands::Status { run_id, json } => {
            status::handle_status_command(&run_id, json, config).await
        }
        Commands::Health => health::handle_health_command(config).await,
    }
}
