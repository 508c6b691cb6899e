//! Watch command handler

use anyhow::{Context, Result};
use colored::*;
use std::sync::Arc;
use vulminator_client::ScanClient;
use vulminator_core::domain::run::RunId;

use crate::commands::follow::follow_run;
use crate::config::Config;
use crate::scheduler::RunTracker;

/// Handle `vulminator watch`
pub async fn handle_watch_command(run_id: &str, config: &Config) -> Result<()> {
    let run_id = RunId::new(run_id).context("Run ID cannot be empty")?;
    let client = Arc::new(ScanClient::new(config.backend_url.clone()));
    let mut tracker = RunTracker::new(client, config.poll_interval);

    println!("{} {}", "Watching run".bold(), run_id.to_string().cyan());
    tracker.track(run_id);

    follow_run(&mut tracker).await
}
