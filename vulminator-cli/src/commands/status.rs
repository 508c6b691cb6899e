//! Status command handler
//!
//! Fetches a run once, without polling.

use anyhow::{Context, Result, bail};
use vulminator_client::ScanClient;
use vulminator_core::domain::run::{RunId, RunState, RunStatus};
use vulminator_core::dto::run::RunStatusResponse;

use crate::config::Config;
use crate::render::print_run_report;

/// Handle `vulminator status`
pub async fn handle_status_command(run_id: &str, json: bool, config: &Config) -> Result<()> {
    let run_id = RunId::new(run_id).context("Run ID cannot be empty")?;
    let client = ScanClient::new(config.backend_url.clone());

    let response = client
        .get_run(&run_id)
        .await
        .with_context(|| format!("Failed to fetch run {}", run_id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let state = state_from_response(run_id, response);
    print_run_report(&state);

    if state.status == RunStatus::Failed {
        bail!("Run failed");
    }

    Ok(())
}

/// Builds a one-off state from a single backend response
fn state_from_response(run_id: RunId, response: RunStatusResponse) -> RunState {
    let mut state = RunState::new();
    state.begin_run(run_id, RunStatus::Idle, "");
    state.apply(response);
    state
}
