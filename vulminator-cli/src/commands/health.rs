//! Health command handler

use anyhow::{Context, Result, bail};
use colored::*;
use vulminator_client::ScanClient;

use crate::config::Config;

/// Handle `vulminator health`
pub async fn handle_health_command(config: &Config) -> Result<()> {
    let client = ScanClient::new(config.backend_url.clone());

    let health = client
        .health()
        .await
        .with_context(|| format!("Cannot reach backend at {}", client.base_url()))?;

    if !health.is_ok() {
        bail!("Backend reported status '{}'", health.status);
    }

    println!("{} {}", "Backend OK:".green().bold(), client.base_url());
    if let Some(workspace) = &health.workspace {
        println!("  Workspace: {}", workspace.dimmed());
    }

    Ok(())
}
