//! Scan command handler
//!
//! Submits a repository and follows the new run.

use anyhow::Result;
use clap::Args;
use colored::*;
use std::sync::Arc;
use vulminator_client::ScanClient;
use vulminator_core::domain::run::{RunRequest, ScanPreset};

use crate::commands::follow::follow_run;
use crate::config::Config;
use crate::render::print_run_report;
use crate::scheduler::RunTracker;

/// Arguments of `vulminator scan`
#[derive(Args)]
pub struct ScanArgs {
    /// Repository URL (http or https)
    pub repo_url: String,

    /// Scan depth: fast, balanced or exhaustive
    #[arg(long, default_value_t = ScanPreset::Fast)]
    pub preset: ScanPreset,

    /// GitHub token used to clone private repositories and open pull requests
    #[arg(long, env = "VULMINATOR_GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Skip the AI-written report
    #[arg(long)]
    pub no_report: bool,
}

impl ScanArgs {
    fn to_request(&self) -> RunRequest {
        let request = RunRequest::new(self.repo_url.clone())
            .with_preset(self.preset)
            .with_run_report(!self.no_report);

        match &self.github_token {
            Some(token) => request.with_credential(token.clone()),
            None => request,
        }
    }
}

/// Handle `vulminator scan`
pub async fn handle_scan_command(args: ScanArgs, config: &Config) -> Result<()> {
    let client = Arc::new(ScanClient::new(config.backend_url.clone()));
    let mut tracker = RunTracker::new(client, config.poll_interval);
    let request = args.to_request();

    println!(
        "{} {} ({})",
        "Scanning".bold(),
        request.repository_url.trim().cyan(),
        request.preset.label()
    );

    match tracker.submit(&request).await {
        Ok(run_id) => {
            println!("{} {}", "Run started:".green(), run_id);
            follow_run(&mut tracker).await
        }
        Err(e) => {
            print_run_report(&tracker.snapshot());
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ScanArgs,
    }

    #[test]
    fn test_scan_args_defaults() {
        let cli = TestCli::parse_from(["scan", "https://github.com/org/repo"]);
        let request = cli.args.to_request();

        assert_eq!(request.preset, ScanPreset::Fast);
        assert!(request.run_report);
    }

    #[test]
    fn test_scan_args_map_to_request() {
        let cli = TestCli::parse_from([
            "scan",
            "https://github.com/org/repo",
            "--preset",
            "Exhaustive",
            "--github-token",
            " ghp_secret ",
            "--no-report",
        ]);
        let request = cli.args.to_request();

        assert_eq!(request.preset, ScanPreset::Exhaustive);
        assert_eq!(request.effective_credential(), Some("ghp_secret"));
        assert!(!request.run_report);
    }

    #[test]
    fn test_scan_args_reject_unknown_preset() {
        let result = TestCli::try_parse_from(["scan", "https://github.com/org/repo", "--preset", "deep"]);

        assert!(result.is_err());
    }
}
