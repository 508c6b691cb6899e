//! Terminal rendering of run state
//!
//! [`ProgressPrinter`] prints incremental progress while a run is followed;
//! [`print_run_report`] prints the full picture once it settles.

use chrono::{DateTime, Local, Utc};
use colored::*;
use vulminator_core::classify::FindingKind;
use vulminator_core::domain::finding::{Finding, Severity};
use vulminator_core::domain::run::{RunState, RunStatus};

/// Prints only what changed since the previous snapshot
#[derive(Debug, Default)]
pub struct ProgressPrinter {
    last_status: Option<RunStatus>,
    printed_steps: Vec<String>,
    last_transport_error: Option<DateTime<Utc>>,
}

impl ProgressPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prints status transitions, new timeline steps and new transport errors
    pub fn update(&mut self, state: &RunState) {
        if self.last_status != Some(state.status) {
            self.last_status = Some(state.status);
            let busy = if state.is_busy() {
                "  Agent Vulminator is analyzing...".dimmed().to_string()
            } else {
                String::new()
            };
            println!("{} {}{}", "●".cyan(), colorize_status(state.status), busy);
        }

        let steps = state.timeline();
        for step in new_steps(&self.printed_steps, &steps) {
            println!("  {} {}", "▸".cyan(), step);
        }
        self.printed_steps = steps.iter().map(|s| s.to_string()).collect();

        if let Some(error) = &state.transport_error {
            if self.last_transport_error != Some(error.at) {
                self.last_transport_error = Some(error.at);
                println!("  {} {}", "⚠".yellow(), error.message.yellow());
            }
        }
    }
}

/// Steps not printed yet
///
/// When the new timeline does not extend what was printed (a new run, or a
/// rewritten message), every step is new.
fn new_steps<'a, 'b>(printed: &[String], steps: &'b [&'a str]) -> &'b [&'a str] {
    let extends = printed.len() <= steps.len()
        && printed.iter().zip(steps).all(|(seen, step)| seen == step);

    if extends {
        &steps[printed.len()..]
    } else {
        steps
    }
}

/// Print the full state of a run
pub fn print_run_report(state: &RunState) {
    let heading = match &state.run_id {
        Some(run_id) => format!("Run {}…", run_id.short()),
        None => "Awaiting run".to_string(),
    };

    println!();
    println!("{}", heading.bold());
    println!("  Status:  {}", colorize_status(state.status));

    if let Some(run_id) = &state.run_id {
        println!("  Run ID:  {}", run_id.to_string().dimmed());
    }

    if let Some(updated) = state.updated_at {
        println!(
            "  Updated: {}",
            updated
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .dimmed()
        );
    }

    if let Some(error) = &state.last_error {
        println!("\n{}", "Error:".bold());
        println!("  {}", error.red());
    }

    if let Some(error) = &state.transport_error {
        println!(
            "\n{} {}",
            "Last fetch failed at".yellow(),
            error
                .at
                .with_timezone(&Local)
                .format("%H:%M:%S")
                .to_string()
                .yellow()
        );
        println!("  {}", error.message.yellow());
    }

    if let Some(url) = &state.artifact_url {
        println!("\n{} {}", "Pull request:".bold(), url.cyan().underline());
    }

    let steps = state.timeline();
    if !steps.is_empty() {
        println!("\n{}", "Timeline:".bold());
        for step in steps {
            println!("  {} {}", "▸".cyan(), step);
        }
    }

    let classified = state.classified();

    if !classified.dependency_upgrades.is_empty() {
        print_section("Dependency actions", "Auto-upgraded packages");
        for finding in &classified.dependency_upgrades {
            print_finding(FindingKind::DependencyUpgrade, finding);
        }
    }

    if !classified.refactor_notes.is_empty() {
        print_section("AI refactor attempts", "Commentary drops");
        for finding in &classified.refactor_notes {
            print_finding(FindingKind::RefactorNote, finding);
        }
    }

    print_section("Findings", "Vulnerabilities & warnings");
    if classified.vulnerabilities.is_empty() {
        println!("  {}", "No findings yet. Run a scan.".dimmed());
    }
    for finding in &classified.vulnerabilities {
        print_finding(FindingKind::Vulnerability, finding);
    }
}

fn print_section(eyebrow: &str, title: &str) {
    println!();
    println!("{}", eyebrow.to_uppercase().dimmed());
    println!("{}", title.bold());
    println!("{}", "─".repeat(80).dimmed());
}

fn print_finding(kind: FindingKind, finding: &Finding) {
    let badge = colorize_badge(kind.badge(finding));

    match &finding.file_path {
        Some(path) => println!("  [{}] {}  {}", badge, finding.title.bold(), path.dimmed()),
        None => println!("  [{}] {}", badge, finding.title.bold()),
    }

    if !finding.summary.is_empty() {
        for line in finding.summary.lines() {
            println!("      {}", line);
        }
    }
}

/// Colorize a severity badge
fn colorize_badge(severity: Severity) -> ColoredString {
    let label = severity.label();
    match severity {
        Severity::Info => label.cyan(),
        Severity::Low => label.normal(),
        Severity::Moderate | Severity::Medium | Severity::Warning => label.yellow(),
        Severity::High | Severity::Error => label.red(),
        Severity::Critical => label.red().bold(),
    }
}

/// Colorize run status for display
pub fn colorize_status(status: RunStatus) -> ColoredString {
    let label = status.as_str();
    match status {
        RunStatus::Idle => label.dimmed(),
        RunStatus::Queued => label.yellow(),
        RunStatus::Running => label.cyan(),
        RunStatus::Completed => label.green(),
        RunStatus::Failed => label.red(),
    }
}
