//! Following a run to completion
//!
//! Shared by `scan` and `watch`: prints progress as the session changes and
//! the full report once the poller stops.

use anyhow::{Result, bail};
use colored::*;
use tokio::signal;
use tracing::{debug, warn};
use vulminator_client::RunBackend;
use vulminator_core::domain::run::RunStatus;

use crate::render::{ProgressPrinter, print_run_report};
use crate::scheduler::{PollExit, RunTracker};

/// Follows the tracked run until it settles or the user interrupts
///
/// Fails when the run ends `failed`.
pub async fn follow_run<B: RunBackend + ?Sized + 'static>(tracker: &mut RunTracker<B>) -> Result<()> {
    let mut updates = tracker.subscribe();
    let mut printer = ProgressPrinter::new();
    printer.update(&updates.borrow_and_update().clone());

    let interrupt = signal::ctrl_c();
    tokio::pin!(interrupt);

    let exit = loop {
        tokio::select! {
            exit = tracker.wait_until_settled() => break exit,
            changed = updates.changed() => {
                if changed.is_err() {
                    break PollExit::Superseded;
                }
                let state = updates.borrow_and_update().clone();
                printer.update(&state);
            }
            result = &mut interrupt => {
                if let Err(e) = result {
                    warn!("Failed to listen for interrupt: {}", e);
                }
                break PollExit::Cancelled;
            }
        }
    };
    debug!("Stopped following run: {:?}", exit);

    if exit == PollExit::Cancelled {
        tracker.shutdown();
        println!(
            "\n{}",
            "Stopped following; the run keeps going on the backend.".yellow()
        );
    }

    let state = tracker.snapshot();
    printer.update(&state);
    print_run_report(&state);

    if state.status == RunStatus::Failed {
        match &state.run_id {
            Some(run_id) => bail!("Run {} failed", run_id),
            None => bail!("Run failed"),
        }
    }

    Ok(())
}
