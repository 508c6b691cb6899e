//! Shared run session
//!
//! A [`RunSession`] owns the single [`RunState`] of a CLI session and
//! publishes every applied change on a watch channel.
//!
//! Every writer holds a [`LifecycleToken`]. Starting a submission, tracking
//! another run or tearing the session down bumps the epoch, and any mutation
//! carrying an older token is discarded. The epoch check and the mutation
//! happen under the same lock, so a slow response for a superseded run can
//! never land on its successor.
//!
//! Within an epoch every fetch is numbered by a [`FetchTicket`]; a response is
//! applied only if no later fetch has been applied already.

use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::debug;
use vulminator_core::domain::run::{PIPELINE_STARTED_MESSAGE, RunId, RunState, RunStatus};
use vulminator_core::dto::run::RunStatusResponse;

/// Capability to mutate the session during one lifecycle epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleToken {
    epoch: u64,
}

/// Result of an attempted mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The change is visible; carries the status after applying it
    Applied(RunStatus),
    /// Stale token, different run, terminal state or out-of-order status
    Discarded,
}

/// Permission to fetch one run once, in issue order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    run_id: RunId,
    seq: u64,
}

impl FetchTicket {
    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }
}

/// What the poller should do on a cadence tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollTarget {
    Fetch(FetchTicket),
    /// The run already reached a terminal status
    Settled(RunStatus),
    /// The token is stale or no run is tracked
    Superseded,
}

struct Lifecycle {
    epoch: u64,
    state: RunState,
    /// Sequence of the last ticket issued in this epoch
    issued: u64,
    /// Sequence of the newest observation applied in this epoch
    applied: u64,
}

/// Owner of the run state shared by the submitter, the poller and the renderer
pub struct RunSession {
    lifecycle: Mutex<Lifecycle>,
    updates: watch::Sender<RunState>,
    epochs: watch::Sender<u64>,
}

impl RunSession {
    /// Creates an idle session
    pub fn new() -> Self {
        let (updates, _) = watch::channel(RunState::new());
        let (epochs, _) = watch::channel(0);

        Self {
            lifecycle: Mutex::new(Lifecycle {
                epoch: 0,
                state: RunState::new(),
                issued: 0,
                applied: 0,
            }),
            updates,
            epochs,
        }
    }

    /// Receives a snapshot after every applied change
    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.updates.subscribe()
    }

    pub fn snapshot(&self) -> RunState {
        self.lock().state.clone()
    }

    // =============================================================================
    // Lifecycle Transitions
    // =============================================================================

    /// Supersedes the tracked run and clears its results
    ///
    /// The returned token authorizes the outcome of this submission only.
    pub fn begin_submission(&self) -> LifecycleToken {
        self.supersede(|state| state.reset_for_submission())
    }

    /// Supersedes the tracked run and starts following an existing one
    pub fn track(&self, run_id: RunId) -> LifecycleToken {
        self.supersede(|state| state.begin_run(run_id, RunStatus::Queued, ""))
    }

    /// Stops every writer holding a token issued so far
    pub fn teardown(&self) {
        self.supersede(|_| ());
    }

    /// Records the run created by a successful submission
    pub fn accept_submission(
        &self,
        token: LifecycleToken,
        run_id: RunId,
        status: RunStatus,
    ) -> ApplyOutcome {
        self.mutate(token, |lifecycle| {
            lifecycle
                .state
                .begin_run(run_id, status, PIPELINE_STARTED_MESSAGE);
            true
        })
    }

    /// Records a submission that produced no run
    pub fn reject_submission(&self, token: LifecycleToken, error: impl Into<String>) -> ApplyOutcome {
        self.mutate(token, |lifecycle| {
            lifecycle.state.fail_submission(error);
            true
        })
    }

    // =============================================================================
    // Poller Access
    // =============================================================================

    /// Decides whether a cadence tick should fetch
    pub fn poll_target(&self, token: LifecycleToken) -> PollTarget {
        let mut lifecycle = self.lock();

        if lifecycle.epoch != token.epoch {
            return PollTarget::Superseded;
        }

        let run_id = match &lifecycle.state.run_id {
            None => return PollTarget::Superseded,
            Some(_) if lifecycle.state.is_terminal() => {
                return PollTarget::Settled(lifecycle.state.status);
            }
            Some(run_id) => run_id.clone(),
        };

        lifecycle.issued += 1;
        PollTarget::Fetch(FetchTicket {
            run_id,
            seq: lifecycle.issued,
        })
    }

    /// Applies the observation returned for `ticket`
    ///
    /// Discarded when a fetch issued after `ticket` was already applied.
    pub fn apply_observation(
        &self,
        token: LifecycleToken,
        ticket: &FetchTicket,
        observation: RunStatusResponse,
    ) -> ApplyOutcome {
        self.mutate(token, |lifecycle| {
            let applies = ticket.seq > lifecycle.applied
                && lifecycle.state.run_id.as_ref() == Some(&ticket.run_id)
                && lifecycle.state.apply(observation);
            if applies {
                lifecycle.applied = ticket.seq;
            }
            applies
        })
    }

    /// Records that the fetch for `ticket` failed in transport
    ///
    /// Discarded when a fetch issued after `ticket` was already applied.
    pub fn record_transport_error(
        &self,
        token: LifecycleToken,
        ticket: &FetchTicket,
        message: impl Into<String>,
    ) -> ApplyOutcome {
        self.mutate(token, |lifecycle| {
            ticket.seq > lifecycle.applied
                && lifecycle.state.run_id.as_ref() == Some(&ticket.run_id)
                && lifecycle.state.record_transport_error(message)
        })
    }

    /// Resolves once `token` no longer belongs to the current epoch
    pub async fn superseded(&self, token: LifecycleToken) {
        let mut epochs = self.epochs.subscribe();
        // The sender lives as long as `self`, so this only returns on a change.
        let _ = epochs.wait_for(|epoch| *epoch != token.epoch).await;
    }

    fn supersede(&self, reset: impl FnOnce(&mut RunState)) -> LifecycleToken {
        let mut lifecycle = self.lock();
        lifecycle.epoch += 1;
        lifecycle.issued = 0;
        lifecycle.applied = 0;
        reset(&mut lifecycle.state);

        debug!("Session entered lifecycle epoch {}", lifecycle.epoch);
        self.epochs.send_replace(lifecycle.epoch);
        self.updates.send_replace(lifecycle.state.clone());

        LifecycleToken {
            epoch: lifecycle.epoch,
        }
    }

    fn mutate(
        &self,
        token: LifecycleToken,
        apply: impl FnOnce(&mut Lifecycle) -> bool,
    ) -> ApplyOutcome {
        let mut lifecycle = self.lock();

        if lifecycle.epoch != token.epoch || !apply(&mut *lifecycle) {
            return ApplyOutcome::Discarded;
        }

        let status = lifecycle.state.status;
        self.updates.send_replace(lifecycle.state.clone());
        ApplyOutcome::Applied(status)
    }

    fn lock(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RunSession {
    fn default() -> Self {
        Self::new()
    }
}
