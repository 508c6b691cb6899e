//! Run poller
//!
//! Follows one run on a fixed cadence until it reaches a terminal status or
//! its lifecycle token is superseded. Each tick spawns an independent fetch,
//! so a slow backend never delays the next tick; whatever comes back is
//! applied through the session, which discards stale results.

use std::sync::Arc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};
use vulminator_client::RunBackend;
use vulminator_core::domain::run::RunStatus;

use crate::session::{ApplyOutcome, FetchTicket, LifecycleToken, PollTarget, RunSession};

/// Why a poller stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollExit {
    /// The run reached a terminal status
    Settled(RunStatus),
    /// A newer run or a teardown took over the session
    Superseded,
    /// The poller task was aborted
    Cancelled,
}

/// Polls one run and reconciles what it sees into the session
pub struct RunPoller<B: RunBackend + ?Sized> {
    backend: Arc<B>,
    session: Arc<RunSession>,
    interval: Duration,
}

impl<B: RunBackend + ?Sized + 'static> RunPoller<B> {
    /// Creates a new run poller
    pub fn new(backend: Arc<B>, session: Arc<RunSession>, interval: Duration) -> Self {
        Self {
            backend,
            session,
            interval,
        }
    }

    /// Starts polling in a background task
    ///
    /// The first fetch happens immediately.
    pub fn spawn(self, token: LifecycleToken) -> PollHandle {
        PollHandle {
            handle: tokio::spawn(self.run(token)),
            exit: None,
        }
    }

    /// The polling loop
    async fn run(self, token: LifecycleToken) -> PollExit {
        debug!("Starting run poller (interval: {:?})", self.interval);

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Dropped on exit, which aborts fetches still in flight.
        let mut in_flight: JoinSet<ApplyOutcome> = JoinSet::new();

        loop {
            tokio::select! {
                _ = self.session.superseded(token) => {
                    debug!("Run superseded, stopping poller");
                    return PollExit::Superseded;
                }
                _ = ticker.tick() => {
                    match self.session.poll_target(token) {
                        PollTarget::Fetch(ticket) => {
                            debug!("Polling run {}", ticket.run_id());
                            in_flight.spawn(Self::poll_once(
                                Arc::clone(&self.backend),
                                Arc::clone(&self.session),
                                token,
                                ticket,
                            ));
                        }
                        PollTarget::Settled(status) => {
                            debug!("Run already {}, skipping fetch", status);
                            return PollExit::Settled(status);
                        }
                        PollTarget::Superseded => return PollExit::Superseded,
                    }
                }
                Some(joined) = in_flight.join_next() => {
                    match joined {
                        Ok(ApplyOutcome::Applied(status)) if status.is_terminal() => {
                            info!("Run reached terminal status: {}", status);
                            return PollExit::Settled(status);
                        }
                        Ok(_) => {}
                        Err(e) => warn!("Poll task panicked: {}", e),
                    }
                }
            }
        }
    }

    /// Fetches the run once and applies the result
    async fn poll_once(
        backend: Arc<B>,
        session: Arc<RunSession>,
        token: LifecycleToken,
        ticket: FetchTicket,
    ) -> ApplyOutcome {
        match backend.fetch_run(ticket.run_id()).await {
            Ok(observation) => {
                let status = observation.status;
                let outcome = session.apply_observation(token, &ticket, observation);
                if outcome == ApplyOutcome::Discarded {
                    debug!(
                        "Discarded stale observation ({}) for run {}",
                        status,
                        ticket.run_id()
                    );
                }
                outcome
            }
            Err(e) => {
                warn!("Failed to fetch run {}: {}", ticket.run_id(), e);
                let message = if e.is_connection_error() {
                    format!("Cannot reach backend: {}", e)
                } else {
                    format!("Failed to fetch run status: {}", e)
                };
                session.record_transport_error(token, &ticket, message)
            }
        }
    }
}

/// Handle to a running poller
///
/// Dropping the handle aborts the poller.
pub struct PollHandle {
    handle: JoinHandle<PollExit>,
    exit: Option<PollExit>,
}

impl PollHandle {
    /// Aborts the poller and any fetch it has in flight
    pub fn stop(&self) {
        self.handle.abort();
    }

    /// Waits for the poller to stop
    ///
    /// Cancel-safe: dropping the future leaves the poller running.
    pub async fn finished(&mut self) -> PollExit {
        if let Some(exit) = self.exit {
            return exit;
        }

        let exit = match (&mut self.handle).await {
            Ok(exit) => exit,
            Err(e) if e.is_cancelled() => PollExit::Cancelled,
            Err(e) => {
                warn!("Poller task panicked: {}", e);
                PollExit::Cancelled
            }
        };

        self.exit = Some(exit);
        exit
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
