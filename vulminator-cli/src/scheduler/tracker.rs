//! Run tracker
//!
//! Ties the submitter, the poller and the session together for one CLI
//! session. The submitter writes the session while a submission is pending;
//! the poller writes it afterwards.

use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::Duration;
use tracing::{info, warn};
use vulminator_client::RunBackend;
use vulminator_core::domain::run::{RunId, RunRequest, RunState};

use crate::error::SubmissionError;
use crate::scheduler::poller::{PollExit, PollHandle, RunPoller};
use crate::scheduler::submitter::RunSubmitter;
use crate::session::{LifecycleToken, RunSession};

/// Submits runs and follows them until they finish
pub struct RunTracker<B: RunBackend + ?Sized + 'static> {
    backend: Arc<B>,
    session: Arc<RunSession>,
    submitter: RunSubmitter<B>,
    poll_interval: Duration,
    poller: Option<PollHandle>,
}

impl<B: RunBackend + ?Sized + 'static> RunTracker<B> {
    /// Creates a tracker with an idle session
    pub fn new(backend: Arc<B>, poll_interval: Duration) -> Self {
        Self {
            submitter: RunSubmitter::new(Arc::clone(&backend)),
            backend,
            session: Arc::new(RunSession::new()),
            poll_interval,
            poller: None,
        }
    }

    /// Receives a snapshot after every change to the run state
    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.session.subscribe()
    }

    pub fn snapshot(&self) -> RunState {
        self.session.snapshot()
    }

    /// Submits a new run, superseding whatever was tracked before
    ///
    /// On success the poller starts immediately. On failure the session ends
    /// up `failed` with the error recorded and no run id.
    pub async fn submit(&mut self, request: &RunRequest) -> Result<RunId, SubmissionError> {
        self.stop_poller();
        let token = self.session.begin_submission();

        match self.submitter.submit(request).await {
            Ok(accepted) => {
                info!("Run {} accepted ({})", accepted.run_id, accepted.status);
                self.session
                    .accept_submission(token, accepted.run_id.clone(), accepted.status);
                self.start_poller(token);
                Ok(accepted.run_id)
            }
            Err(e) => {
                warn!("Submission failed: {}", e);
                self.session.reject_submission(token, e.to_string());
                Err(e)
            }
        }
    }

    /// Follows a run that was submitted elsewhere
    pub fn track(&mut self, run_id: RunId) {
        self.stop_poller();
        info!("Tracking run {}", run_id);
        let token = self.session.track(run_id);
        self.start_poller(token);
    }

    /// Waits until the current poller stops
    ///
    /// Returns [`PollExit::Superseded`] right away when nothing is polled.
    /// Cancel-safe.
    pub async fn wait_until_settled(&mut self) -> PollExit {
        match self.poller.as_mut() {
            Some(poller) => poller.finished().await,
            None => PollExit::Superseded,
        }
    }

    /// Stops polling; results still in flight are discarded
    pub fn shutdown(&mut self) {
        self.session.teardown();
        self.stop_poller();
    }

    fn start_poller(&mut self, token: LifecycleToken) {
        let poller = RunPoller::new(
            Arc::clone(&self.backend),
            Arc::clone(&self.session),
            self.poll_interval,
        );
        self.poller = Some(poller.spawn(token));
    }

    fn stop_poller(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
    }
}

impl<B: RunBackend + ?Sized + 'static> Drop for RunTracker<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
