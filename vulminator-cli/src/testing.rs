//! In-memory backend for tracker tests

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use vulminator_client::{ClientError, RunBackend};
use vulminator_core::domain::run::{RunId, RunStatus};
use vulminator_core::dto::run::{AnalyzeRequest, AnalyzeResponse, RunStatusResponse};

/// Builds an observation with only status and message set
pub fn observation(status: RunStatus, message: &str) -> RunStatusResponse {
    RunStatusResponse {
        run_id: None,
        status,
        message: Some(message.to_string()),
        findings: None,
        pr_url: None,
    }
}

/// One scripted answer to `GET /runs/{id}`
#[derive(Debug, Clone)]
pub enum Step {
    Observe(RunStatusResponse),
    Fail(u16),
}

#[derive(Default)]
struct Inner {
    run_ids: VecDeque<String>,
    reject_submissions: bool,
    submissions: Vec<AnalyzeRequest>,
    scripts: HashMap<String, VecDeque<Step>>,
    delays: HashMap<String, Duration>,
    fetches: HashMap<String, usize>,
}

/// Scripted [`RunBackend`]
///
/// Each run answers with its scripted steps in order; the last step repeats
/// once the script runs out.
#[derive(Default)]
pub struct FakeBackend {
    inner: Mutex<Inner>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids handed out by successive submissions; random ids afterwards
    pub fn with_run_ids(self, ids: &[&str]) -> Self {
        self.inner.lock().unwrap().run_ids = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn rejecting(self) -> Self {
        self.inner.lock().unwrap().reject_submissions = true;
        self
    }

    pub fn script(&self, run_id: &str, steps: Vec<Step>) {
        self.inner
            .lock()
            .unwrap()
            .scripts
            .insert(run_id.to_string(), steps.into());
    }

    /// Makes every fetch of `run_id` take `delay`
    pub fn delay(&self, run_id: &str, delay: Duration) {
        self.inner
            .lock()
            .unwrap()
            .delays
            .insert(run_id.to_string(), delay);
    }

    pub fn fetches(&self, run_id: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .fetches
            .get(run_id)
            .copied()
            .unwrap_or(0)
    }

    pub fn submissions(&self) -> Vec<AnalyzeRequest> {
        self.inner.lock().unwrap().submissions.clone()
    }
}

#[async_trait]
impl RunBackend for FakeBackend {
    async fn start_run(&self, req: &AnalyzeRequest) -> Result<AnalyzeResponse, ClientError> {
        let mut inner = self.inner.lock().unwrap();
        inner.submissions.push(req.clone());

        if inner.reject_submissions {
            return Err(ClientError::api_error(503, "backend unavailable"));
        }

        let run_id = inner
            .run_ids
            .pop_front()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        Ok(AnalyzeResponse {
            run_id,
            status: RunStatus::Queued,
        })
    }

    async fn fetch_run(&self, run_id: &RunId) -> Result<RunStatusResponse, ClientError> {
        let (step, delay) = {
            let mut inner = self.inner.lock().unwrap();
            *inner.fetches.entry(run_id.to_string()).or_default() += 1;

            let delay = inner.delays.get(run_id.as_str()).copied();
            let step = match inner.scripts.get_mut(run_id.as_str()) {
                Some(steps) if steps.len() > 1 => steps.pop_front(),
                Some(steps) => steps.front().cloned(),
                None => None,
            };
            (step, delay)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match step {
            Some(Step::Observe(observation)) => Ok(observation),
            Some(Step::Fail(status)) => Err(ClientError::api_error(status, "scripted failure")),
            None => Err(ClientError::NotFound(run_id.to_string())),
        }
    }
}
