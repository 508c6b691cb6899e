//! Backend abstraction used by the run tracker

use async_trait::async_trait;
use vulminator_core::domain::run::RunId;
use vulminator_core::dto::run::{AnalyzeRequest, AnalyzeResponse, RunStatusResponse};

use crate::ScanClient;
use crate::error::Result;

/// The job API a run tracker needs
///
/// Implemented by [`ScanClient`] over HTTP; tests substitute in-memory fakes.
#[async_trait]
pub trait RunBackend: Send + Sync {
    /// Creates a run and returns its id and initial status
    async fn start_run(&self, req: &AnalyzeRequest) -> Result<AnalyzeResponse>;

    /// Fetches the current state of a run
    async fn fetch_run(&self, run_id: &RunId) -> Result<RunStatusResponse>;
}

#[async_trait]
impl RunBackend for ScanClient {
    async fn start_run(&self, req: &AnalyzeRequest) -> Result<AnalyzeResponse> {
        self.analyze(req).await
    }

    async fn fetch_run(&self, run_id: &RunId) -> Result<RunStatusResponse> {
        self.get_run(run_id).await
    }
}
