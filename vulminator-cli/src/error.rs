//! Error types for run submission

use thiserror::Error;
use vulminator_client::ClientError;
use vulminator_core::domain::run::RequestError;

/// Errors raised while creating a run
///
/// A submission error never produces a run id; the session records it as a
/// terminal `failed` status.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Invalid scan request: {0}")]
    InvalidRequest(#[from] RequestError),

    #[error("Analyze request failed: {0}")]
    Backend(#[from] ClientError),

    #[error("Backend accepted the run without a run id")]
    MissingRunId,
}
