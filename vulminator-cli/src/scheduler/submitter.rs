//! Run submitter
//!
//! Turns a [`RunRequest`] into exactly one `POST /analyze` call.

use std::sync::Arc;
use tracing::{debug, info};
use vulminator_client::RunBackend;
use vulminator_core::domain::run::{RunId, RunRequest, RunStatus};
use vulminator_core::dto::run::AnalyzeRequest;

use crate::error::SubmissionError;

/// A run the backend accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedRun {
    pub run_id: RunId,
    pub status: RunStatus,
}

/// Creates runs on the backend
pub struct RunSubmitter<B: RunBackend + ?Sized> {
    backend: Arc<B>,
}

impl<B: RunBackend + ?Sized> RunSubmitter<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Validates the request and issues one job-creation call
    ///
    /// Nothing is sent when validation fails.
    pub async fn submit(&self, request: &RunRequest) -> Result<AcceptedRun, SubmissionError> {
        request.validate()?;

        let payload = AnalyzeRequest::from(request);
        info!(
            "Submitting scan of {} (preset {}, token {})",
            payload.repo_url,
            payload.preset,
            if payload.github_token.is_some() {
                "provided"
            } else {
                "none"
            }
        );

        let response = self.backend.start_run(&payload).await?;
        let run_id = RunId::new(response.run_id).ok_or(SubmissionError::MissingRunId)?;

        // A freshly created run is at least queued.
        let status = match response.status {
            RunStatus::Idle => RunStatus::Queued,
            status => status,
        };

        debug!("Backend accepted run {} as {}", run_id, status);
        Ok(AcceptedRun { run_id, status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;
    use vulminator_core::domain::run::ScanPreset;

    #[tokio::test]
    async fn test_submit_returns_backend_run_id() {
        let backend = Arc::new(FakeBackend::new().with_run_ids(&["run-1"]));
        let submitter = RunSubmitter::new(Arc::clone(&backend));

        let accepted = submitter
            .submit(&RunRequest::new("https://github.com/org/repo"))
            .await
            .unwrap();

        assert_eq!(accepted.run_id.as_str(), "run-1");
        assert_eq!(accepted.status, RunStatus::Queued);
        assert_eq!(backend.submissions().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_sends_preset_and_omits_blank_token() {
        let backend = Arc::new(FakeBackend::new());
        let submitter = RunSubmitter::new(Arc::clone(&backend));

        submitter
            .submit(
                &RunRequest::new("https://github.com/org/repo")
                    .with_preset(ScanPreset::Balanced)
                    .with_credential("  "),
            )
            .await
            .unwrap();

        let sent = &backend.submissions()[0];
        assert_eq!(sent.preset, ScanPreset::Balanced);
        assert!(sent.github_token.is_none());
        assert!(sent.run_ai_report);
    }

    #[tokio::test]
    async fn test_invalid_request_is_not_sent() {
        let backend = Arc::new(FakeBackend::new());
        let submitter = RunSubmitter::new(Arc::clone(&backend));

        let err = submitter.submit(&RunRequest::new("")).await.unwrap_err();

        assert!(matches!(err, SubmissionError::InvalidRequest(_)));
        assert!(backend.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_backend_failure_is_submission_error() {
        let backend = Arc::new(FakeBackend::new().rejecting());
        let submitter = RunSubmitter::new(Arc::clone(&backend));

        let err = submitter
            .submit(&RunRequest::new("https://github.com/org/repo"))
            .await
            .unwrap_err();

        assert!(matches!(err, SubmissionError::Backend(_)));
        assert_eq!(backend.submissions().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_run_id_is_rejected() {
        let backend = Arc::new(FakeBackend::new().with_run_ids(&["  "]));
        let submitter = RunSubmitter::new(backend);

        let err = submitter
            .submit(&RunRequest::new("https://github.com/org/repo"))
            .await
            .unwrap_err();

        assert!(matches!(err, SubmissionError::MissingRunId));
    }
}
