//! Run-related API endpoints

use reqwest::Url;
use tracing::debug;
use vulminator_core::domain::run::RunId;
use vulminator_core::dto::health::HealthResponse;
use vulminator_core::dto::run::{AnalyzeRequest, AnalyzeResponse, RunStatusResponse};

use crate::ScanClient;
use crate::error::{ClientError, Result};

impl ScanClient {
    // =============================================================================
    // Run Lifecycle
    // =============================================================================

    /// Start a new scan run
    ///
    /// # Arguments
    /// * `req` - The analyze request body
    ///
    /// # Returns
    /// The backend-assigned run id and its initial status
    ///
    /// # Example
    /// ```no_run
    /// # use vulminator_client::ScanClient;
    /// # use vulminator_core::dto::run::AnalyzeRequest;
    /// # use vulminator_core::domain::run::ScanPreset;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = ScanClient::new("http://localhost:8000");
    /// let accepted = client.analyze(&AnalyzeRequest {
    ///     repo_url: "https://github.com/org/repo".to_string(),
    ///     preset: ScanPreset::Fast,
    ///     run_ai_report: true,
    ///     github_token: None,
    /// }).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn analyze(&self, req: &AnalyzeRequest) -> Result<AnalyzeResponse> {
        let url = format!("{}/analyze", self.base_url);
        debug!("POST {} (preset {})", url, req.preset);
        let response = self.client.post(&url).json(req).send().await?;

        self.handle_response(response).await
    }

    /// Get the current state of a run
    ///
    /// # Arguments
    /// * `run_id` - The run identifier
    ///
    /// # Returns
    /// The run status, progress message, findings and PR link
    pub async fn get_run(&self, run_id: &RunId) -> Result<RunStatusResponse> {
        let url = self.run_url(run_id)?;
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        self.handle_response(response).await.map_err(|e| {
            if e.is_not_found() {
                ClientError::NotFound(run_id.to_string())
            } else {
                e
            }
        })
    }

    /// `{base_url}/runs/{run_id}` with the id escaped as one path segment
    fn run_url(&self, run_id: &RunId) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            ClientError::InvalidRequest(format!("invalid backend URL '{}': {}", self.base_url, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                ClientError::InvalidRequest(format!("backend URL '{}' cannot have a path", self.base_url))
            })?
            .pop_if_empty()
            .push("runs")
            .push(run_id.as_str());

        Ok(url)
    }

    // =============================================================================
    // Health
    // =============================================================================

    /// Check that the backend is up
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
