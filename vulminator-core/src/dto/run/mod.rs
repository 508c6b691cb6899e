//! Run DTOs for communication with the scan backend

use serde::{Deserialize, Serialize};

use crate::domain::finding::Finding;
use crate::domain::run::{RunRequest, RunStatus, ScanPreset};

/// Body of `POST /analyze`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub repo_url: String,
    pub preset: ScanPreset,
    pub run_ai_report: bool,

    /// Omitted entirely when no credential was supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,
}

impl From<&RunRequest> for AnalyzeRequest {
    fn from(request: &RunRequest) -> Self {
        Self {
            repo_url: request.repository_url.trim().to_string(),
            preset: request.preset,
            run_ai_report: request.run_report,
            github_token: request.effective_credential().map(str::to_string),
        }
    }
}

/// Response of `POST /analyze`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub run_id: String,
    pub status: RunStatus,
}

/// Response of `GET /runs/{run_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatusResponse {
    #[serde(default)]
    pub run_id: Option<String>,
    pub status: RunStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub findings: Option<Vec<Finding>>,
    #[serde(default)]
    pub pr_url: Option<String>,
}
