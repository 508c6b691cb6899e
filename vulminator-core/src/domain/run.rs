//! Run domain types
//!
//! A run is one invocation of the remote scan pipeline. The client submits a
//! [`RunRequest`], receives a [`RunId`], and then reconciles successive backend
//! observations into a single [`RunState`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::classify::{ClassifiedFindings, classify};
use crate::domain::finding::Finding;
use crate::dto::run::RunStatusResponse;
use crate::timeline;

/// Message shown once a submission is accepted, before the first poll lands
pub const PIPELINE_STARTED_MESSAGE: &str = "pipeline started";

// =============================================================================
// Identifiers & Enums
// =============================================================================

/// Backend-assigned run identifier
///
/// Never empty: construct through [`RunId::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Creates a run id, returning `None` for blank input
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters of the id, used in headings
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Run lifecycle status
///
/// `Idle` only precedes the first run of a session; the backend itself
/// reports `queued`, `running`, `completed` or `failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    #[default]
    Idle,
    Queued,
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    /// `Completed` and `Failed` end a run; nothing moves it afterwards
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Failed)
    }

    /// The backend is still working on the run
    pub fn is_busy(self) -> bool {
        matches!(self, RunStatus::Queued | RunStatus::Running)
    }

    fn rank(self) -> u8 {
        match self {
            RunStatus::Idle => 0,
            RunStatus::Queued => 1,
            RunStatus::Running => 2,
            RunStatus::Completed | RunStatus::Failed => 3,
        }
    }

    /// Whether an observation with status `next` may replace this one
    ///
    /// Status only moves forward along `queued -> running -> terminal`.
    pub fn can_advance_to(self, next: RunStatus) -> bool {
        !self.is_terminal() && next.rank() >= self.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Idle => "idle",
            RunStatus::Queued => "queued",
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scan depth preset understood by the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanPreset {
    #[default]
    Fast,
    Balanced,
    Exhaustive,
}

impl ScanPreset {
    pub const ALL: [ScanPreset; 3] = [ScanPreset::Fast, ScanPreset::Balanced, ScanPreset::Exhaustive];

    pub fn as_str(self) -> &'static str {
        match self {
            ScanPreset::Fast => "fast",
            ScanPreset::Balanced => "balanced",
            ScanPreset::Exhaustive => "exhaustive",
        }
    }

    /// Human-readable description of the rule set behind the preset
    pub fn label(self) -> &'static str {
        match self {
            ScanPreset::Fast => "Fast (p/ci)",
            ScanPreset::Balanced => "Balanced (security audit)",
            ScanPreset::Exhaustive => "Exhaustive (OWASP top 10)",
        }
    }
}

impl fmt::Display for ScanPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScanPreset::ALL
            .into_iter()
            .find(|preset| preset.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown preset '{}' (expected one of: fast, balanced, exhaustive)",
                    s
                )
            })
    }
}

// =============================================================================
// Run Request
// =============================================================================

/// Errors raised while validating a [`RunRequest`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Repository URL cannot be empty")]
    EmptyRepositoryUrl,

    #[error("Repository URL must start with http:// or https://: {0}")]
    InvalidRepositoryUrl(String),
}

/// User-supplied parameters for a new run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub repository_url: String,
    pub preset: ScanPreset,
    /// GitHub token forwarded to the backend for cloning and PR creation
    pub credential: Option<String>,
    /// Ask the backend for the AI-generated report
    pub run_report: bool,
}

impl RunRequest {
    /// Creates a request with the default preset and the report enabled
    pub fn new(repository_url: impl Into<String>) -> Self {
        Self {
            repository_url: repository_url.into(),
            preset: ScanPreset::default(),
            credential: None,
            run_report: true,
        }
    }

    pub fn with_preset(mut self, preset: ScanPreset) -> Self {
        self.preset = preset;
        self
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn with_run_report(mut self, run_report: bool) -> Self {
        self.run_report = run_report;
        self
    }

    /// Validates the request before it is sent
    pub fn validate(&self) -> Result<(), RequestError> {
        let url = self.repository_url.trim();

        if url.is_empty() {
            return Err(RequestError::EmptyRepositoryUrl);
        }

        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"));

        match rest {
            Some(host) if !host.is_empty() => Ok(()),
            _ => Err(RequestError::InvalidRepositoryUrl(url.to_string())),
        }
    }

    /// The credential to forward, trimmed
    ///
    /// A credential that is blank after trimming is treated as absent.
    pub fn effective_credential(&self) -> Option<&str> {
        self.credential
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

// =============================================================================
// Run State
// =============================================================================

/// Advisory signal for a poll fetch that could not reach the backend
///
/// Distinct from a backend-reported `failed` status: the run may still be
/// healthy, we just could not observe it.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportError {
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Consumer-visible state of the tracked run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunState {
    pub run_id: Option<RunId>,
    pub status: RunStatus,
    pub message: String,
    pub findings: Vec<Finding>,
    /// Link to the pull request opened by the backend
    pub artifact_url: Option<String>,
    /// Why the last submission failed
    pub last_error: Option<String>,
    pub transport_error: Option<TransportError>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl RunState {
    /// Creates an idle state with no run
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops everything tied to the previous run
    ///
    /// Status is left untouched until the backend answers the submission.
    pub fn reset_for_submission(&mut self) {
        self.run_id = None;
        self.message.clear();
        self.findings.clear();
        self.artifact_url = None;
        self.last_error = None;
        self.transport_error = None;
        self.updated_at = Some(Utc::now());
    }

    /// Starts tracking a freshly accepted run
    pub fn begin_run(&mut self, run_id: RunId, status: RunStatus, message: impl Into<String>) {
        self.reset_for_submission();
        self.run_id = Some(run_id);
        self.status = status;
        self.message = message.into();
    }

    /// Records a submission that never produced a run
    pub fn fail_submission(&mut self, error: impl Into<String>) {
        self.run_id = None;
        self.status = RunStatus::Failed;
        self.last_error = Some(error.into());
        self.updated_at = Some(Utc::now());
    }

    /// Overwrites the observable fields with a backend observation
    ///
    /// Returns `false`, leaving the state untouched, when the state is already
    /// terminal or the observation would move status backwards.
    pub fn apply(&mut self, observation: RunStatusResponse) -> bool {
        if !self.status.can_advance_to(observation.status) {
            return false;
        }

        self.status = observation.status;
        self.message = observation.message.unwrap_or_default();
        self.findings = observation.findings.unwrap_or_default();
        self.artifact_url = observation.pr_url.filter(|url| !url.trim().is_empty());
        self.updated_at = Some(Utc::now());
        true
    }

    /// Records a failed poll fetch without touching status
    ///
    /// Returns `false` once the run is terminal.
    pub fn record_transport_error(&mut self, message: impl Into<String>) -> bool {
        if self.status.is_terminal() {
            return false;
        }

        let at = Utc::now();
        self.transport_error = Some(TransportError {
            message: message.into(),
            at,
        });
        self.updated_at = Some(at);
        true
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn is_busy(&self) -> bool {
        self.status.is_busy()
    }

    /// Progress steps derived from the current message
    pub fn timeline(&self) -> Vec<&str> {
        timeline::steps(&self.message)
    }

    /// Findings partitioned into display buckets
    pub fn classified(&self) -> ClassifiedFindings<'_> {
        classify(&self.findings)
    }
}
