//! Finding domain types

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One reported item from analysis or automated remediation
///
/// Produced by the backend and never modified by the client. Titles are not
/// unique; findings are identified by their position in the run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub summary: String,
}

/// Reads a missing or `null` string as empty
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Finding {
    /// Creates a finding with only a title set
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = Some(severity.into());
        self
    }

    /// Normalized severity, `Info` when absent or unrecognized
    pub fn severity(&self) -> Severity {
        Severity::parse(self.severity.as_deref())
    }
}

/// Display severity of a finding
///
/// Covers the levels emitted by Semgrep (`info`, `warning`, `error`) and by
/// npm audit (`low` through `critical`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Severity {
    #[default]
    Info,
    Low,
    Moderate,
    Medium,
    High,
    Critical,
    Warning,
    Error,
}

impl Severity {
    /// Parses a raw severity, case-insensitively
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Severity::Info;
        };

        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Severity::Low,
            "moderate" => Severity::Moderate,
            "medium" => Severity::Medium,
            "high" => Severity::High,
            "critical" => Severity::Critical,
            "warning" => Severity::Warning,
            "error" => Severity::Error,
            _ => Severity::Info,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// Upper-case badge label
    pub fn label(self) -> String {
        self.as_str().to_ascii_uppercase()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
