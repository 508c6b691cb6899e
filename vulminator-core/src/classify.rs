//! Findings classification
//!
//! Partitions the findings of a run into three display buckets based on the
//! title conventions used by the backend:
//! - `Upgraded <package>` for automatic dependency upgrades
//! - `Refactor <path>` for AI refactor attempts
//! - everything else is treated as a vulnerability or warning
//!
//! The backend has no dedicated finding-kind field, so a change in its title
//! wording moves findings into the vulnerability bucket.

use crate::domain::finding::{Finding, Severity};

/// Title prefix of dependency upgrade findings
pub const UPGRADE_PREFIX: &str = "Upgraded";

/// Title prefix of refactor findings
pub const REFACTOR_PREFIX: &str = "Refactor";

/// Display bucket of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FindingKind {
    DependencyUpgrade,
    RefactorNote,
    Vulnerability,
}

impl FindingKind {
    /// Determines the bucket from the finding title
    pub fn of(finding: &Finding) -> Self {
        if finding.title.starts_with(UPGRADE_PREFIX) {
            FindingKind::DependencyUpgrade
        } else if finding.title.starts_with(REFACTOR_PREFIX) {
            FindingKind::RefactorNote
        } else {
            FindingKind::Vulnerability
        }
    }

    /// Severity shown on the finding's badge
    ///
    /// Upgrades are always informational and refactor notes are either
    /// informational or a warning.
    pub fn badge(self, finding: &Finding) -> Severity {
        match self {
            FindingKind::DependencyUpgrade => Severity::Info,
            FindingKind::RefactorNote => match finding.severity() {
                Severity::Info => Severity::Info,
                _ => Severity::Warning,
            },
            FindingKind::Vulnerability => finding.severity(),
        }
    }
}

/// Findings partitioned into display buckets
///
/// Each bucket borrows from the input and keeps its relative order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedFindings<'a> {
    pub dependency_upgrades: Vec<&'a Finding>,
    pub refactor_notes: Vec<&'a Finding>,
    pub vulnerabilities: Vec<&'a Finding>,
}

/// Partitions findings into dependency upgrades, refactor notes and vulnerabilities
pub fn classify(findings: &[Finding]) -> ClassifiedFindings<'_> {
    let mut classified = ClassifiedFindings::default();

    for finding in findings {
        match FindingKind::of(finding) {
            FindingKind::DependencyUpgrade => classified.dependency_upgrades.push(finding),
            FindingKind::RefactorNote => classified.refactor_notes.push(finding),
            FindingKind::Vulnerability => classified.vulnerabilities.push(finding),
        }
    }

    classified
}
