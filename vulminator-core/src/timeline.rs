//! Progress timeline
//!
//! The backend reports pipeline progress as a single message whose steps are
//! separated by `;`.

/// Separator between steps in a run message
pub const STEP_DELIMITER: char = ';';

/// Splits a run message into trimmed, non-empty steps
pub fn steps(message: &str) -> Vec<&str> {
    message
        .split(STEP_DELIMITER)
        .map(str::trim)
        .filter(|step| !step.is_empty())
        .collect()
}
