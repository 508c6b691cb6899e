//! Health DTOs

use serde::{Deserialize, Serialize};

/// Response of the backend health check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,

    /// Directory the backend clones repositories into
    #[serde(default)]
    pub workspace: Option<String>,
}

impl HealthResponse {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}
