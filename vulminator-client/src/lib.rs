//! Vulminator HTTP Client
//!
//! A small, type-safe HTTP client for the Vulminator scan backend.
//!
//! The [`RunBackend`] trait describes the two calls the run tracker depends on
//! (starting a run and fetching its state); [`ScanClient`] implements it over
//! HTTP.
//!
//! # Example
//!
//! ```no_run
//! use vulminator_client::ScanClient;
//! use vulminator_core::domain::run::RunRequest;
//! use vulminator_core::dto::run::AnalyzeRequest;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ScanClient::new("http://localhost:8000");
//!
//!     let request = RunRequest::new("https://github.com/org/repo");
//!     let accepted = client.analyze(&AnalyzeRequest::from(&request)).await?;
//!
//!     println!("Started run: {}", accepted.run_id);
//!     Ok(())
//! }
//! ```

mod backend;
pub mod error;
mod runs;

// Re-export commonly used types
pub use backend::RunBackend;
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// Default backend URL used when none is configured
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// HTTP client for the scan backend API
///
/// Endpoints:
/// - `POST /analyze` to start a run
/// - `GET /runs/{run_id}` to observe a run
/// - `GET /health` to check reachability
#[derive(Debug, Clone)]
pub struct ScanClient {
    /// Base URL of the backend (e.g., "http://localhost:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl ScanClient {
    /// Create a new scan client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the backend API (e.g., "http://localhost:8000")
    ///
    /// # Example
    /// ```
    /// use vulminator_client::ScanClient;
    ///
    /// let client = ScanClient::new("http://localhost:8000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new scan client with a custom HTTP client
    ///
    /// This allows you to configure proxies, TLS settings, etc.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the backend API
    /// * `client` - A configured reqwest Client
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the backend
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
