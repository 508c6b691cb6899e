//! Configuration module
//!
//! Handles CLI configuration: where the backend lives and how often a run
//! is polled.

use std::time::Duration;

/// Default cadence between two fetches of a run
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2500);

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the scan backend
    pub backend_url: String,

    /// How often an active run is fetched
    pub poll_interval: Duration,
}

impl Config {
    /// Creates a new configuration with the default poll interval
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.backend_url.is_empty() {
            anyhow::bail!("backend_url cannot be empty");
        }

        if !self.backend_url.starts_with("http://") && !self.backend_url.starts_with("https://") {
            anyhow::bail!("backend_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(vulminator_client::DEFAULT_BACKEND_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend_url, "http://localhost:8000");
        assert_eq!(config.poll_interval, Duration::from_millis(2500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.backend_url = String::new();
        assert!(config.validate().is_err());

        config.backend_url = "localhost:8000".to_string();
        assert!(config.validate().is_err());

        config.backend_url = "https://scan.example.com".to_string();
        assert!(config.validate().is_ok());

        let config = config.with_poll_interval(Duration::ZERO);
        assert!(config.validate().is_err());
    }
}
