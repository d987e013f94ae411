//! Register configuration module

use clap::Parser;

use crate::config::{api::ApiSettings, observability::LoggingConfig, storage::StorageConfig};

pub(crate) mod api;
pub(crate) mod observability;
pub(crate) mod storage;

pub(crate) use observability::LogFormat;

/// Till terminal register configuration
#[derive(Debug, Parser)]
#[command(name = "till-register", about = "Till terminal register", long_about = None)]
pub struct RegisterConfig {
    /// Backend API settings.
    #[command(flatten)]
    pub api: ApiSettings,

    /// Local cart storage settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl RegisterConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn flags_override_defaults() -> TestResult {
        let config = RegisterConfig::try_parse_from([
            "till-register",
            "--api-url",
            "http://caja.local:3000/api",
            "--api-timeout-secs",
            "4",
            "--data-dir",
            "/var/lib/till",
            "--log-format",
            "json",
        ])?;

        let api = config.api.api_config();

        assert_eq!(api.base_url, "http://caja.local:3000/api");
        assert_eq!(api.timeout, Duration::from_secs(4));
        assert_eq!(config.storage.data_dir.to_str(), Some("/var/lib/till"));
        assert!(matches!(config.logging.log_format, LogFormat::Json));

        Ok(())
    }
}
