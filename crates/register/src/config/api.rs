//! API Config

use std::{fmt, time::Duration};

use clap::Args;
use till_app::api::{ApiConfig, DEFAULT_API_URL};

/// Backend connection and credentials.
#[derive(Args)]
pub struct ApiSettings {
    /// Base URL of the store REST API
    #[arg(long, env = "TILL_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "TILL_API_TIMEOUT_SECS", default_value_t = 10_u64)]
    pub api_timeout_secs: u64,

    /// Bearer token of an existing session
    #[arg(long, env = "TILL_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Refresh token of an existing session
    #[arg(long, env = "TILL_REFRESH_TOKEN", hide_env_values = true)]
    pub refresh_token: Option<String>,

    /// Username to log in with when no token is given
    #[arg(short, long, env = "TILL_USERNAME")]
    pub username: Option<String>,

    /// Password to log in with
    #[arg(long, env = "TILL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl ApiSettings {
    /// Client configuration for these settings.
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.api_timeout_secs),
        }
    }
}

impl fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = |secret: &Option<String>| secret.as_ref().map(|_| "<redacted>");

        f.debug_struct("ApiSettings")
            .field("api_url", &self.api_url)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("api_token", &redacted(&self.api_token))
            .field("refresh_token", &redacted(&self.refresh_token))
            .field("username", &self.username)
            .field("password", &redacted(&self.password))
            .finish()
    }
}
