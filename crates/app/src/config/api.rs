//! Backend API Config

use std::time::Duration;

use clap::Args;

/// Backend API settings.
#[derive(Debug, Clone, Args)]
pub struct ApiConfig {
    /// Backend base URL
    #[arg(long = "api-url", env = "BAGLAN_API_URL", default_value = "https://localhost:7047", global = true)]
    pub url: String,

    /// Bearer token from a previous login
    #[arg(long = "api-token", env = "BAGLAN_API_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long = "api-timeout-seconds", env = "BAGLAN_API_TIMEOUT_SECONDS", default_value_t = 30u64, global = true)]
    pub timeout_seconds: u64,
}

impl ApiConfig {
    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
