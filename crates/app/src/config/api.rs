//! API Config

use clap::Args;

/// Point-of-sale API connection settings.
#[derive(Debug, Clone, Args)]
pub struct ApiConfig {
    /// Base URL of the point-of-sale API, without the `/api` prefix
    #[arg(long, env = "VALET_API_URL", default_value = "http://localhost:8001")]
    pub api_url: String,

    /// Bearer token for the point-of-sale API
    #[arg(long, env = "VALET_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, env = "VALET_HTTP_TIMEOUT_SECONDS", default_value_t = 10u64)]
    pub http_timeout_seconds: u64,
}
