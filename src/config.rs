use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://yargi-api.onrender.com";

/// Runtime settings for the API client.
///
/// Only the API base location is configurable (`HUKUK_API_BASE`, also read
/// from a `.env` file). Timeouts are generous because the free-tier host
/// can take 30-50 seconds to wake up.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            connect_timeout: Duration::from_secs(60),
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let base_url = dotenv::var("HUKUK_API_BASE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Self::default().with_base_url(&base_url)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim().trim_end_matches('/').to_string();
        self
    }
}
