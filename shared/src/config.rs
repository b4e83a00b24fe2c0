use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for the REST client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Build from the optional `VITE_API_URL` override.
    pub fn from_override(api_url: Option<&str>) -> Self {
        let api_base_url = api_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();
        Self {
            api_base_url,
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Absolute URL for an endpoint path such as `/tickets/`.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_override(None)
    }
}
