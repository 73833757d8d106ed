//! JSON-over-HTTP client shared by the API adapters.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::ScrapeError;

/// Default user agent for API requests.
pub const USER_AGENT: &str = concat!("gonggo/", env!("CARGO_PKG_VERSION"));

/// Query parameters that carry credentials and must not reach the logs.
const SECRET_PARAMS: &[&str] = &["crtfcKey", "serviceKey"];

/// HTTP client with a fixed timeout and a per-source label for logging.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    source_id: String,
}

impl HttpClient {
    /// Create a client with the default user agent.
    pub fn new(source_id: &str, timeout: Duration) -> Result<Self, ScrapeError> {
        Self::with_user_agent(source_id, timeout, None)
    }

    /// Create a client, overriding the user agent when `user_agent` is set.
    pub fn with_user_agent(
        source_id: &str,
        timeout: Duration,
        user_agent: Option<&str>,
    ) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(user_agent.unwrap_or(USER_AGENT))
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(ScrapeError::Transport)?;

        Ok(Self {
            client,
            source_id: source_id.to_string(),
        })
    }

    /// GET `url` with `query` and decode the body as JSON.
    ///
    /// Non-success status codes are transport failures.
    pub async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, ScrapeError> {
        let start = Instant::now();
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;

        debug!(
            source = %self.source_id,
            status = response.status().as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            query = %redact(query),
            "GET {}",
            url
        );

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(ScrapeError::Decode)
    }
}

/// Render query parameters for logging with credentials masked.
fn redact(query: &[(&str, String)]) -> String {
    query
        .iter()
        .map(|(key, value)| {
            if SECRET_PARAMS.contains(key) {
                format!("{}=***", key)
            } else {
                format!("{}={}", key, value)
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_masks_keys() {
        let query = [
            ("crtfcKey", "secret".to_string()),
            ("dataType", "json".to_string()),
        ];
        assert_eq!(redact(&query), "crtfcKey=***&dataType=json");
    }
}
