//! Headless browser settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Browser engine configuration (`[browser]` in the config file).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserEngineConfig {
    /// Run without a visible window (default: true).
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Page load timeout in seconds.
    #[serde(default = "default_page_load_timeout")]
    pub page_load_timeout: u64,

    /// How long to wait for the list-row selector, in seconds.
    #[serde(default = "default_element_wait")]
    pub element_wait: u64,

    /// Additional Chrome arguments.
    #[serde(default)]
    pub chrome_args: Vec<String>,

    /// Remote Chrome DevTools URL (e.g., "ws://localhost:9222").
    /// If set, connects to an existing browser instead of launching one.
    #[serde(default)]
    pub remote_url: Option<String>,
}

impl Default for BrowserEngineConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            page_load_timeout: default_page_load_timeout(),
            element_wait: default_element_wait(),
            chrome_args: Vec::new(),
            remote_url: None,
        }
    }
}

impl BrowserEngineConfig {
    pub fn page_load(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout)
    }

    pub fn element_wait(&self) -> Duration {
        Duration::from_secs(self.element_wait)
    }
}

pub fn default_headless() -> bool {
    true
}

pub fn default_page_load_timeout() -> u64 {
    30
}

pub fn default_element_wait() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_table_keeps_defaults() {
        let config: BrowserEngineConfig = toml::from_str("headless = false").unwrap();
        assert!(!config.headless);
        assert_eq!(config.page_load(), Duration::from_secs(30));
        assert_eq!(config.element_wait(), Duration::from_secs(10));
        assert!(config.remote_url.is_none());
    }
}
