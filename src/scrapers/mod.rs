//! Source adapters for the notice pipeline.
//!
//! Each adapter pulls raw postings from one upstream source, classifies and
//! scores them, and hands back normalized [`Notice`]s. Adapters never fail a
//! run: transport and parse failures are logged and turn into empty or
//! partial results.

pub mod agency;
pub mod bizinfo;
pub mod browser;
pub mod g2b;
mod http_client;
pub mod profiles;

pub use agency::AgencyAdapter;
pub use bizinfo::BizinfoAdapter;
pub use browser::{BrowserEngineConfig, BrowserSession, PageRenderer};
pub use g2b::G2bAdapter;
pub use http_client::HttpClient;
pub use profiles::SourceProfile;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Notice, SourceTag};

/// Errors raised inside an adapter. They stop at the adapter boundary.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid JSON response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("API returned an error: {0}")]
    Api(String),

    #[error("no API key configured for {0}")]
    MissingCredential(&'static str),

    #[error("browser unavailable: {0}")]
    Browser(String),

    #[error("failed to load {url}: {message}")]
    Navigation { url: String, message: String },

    #[error("timed out after {seconds}s waiting for {what}")]
    Timeout { what: String, seconds: u64 },

    #[error("invalid selector {0:?}")]
    Selector(String),
}

/// One upstream source of notices.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn tag(&self) -> SourceTag;

    /// Collect, classify and score notices for one run.
    ///
    /// Failures are logged and yield whatever was collected before them.
    async fn collect(&self) -> Vec<Notice>;
}
