//! Crawl pipeline: run coordination, deduplication and orchestration.
//!
//! Sources run strictly one after another. Each adapter's output passes the
//! [`Gatekeeper`] before it reaches storage, and every source gets one audit
//! row per run.

mod coordinator;
mod gatekeeper;
mod orchestrator;

pub use coordinator::{RunCoordinator, RunGuard};
pub use gatekeeper::Gatekeeper;
pub use orchestrator::{Orchestrator, RunRequest};

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Notice, SourceCounts, SourceTag};
use crate::repository::DieselError;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A run is already in flight.
    #[error("a crawl is already running")]
    AlreadyRunning,

    #[error("storage error: {0}")]
    Store(#[from] DieselError),
}

/// Persistent notice store, keyed by detail URL.
#[async_trait]
pub trait NoticeStore: Send + Sync {
    /// Whether a notice with exactly this URL is stored.
    async fn exists(&self, url: &str) -> Result<bool, DieselError>;

    /// Insert a notice. Returns `false` when the URL was already present.
    async fn insert(&self, notice: &Notice) -> Result<bool, DieselError>;
}

/// Per-user exclusion set.
#[async_trait]
pub trait ExclusionStore: Send + Sync {
    /// URLs the user marked "not interested".
    async fn excluded_urls(&self, user_id: i64) -> Result<HashSet<String>, DieselError>;
}

/// Append-only crawl audit log.
#[async_trait]
pub trait CrawlLogStore: Send + Sync {
    async fn append(&self, source: SourceTag, counts: SourceCounts) -> Result<(), DieselError>;
}
