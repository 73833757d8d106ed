//! User-scoped suppression entries and crawl audit rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A notice URL a user marked "not interested".
///
/// Unique per (user, URL) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExclusionEntry {
    /// Database row ID.
    pub id: i64,
    pub user_id: i64,
    pub notice_url: String,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Append-only audit row written once per source per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlLogEntry {
    /// Database row ID.
    pub id: i64,
    /// Source display name.
    pub source: String,
    pub total_count: u32,
    pub new_count: u32,
    pub crawled_at: DateTime<Utc>,
}
