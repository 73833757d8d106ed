//! Append-only crawl audit log.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::models::{CrawlLogRecord, NewCrawlLog};
use super::parse_datetime;
use super::pool::{AsyncSqlitePool, DieselError};
use crate::models::{CrawlLogEntry, SourceCounts, SourceTag};
use crate::pipeline::CrawlLogStore;
use crate::schema::crawl_logs;

/// Rows returned by [`CrawlLogRepository::recent`] when no limit is given.
pub const DEFAULT_LOG_LIMIT: i64 = 20;

impl From<CrawlLogRecord> for CrawlLogEntry {
    fn from(record: CrawlLogRecord) -> Self {
        CrawlLogEntry {
            id: record.id,
            source: record.source,
            total_count: record.total_count.max(0) as u32,
            new_count: record.new_count.max(0) as u32,
            crawled_at: parse_datetime(&record.crawled_at),
        }
    }
}

#[derive(Clone)]
pub struct CrawlLogRepository {
    pool: AsyncSqlitePool,
}

impl CrawlLogRepository {
    pub fn new(pool: AsyncSqlitePool) -> Self {
        Self { pool }
    }

    /// The `limit` most recent rows, newest first.
    pub async fn recent(&self, limit: i64) -> Result<Vec<CrawlLogEntry>, DieselError> {
        let mut conn = self.pool.get().await?;

        crawl_logs::table
            .order(crawl_logs::id.desc())
            .limit(limit)
            .select(CrawlLogRecord::as_select())
            .load(&mut conn)
            .await
            .map(|records| records.into_iter().map(CrawlLogEntry::from).collect())
    }
}

#[async_trait]
impl CrawlLogStore for CrawlLogRepository {
    async fn append(&self, source: SourceTag, counts: SourceCounts) -> Result<(), DieselError> {
        let mut conn = self.pool.get().await?;
        let crawled_at = Utc::now().to_rfc3339();

        diesel::insert_into(crawl_logs::table)
            .values(&NewCrawlLog {
                source: source.display_name(),
                total_count: counts.total.min(i32::MAX as u32) as i32,
                new_count: counts.new.min(i32::MAX as u32) as i32,
                crawled_at: &crawled_at,
            })
            .execute(&mut conn)
            .await?;

        Ok(())
    }
}
