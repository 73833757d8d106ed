//! Database context for managing connections and repository access.

use std::path::Path;

use diesel_async::SimpleAsyncConnection;

use super::crawl_log::CrawlLogRepository;
use super::exclusion::ExclusionRepository;
use super::notice::NoticeRepository;
use super::pool::{AsyncSqlitePool, DieselError};

/// Holds the connection factory and hands out repositories.
///
/// # Example
/// ```ignore
/// let ctx = DbContext::from_url("sqlite:gonggo.db");
/// ctx.init_schema().await?;
/// let logs = ctx.crawl_logs().recent(20).await?;
/// ```
#[derive(Clone, Debug)]
pub struct DbContext {
    pool: AsyncSqlitePool,
}

impl DbContext {
    pub fn new(db_path: &Path) -> Self {
        Self {
            pool: AsyncSqlitePool::from_path(db_path),
        }
    }

    pub fn from_url(database_url: &str) -> Self {
        Self {
            pool: AsyncSqlitePool::new(database_url),
        }
    }

    pub fn pool(&self) -> &AsyncSqlitePool {
        &self.pool
    }

    pub fn notices(&self) -> NoticeRepository {
        NoticeRepository::new(self.pool.clone())
    }

    pub fn exclusions(&self) -> ExclusionRepository {
        ExclusionRepository::new(self.pool.clone())
    }

    pub fn crawl_logs(&self) -> CrawlLogRepository {
        CrawlLogRepository::new(self.pool.clone())
    }

    /// Create the tables if they don't exist.
    pub async fn init_schema(&self) -> Result<(), DieselError> {
        let mut conn = self.pool.get().await?;
        conn.batch_execute(
            r#"
            PRAGMA journal_mode = WAL;

            CREATE TABLE IF NOT EXISTS notices (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                url TEXT NOT NULL UNIQUE,
                title TEXT NOT NULL,
                agency TEXT NOT NULL DEFAULT '',
                posted_date TEXT NOT NULL DEFAULT '',
                end_date TEXT,
                category TEXT NOT NULL DEFAULT '',
                subcategory TEXT NOT NULL DEFAULT '',
                relevance INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL,
                source TEXT NOT NULL,
                crawled_at TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_notices_source ON notices(source);
            CREATE INDEX IF NOT EXISTS idx_notices_relevance ON notices(relevance);

            CREATE TABLE IF NOT EXISTS excluded_notices (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                notice_url TEXT NOT NULL,
                reason TEXT,
                created_at TEXT NOT NULL,
                UNIQUE(user_id, notice_url)
            );

            CREATE TABLE IF NOT EXISTS crawl_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                source TEXT NOT NULL,
                total_count INTEGER NOT NULL DEFAULT 0,
                new_count INTEGER NOT NULL DEFAULT 0,
                crawled_at TEXT NOT NULL
            );
            "#,
        )
        .await
    }
}
