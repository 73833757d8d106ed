//! Notice repository, keyed by detail URL.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::models::{NewNotice, NoticeRecord};
use super::parse_datetime;
use super::pool::{AsyncSqlitePool, DieselError};
use crate::models::{Notice, NoticeStatus, SourceTag};
use crate::pipeline::NoticeStore;
use crate::schema::notices;

impl From<NoticeRecord> for Notice {
    fn from(record: NoticeRecord) -> Self {
        Notice {
            title: record.title,
            agency: record.agency,
            posted_date: record.posted_date,
            end_date: record.end_date,
            detail_url: record.url,
            category: record.category,
            subcategory: record.subcategory,
            relevance: record.relevance.clamp(0, Notice::MAX_RELEVANCE as i32) as u8,
            status: NoticeStatus::from_str(&record.status).unwrap_or(NoticeStatus::Unknown),
            crawled_at: parse_datetime(&record.crawled_at),
            source: SourceTag::from_stored(&record.source).unwrap_or(SourceTag::Agency),
        }
    }
}

#[derive(Clone)]
pub struct NoticeRepository {
    pool: AsyncSqlitePool,
}

impl NoticeRepository {
    pub fn new(pool: AsyncSqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, url: &str) -> Result<Option<Notice>, DieselError> {
        let mut conn = self.pool.get().await?;

        notices::table
            .filter(notices::url.eq(url))
            .select(NoticeRecord::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|opt| opt.map(Notice::from))
    }

    pub async fn count(&self) -> Result<i64, DieselError> {
        let mut conn = self.pool.get().await?;
        notices::table.count().get_result(&mut conn).await
    }

    /// Notices from one source, most relevant first.
    pub async fn list_by_source(
        &self,
        source: SourceTag,
        limit: i64,
    ) -> Result<Vec<Notice>, DieselError> {
        let mut conn = self.pool.get().await?;

        notices::table
            .filter(notices::source.eq(source.display_name()))
            .order((notices::relevance.desc(), notices::id.desc()))
            .limit(limit)
            .select(NoticeRecord::as_select())
            .load(&mut conn)
            .await
            .map(|records| records.into_iter().map(Notice::from).collect())
    }
}

#[async_trait]
impl NoticeStore for NoticeRepository {
    async fn exists(&self, url: &str) -> Result<bool, DieselError> {
        let mut conn = self.pool.get().await?;

        use diesel::dsl::count_star;
        let count: i64 = notices::table
            .filter(notices::url.eq(url))
            .select(count_star())
            .first(&mut conn)
            .await?;

        Ok(count > 0)
    }

    async fn insert(&self, notice: &Notice) -> Result<bool, DieselError> {
        let mut conn = self.pool.get().await?;

        let crawled_at = notice.crawled_at.to_rfc3339();
        let created_at = Utc::now().to_rfc3339();
        let record = NewNotice {
            url: &notice.detail_url,
            title: &notice.title,
            agency: &notice.agency,
            posted_date: &notice.posted_date,
            end_date: notice.end_date.as_deref(),
            category: &notice.category,
            subcategory: &notice.subcategory,
            relevance: i32::from(notice.relevance),
            status: notice.status.as_str(),
            source: notice.source.display_name(),
            crawled_at: &crawled_at,
            created_at: &created_at,
        };

        let rows = diesel::insert_into(notices::table)
            .values(&record)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await?;

        Ok(rows > 0)
    }
}
