//! Per-user "not interested" list.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::models::{ExclusionRecord, NewExclusion};
use super::pool::{AsyncSqlitePool, DieselError};
use super::util::is_unique_violation;
use super::parse_datetime;
use crate::models::ExclusionEntry;
use crate::pipeline::ExclusionStore;
use crate::schema::excluded_notices;

impl From<ExclusionRecord> for ExclusionEntry {
    fn from(record: ExclusionRecord) -> Self {
        ExclusionEntry {
            id: record.id,
            user_id: record.user_id,
            notice_url: record.notice_url,
            reason: record.reason,
            created_at: parse_datetime(&record.created_at),
        }
    }
}

#[derive(Clone)]
pub struct ExclusionRepository {
    pool: AsyncSqlitePool,
}

impl ExclusionRepository {
    pub fn new(pool: AsyncSqlitePool) -> Self {
        Self { pool }
    }

    /// Exclude `url` for `user_id`.
    ///
    /// Returns `None` if the pair is already excluded.
    pub async fn add(
        &self,
        user_id: i64,
        url: &str,
        reason: Option<&str>,
    ) -> Result<Option<ExclusionEntry>, DieselError> {
        let mut conn = self.pool.get().await?;
        let created_at = Utc::now().to_rfc3339();

        let inserted = diesel::insert_into(excluded_notices::table)
            .values(&NewExclusion {
                user_id,
                notice_url: url,
                reason,
                created_at: &created_at,
            })
            .execute(&mut conn)
            .await;

        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => return Ok(None),
            Err(e) => return Err(e),
        }

        excluded_notices::table
            .filter(excluded_notices::user_id.eq(user_id))
            .filter(excluded_notices::notice_url.eq(url))
            .select(ExclusionRecord::as_select())
            .first(&mut conn)
            .await
            .map(|record| Some(ExclusionEntry::from(record)))
    }

    /// A user's exclusions, newest first.
    pub async fn list(&self, user_id: i64) -> Result<Vec<ExclusionEntry>, DieselError> {
        let mut conn = self.pool.get().await?;

        excluded_notices::table
            .filter(excluded_notices::user_id.eq(user_id))
            .order((excluded_notices::created_at.desc(), excluded_notices::id.desc()))
            .select(ExclusionRecord::as_select())
            .load(&mut conn)
            .await
            .map(|records| records.into_iter().map(ExclusionEntry::from).collect())
    }

    /// Remove one of the user's exclusions by row id.
    pub async fn remove(&self, user_id: i64, id: i64) -> Result<bool, DieselError> {
        let mut conn = self.pool.get().await?;

        let rows = diesel::delete(
            excluded_notices::table
                .filter(excluded_notices::id.eq(id))
                .filter(excluded_notices::user_id.eq(user_id)),
        )
        .execute(&mut conn)
        .await?;

        Ok(rows > 0)
    }

    pub async fn remove_url(&self, user_id: i64, url: &str) -> Result<bool, DieselError> {
        let mut conn = self.pool.get().await?;

        let rows = diesel::delete(
            excluded_notices::table
                .filter(excluded_notices::notice_url.eq(url))
                .filter(excluded_notices::user_id.eq(user_id)),
        )
        .execute(&mut conn)
        .await?;

        Ok(rows > 0)
    }
}

#[async_trait]
impl ExclusionStore for ExclusionRepository {
    async fn excluded_urls(&self, user_id: i64) -> Result<HashSet<String>, DieselError> {
        let mut conn = self.pool.get().await?;

        let urls: Vec<String> = excluded_notices::table
            .filter(excluded_notices::user_id.eq(user_id))
            .select(excluded_notices::notice_url)
            .load(&mut conn)
            .await?;

        Ok(urls.into_iter().collect())
    }
}
