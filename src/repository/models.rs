//! Diesel record types for the SQLite tables.
//!
//! Timestamps are stored as RFC 3339 text.

use diesel::prelude::*;

use crate::schema;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = schema::notices)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NoticeRecord {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub agency: String,
    pub posted_date: String,
    pub end_date: Option<String>,
    pub category: String,
    pub subcategory: String,
    pub relevance: i32,
    pub status: String,
    pub source: String,
    pub crawled_at: String,
    pub created_at: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = schema::notices)]
pub struct NewNotice<'a> {
    pub url: &'a str,
    pub title: &'a str,
    pub agency: &'a str,
    pub posted_date: &'a str,
    pub end_date: Option<&'a str>,
    pub category: &'a str,
    pub subcategory: &'a str,
    pub relevance: i32,
    pub status: &'a str,
    pub source: &'a str,
    pub crawled_at: &'a str,
    pub created_at: &'a str,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = schema::excluded_notices)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ExclusionRecord {
    pub id: i64,
    pub user_id: i64,
    pub notice_url: String,
    pub reason: Option<String>,
    pub created_at: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = schema::excluded_notices)]
pub struct NewExclusion<'a> {
    pub user_id: i64,
    pub notice_url: &'a str,
    pub reason: Option<&'a str>,
    pub created_at: &'a str,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = schema::crawl_logs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CrawlLogRecord {
    pub id: i64,
    pub source: String,
    pub total_count: i32,
    pub new_count: i32,
    pub crawled_at: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = schema::crawl_logs)]
pub struct NewCrawlLog<'a> {
    pub source: &'a str,
    pub total_count: i32,
    pub new_count: i32,
    pub crawled_at: &'a str,
}
