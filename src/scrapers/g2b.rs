//! Procurement API adapter (나라장터 bid notices).
//!
//! Service contracts cluster late in the result ordering, so the scan reads a
//! fixed set of early and late pages instead of paging through everything.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Local, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::{debug, error, info};

use super::{HttpClient, ScrapeError, SourceAdapter};
use crate::deadline::{self, Deadline};
use crate::models::{Notice, RawRecord, SourceTag};
use crate::normalize::{self, g2b_fields as f, Assessment};
use crate::scoring::{self, Verdict};

pub const API_URL: &str =
    "https://apis.data.go.kr/1230000/ao/PubDataOpnStdService/getDataSetOpnStdBidPblancInfo";

/// Rows requested per page.
pub const ROWS_PER_PAGE: u32 = 500;

/// Business division that marks a service contract.
const SERVICE_DIVISION: &str = "용역";

/// Pages scanned, in order.
pub fn scan_pages() -> impl Iterator<Item = u32> {
    (1..=5).chain(50..=60)
}

/// Settings for the procurement API.
#[derive(Debug, Clone)]
pub struct G2bOptions {
    pub api_key: Option<String>,
    /// Query window in days, ending today.
    pub days: i64,
    /// Stop once this many relevant items are collected.
    pub target_items: usize,
    /// Pause between pages.
    pub page_pause: Duration,
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

impl Default for G2bOptions {
    fn default() -> Self {
        Self {
            api_key: None,
            days: 30,
            target_items: 100,
            page_pause: Duration::from_millis(300),
            timeout: Duration::from_secs(60),
            user_agent: None,
        }
    }
}

/// Inclusive notice-date window, as `YYYYMMDDHHMM` strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryWindow {
    pub begin: String,
    pub end: String,
}

impl QueryWindow {
    pub fn ending_at(now: NaiveDateTime, days: i64) -> Self {
        let start = now - ChronoDuration::days(days);
        Self {
            begin: start.format("%Y%m%d0000").to_string(),
            end: now.format("%Y%m%d2359").to_string(),
        }
    }
}

/// One page of raw API output.
#[async_trait]
pub trait BidPageSource: Send + Sync {
    async fn fetch_page(&self, page: u32, window: &QueryWindow) -> Result<Value, ScrapeError>;
}

/// Live API pages.
struct ApiPages {
    client: HttpClient,
    api_key: String,
    api_url: String,
}

#[async_trait]
impl BidPageSource for ApiPages {
    async fn fetch_page(&self, page: u32, window: &QueryWindow) -> Result<Value, ScrapeError> {
        self.client
            .get_json(
                &self.api_url,
                &[
                    ("serviceKey", self.api_key.clone()),
                    ("numOfRows", ROWS_PER_PAGE.to_string()),
                    ("pageNo", page.to_string()),
                    ("bidNtceBgnDt", window.begin.clone()),
                    ("bidNtceEndDt", window.end.clone()),
                    ("type", "json".to_string()),
                ],
            )
            .await
    }
}

pub struct G2bAdapter {
    options: G2bOptions,
    api_url: String,
}

impl G2bAdapter {
    pub fn new(options: G2bOptions) -> Self {
        Self {
            options,
            api_url: API_URL.to_string(),
        }
    }

    /// Point the adapter at a different endpoint.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    fn api_pages(&self) -> Result<ApiPages, ScrapeError> {
        let api_key = self
            .options
            .api_key
            .clone()
            .ok_or(ScrapeError::MissingCredential("g2b"))?;
        let client = HttpClient::with_user_agent(
            SourceTag::G2b.as_str(),
            self.options.timeout,
            self.options.user_agent.as_deref(),
        )?;
        Ok(ApiPages {
            client,
            api_key,
            api_url: self.api_url.clone(),
        })
    }

    /// Scan the page window until the target is met, a page comes back
    /// empty, or a request fails. Items collected so far are always kept.
    pub async fn scan(&self, pages: &dyn BidPageSource, now: NaiveDateTime) -> Vec<Notice> {
        let window = QueryWindow::ending_at(now, self.options.days);
        info!(
            "Calling procurement API (last {} days, {}..{})",
            self.options.days, window.begin, window.end
        );

        let mut notices = Vec::new();
        for page in scan_pages() {
            let body = match pages.fetch_page(page, &window).await {
                Ok(body) => body,
                Err(e) => {
                    error!("Procurement API request failed on page {}: {}", page, e);
                    break;
                }
            };

            let items = page_items(&body);
            if items.is_empty() {
                debug!("page {} is empty, stopping", page);
                break;
            }

            let before = notices.len();
            notices.extend(
                items
                    .into_iter()
                    .filter_map(RawRecord::from_json)
                    .filter_map(|raw| assess(&raw, now)),
            );
            info!("  page {}: {} service notices", page, notices.len() - before);

            if notices.len() >= self.options.target_items {
                break;
            }
            if !self.options.page_pause.is_zero() {
                tokio::time::sleep(self.options.page_pause).await;
            }
        }

        info!("Procurement API: {} notices", notices.len());
        notices
    }
}

/// Items at `response.body.items`, which may be an array, an object wrapping
/// an `item` array or object, or a bare object.
pub fn page_items(body: &Value) -> Vec<&Value> {
    let items = match body.pointer("/response/body/items") {
        Some(items) => items,
        None => return Vec::new(),
    };

    match items {
        Value::Array(list) => list.iter().collect(),
        Value::Object(map) => match map.get("item") {
            Some(Value::Array(list)) => list.iter().collect(),
            Some(item @ Value::Object(_)) => vec![item],
            Some(_) => Vec::new(),
            None if map.is_empty() => Vec::new(),
            None => vec![items],
        },
        _ => Vec::new(),
    }
}

/// Division filter, deadline, relevance, normalization. `None` drops the item.
fn assess(raw: &RawRecord, now: NaiveDateTime) -> Option<Notice> {
    let title = raw.get_opt(f::TITLE)?;

    if let Some(division) = raw.get_opt(f::DIVISION) {
        if !division.contains(SERVICE_DIVISION) {
            return None;
        }
    }

    let status = match deadline::classify_procurement(raw.get(f::CLOSE_DATE), raw.get(f::CLOSE_TIME), now)
    {
        Deadline::Closed => return None,
        Deadline::Active(status) => status,
    };

    let relevance = match scoring::score_procurement(title, raw.get(f::AGENCY)) {
        Verdict::Relevant(score) => score,
        Verdict::Rejected(reason) => {
            debug!("rejected {:?}: {:?}", title, reason);
            return None;
        }
    };

    normalize::normalize(
        SourceTag::G2b,
        raw,
        Assessment {
            relevance,
            status,
            crawled_at: Utc::now(),
        },
    )
}

#[async_trait]
impl SourceAdapter for G2bAdapter {
    fn tag(&self) -> SourceTag {
        SourceTag::G2b
    }

    async fn collect(&self) -> Vec<Notice> {
        match self.api_pages() {
            Ok(pages) => self.scan(&pages, Local::now().naive_local()).await,
            Err(e) => {
                error!("Procurement API unavailable: {}", e);
                Vec::new()
            }
        }
    }
}
