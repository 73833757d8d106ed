//! Funding-program API adapter (기업마당).

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::{debug, error, info};

use super::{HttpClient, ScrapeError, SourceAdapter};
use crate::deadline::{self, Deadline};
use crate::models::{Notice, RawRecord, SourceTag};
use crate::normalize::{self, bizinfo_fields as f, Assessment};
use crate::scoring::{self, ScoringInput, Verdict};

pub const API_URL: &str = "https://www.bizinfo.go.kr/uss/rss/bizinfoApi.do";

/// Default number of records requested in the single call.
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// Settings for the funding-program API.
#[derive(Debug, Clone)]
pub struct BizinfoOptions {
    pub api_key: Option<String>,
    pub page_size: u32,
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

impl Default for BizinfoOptions {
    fn default() -> Self {
        Self {
            api_key: None,
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }
}

pub struct BizinfoAdapter {
    options: BizinfoOptions,
    api_url: String,
}

impl BizinfoAdapter {
    pub fn new(options: BizinfoOptions) -> Self {
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

    async fn fetch(&self) -> Result<Value, ScrapeError> {
        let api_key = self
            .options
            .api_key
            .as_deref()
            .ok_or(ScrapeError::MissingCredential("bizinfo"))?;
        let client = HttpClient::with_user_agent(
            SourceTag::Bizinfo.as_str(),
            self.options.timeout,
            self.options.user_agent.as_deref(),
        )?;

        info!(
            "Calling funding-program API (up to {} records)",
            self.options.page_size
        );
        client
            .get_json(
                &self.api_url,
                &[
                    ("crtfcKey", api_key.to_string()),
                    ("dataType", "json".to_string()),
                    ("searchCnt", self.options.page_size.to_string()),
                ],
            )
            .await
    }
}

/// Turn a decoded API response into notices.
///
/// An error field in the response short-circuits to an error.
pub fn parse_response(body: &Value, now: NaiveDateTime) -> Result<Vec<Notice>, ScrapeError> {
    if let Some(err) = body.get("reqErr") {
        let message = match err {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(ScrapeError::Api(message));
    }

    let items = body
        .get("jsonArray")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    Ok(items
        .iter()
        .filter_map(RawRecord::from_json)
        .filter_map(|raw| assess(&raw, now))
        .collect())
}

/// Deadline, then relevance, then normalization. `None` drops the record.
fn assess(raw: &RawRecord, now: NaiveDateTime) -> Option<Notice> {
    let title = raw.get_opt(f::TITLE)?;

    let status = match deadline::classify_funding(raw.get(f::END_DATE), now) {
        Deadline::Closed => {
            debug!("closed: {}", title);
            return None;
        }
        Deadline::Active(status) => status,
    };

    let input = ScoringInput {
        title,
        summary: raw.get(f::SUMMARY),
        category: raw.get(f::CATEGORY),
        subcategory: raw.get(f::SUBCATEGORY),
        tags: raw.get(f::HASHTAGS),
        agency: raw.get(f::AGENCY),
    };
    let relevance = match scoring::Strategy::Funding.score(&input) {
        Verdict::Relevant(score) => score,
        rejected => {
            debug!("rejected {:?}: {:?}", title, rejected);
            return None;
        }
    };

    normalize::normalize(
        SourceTag::Bizinfo,
        raw,
        Assessment {
            relevance,
            status,
            crawled_at: Utc::now(),
        },
    )
}

#[async_trait]
impl SourceAdapter for BizinfoAdapter {
    fn tag(&self) -> SourceTag {
        SourceTag::Bizinfo
    }

    async fn collect(&self) -> Vec<Notice> {
        let body = match self.fetch().await {
            Ok(body) => body,
            Err(e) => {
                error!("Funding-program API request failed: {}", e);
                return Vec::new();
            }
        };

        match parse_response(&body, Local::now().naive_local()) {
            Ok(notices) => {
                info!("Funding-program API: {} notices", notices.len());
                notices
            }
            Err(e) => {
                error!("Funding-program API error: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoticeStatus;
    use serde_json::json;

    fn now() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn item(id: u32, title: &str, category: &str, end: &str) -> Value {
        json!({
            "pblancNm": title,
            "jrsdInsttNm": "중소벤처기업부",
            "creatPnttm": "2024-02-20 10:00:00",
            "reqstEndDe": end,
            "pblancUrl": format!("https://www.bizinfo.go.kr/view.do?pblancId=PBLN_{}", id),
            "bsnsSumryCn": "",
            "pldirSportRealmLclasCodeNm": category,
            "pldirSportRealmMlsfcCodeNm": "",
            "hashtags": ""
        })
    }

    #[test]
    fn test_error_field_short_circuits() {
        let body = json!({"reqErr": "인증키 오류", "jsonArray": [item(1, "디자인 바우처", "경영", "")]});
        assert!(matches!(
            parse_response(&body, now()),
            Err(ScrapeError::Api(msg)) if msg == "인증키 오류"
        ));
    }

    #[test]
    fn test_closed_and_irrelevant_records_are_dropped() {
        let body = json!({"jsonArray": [
            item(1, "디자인 바우처 수행기관 모집", "경영", "20240320"),
            item(2, "디자인 바우처 수행기관 모집", "경영", "20240229"),
            item(3, "디자인 지원 융자", "금융지원", "20240320"),
            item(4, "수출 판로 개척", "수출", "20240320"),
            item(5, "브랜드 개발 지원", "기술", "20240305"),
            item(6, "패키지 디자인 지원", "기술", "")
        ]});

        let notices = parse_response(&body, now()).unwrap();
        let urls: Vec<_> = notices.iter().map(|n| n.detail_url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://www.bizinfo.go.kr/view.do?pblancId=PBLN_1",
                "https://www.bizinfo.go.kr/view.do?pblancId=PBLN_5",
                "https://www.bizinfo.go.kr/view.do?pblancId=PBLN_6",
            ]
        );
        assert_eq!(notices[0].status, NoticeStatus::Open);
        assert_eq!(notices[0].relevance, 8);
        assert_eq!(notices[1].status, NoticeStatus::ClosingSoon);
        assert_eq!(notices[2].status, NoticeStatus::Unknown);
        assert!(notices.iter().all(|n| n.source == SourceTag::Bizinfo));
    }

    #[test]
    fn test_missing_array_is_empty() {
        assert!(parse_response(&json!({}), now()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_key_yields_nothing() {
        let adapter = BizinfoAdapter::new(BizinfoOptions::default());
        assert!(adapter.collect().await.is_empty());
    }
}
