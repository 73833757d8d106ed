//! Agency website adapter.
//!
//! Renders each profile's listing page in a headless browser, extracts the
//! newest rows and keeps recent, relevant announcements. A failing profile
//! yields nothing and the crawl moves on to the next one.

mod extract;

pub use extract::{extract_rows, resolve_link, ListingRow, MIN_TITLE_CHARS};

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime, Utc};
use tracing::{debug, error, info, warn};

use super::browser::{BrowserEngineConfig, BrowserSession, PageRenderer};
use super::{profiles, ScrapeError, SourceAdapter, SourceProfile};
use crate::deadline;
use crate::models::{Notice, NoticeStatus, RawRecord, SourceTag};
use crate::normalize::{self, agency_fields, Assessment};
use crate::scoring;

/// Tunables for the agency crawl.
#[derive(Debug, Clone)]
pub struct AgencyOptions {
    /// Rows considered per listing page.
    pub max_rows: usize,
    /// Postings older than this many days are dropped.
    pub recent_days: i64,
    /// Pause after each profile.
    pub pause: Duration,
}

impl Default for AgencyOptions {
    fn default() -> Self {
        Self {
            max_rows: 20,
            recent_days: 60,
            pause: Duration::from_secs(1),
        }
    }
}

/// Scrapes the configured agency profiles through one browser session.
pub struct AgencyAdapter {
    profiles: Vec<&'static SourceProfile>,
    browser: BrowserEngineConfig,
    options: AgencyOptions,
}

impl AgencyAdapter {
    pub fn new(
        profiles: Vec<&'static SourceProfile>,
        browser: BrowserEngineConfig,
        options: AgencyOptions,
    ) -> Self {
        Self {
            profiles,
            browser,
            options,
        }
    }

    /// Adapter over every registered profile.
    pub fn all_profiles(browser: BrowserEngineConfig, options: AgencyOptions) -> Self {
        Self::new(profiles::select(&[]), browser, options)
    }

    pub fn profiles(&self) -> &[&'static SourceProfile] {
        &self.profiles
    }

    /// Crawl every profile with `renderer`, in order.
    pub async fn collect_with(
        &self,
        renderer: &mut dyn PageRenderer,
        now: NaiveDateTime,
    ) -> Vec<Notice> {
        let mut notices = Vec::new();

        for profile in &self.profiles {
            info!("Scraping {} ({})", profile.name, profile.id);
            match self.scrape_profile(renderer, profile, now).await {
                Ok(found) => {
                    info!("    {}: {} notices", profile.id, found.len());
                    notices.extend(found);
                }
                Err(ScrapeError::Timeout { what, seconds }) => {
                    warn!("{}: timed out after {}s waiting for {}", profile.name, seconds, what);
                }
                Err(e) => {
                    error!("{} crawl failed: {}", profile.name, e);
                }
            }

            if !self.options.pause.is_zero() {
                tokio::time::sleep(self.options.pause).await;
            }
        }

        notices
    }

    async fn scrape_profile(
        &self,
        renderer: &mut dyn PageRenderer,
        profile: &SourceProfile,
        now: NaiveDateTime,
    ) -> Result<Vec<Notice>, ScrapeError> {
        let html = renderer
            .render(profile.url, profile.list_selector, profile.settle_interval())
            .await?;
        let rows = extract_rows(&html, profile, self.options.max_rows)?;
        Ok(rows
            .into_iter()
            .filter_map(|row| assess_row(row, profile, now, self.options.recent_days))
            .collect())
    }
}

/// Apply the title gates and recency filter to one row.
fn assess_row(
    row: ListingRow,
    profile: &SourceProfile,
    now: NaiveDateTime,
    recent_days: i64,
) -> Option<Notice> {
    if row.title.chars().count() < MIN_TITLE_CHARS {
        return None;
    }

    let verdict = scoring::score_agency(&row.title);
    let scoring::Verdict::Relevant(relevance) = verdict else {
        debug!("{}: rejected {:?}: {:?}", profile.id, row.title, verdict);
        return None;
    };

    if !deadline::is_recent(&row.date, recent_days, now) {
        debug!("{}: stale posting {:?} ({})", profile.id, row.title, row.date);
        return None;
    }

    let raw = RawRecord::new()
        .with(agency_fields::TITLE, row.title)
        .with(agency_fields::URL, row.url)
        .with(agency_fields::DATE, row.date)
        .with(agency_fields::AGENCY, profile.name);

    normalize::normalize(
        SourceTag::Agency,
        &raw,
        Assessment {
            relevance,
            status: NoticeStatus::Unknown,
            crawled_at: Utc::now(),
        },
    )
}

#[async_trait]
impl SourceAdapter for AgencyAdapter {
    fn tag(&self) -> SourceTag {
        SourceTag::Agency
    }

    async fn collect(&self) -> Vec<Notice> {
        let mut session = match BrowserSession::launch(&self.browser).await {
            Ok(session) => session,
            Err(e) => {
                error!("Browser launch failed, skipping agency sources: {}", e);
                return Vec::new();
            }
        };

        let notices = self
            .collect_with(&mut session, Local::now().naive_local())
            .await;
        session.close().await;
        notices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakeRenderer {
        pages: HashMap<&'static str, Result<String, &'static str>>,
        visited: Vec<String>,
    }

    #[async_trait]
    impl PageRenderer for FakeRenderer {
        async fn render(
            &mut self,
            url: &str,
            _selector: &str,
            _settle: Duration,
        ) -> Result<String, ScrapeError> {
            self.visited.push(url.to_string());
            match self.pages.get(url) {
                Some(Ok(html)) => Ok(html.clone()),
                Some(Err(message)) => Err(ScrapeError::Navigation {
                    url: url.to_string(),
                    message: message.to_string(),
                }),
                None => Err(ScrapeError::Timeout {
                    what: "selector".into(),
                    seconds: 10,
                }),
            }
        }
    }

    fn listing(rows: &[(&str, &str, &str)]) -> String {
        let body: String = rows
            .iter()
            .map(|(title, href, date)| {
                format!(
                    "<tr><td>n</td><td><a href=\"{}\">{}</a></td><td>w</td><td>{}</td></tr>",
                    href, title, date
                )
            })
            .collect();
        format!("<table><tbody>{}</tbody></table>", body)
    }

    fn now() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 3, 20)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn adapter(ids: &[&str]) -> AgencyAdapter {
        let ids: Vec<String> = ids.iter().map(|s| s.to_string()).collect();
        AgencyAdapter::new(
            profiles::select(&ids),
            BrowserEngineConfig::default(),
            AgencyOptions {
                pause: Duration::ZERO,
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_filters_rows_and_scores() {
        let kidp = profiles::get("kidp").unwrap();
        let html = listing(&[
            ("2024 디자인 브랜딩 지원사업 기업 모집 공고", "/v?idx=1", "2024-03-15"),
            ("디자인 바우처 선정결과 안내", "/v?idx=2", "2024-03-14"),
            ("2023 디자인 지원사업 모집", "/v?idx=3", "2023-10-01"),
            ("사무실 이전 안내", "/v?idx=4", "2024-03-13"),
            ("홍보물 제작 지원사업 모집", "/v?idx=5", "날짜 미정"),
        ]);
        let mut renderer = FakeRenderer {
            pages: HashMap::from([(kidp.url, Ok(html))]),
            visited: Vec::new(),
        };

        let notices = adapter(&["kidp"]).collect_with(&mut renderer, now()).await;
        let titles: Vec<_> = notices.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["2024 디자인 브랜딩 지원사업 기업 모집 공고", "홍보물 제작 지원사업 모집"]
        );

        let first = &notices[0];
        assert_eq!(first.relevance, 9);
        assert_eq!(first.agency, "한국디자인진흥원");
        assert_eq!(first.detail_url, "https://www.kidp.or.kr/v?idx=1");
        assert_eq!(first.source, SourceTag::Agency);
        assert_eq!(first.status, NoticeStatus::Unknown);
        // Unparsable date is kept.
        assert_eq!(notices[1].posted_date, "날짜 미정");
    }

    #[tokio::test]
    async fn test_failing_profile_does_not_stop_crawl() {
        let kidp = profiles::get("kidp").unwrap();
        let kiat = profiles::get("kiat").unwrap();
        let html = listing(&[("디자인 지원사업 참여기업 모집", "/v?idx=9", "2024-03-19")]);
        let mut renderer = FakeRenderer {
            pages: HashMap::from([(kidp.url, Err("net::ERR_CONNECTION_RESET")), (kiat.url, Ok(html))]),
            visited: Vec::new(),
        };

        let notices = adapter(&["kidp", "kiat", "kocca"])
            .collect_with(&mut renderer, now())
            .await;
        assert_eq!(renderer.visited.len(), 3);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].agency, "한국산업기술진흥원");
    }

    #[tokio::test]
    async fn test_only_first_rows_are_considered() {
        let kidp = profiles::get("kidp").unwrap();
        let rows: Vec<(String, String)> = (0..25)
            .map(|i| (format!("디자인 지원사업 모집 {}", i), format!("/v?idx={}", i)))
            .collect();
        let rows: Vec<(&str, &str, &str)> = rows
            .iter()
            .map(|(t, h)| (t.as_str(), h.as_str(), "2024-03-19"))
            .collect();
        let mut renderer = FakeRenderer {
            pages: HashMap::from([(kidp.url, Ok(listing(&rows)))]),
            visited: Vec::new(),
        };

        let notices = adapter(&["kidp"]).collect_with(&mut renderer, now()).await;
        assert_eq!(notices.len(), 20);
    }
}
