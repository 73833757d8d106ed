//! Row extraction from rendered agency listing pages.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::scrapers::{ScrapeError, SourceProfile};

/// Titles shorter than this (in characters) are layout noise.
pub const MIN_TITLE_CHARS: usize = 5;

/// Quoted numeric id inside an inline click handler.
static ONCLICK_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"['"](\d+)['"]"#).unwrap());

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// One listing row as found on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    pub title: String,
    /// Absolute detail URL, or empty when the row had no link.
    pub url: String,
    /// Date cell text, empty when the date selector did not match.
    pub date: String,
}

/// Compiled selectors for one profile.
struct ProfileSelectors {
    list: Selector,
    title: Selector,
    date: Selector,
}

impl ProfileSelectors {
    fn compile(profile: &SourceProfile) -> Result<Self, ScrapeError> {
        let parse = |s: &str| Selector::parse(s).map_err(|_| ScrapeError::Selector(s.to_string()));
        Ok(Self {
            list: parse(profile.list_selector)?,
            title: parse(profile.title_selector)?,
            date: parse(profile.date_selector)?,
        })
    }
}

/// Extract up to `max_rows` listing rows from `html`.
///
/// Rows without a title element or with a too-short title are skipped.
pub fn extract_rows(
    html: &str,
    profile: &SourceProfile,
    max_rows: usize,
) -> Result<Vec<ListingRow>, ScrapeError> {
    let selectors = ProfileSelectors::compile(profile)?;
    let document = Html::parse_document(html);
    let base = Url::parse(profile.url).ok();

    let rows = document
        .select(&selectors.list)
        .take(max_rows)
        .filter_map(|row| parse_row(row, &selectors, profile, base.as_ref()))
        .collect();
    Ok(rows)
}

fn parse_row(
    row: ElementRef<'_>,
    selectors: &ProfileSelectors,
    profile: &SourceProfile,
    base: Option<&Url>,
) -> Option<ListingRow> {
    let title_elem = row.select(&selectors.title).next()?;
    let title = collapse_whitespace(&title_elem.text().collect::<String>());
    if title.chars().count() < MIN_TITLE_CHARS {
        debug!("{}: skipping short title {:?}", profile.id, title);
        return None;
    }

    let url = resolve_link(
        title_elem.value().attr("href").unwrap_or(""),
        title_elem.value().attr("onclick").unwrap_or(""),
        profile.url,
        base,
    );

    let date = row
        .select(&selectors.date)
        .next()
        .map(|cell| collapse_whitespace(&cell.text().collect::<String>()))
        .unwrap_or_default();

    Some(ListingRow { title, url, date })
}

/// Turn a row link into an absolute detail URL.
///
/// Script pseudo-links are rebuilt from the numeric id in the click handler as
/// `{listing URL without query}?mode=view&idx={id}`; without an id the
/// listing URL itself is used.
pub fn resolve_link(href: &str, onclick: &str, listing_url: &str, base: Option<&Url>) -> String {
    let href = href.trim();
    if href.to_ascii_lowercase().starts_with("javascript") {
        return match ONCLICK_ID.captures(onclick) {
            Some(caps) => {
                let base_url = listing_url.split('?').next().unwrap_or(listing_url);
                format!("{}?mode=view&idx={}", base_url, &caps[1])
            }
            None => listing_url.to_string(),
        };
    }
    if href.is_empty() {
        return String::new();
    }
    match base.and_then(|b| b.join(href).ok()) {
        Some(url) => url.to_string(),
        None => href.to_string(),
    }
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::profiles;

    const LISTING: &str = r#"
        <html><body><table><tbody>
          <tr>
            <td>1</td>
            <td><a href="/board/view.do?idx=101">2024 디자인 브랜딩 지원사업
                 기업 모집 공고</a></td>
            <td>관리자</td>
            <td>2024-03-15</td>
          </tr>
          <tr>
            <td>2</td>
            <td><a href="javascript:void(0)" onclick="fnView('2041');">바우처 수행기관 모집</a></td>
            <td>관리자</td>
            <td>2024.03.10</td>
          </tr>
          <tr>
            <td>3</td>
            <td><a href="javascript:;" onclick="goView();">홍보 영상 제작 지원사업 공고</a></td>
            <td>관리자</td>
          </tr>
          <tr><td>4</td><td><a href="/x">공지</a></td><td></td><td>2024-03-01</td></tr>
          <tr><td>5</td><td><a href="/y">모집공고</a></td><td></td><td>2024-03-02</td></tr>
          <tr><td colspan="4">등록된 게시물이 없습니다</td></tr>
        </tbody></table></body></html>
    "#;

    fn kidp() -> &'static SourceProfile {
        profiles::get("kidp").unwrap()
    }

    #[test]
    fn test_extracts_titles_links_and_dates() {
        let rows = extract_rows(LISTING, kidp(), 20).unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].title, "2024 디자인 브랜딩 지원사업 기업 모집 공고");
        assert_eq!(rows[0].url, "https://www.kidp.or.kr/board/view.do?idx=101");
        assert_eq!(rows[0].date, "2024-03-15");

        assert_eq!(
            rows[1].url,
            "https://www.kidp.or.kr/?mode=view&idx=2041"
        );
        assert_eq!(rows[1].date, "2024.03.10");

        // No id in the handler: fall back to the listing page.
        assert_eq!(rows[2].url, "https://www.kidp.or.kr/?menuno=1202");
        assert_eq!(rows[2].date, "");
    }

    #[test]
    fn test_short_titles_are_dropped() {
        let rows = extract_rows(LISTING, kidp(), 20).unwrap();
        assert!(rows.iter().all(|r| r.title.chars().count() >= MIN_TITLE_CHARS));
        // Four characters, keywords included, is still too short.
        assert!(!rows.iter().any(|r| r.title == "공지" || r.title == "모집공고"));
    }

    #[test]
    fn test_max_rows_counts_page_rows() {
        let rows = extract_rows(LISTING, kidp(), 1).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_missing_href_yields_empty_url() {
        assert_eq!(resolve_link("", "", "https://a.kr/list?x=1", None), "");
    }

    #[test]
    fn test_javascript_link_strips_listing_query() {
        let url = resolve_link(
            "JavaScript:view()",
            "view(\"77\", 'board')",
            "https://www.example.or.kr/board/list.do?bbs=3",
            None,
        );
        assert_eq!(url, "https://www.example.or.kr/board/list.do?mode=view&idx=77");
    }

    #[test]
    fn test_absolute_href_is_kept() {
        let base = Url::parse("https://a.kr/list").ok();
        assert_eq!(
            resolve_link("https://b.kr/view?id=1", "", "https://a.kr/list", base.as_ref()),
            "https://b.kr/view?id=1"
        );
    }
}
