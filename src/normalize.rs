//! Raw record normalization.
//!
//! Maps each adapter's raw field bag onto the canonical [`Notice`]. Scoring and
//! deadline classification happen before this step; the normalizer only shapes
//! fields and refuses records with no title.

use chrono::{DateTime, Utc};

use crate::models::{Notice, NoticeStatus, RawRecord, SourceTag};

/// Field names of the funding-program API.
pub mod bizinfo_fields {
    pub const TITLE: &str = "pblancNm";
    pub const AGENCY: &str = "jrsdInsttNm";
    pub const POSTED: &str = "creatPnttm";
    pub const END_DATE: &str = "reqstEndDe";
    pub const URL: &str = "pblancUrl";
    pub const SUMMARY: &str = "bsnsSumryCn";
    pub const CATEGORY: &str = "pldirSportRealmLclasCodeNm";
    pub const SUBCATEGORY: &str = "pldirSportRealmMlsfcCodeNm";
    pub const HASHTAGS: &str = "hashtags";
    pub const TARGET: &str = "trgetNm";
    pub const EXECUTOR: &str = "excInsttNm";
}

/// Field names of the procurement API.
pub mod g2b_fields {
    pub const TITLE: &str = "bidNtceNm";
    pub const DIVISION: &str = "bsnsDivNm";
    pub const CLOSE_DATE: &str = "bidClseDate";
    pub const CLOSE_TIME: &str = "bidClseTm";
    pub const AGENCY: &str = "ntceInsttNm";
    pub const NOTICE_DATE: &str = "bidNtceDate";
    pub const NOTICE_TIME: &str = "bidNtceBgn";
    pub const URL: &str = "bidNtceUrl";
    pub const BUDGET: &str = "presmptPrce";
}

/// Field names the agency adapter fills in per row.
pub mod agency_fields {
    pub const TITLE: &str = "title";
    pub const URL: &str = "url";
    pub const DATE: &str = "date";
    pub const AGENCY: &str = "agency";
}

/// Category assigned to agency postings.
pub const AGENCY_CATEGORY: &str = "지원사업";
/// Category assigned to procurement notices.
pub const PROCUREMENT_CATEGORY: &str = "용역";
/// Procurement subcategory is the title truncated to this many characters.
const PROCUREMENT_SUBCATEGORY_CHARS: usize = 20;

/// Verdicts computed upstream of normalization.
#[derive(Debug, Clone, Copy)]
pub struct Assessment {
    pub relevance: u8,
    pub status: NoticeStatus,
    pub crawled_at: DateTime<Utc>,
}

/// Normalize a raw record from `source`. Returns `None` when it has no title.
pub fn normalize(source: SourceTag, raw: &RawRecord, assessment: Assessment) -> Option<Notice> {
    match source {
        SourceTag::Bizinfo => from_bizinfo(raw, assessment),
        SourceTag::Agency => from_agency(raw, assessment),
        SourceTag::G2b => from_g2b(raw, assessment),
    }
}

fn from_bizinfo(raw: &RawRecord, a: Assessment) -> Option<Notice> {
    use bizinfo_fields as f;

    let title = raw.get_opt(f::TITLE)?;
    Some(Notice {
        title: title.to_string(),
        agency: raw.get(f::AGENCY).trim().to_string(),
        posted_date: raw.get(f::POSTED).trim().to_string(),
        end_date: raw.get_opt(f::END_DATE).map(str::to_string),
        detail_url: raw.get(f::URL).trim().to_string(),
        category: raw.get(f::CATEGORY).trim().to_string(),
        subcategory: raw.get(f::SUBCATEGORY).trim().to_string(),
        relevance: a.relevance.min(Notice::MAX_RELEVANCE),
        status: a.status,
        crawled_at: a.crawled_at,
        source: SourceTag::Bizinfo,
    })
}

fn from_agency(raw: &RawRecord, a: Assessment) -> Option<Notice> {
    use agency_fields as f;

    let title = raw.get_opt(f::TITLE)?;
    Some(Notice {
        title: title.to_string(),
        agency: raw.get(f::AGENCY).trim().to_string(),
        posted_date: raw.get(f::DATE).trim().to_string(),
        end_date: None,
        detail_url: raw.get(f::URL).trim().to_string(),
        category: AGENCY_CATEGORY.to_string(),
        subcategory: String::new(),
        relevance: a.relevance.min(Notice::MAX_RELEVANCE),
        // Agency listings carry no deadline.
        status: NoticeStatus::Unknown,
        crawled_at: a.crawled_at,
        source: SourceTag::Agency,
    })
}

fn from_g2b(raw: &RawRecord, a: Assessment) -> Option<Notice> {
    use g2b_fields as f;

    let title = raw.get_opt(f::TITLE)?;
    let posted_date = match raw.get_opt(f::NOTICE_DATE) {
        Some(date) => format!("{} {}", date, raw.get(f::NOTICE_TIME).trim())
            .trim_end()
            .to_string(),
        None => String::new(),
    };
    let end_date = match (raw.get_opt(f::CLOSE_DATE), raw.get_opt(f::CLOSE_TIME)) {
        (Some(date), Some(time)) => Some(format!("{} {}", date, time)),
        (Some(date), None) => Some(date.to_string()),
        (None, _) => None,
    };

    Some(Notice {
        title: title.to_string(),
        agency: raw.get(f::AGENCY).trim().to_string(),
        posted_date,
        end_date,
        detail_url: raw.get(f::URL).trim().to_string(),
        category: PROCUREMENT_CATEGORY.to_string(),
        subcategory: title.chars().take(PROCUREMENT_SUBCATEGORY_CHARS).collect(),
        relevance: a.relevance.min(Notice::MAX_RELEVANCE),
        status: a.status,
        crawled_at: a.crawled_at,
        source: SourceTag::G2b,
    })
}
