//! Canonical notice model.
//!
//! Every adapter normalizes its raw output into a [`Notice`]. The detail URL
//! is the identity key: two notices with the same URL are the same notice,
//! whatever else drifted between crawls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which pipeline source produced a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    /// Funding-program API (기업마당).
    Bizinfo,
    /// Agency website scrape (기관별).
    Agency,
    /// Procurement API (나라장터).
    G2b,
}

impl SourceTag {
    /// All tags in pipeline execution order.
    pub const ALL: [SourceTag; 3] = [SourceTag::Bizinfo, SourceTag::Agency, SourceTag::G2b];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bizinfo => "bizinfo",
            Self::Agency => "agency",
            Self::G2b => "g2b",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "bizinfo" => Some(Self::Bizinfo),
            "agency" => Some(Self::Agency),
            "g2b" => Some(Self::G2b),
            _ => None,
        }
    }

    /// Display name used in the store and the audit log.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Bizinfo => "기업마당",
            Self::Agency => "기관별",
            Self::G2b => "나라장터",
        }
    }

    /// Parse either the short id or the display name.
    pub fn from_stored(s: &str) -> Option<Self> {
        Self::from_str(s).or_else(|| Self::ALL.into_iter().find(|t| t.display_name() == s))
    }
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a stored notice.
///
/// Closed postings (마감) are never represented here: they are dropped before
/// normalization, see [`crate::deadline::Deadline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeStatus {
    /// 확인필요: deadline absent or unparsable.
    Unknown,
    /// 접수중: accepting applications.
    Open,
    /// 마감임박: deadline within the source's imminent window.
    ClosingSoon,
}

impl NoticeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "확인필요",
            Self::Open => "접수중",
            Self::ClosingSoon => "마감임박",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "확인필요" => Some(Self::Unknown),
            "접수중" => Some(Self::Open),
            "마감임박" => Some(Self::ClosingSoon),
            _ => None,
        }
    }
}

impl std::fmt::Display for NoticeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized, scored funding announcement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    /// Announcement title (never empty).
    pub title: String,
    /// Issuing agency name.
    pub agency: String,
    /// Posting date as shown by the source (display only).
    pub posted_date: String,
    /// Deadline as shown by the source, if any.
    pub end_date: Option<String>,
    /// Absolute detail URL, the identity key.
    pub detail_url: String,
    pub category: String,
    pub subcategory: String,
    /// Relevance score in 0..=10.
    pub relevance: u8,
    pub status: NoticeStatus,
    pub crawled_at: DateTime<Utc>,
    pub source: SourceTag,
}

impl Notice {
    /// Maximum relevance score.
    pub const MAX_RELEVANCE: u8 = 10;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_tag_roundtrip_names() {
        for tag in SourceTag::ALL {
            assert_eq!(SourceTag::from_str(tag.as_str()), Some(tag));
            assert_eq!(SourceTag::from_stored(tag.display_name()), Some(tag));
        }
        assert_eq!(SourceTag::from_str("unknown"), None);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(NoticeStatus::Unknown.as_str(), "확인필요");
        assert_eq!(NoticeStatus::from_str("마감임박"), Some(NoticeStatus::ClosingSoon));
        // Closed is a drop decision, never a stored status.
        assert_eq!(NoticeStatus::from_str("마감"), None);
    }
}
