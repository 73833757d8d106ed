//! Date parsing and deadline classification.
//!
//! Sources publish dates in several shapes (`2024-03-15`, `2024.03.15`,
//! `2024/03/15`, `20240315`, `202403151800`). Parse failures never drop a
//! record: an unparsable deadline classifies as [`NoticeStatus::Unknown`] and
//! an unparsable posting date counts as recent.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::models::NoticeStatus;

/// Separated date formats, in preference order.
const SEPARATED_FORMATS: &[&str] = &["%Y-%m-%d", "%Y.%m.%d", "%Y/%m/%d"];

static NON_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9]").unwrap());

/// Outcome of classifying a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deadline {
    /// Deadline already passed; the record must be dropped.
    Closed,
    /// Record stays in the feed with this status.
    Active(NoticeStatus),
}

impl Deadline {
    pub fn is_closed(&self) -> bool {
        matches!(self, Deadline::Closed)
    }

    /// Status to persist, `None` for closed postings.
    pub fn status(&self) -> Option<NoticeStatus> {
        match self {
            Deadline::Closed => None,
            Deadline::Active(status) => Some(*status),
        }
    }
}

/// Per-source window for the "closing soon" status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlinePolicy {
    /// Deadlines at most this many whole days away are "closing soon".
    pub imminent_days: i64,
}

impl DeadlinePolicy {
    /// Funding-program API.
    pub const FUNDING: DeadlinePolicy = DeadlinePolicy { imminent_days: 7 };
    /// Procurement API.
    pub const PROCUREMENT: DeadlinePolicy = DeadlinePolicy { imminent_days: 3 };

    /// Classify an already-parsed deadline against `now`.
    pub fn classify_at(&self, end: NaiveDateTime, now: NaiveDateTime) -> Deadline {
        if end < now {
            return Deadline::Closed;
        }
        if (end - now).num_days() <= self.imminent_days {
            Deadline::Active(NoticeStatus::ClosingSoon)
        } else {
            Deadline::Active(NoticeStatus::Open)
        }
    }
}

/// Classify a funding-API deadline (`YYYYMMDD` or ISO-date prefix).
pub fn classify_funding(raw: &str, now: NaiveDateTime) -> Deadline {
    let raw = raw.trim();
    if raw.is_empty() {
        return Deadline::Active(NoticeStatus::Unknown);
    }

    let parsed = if raw.chars().count() == 8 {
        parse_compact_date(raw)
    } else {
        NaiveDate::parse_from_str(&prefix(raw, 10), "%Y-%m-%d").ok()
    };

    match parsed {
        Some(date) => DeadlinePolicy::FUNDING.classify_at(start_of_day(date), now),
        None => Deadline::Active(NoticeStatus::Unknown),
    }
}

/// Classify a procurement deadline built from a date and an optional time field.
///
/// Both fields present yield a 12-digit `YYYYMMDDHHMM` timestamp; otherwise
/// the first 8 digits are read as a date.
pub fn classify_procurement(date: &str, time: &str, now: NaiveDateTime) -> Deadline {
    let combined = if !date.trim().is_empty() && !time.trim().is_empty() {
        format!("{}{}", date.trim(), time.trim())
    } else {
        date.trim().to_string()
    };
    let digits = NON_DIGITS.replace_all(&combined, "");

    let parsed = if digits.len() >= 12 {
        parse_compact_datetime(&digits[..12])
    } else if digits.len() >= 8 {
        parse_compact_date(&digits[..8]).map(start_of_day)
    } else {
        None
    };

    match parsed {
        Some(end) => DeadlinePolicy::PROCUREMENT.classify_at(end, now),
        None => Deadline::Active(NoticeStatus::Unknown),
    }
}

/// Parse a posting date in any of the supported shapes.
///
/// Tries the separated formats on the first ten characters, then falls back
/// to the first eight digits of the whole string.
pub fn parse_posting_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let head = prefix(raw, 10);
    for format in SEPARATED_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&head, format) {
            return Some(date);
        }
    }

    let digits = NON_DIGITS.replace_all(raw, "");
    if digits.len() >= 8 {
        return parse_compact_date(&digits[..8]);
    }
    None
}

/// Whether a posting date falls inside the last `days` days.
///
/// Unparsable dates count as recent.
pub fn is_recent(raw: &str, days: i64, now: NaiveDateTime) -> bool {
    match parse_posting_date(raw) {
        Some(date) => start_of_day(date) >= now - Duration::days(days),
        None => true,
    }
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn prefix(s: &str, chars: usize) -> String {
    s.chars().take(chars).collect()
}

/// `YYYYMMDD`, digits only.
fn parse_compact_date(digits: &str) -> Option<NaiveDate> {
    if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = digits[0..4].parse().ok()?;
    let month = digits[4..6].parse().ok()?;
    let day = digits[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `YYYYMMDDHHMM`, digits only.
fn parse_compact_datetime(digits: &str) -> Option<NaiveDateTime> {
    let date = parse_compact_date(digits.get(0..8)?)?;
    let hour = digits.get(8..10)?.parse().ok()?;
    let minute = digits.get(10..12)?.parse().ok()?;
    date.and_hms_opt(hour, minute, 0)
}
