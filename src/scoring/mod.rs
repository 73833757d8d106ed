//! Relevance scoring.
//!
//! Each source carries its own formula: agency titles start from a baseline
//! once they pass the keyword gate, funding-API records are gated on their
//! structured category fields first, and procurement titles are ranked on a
//! weighted keyword ladder. Exclusion checks always run before any positive
//! scoring, so a rejected record scores 0 regardless of other matches.

pub mod keywords;

use serde::Serialize;

use crate::models::Notice;
use keywords::{count_matches, first_match};

/// Why a record was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RejectReason {
    /// Top-level category denotes a financial instrument.
    FinancialCategory,
    /// Sub-category is a loan, investment or guarantee program.
    ExcludedSubcategory(&'static str),
    /// Text contains an exclusion keyword.
    ExcludedKeyword(&'static str),
    /// None of the required announcement terms appear.
    MissingRequiredKeyword,
    /// No provider or service-domain signal at all.
    NoPositiveSignal,
}

/// Outcome of scoring a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Rejected(RejectReason),
    /// Accepted with a score in 1..=10.
    Relevant(u8),
}

impl Verdict {
    /// Numeric score; rejected records score 0.
    pub fn score(&self) -> u8 {
        match self {
            Verdict::Rejected(_) => 0,
            Verdict::Relevant(score) => *score,
        }
    }

    pub fn is_relevant(&self) -> bool {
        matches!(self, Verdict::Relevant(_))
    }
}

/// Text fields a strategy may look at.
#[derive(Debug, Clone, Default)]
pub struct ScoringInput<'a> {
    pub title: &'a str,
    pub summary: &'a str,
    pub category: &'a str,
    pub subcategory: &'a str,
    pub tags: &'a str,
    pub agency: &'a str,
}

/// Per-source scoring formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Funding-program API: category gates, exclusion, provider/service bonus.
    Funding,
    /// Agency listings: required/excluded title terms, baseline 5.
    Agency,
    /// Procurement API: exclusion list, then a 4/2/1 keyword ladder.
    Procurement,
}

impl Strategy {
    pub fn score(&self, input: &ScoringInput<'_>) -> Verdict {
        match self {
            Strategy::Funding => score_funding(input),
            Strategy::Agency => score_agency(input.title),
            Strategy::Procurement => score_procurement(input.title, input.agency),
        }
    }
}

const FUNDING_PROVIDER_BONUS: u32 = 5;
const FUNDING_SERVICE_BONUS: u32 = 3;
const AGENCY_BASELINE: u32 = 5;
const AGENCY_FIELD_BONUS: u32 = 2;
const PROCUREMENT_WEIGHTS: (u32, u32, u32) = (4, 2, 1);

fn cap(score: u32) -> u8 {
    score.min(u32::from(Notice::MAX_RELEVANCE)) as u8
}

/// Funding-program records.
pub fn score_funding(input: &ScoringInput<'_>) -> Verdict {
    let category = input.category.to_lowercase();
    if category.contains(keywords::FUNDING_FINANCIAL_CATEGORY) {
        return Verdict::Rejected(RejectReason::FinancialCategory);
    }

    let subcategory = input.subcategory.to_lowercase();
    if let Some(kw) = first_match(&subcategory, keywords::FUNDING_EXCLUDED_SUBCATEGORIES) {
        return Verdict::Rejected(RejectReason::ExcludedSubcategory(kw));
    }

    let text = [
        input.title,
        input.summary,
        input.tags,
        input.category,
        input.subcategory,
    ]
    .join(" ")
    .to_lowercase();

    if let Some(kw) = first_match(&text, keywords::FUNDING_EXCLUDED) {
        return Verdict::Rejected(RejectReason::ExcludedKeyword(kw));
    }

    let has_provider = first_match(&text, keywords::FUNDING_PROVIDER).is_some();
    let service_matches = count_matches(&text, keywords::FUNDING_SERVICE) as u32;
    if !has_provider && service_matches == 0 {
        return Verdict::Rejected(RejectReason::NoPositiveSignal);
    }

    let mut score = service_matches * FUNDING_SERVICE_BONUS;
    if has_provider {
        score += FUNDING_PROVIDER_BONUS;
    }
    Verdict::Relevant(cap(score))
}

/// Agency listing titles.
pub fn score_agency(title: &str) -> Verdict {
    let title = title.to_lowercase();

    if let Some(kw) = first_match(&title, keywords::AGENCY_EXCLUDED) {
        return Verdict::Rejected(RejectReason::ExcludedKeyword(kw));
    }
    if first_match(&title, keywords::AGENCY_REQUIRED).is_none() {
        return Verdict::Rejected(RejectReason::MissingRequiredKeyword);
    }

    let field_matches = count_matches(&title, keywords::AGENCY_FIELD) as u32;
    Verdict::Relevant(cap(AGENCY_BASELINE + AGENCY_FIELD_BONUS * field_matches))
}

/// Procurement titles, corroborated by the issuing agency name.
pub fn score_procurement(title: &str, agency: &str) -> Verdict {
    let text = format!("{} {}", title, agency).to_lowercase();

    if let Some(kw) = first_match(&text, keywords::PROCUREMENT_EXCLUDED) {
        return Verdict::Rejected(RejectReason::ExcludedKeyword(kw));
    }

    let (high, medium, low) = PROCUREMENT_WEIGHTS;
    let score = count_matches(&text, keywords::PROCUREMENT_HIGH) as u32 * high
        + count_matches(&text, keywords::PROCUREMENT_MEDIUM) as u32 * medium
        + count_matches(&text, keywords::PROCUREMENT_LOW) as u32 * low;

    if score == 0 {
        return Verdict::Rejected(RejectReason::NoPositiveSignal);
    }
    Verdict::Relevant(cap(score))
}
