//! Keyword tables for the relevance strategies.
//!
//! All entries are lower-case; matching is substring containment against
//! lower-cased text.

// Agency listings

/// At least one must appear in an agency title.
pub const AGENCY_REQUIRED: &[&str] = &[
    "모집",
    "공모",
    "공고",
    "참여",
    "신청",
    "지원사업",
    "지원 사업",
    "수행기관",
    "전문기관",
    "바우처",
    "사업자",
    "기업 모집",
];

/// Any match rejects an agency title.
pub const AGENCY_EXCLUDED: &[&str] = &[
    "결과 발표",
    "선정 결과",
    "선정결과",
    "합격자",
    "최종 선정",
    "취소",
    "연기",
    "변경 안내",
    "휴무",
    "채용",
    "직원 모집",
    "교육 안내",
    "세미나",
    "설명회",
    "워크숍",
    "마감",
    "접수마감",
    "신청마감",
    "모집마감",
    "종료",
    "모집종료",
    "접수종료",
    "완료",
    "선정완료",
    "모집완료",
    "기간연장",
    "기간 연장",
    "재공고",
];

/// Each match adds 2 to the agency baseline.
pub const AGENCY_FIELD: &[&str] = &[
    "디자인",
    "브랜드",
    "브랜딩",
    "ci",
    "bi",
    "로고",
    "홈페이지",
    "웹사이트",
    "카탈로그",
    "리플렛",
    "브로슈어",
    "홍보",
    "마케팅",
    "광고",
    "콘텐츠",
    "영상",
    "제작",
    "패키지",
    "포장",
    "그래픽",
    "시각",
    "ux",
    "ui",
];

// Funding-program API

/// A top-level category containing this term is a financial instrument.
pub const FUNDING_FINANCIAL_CATEGORY: &str = "금융";

/// Loan, equity and guarantee sub-categories.
pub const FUNDING_EXCLUDED_SUBCATEGORIES: &[&str] = &["융자", "출자", "투자", "대출", "보증"];

/// Any match anywhere in the combined text rejects a funding record.
pub const FUNDING_EXCLUDED: &[&str] = &[
    // notice lifecycle noise
    "결과 발표",
    "선정 결과",
    "선정결과",
    "합격자",
    "최종 선정",
    "취소",
    "연기",
    "채용",
    "직원 모집",
    "교육 안내",
    "세미나",
    "설명회",
    "워크숍",
    "접수마감",
    "신청마감",
    "모집마감",
    "모집종료",
    "접수종료",
    "재공고",
    // unrelated programs and domains
    "융자",
    "대출",
    "전시회",
    "박람회",
    "인턴",
    "교육생",
    "참여기업",
    "수요기업",
    "입주기업",
    "수혜기업",
    "농업",
    "축산",
    "수산",
    "어업",
    "임업",
    "귀농",
    "귀촌",
    "의료",
    "바이오",
    "제약",
    "헬스케어",
    "에너지",
    "신재생",
    "탄소중립",
    "반도체",
    "배터리",
    "자동차",
    "조선",
    "건설",
    "건축",
    "토목",
    "부동산",
];

/// Provider or mechanism terms; presence adds a flat bonus.
pub const FUNDING_PROVIDER: &[&str] = &[
    "바우처",
    "수행기관",
    "전문기관",
    "참여기관",
    "지정기관",
    "공급기업",
];

/// Service-domain terms; each distinct match adds a bonus.
pub const FUNDING_SERVICE: &[&str] = &[
    "디자인", "브랜드", "브랜딩", "패키지", "ui", "ux", "시각", "ci", "bi",
];

// Procurement API

/// Construction, logistics, security and utility work.
pub const PROCUREMENT_EXCLUDED: &[&str] = &[
    "건설",
    "토목",
    "건축",
    "시설",
    "공사",
    "보수",
    "유지보수",
    "청소",
    "경비",
    "보안",
    "급식",
    "식자재",
    "의료",
    "약품",
    "차량",
    "운송",
    "배송",
    "폐기물",
    "소각",
    "감리",
    "측량",
    "전기",
    "통신",
    "설비",
    "소방",
    "안전진단",
];

pub const PROCUREMENT_HIGH: &[&str] = &[
    "디자인",
    "브랜드",
    "브랜딩",
    "ci",
    "bi",
    "로고",
    "아이덴티티",
    "홈페이지",
    "웹사이트",
    "웹",
    "카탈로그",
    "리플렛",
    "브로슈어",
    "패키지",
    "포장",
    "편집",
    "인쇄",
    "출판",
];

pub const PROCUREMENT_MEDIUM: &[&str] = &[
    "홍보",
    "마케팅",
    "광고",
    "콘텐츠",
    "영상",
    "제작",
    "캠페인",
    "sns",
    "소셜",
    "미디어",
    "촬영",
    "사진",
    "이미지",
    "그래픽",
    "일러스트",
    "캐릭터",
    "슬로건",
    "네이밍",
    "카피",
];

pub const PROCUREMENT_LOW: &[&str] = &["컨설팅", "기획", "전략", "리뉴얼", "개편", "구축"];

/// First keyword of `list` contained in `text`.
pub fn first_match(text: &str, list: &'static [&'static str]) -> Option<&'static str> {
    list.iter().copied().find(|kw| text.contains(kw))
}

/// Number of keywords of `list` contained in `text`.
pub fn count_matches(text: &str, list: &[&str]) -> usize {
    list.iter().filter(|kw| text.contains(*kw)).count()
}
