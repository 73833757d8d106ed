//! Built-in agency source profiles.
//!
//! The registry is a closed, static table: profiles are never added or
//! mutated at runtime, and iteration order is table order.

use std::time::Duration;

use serde::Serialize;

/// Settle interval used when a profile does not override it.
pub const DEFAULT_SETTLE_SECS: u64 = 3;

/// Scraping configuration for one agency listing page.
///
/// Selectors are CSS selector groups; a comma-separated group matches
/// whichever alternative the page uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceProfile {
    pub id: &'static str,
    /// Agency display name, stored on every notice from this profile.
    pub name: &'static str,
    /// Listing page URL.
    pub url: &'static str,
    pub list_selector: &'static str,
    pub title_selector: &'static str,
    pub date_selector: &'static str,
    /// Seconds to let client-side rendering settle after load.
    pub settle_secs: Option<u64>,
}

impl SourceProfile {
    pub fn settle_interval(&self) -> Duration {
        Duration::from_secs(self.settle_secs.unwrap_or(DEFAULT_SETTLE_SECS))
    }
}

/// Look up a profile by id.
pub fn get(id: &str) -> Option<&'static SourceProfile> {
    PROFILES.iter().find(|p| p.id == id)
}

/// All profiles, in registry order.
pub fn all() -> &'static [SourceProfile] {
    PROFILES
}

/// Ids not present in the registry.
pub fn unknown_ids<'a>(ids: &'a [String]) -> Vec<&'a str> {
    ids.iter()
        .map(String::as_str)
        .filter(|id| get(id).is_none())
        .collect()
}

/// Resolve a subset of ids in registry order; an empty subset means all.
pub fn select(ids: &[String]) -> Vec<&'static SourceProfile> {
    if ids.is_empty() {
        return PROFILES.iter().collect();
    }
    PROFILES
        .iter()
        .filter(|p| ids.iter().any(|id| id == p.id))
        .collect()
}

static PROFILES: &[SourceProfile] = &[
    // Design and industry promotion agencies
    SourceProfile {
        id: "kidp",
        name: "한국디자인진흥원",
        url: "https://www.kidp.or.kr/?menuno=1202",
        list_selector: "table tbody tr",
        title_selector: "td a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    SourceProfile {
        id: "kiat",
        name: "한국산업기술진흥원",
        url: "https://www.kiat.or.kr/front/board/boardContentsListPage.do?board_id=90",
        list_selector: "table tbody tr",
        title_selector: "td a",
        date_selector: "td:nth-child(5)",
        settle_secs: None,
    },
    SourceProfile {
        id: "kocca",
        name: "한국콘텐츠진흥원",
        url: "https://www.kocca.kr/kocca/bbs/list/B0000204.do?categorys=2&subcate=50&cateCode=0&menuNo=204897",
        list_selector: "table tbody tr",
        title_selector: "td.subject a, td a",
        date_selector: "td:nth-child(5)",
        settle_secs: None,
    },
    SourceProfile {
        id: "gbsa",
        name: "경기도경제과학진흥원",
        url: "https://egbiz.or.kr/user/bbs/BD_selectBbsList.do?q_bbsSn=1004",
        list_selector: "table tbody tr",
        title_selector: "td a",
        date_selector: "td:nth-child(5)",
        settle_secs: Some(6),
    },
    SourceProfile {
        id: "kotra",
        name: "KOTRA 수출바우처",
        url: "https://www.exportvoucher.com/portal/bizinfo/support_01",
        list_selector: "table tbody tr, .list-table tbody tr",
        title_selector: "td a, .title a",
        date_selector: "td:nth-child(4), .date",
        settle_secs: None,
    },
    SourceProfile {
        id: "sba",
        name: "서울경제진흥원",
        url: "http://211.45.214.168/Pages/BusinessApply/Posting.aspx",
        list_selector: "table tbody tr",
        title_selector: "td a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    // Regional techno-parks
    SourceProfile {
        id: "seoultp",
        name: "서울테크노파크",
        url: "https://www.seoultp.or.kr/user/nd19746.do",
        list_selector: "table tbody tr",
        title_selector: "td a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    SourceProfile {
        id: "itp",
        name: "인천테크노파크",
        url: "https://www.itp.or.kr/intro.asp?tmid=13&st=1",
        list_selector: "table tbody tr",
        title_selector: "td a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    SourceProfile {
        id: "gtp",
        name: "경기테크노파크",
        url: "https://pms.gtp.or.kr/web/business/webBusinessList.do",
        list_selector: "table tbody tr",
        title_selector: "td a",
        date_selector: "td:nth-child(5)",
        settle_secs: None,
    },
    SourceProfile {
        id: "gwtp",
        name: "강원테크노파크",
        url: "https://www.gwtp.or.kr/gwtp/bbsNew_list.php?code=sub01b&keyvalue=sub01",
        list_selector: "table tbody tr",
        title_selector: "td a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    SourceProfile {
        id: "ctp",
        name: "충남테크노파크",
        url: "https://www.ctp.or.kr/business/data.do",
        list_selector: "table tbody tr",
        title_selector: "td a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    SourceProfile {
        id: "djtp",
        name: "대전테크노파크",
        url: "https://www.djtp.or.kr/board.es?mid=a20102000000&bid=0102",
        list_selector: "table tbody tr",
        title_selector: "td a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    SourceProfile {
        id: "sjtp",
        name: "세종테크노파크",
        url: "https://www.sjtp.or.kr/bbs/board.php?bo_table=business01",
        list_selector: "table tbody tr",
        title_selector: "td a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    SourceProfile {
        id: "jbtp",
        name: "전북테크노파크",
        url: "https://www.jbtp.or.kr/board/list.jbtp?boardId=BBS_0000006&menuCd=DOM_000000102001000000&contentsSid=9&cpath=",
        list_selector: "table tbody tr",
        title_selector: "td a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    SourceProfile {
        id: "jntp",
        name: "전남테크노파크",
        url: "https://www.jntp.or.kr/base/board/list?boardManagementNo=11&menuLevel=2&menuNo=44",
        list_selector: "table tbody tr",
        title_selector: "td a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    SourceProfile {
        id: "gjtp",
        name: "광주테크노파크",
        url: "https://www.gjtp.or.kr/home/business.cs",
        list_selector: "table tbody tr, ul.list li",
        title_selector: "td a, a",
        date_selector: "td:nth-child(4), .date",
        settle_secs: None,
    },
    SourceProfile {
        id: "gbtp",
        name: "경북테크노파크",
        url: "https://www.gbtp.or.kr/user/board.do?bbsId=BBSMSTR_000000000023",
        list_selector: "table tbody tr",
        title_selector: "td:nth-child(3) a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    SourceProfile {
        id: "btp",
        name: "부산테크노파크",
        url: "https://www.btp.or.kr/kor/CMS/Board/Board.do?mCode=MN013",
        list_selector: "table tbody tr",
        title_selector: "td a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    SourceProfile {
        id: "utp",
        name: "울산테크노파크",
        url: "https://www.utp.or.kr/board/board.php?bo_table=sub0203_02",
        list_selector: "table tbody tr",
        title_selector: "td a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    SourceProfile {
        id: "jejutp",
        name: "제주테크노파크",
        url: "https://www.jejutp.or.kr/board/business",
        list_selector: "table tbody tr, ul li",
        title_selector: "td a, a",
        date_selector: "td:nth-child(4), .date",
        settle_secs: None,
    },
    SourceProfile {
        id: "dgtp",
        name: "대구테크노파크",
        url: "https://dgtp.or.kr/bbs/BoardControll.do?bbsId=BBSMSTR_000000000003",
        list_selector: "table tbody tr",
        title_selector: "td a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    SourceProfile {
        id: "cbtp",
        name: "충북테크노파크",
        url: "https://www.cbtp.or.kr/index.php?control=bbs&board_id=saup_notice&lm_uid=387",
        list_selector: "table tbody tr",
        title_selector: "td a",
        date_selector: "td:nth-child(4)",
        settle_secs: Some(6),
    },
    SourceProfile {
        id: "gntp",
        name: "경남테크노파크",
        url: "https://www.gntp.or.kr/biz/apply",
        list_selector: "table tbody tr, ul li",
        title_selector: "td a, a",
        date_selector: "td:nth-child(4), .date",
        settle_secs: None,
    },
    // Ministry and regional design centres
    SourceProfile {
        id: "motir",
        name: "산업통상자원부",
        url: "https://www.motir.go.kr/kor/article/ATCL2826a2625",
        list_selector: "table tbody tr",
        title_selector: "td:nth-child(2) a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    SourceProfile {
        id: "gidp",
        name: "경기디자인센터",
        url: "https://www.gidp.kr/gidp/notice/notification",
        list_selector: "table tbody tr",
        title_selector: "td a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    SourceProfile {
        id: "gdc",
        name: "광주디자인센터",
        url: "https://www.gdc.or.kr/board.do?S=S01&M=0403000000&b_code=0004",
        list_selector: "table tbody tr",
        title_selector: "td:nth-child(2) a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    SourceProfile {
        id: "dgdp",
        name: "대구경북디자인센터",
        url: "https://www.dgdp.or.kr/notice/public",
        list_selector: "table.table tbody tr",
        title_selector: "td p, td a",
        date_selector: "td:nth-child(6)",
        settle_secs: None,
    },
    SourceProfile {
        id: "didp",
        name: "대전디자인센터",
        url: "https://www.didp.or.kr/notification_notice",
        list_selector: "table tbody tr",
        title_selector: "td a",
        date_selector: "td:nth-child(5)",
        settle_secs: None,
    },
    SourceProfile {
        id: "dcb",
        name: "부산디자인센터",
        url: "https://www.dcb.or.kr/01_news/?mcode=0401010000",
        list_selector: "table tbody tr",
        title_selector: "td a",
        date_selector: "td:nth-child(7)",
        settle_secs: None,
    },
    SourceProfile {
        id: "sdf_notice",
        name: "서울디자인재단(공지)",
        url: "https://seouldesign.or.kr/?menuno=17&cateno=131",
        list_selector: "tbody tr",
        title_selector: "td a",
        date_selector: "td:nth-child(5)",
        settle_secs: None,
    },
    SourceProfile {
        id: "sdf_bid",
        name: "서울디자인재단(입찰)",
        url: "https://seouldesign.or.kr/?menuno=18&cateno=132",
        list_selector: "tbody tr",
        title_selector: "td a",
        date_selector: "td:nth-child(5)",
        settle_secs: None,
    },
    SourceProfile {
        id: "designdb",
        name: "디자인DB",
        url: "https://dkworks.designdb.com/web/board/noticeList.do",
        list_selector: "table tbody tr",
        title_selector: "td a",
        date_selector: "td:nth-child(5)",
        settle_secs: None,
    },
    // Regional SME and startup offices
    SourceProfile {
        id: "mss_seoul",
        name: "서울지방중소벤처기업청",
        url: "https://www.mss.go.kr/site/seoul/ex/bbs/List.do?cbIdx=146",
        list_selector: "table tbody tr",
        title_selector: "td.title a, td a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    SourceProfile {
        id: "mss_busan",
        name: "부산지방중소벤처기업청",
        url: "https://www.mss.go.kr/site/busan/ex/bbs/List.do?cbIdx=256",
        list_selector: "table tbody tr",
        title_selector: "td.title a, td a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    SourceProfile {
        id: "mss_daegu",
        name: "대구경북지방중소벤처기업청",
        url: "https://www.mss.go.kr/site/daegu/ex/bbs/List.do?cbIdx=253",
        list_selector: "table tbody tr",
        title_selector: "td.title a, td a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    SourceProfile {
        id: "mss_incheon",
        name: "인천지방중소벤처기업청",
        url: "https://www.mss.go.kr/site/incheon/ex/bbs/List.do?cbIdx=246",
        list_selector: "table tbody tr",
        title_selector: "td.title a, td a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    SourceProfile {
        id: "mss_gwangju",
        name: "광주전남지방중소벤처기업청",
        url: "https://www.mss.go.kr/site/gwangju/ex/bbs/List.do?cbIdx=251",
        list_selector: "table tbody tr",
        title_selector: "td.title a, td a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    SourceProfile {
        id: "mss_daejeon",
        name: "대전세종충남지방중소벤처기업청",
        url: "https://www.mss.go.kr/site/daejeon/ex/bbs/List.do?cbIdx=248",
        list_selector: "table tbody tr",
        title_selector: "td.title a, td a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    SourceProfile {
        id: "mss_gyeonggi",
        name: "경기지방중소벤처기업청",
        url: "https://www.mss.go.kr/site/gyeonggi/ex/bbs/List.do?cbIdx=247",
        list_selector: "table tbody tr",
        title_selector: "td.title a, td a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    SourceProfile {
        id: "mss_gangwon",
        name: "강원지방중소벤처기업청",
        url: "https://www.mss.go.kr/site/gangwon/ex/bbs/List.do?cbIdx=252",
        list_selector: "table tbody tr",
        title_selector: "td.title a, td a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    SourceProfile {
        id: "mss_chungbuk",
        name: "충북지방중소벤처기업청",
        url: "https://www.mss.go.kr/site/chungbuk/ex/bbs/List.do?cbIdx=249",
        list_selector: "table tbody tr",
        title_selector: "td.title a, td a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    SourceProfile {
        id: "mss_jeonbuk",
        name: "전북지방중소벤처기업청",
        url: "https://www.mss.go.kr/site/jeonbuk/ex/bbs/List.do?cbIdx=250",
        list_selector: "table tbody tr",
        title_selector: "td.title a, td a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    SourceProfile {
        id: "mss_gyeongnam",
        name: "경남지방중소벤처기업청",
        url: "https://www.mss.go.kr/site/gyeongnam/ex/bbs/List.do?cbIdx=255",
        list_selector: "table tbody tr",
        title_selector: "td.title a, td a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    SourceProfile {
        id: "mss_ulsan",
        name: "울산지방중소벤처기업청",
        url: "https://www.mss.go.kr/site/ulsan/ex/bbs/List.do?cbIdx=254",
        list_selector: "table tbody tr",
        title_selector: "td.title a, td a",
        date_selector: "td:nth-child(4)",
        settle_secs: None,
    },
    // Creative economy innovation centres
    SourceProfile {
        id: "ccei_seoul",
        name: "서울창조경제혁신센터",
        url: "https://ccei.creativekorea.or.kr/seoul/custom/notice_list.do",
        list_selector: "table tbody tr, ul.board-list li",
        title_selector: "td a, a",
        date_selector: "td:nth-child(4), .date, span.date",
        settle_secs: None,
    },
    SourceProfile {
        id: "ccei_busan",
        name: "부산창조경제혁신센터",
        url: "https://ccei.creativekorea.or.kr/busan/custom/notice_list.do",
        list_selector: "table tbody tr, ul.board-list li",
        title_selector: "td a, a",
        date_selector: "td:nth-child(4), .date, span.date",
        settle_secs: None,
    },
    SourceProfile {
        id: "ccei_daegu",
        name: "대구창조경제혁신센터",
        url: "https://ccei.creativekorea.or.kr/daegu/custom/notice_list.do",
        list_selector: "table tbody tr, ul.board-list li",
        title_selector: "td a, a",
        date_selector: "td:nth-child(4), .date, span.date",
        settle_secs: None,
    },
    SourceProfile {
        id: "ccei_incheon",
        name: "인천창조경제혁신센터",
        url: "https://ccei.creativekorea.or.kr/incheon/custom/notice_list.do",
        list_selector: "table tbody tr, ul.board-list li",
        title_selector: "td a, a",
        date_selector: "td:nth-child(4), .date, span.date",
        settle_secs: None,
    },
    SourceProfile {
        id: "ccei_gwangju",
        name: "광주창조경제혁신센터",
        url: "https://ccei.creativekorea.or.kr/gwangju/custom/notice_list.do",
        list_selector: "table tbody tr, ul.board-list li",
        title_selector: "td a, a",
        date_selector: "td:nth-child(4), .date, span.date",
        settle_secs: None,
    },
    SourceProfile {
        id: "ccei_daejeon",
        name: "대전창조경제혁신센터",
        url: "https://ccei.creativekorea.or.kr/daejeon/custom/notice_list.do",
        list_selector: "table tbody tr, ul.board-list li",
        title_selector: "td a, a",
        date_selector: "td:nth-child(4), .date, span.date",
        settle_secs: None,
    },
    SourceProfile {
        id: "ccei_ulsan",
        name: "울산창조경제혁신센터",
        url: "https://ccei.creativekorea.or.kr/ulsan/custom/notice_list.do",
        list_selector: "table tbody tr, ul.board-list li",
        title_selector: "td a, a",
        date_selector: "td:nth-child(4), .date, span.date",
        settle_secs: None,
    },
    SourceProfile {
        id: "ccei_sejong",
        name: "세종창조경제혁신센터",
        url: "https://ccei.creativekorea.or.kr/sejong/custom/notice_list.do",
        list_selector: "table tbody tr, ul.board-list li",
        title_selector: "td a, a",
        date_selector: "td:nth-child(4), .date, span.date",
        settle_secs: None,
    },
    SourceProfile {
        id: "ccei_gyeonggi",
        name: "경기창조경제혁신센터",
        url: "https://ccei.creativekorea.or.kr/gyeonggi/custom/notice_list.do",
        list_selector: "table tbody tr, ul.board-list li",
        title_selector: "td a, a",
        date_selector: "td:nth-child(4), .date, span.date",
        settle_secs: None,
    },
    SourceProfile {
        id: "ccei_gangwon",
        name: "강원창조경제혁신센터",
        url: "https://ccei.creativekorea.or.kr/gangwon/custom/notice_list.do",
        list_selector: "table tbody tr, ul.board-list li",
        title_selector: "td a, a",
        date_selector: "td:nth-child(4), .date, span.date",
        settle_secs: None,
    },
    SourceProfile {
        id: "ccei_chungbuk",
        name: "충북창조경제혁신센터",
        url: "https://ccei.creativekorea.or.kr/chungbuk/custom/notice_list.do",
        list_selector: "table tbody tr, ul.board-list li",
        title_selector: "td a, a",
        date_selector: "td:nth-child(4), .date, span.date",
        settle_secs: None,
    },
    SourceProfile {
        id: "ccei_chungnam",
        name: "충남창조경제혁신센터",
        url: "https://ccei.creativekorea.or.kr/chungnam/custom/notice_list.do",
        list_selector: "table tbody tr, ul.board-list li",
        title_selector: "td a, a",
        date_selector: "td:nth-child(4), .date, span.date",
        settle_secs: None,
    },
    SourceProfile {
        id: "ccei_jeonbuk",
        name: "전북창조경제혁신센터",
        url: "https://ccei.creativekorea.or.kr/jeonbuk/custom/notice_list.do",
        list_selector: "table tbody tr, ul.board-list li",
        title_selector: "td a, a",
        date_selector: "td:nth-child(4), .date, span.date",
        settle_secs: None,
    },
    SourceProfile {
        id: "ccei_jeonnam",
        name: "전남창조경제혁신센터",
        url: "https://ccei.creativekorea.or.kr/jeonnam/custom/notice_list.do",
        list_selector: "table tbody tr, ul.board-list li",
        title_selector: "td a, a",
        date_selector: "td:nth-child(4), .date, span.date",
        settle_secs: None,
    },
    SourceProfile {
        id: "ccei_gyeongbuk",
        name: "경북창조경제혁신센터",
        url: "https://ccei.creativekorea.or.kr/gyeongbuk/custom/notice_list.do",
        list_selector: "table tbody tr, ul.board-list li",
        title_selector: "td a, a",
        date_selector: "td:nth-child(4), .date, span.date",
        settle_secs: None,
    },
    SourceProfile {
        id: "ccei_gyeongnam",
        name: "경남창조경제혁신센터",
        url: "https://ccei.creativekorea.or.kr/gyeongnam/custom/notice_list.do",
        list_selector: "table tbody tr, ul.board-list li",
        title_selector: "td a, a",
        date_selector: "td:nth-child(4), .date, span.date",
        settle_secs: None,
    },
    SourceProfile {
        id: "ccei_jeju",
        name: "제주창조경제혁신센터",
        url: "https://ccei.creativekorea.or.kr/jeju/custom/notice_list.do",
        list_selector: "table tbody tr, ul.board-list li",
        title_selector: "td a, a",
        date_selector: "td:nth-child(4), .date, span.date",
        settle_secs: None,
    },
];
