//! End-to-end runs of the orchestrator against the SQLite repository.
//!
//! Adapters are replaced with canned ones so the tests never touch the
//! network or a browser.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};
use tempfile::TempDir;

use gonggo::models::{Notice, SourceCounts, SourceTag};
use gonggo::pipeline::{Orchestrator, PipelineError, RunCoordinator, RunRequest};
use gonggo::repository::DbContext;
use gonggo::scrapers::{bizinfo, SourceAdapter};

struct CannedAdapter {
    tag: SourceTag,
    notices: Vec<Notice>,
}

#[async_trait]
impl SourceAdapter for CannedAdapter {
    fn tag(&self) -> SourceTag {
        self.tag
    }

    async fn collect(&self) -> Vec<Notice> {
        self.notices.clone()
    }
}

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

fn funding_item(id: u32, title: &str, end: &str) -> Value {
    json!({
        "pblancNm": title,
        "jrsdInsttNm": "중소벤처기업부",
        "creatPnttm": "2024-02-20 10:00:00",
        "reqstEndDe": end,
        "pblancUrl": format!("https://www.bizinfo.go.kr/view.do?pblancId=PBLN_{}", id),
        "bsnsSumryCn": "",
        "pldirSportRealmLclasCodeNm": "경영",
        "pldirSportRealmMlsfcCodeNm": "",
        "hashtags": ""
    })
}

/// Funding notices as the API adapter would emit them.
fn funding_notices() -> Vec<Notice> {
    let body = json!({"jsonArray": [
        funding_item(1, "디자인 바우처 수행기관 모집", "20240320"),
        funding_item(2, "브랜드 개발 지원", "20240305"),
        funding_item(3, "디자인 바우처 결과 발표", "20240320"),
        funding_item(4, "패키지 디자인 지원", "20240201"),
    ]});
    bizinfo::parse_response(&body, now()).unwrap()
}

async fn setup() -> (DbContext, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let ctx = DbContext::new(&dir.path().join("gonggo.db"));
    ctx.init_schema().await.unwrap();
    (ctx, dir)
}

fn orchestrator(ctx: &DbContext, coordinator: RunCoordinator) -> Orchestrator {
    Orchestrator::new(
        Arc::new(ctx.notices()),
        Arc::new(ctx.exclusions()),
        Arc::new(ctx.crawl_logs()),
        coordinator,
    )
    .with_adapter(Box::new(CannedAdapter {
        tag: SourceTag::Bizinfo,
        notices: funding_notices(),
    }))
}

#[tokio::test]
async fn test_repeated_run_only_counts_new_notices() {
    let (ctx, _dir) = setup().await;
    let orchestrator = orchestrator(&ctx, RunCoordinator::new());
    let request = RunRequest::all(1);

    let first = orchestrator.run(&request).await.unwrap();
    assert_eq!(first.get(SourceTag::Bizinfo), SourceCounts { total: 2, new: 2 });
    assert_eq!(first.get(SourceTag::G2b), SourceCounts::default());

    let second = orchestrator.run(&request).await.unwrap();
    assert_eq!(second.get(SourceTag::Bizinfo), SourceCounts { total: 2, new: 0 });
    assert_eq!(ctx.notices().count().await.unwrap(), 2);

    let stored = ctx
        .notices()
        .get("https://www.bizinfo.go.kr/view.do?pblancId=PBLN_1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.relevance, 8);
    assert_eq!(stored.source, SourceTag::Bizinfo);

    let logs = ctx.crawl_logs().recent(10).await.unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].source, "기업마당");
    assert_eq!((logs[0].total_count, logs[0].new_count), (2, 0));
    assert_eq!((logs[1].total_count, logs[1].new_count), (2, 2));
}

#[tokio::test]
async fn test_exclusions_apply_to_their_user_only() {
    let (ctx, _dir) = setup().await;
    ctx.exclusions()
        .add(
            7,
            "https://www.bizinfo.go.kr/view.do?pblancId=PBLN_2",
            Some("관심 없음"),
        )
        .await
        .unwrap();

    let orchestrator = orchestrator(&ctx, RunCoordinator::new());
    let excluded_run = orchestrator.run(&RunRequest::all(7)).await.unwrap();
    assert_eq!(
        excluded_run.get(SourceTag::Bizinfo),
        SourceCounts { total: 2, new: 1 }
    );

    let other_user = orchestrator.run(&RunRequest::all(8)).await.unwrap();
    assert_eq!(
        other_user.get(SourceTag::Bizinfo),
        SourceCounts { total: 2, new: 1 }
    );
    assert_eq!(ctx.notices().count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_run_is_rejected_while_another_is_active() {
    let (ctx, _dir) = setup().await;
    let coordinator = RunCoordinator::new();
    let orchestrator = orchestrator(&ctx, coordinator.clone());

    let guard = coordinator.try_begin().unwrap();
    assert!(matches!(
        orchestrator.run(&RunRequest::all(1)).await,
        Err(PipelineError::AlreadyRunning)
    ));
    assert_eq!(ctx.notices().count().await.unwrap(), 0);

    drop(guard);
    assert!(orchestrator.run(&RunRequest::all(1)).await.is_ok());
}
