//! Sequential run over the configured sources.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{
    CrawlLogStore, ExclusionStore, Gatekeeper, NoticeStore, PipelineError, RunCoordinator,
};
use crate::models::{RunReport, SourceTag};
use crate::scrapers::SourceAdapter;

/// Progress when a source starts and when its slot in the run is over.
const MILESTONES: [(SourceTag, u8, u8); 3] = [
    (SourceTag::Bizinfo, 10, 40),
    (SourceTag::Agency, 50, 80),
    (SourceTag::G2b, 85, 100),
];

/// Which sources to run and whose exclusion set applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    pub sources: Vec<SourceTag>,
    pub user_id: i64,
}

impl RunRequest {
    /// Every source, for `user_id`.
    pub fn all(user_id: i64) -> Self {
        Self {
            sources: SourceTag::ALL.to_vec(),
            user_id,
        }
    }

    pub fn includes(&self, tag: SourceTag) -> bool {
        self.sources.contains(&tag)
    }
}

/// Runs adapters in fixed order (funding API, agencies, procurement API)
/// and routes their output through the gatekeeper.
pub struct Orchestrator {
    adapters: Vec<Box<dyn SourceAdapter>>,
    notices: Arc<dyn NoticeStore>,
    exclusions: Arc<dyn ExclusionStore>,
    logs: Arc<dyn CrawlLogStore>,
    coordinator: RunCoordinator,
}

impl Orchestrator {
    pub fn new(
        notices: Arc<dyn NoticeStore>,
        exclusions: Arc<dyn ExclusionStore>,
        logs: Arc<dyn CrawlLogStore>,
        coordinator: RunCoordinator,
    ) -> Self {
        Self {
            adapters: Vec::new(),
            notices,
            exclusions,
            logs,
            coordinator,
        }
    }

    /// Register the adapter for its source tag, replacing any earlier one.
    pub fn with_adapter(mut self, adapter: Box<dyn SourceAdapter>) -> Self {
        self.adapters.retain(|a| a.tag() != adapter.tag());
        self.adapters.push(adapter);
        self
    }

    pub fn coordinator(&self) -> &RunCoordinator {
        &self.coordinator
    }

    fn adapter(&self, tag: SourceTag) -> Option<&dyn SourceAdapter> {
        self.adapters
            .iter()
            .find(|a| a.tag() == tag)
            .map(|a| a.as_ref())
    }

    /// Execute one run.
    ///
    /// Fails fast with [`PipelineError::AlreadyRunning`] if a run is in
    /// flight. Source failures are absorbed by the adapters; storage failures
    /// abort the run.
    pub async fn run(&self, request: &RunRequest) -> Result<RunReport, PipelineError> {
        let guard = self.coordinator.try_begin()?;
        let excluded = self.exclusions.excluded_urls(request.user_id).await?;
        let gatekeeper = Gatekeeper::new(self.notices.as_ref(), &excluded);

        let mut report = RunReport::default();
        for (tag, start, done) in MILESTONES {
            if request.includes(tag) {
                match self.adapter(tag) {
                    Some(adapter) => {
                        guard.enter_source(tag.display_name(), start);
                        let candidates = adapter.collect().await;
                        let counts = gatekeeper.admit(&candidates).await?;
                        self.logs.append(tag, counts).await?;
                        info!(
                            "{}: {} collected, {} new",
                            tag.display_name(),
                            counts.total,
                            counts.new
                        );
                        report.record(tag, counts);
                    }
                    None => warn!("No adapter configured for {}", tag),
                }
            }
            guard.set_progress(done);
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Notice, RunStatus, SourceCounts};
    use crate::pipeline::gatekeeper::tests::{notice, MemoryStore};
    use crate::repository::DieselError;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    type StatusLog = Arc<Mutex<Vec<(SourceTag, RunStatus)>>>;

    /// Emits a fixed batch and records the run status it observed.
    struct FixedAdapter {
        tag: SourceTag,
        notices: Vec<Notice>,
        coordinator: RunCoordinator,
        seen: StatusLog,
    }

    impl FixedAdapter {
        fn new(tag: SourceTag, urls: &[String], coordinator: &RunCoordinator) -> Self {
            Self::observed(tag, urls, coordinator, StatusLog::default())
        }

        fn observed(
            tag: SourceTag,
            urls: &[String],
            coordinator: &RunCoordinator,
            seen: StatusLog,
        ) -> Self {
            Self {
                tag,
                notices: urls.iter().map(|u| notice(u)).collect(),
                coordinator: coordinator.clone(),
                seen,
            }
        }
    }

    #[async_trait]
    impl SourceAdapter for FixedAdapter {
        fn tag(&self) -> SourceTag {
            self.tag
        }

        async fn collect(&self) -> Vec<Notice> {
            self.seen
                .lock()
                .unwrap()
                .push((self.tag, self.coordinator.status()));
            self.notices.clone()
        }
    }

    #[derive(Default)]
    struct MemoryExclusions(HashSet<String>);

    #[async_trait]
    impl ExclusionStore for MemoryExclusions {
        async fn excluded_urls(&self, _user_id: i64) -> Result<HashSet<String>, DieselError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct MemoryLog(Mutex<Vec<(SourceTag, SourceCounts)>>);

    #[async_trait]
    impl CrawlLogStore for MemoryLog {
        async fn append(&self, source: SourceTag, counts: SourceCounts) -> Result<(), DieselError> {
            self.0.lock().unwrap().push((source, counts));
            Ok(())
        }
    }

    fn urls(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("https://{}.kr/{}", prefix, i)).collect()
    }

    #[tokio::test]
    async fn test_second_identical_run_inserts_nothing() {
        let coordinator = RunCoordinator::new();
        let store = Arc::new(MemoryStore::default());
        let log = Arc::new(MemoryLog::default());
        let orchestrator = Orchestrator::new(
            store.clone(),
            Arc::new(MemoryExclusions::default()),
            log.clone(),
            coordinator.clone(),
        )
        .with_adapter(Box::new(FixedAdapter::new(
            SourceTag::Bizinfo,
            &urls("biz", 10),
            &coordinator,
        )));

        let request = RunRequest {
            sources: vec![SourceTag::Bizinfo],
            user_id: 1,
        };
        let first = orchestrator.run(&request).await.unwrap();
        let second = orchestrator.run(&request).await.unwrap();

        assert_eq!(first.get(SourceTag::Bizinfo), SourceCounts { total: 10, new: 10 });
        assert_eq!(second.get(SourceTag::Bizinfo), SourceCounts { total: 10, new: 0 });
        assert_eq!(store.urls().len(), 10);
        assert_eq!(log.0.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_runs_sources_in_order_with_milestones() {
        let coordinator = RunCoordinator::new();
        let seen = StatusLog::default();
        let adapter = |tag, prefix, n| {
            Box::new(FixedAdapter::observed(tag, &urls(prefix, n), &coordinator, seen.clone()))
        };

        let orchestrator = Orchestrator::new(
            Arc::new(MemoryStore::default()),
            Arc::new(MemoryExclusions::default()),
            Arc::new(MemoryLog::default()),
            coordinator.clone(),
        )
        .with_adapter(adapter(SourceTag::G2b, "g2b", 1))
        .with_adapter(adapter(SourceTag::Agency, "agency", 2))
        .with_adapter(adapter(SourceTag::Bizinfo, "biz", 3));

        let report = orchestrator.run(&RunRequest::all(1)).await.unwrap();
        assert_eq!(report.total_new(), 6);

        let seen: Vec<(SourceTag, Option<String>, u8)> = seen
            .lock()
            .unwrap()
            .iter()
            .map(|(tag, status)| (*tag, status.current_source.clone(), status.progress))
            .collect();
        assert_eq!(
            seen,
            vec![
                (SourceTag::Bizinfo, Some("기업마당".to_string()), 10),
                (SourceTag::Agency, Some("기관별".to_string()), 50),
                (SourceTag::G2b, Some("나라장터".to_string()), 85),
            ]
        );

        // Status is reset after the run.
        assert!(!coordinator.is_running());
        assert_eq!(coordinator.status(), RunStatus::default());
    }

    #[tokio::test]
    async fn test_excluded_and_unrequested_sources() {
        let coordinator = RunCoordinator::new();
        let excluded = MemoryExclusions(HashSet::from(["https://biz.kr/0".to_string()]));
        let orchestrator = Orchestrator::new(
            Arc::new(MemoryStore::default()),
            Arc::new(excluded),
            Arc::new(MemoryLog::default()),
            coordinator.clone(),
        )
        .with_adapter(Box::new(FixedAdapter::new(
            SourceTag::Bizinfo,
            &urls("biz", 2),
            &coordinator,
        )))
        .with_adapter(Box::new(FixedAdapter::new(
            SourceTag::G2b,
            &urls("g2b", 2),
            &coordinator,
        )));

        let request = RunRequest {
            sources: vec![SourceTag::Bizinfo, SourceTag::Agency],
            user_id: 7,
        };
        let report = orchestrator.run(&request).await.unwrap();
        assert_eq!(report.get(SourceTag::Bizinfo), SourceCounts { total: 2, new: 1 });
        // Requested without an adapter, and not requested at all.
        assert_eq!(report.get(SourceTag::Agency), SourceCounts::default());
        assert_eq!(report.get(SourceTag::G2b), SourceCounts::default());
    }

    #[tokio::test]
    async fn test_concurrent_run_is_rejected() {
        let coordinator = RunCoordinator::new();
        let orchestrator = Orchestrator::new(
            Arc::new(MemoryStore::default()),
            Arc::new(MemoryExclusions::default()),
            Arc::new(MemoryLog::default()),
            coordinator.clone(),
        );

        let _held = coordinator.try_begin().unwrap();
        assert!(matches!(
            orchestrator.run(&RunRequest::all(1)).await,
            Err(PipelineError::AlreadyRunning)
        ));
    }
}
