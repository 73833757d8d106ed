//! Dedup and exclusion filter in front of the notice store.

use std::collections::HashSet;

use tracing::debug;

use super::{NoticeStore, PipelineError};
use crate::models::{Notice, SourceCounts};

/// Decides insert-or-skip for each candidate of one adapter run.
///
/// URLs are opaque identity keys: matching is exact string equality, with no
/// normalization of scheme, trailing slashes or query order.
pub struct Gatekeeper<'a> {
    store: &'a dyn NoticeStore,
    excluded: &'a HashSet<String>,
}

impl<'a> Gatekeeper<'a> {
    pub fn new(store: &'a dyn NoticeStore, excluded: &'a HashSet<String>) -> Self {
        Self { store, excluded }
    }

    /// Insert every candidate that is not empty, excluded or already stored.
    ///
    /// `total` counts every candidate seen; `new` counts inserts.
    pub async fn admit(&self, candidates: &[Notice]) -> Result<SourceCounts, PipelineError> {
        let mut counts = SourceCounts {
            total: candidates.len() as u32,
            new: 0,
        };

        for notice in candidates {
            let url = notice.detail_url.as_str();
            if url.is_empty() {
                debug!("skip (no url): {}", notice.title);
                continue;
            }
            if self.excluded.contains(url) {
                debug!("skip (excluded): {}", url);
                continue;
            }
            if self.store.exists(url).await? {
                continue;
            }
            if self.store.insert(notice).await? {
                counts.new += 1;
            }
        }

        Ok(counts)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{NoticeStatus, SourceTag};
    use crate::repository::DieselError;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    /// In-memory notice store.
    #[derive(Default)]
    pub(crate) struct MemoryStore {
        pub notices: Mutex<Vec<Notice>>,
    }

    impl MemoryStore {
        pub fn urls(&self) -> Vec<String> {
            self.notices
                .lock()
                .unwrap()
                .iter()
                .map(|n| n.detail_url.clone())
                .collect()
        }
    }

    #[async_trait]
    impl NoticeStore for MemoryStore {
        async fn exists(&self, url: &str) -> Result<bool, DieselError> {
            Ok(self.notices.lock().unwrap().iter().any(|n| n.detail_url == url))
        }

        async fn insert(&self, notice: &Notice) -> Result<bool, DieselError> {
            let mut notices = self.notices.lock().unwrap();
            if notices.iter().any(|n| n.detail_url == notice.detail_url) {
                return Ok(false);
            }
            notices.push(notice.clone());
            Ok(true)
        }
    }

    pub(crate) fn notice(url: &str) -> Notice {
        Notice {
            title: format!("디자인 바우처 수행기관 모집 {}", url),
            agency: "중소벤처기업부".into(),
            posted_date: "2024-03-01".into(),
            end_date: None,
            detail_url: url.into(),
            category: "경영".into(),
            subcategory: String::new(),
            relevance: 8,
            status: NoticeStatus::Open,
            crawled_at: Utc::now(),
            source: SourceTag::Bizinfo,
        }
    }

    #[tokio::test]
    async fn test_rejects_empty_excluded_and_known_urls() {
        let store = MemoryStore::default();
        store.insert(&notice("https://a.kr/1")).await.unwrap();
        let excluded = HashSet::from(["https://a.kr/2".to_string()]);

        let candidates = vec![
            notice("https://a.kr/1"),
            notice("https://a.kr/2"),
            notice(""),
            notice("https://a.kr/3"),
        ];
        let counts = Gatekeeper::new(&store, &excluded)
            .admit(&candidates)
            .await
            .unwrap();

        assert_eq!(counts, SourceCounts { total: 4, new: 1 });
        assert_eq!(store.urls(), vec!["https://a.kr/1", "https://a.kr/3"]);
    }

    #[tokio::test]
    async fn test_urls_are_compared_exactly() {
        let store = MemoryStore::default();
        store.insert(&notice("https://a.kr/view?id=1")).await.unwrap();
        let excluded = HashSet::new();

        let candidates = vec![
            notice("https://a.kr/view?id=1/"),
            notice("http://a.kr/view?id=1"),
        ];
        let counts = Gatekeeper::new(&store, &excluded)
            .admit(&candidates)
            .await
            .unwrap();
        assert_eq!(counts.new, 2);
    }

    #[tokio::test]
    async fn test_duplicates_within_one_batch_insert_once() {
        let store = MemoryStore::default();
        let excluded = HashSet::new();
        let candidates = vec![notice("https://a.kr/1"), notice("https://a.kr/1")];

        let counts = Gatekeeper::new(&store, &excluded)
            .admit(&candidates)
            .await
            .unwrap();
        assert_eq!(counts, SourceCounts { total: 2, new: 1 });
    }
}
