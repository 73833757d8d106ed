//! Crawl run status models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::SourceTag;

/// Pollable status of the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatus {
    pub is_running: bool,
    /// Display name of the source being processed.
    pub current_source: Option<String>,
    /// Coarse progress, 0 to 100.
    pub progress: u8,
}

impl RunStatus {
    /// Status at the start of a run.
    pub fn started() -> Self {
        Self {
            is_running: true,
            current_source: None,
            progress: 0,
        }
    }
}

/// Totals for one source in one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCounts {
    /// Items the adapter emitted.
    pub total: u32,
    /// Items the gatekeeper inserted.
    pub new: u32,
}

/// Result of one pipeline run, keyed by source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub sources: BTreeMap<String, SourceCounts>,
}

impl RunReport {
    pub fn record(&mut self, tag: SourceTag, counts: SourceCounts) {
        self.sources.insert(tag.as_str().to_string(), counts);
    }

    /// Counts for a source, `{0, 0}` when it was not part of the run.
    pub fn get(&self, tag: SourceTag) -> SourceCounts {
        self.sources.get(tag.as_str()).copied().unwrap_or_default()
    }

    pub fn total_new(&self) -> u32 {
        self.sources.values().map(|c| c.new).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_source_reports_zero() {
        let mut report = RunReport::default();
        report.record(SourceTag::Bizinfo, SourceCounts { total: 4, new: 2 });
        assert_eq!(report.get(SourceTag::G2b), SourceCounts::default());
        assert_eq!(report.get(SourceTag::Bizinfo).new, 2);
        assert_eq!(report.total_new(), 2);
    }
}
