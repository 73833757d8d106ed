//! Data models for the notice pipeline.

mod exclusion;
mod notice;
mod raw;
mod run_status;

pub use exclusion::{CrawlLogEntry, ExclusionEntry};
pub use notice::{Notice, NoticeStatus, SourceTag};
pub use raw::RawRecord;
pub use run_status::{RunReport, RunStatus, SourceCounts};
