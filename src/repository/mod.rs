//! SQLite persistence for notices, exclusions and the crawl log.
//!
//! Each repository implements one of the store traits in
//! [`crate::pipeline`], so the pipeline never sees Diesel types beyond the
//! error alias.

pub mod context;
pub mod crawl_log;
pub mod exclusion;
pub mod models;
pub mod notice;
pub mod pool;
pub mod util;

pub use context::DbContext;
pub use crawl_log::{CrawlLogRepository, DEFAULT_LOG_LIMIT};
pub use exclusion::ExclusionRepository;
pub use notice::NoticeRepository;
pub use pool::{AsyncSqlitePool, DieselError};
pub use util::{parse_datetime, to_diesel_error};
