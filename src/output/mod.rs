//! Output handling: page records, persistence, and crawl statistics

mod json;
mod sink;
mod stats;
mod traits;

pub use json::JsonStore;
pub use sink::{RecordSink, TRUNCATION_MARKER};
pub use stats::{CrawlReport, PageFailure};
pub use traits::{PageRecord, PageStore, StoreError};
