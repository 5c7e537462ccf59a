//! Page record sink: size-guards records before persistence

use crate::output::traits::{PageRecord, PageStore, StoreError};
use std::path::PathBuf;

/// Appended to sanitized HTML that was cut at the size limit
pub const TRUNCATION_MARKER: &str = "<!-- content truncated -->";

/// Guards record size and hands records to the persistence collaborator
///
/// Truncation is a warning, never a failure; persistence failures drop the
/// affected page only and surface as an error to the caller.
#[derive(Debug)]
pub struct RecordSink<S> {
    store: S,
    max_content_bytes: usize,
}

impl<S: PageStore> RecordSink<S> {
    pub fn new(store: S, max_content_bytes: usize) -> Self {
        Self {
            store,
            max_content_bytes,
        }
    }

    /// Submits a record, truncating oversized HTML before persistence
    pub fn submit(&self, mut record: PageRecord) -> Result<PathBuf, StoreError> {
        if record.sanitized_html.len() > self.max_content_bytes {
            let original = record.sanitized_html.len();
            let mut cut = self.max_content_bytes;
            while !record.sanitized_html.is_char_boundary(cut) {
                cut -= 1;
            }
            record.sanitized_html.truncate(cut);
            record.sanitized_html.push_str(TRUNCATION_MARKER);

            tracing::warn!(
                url = %record.url,
                original_bytes = original,
                limit = self.max_content_bytes,
                "sanitized content exceeds limit, truncated"
            );
        }

        self.store.persist(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeSet;
    use std::sync::Mutex;

    /// In-memory store capturing submitted records
    #[derive(Default)]
    struct MemoryStore {
        records: Mutex<Vec<PageRecord>>,
        fail: bool,
    }

    impl PageStore for MemoryStore {
        fn persist(&self, record: &PageRecord) -> Result<PathBuf, StoreError> {
            if self.fail {
                return Err(StoreError::Rejected("disk full".to_string()));
            }
            self.records.lock().unwrap().push(record.clone());
            Ok(PathBuf::from("memory"))
        }
    }

    fn record_with_html(html: String) -> PageRecord {
        PageRecord {
            url: "https://example.com/big".to_string(),
            title: None,
            sanitized_html: html,
            text_content: vec![],
            internal_links: BTreeSet::new(),
            external_links: BTreeSet::new(),
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_oversized_html_truncated_with_marker() {
        let store = MemoryStore::default();
        let limit = 1024;
        let sink = RecordSink::new(store, limit);

        sink.submit(record_with_html("x".repeat(limit + 200))).unwrap();

        let records = sink.store.records.lock().unwrap();
        let html = &records[0].sanitized_html;
        assert_eq!(html.len(), limit + TRUNCATION_MARKER.len());
        assert!(html.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_small_record_untouched() {
        let store = MemoryStore::default();
        let sink = RecordSink::new(store, 1024);

        sink.submit(record_with_html("<p>small</p>".to_string())).unwrap();

        let records = sink.store.records.lock().unwrap();
        assert_eq!(records[0].sanitized_html, "<p>small</p>");
    }

    #[test]
    fn test_exact_limit_untouched() {
        let store = MemoryStore::default();
        let limit = 64;
        let sink = RecordSink::new(store, limit);

        sink.submit(record_with_html("y".repeat(limit))).unwrap();

        let records = sink.store.records.lock().unwrap();
        assert_eq!(records[0].sanitized_html.len(), limit);
        assert!(!records[0].sanitized_html.contains(TRUNCATION_MARKER));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let store = MemoryStore::default();
        // limit falls in the middle of a multi-byte character
        let sink = RecordSink::new(store, 5);

        sink.submit(record_with_html("ééééé".to_string())).unwrap();

        let records = sink.store.records.lock().unwrap();
        assert!(records[0].sanitized_html.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_persistence_failure_propagates() {
        let store = MemoryStore {
            fail: true,
            ..Default::default()
        };
        let sink = RecordSink::new(store, 1024);

        let result = sink.submit(record_with_html("<p>x</p>".to_string()));
        assert!(result.is_err());
    }
}
