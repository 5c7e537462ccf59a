//! JSON-file persistence: one file per page record

use crate::output::traits::{PageRecord, PageStore, StoreError};
use std::path::{Path, PathBuf};

/// Longest URL-derived filename stem before the timestamp suffix
const MAX_STEM_LEN: usize = 180;

/// Writes each page record to its own JSON file in a directory
#[derive(Debug, Clone)]
pub struct JsonStore {
    directory: PathBuf,
}

impl JsonStore {
    /// Creates the store, creating the output directory if needed
    pub fn new(directory: impl AsRef<Path>) -> Result<Self, StoreError> {
        let directory = directory.as_ref().to_path_buf();
        std::fs::create_dir_all(&directory)?;
        Ok(Self { directory })
    }

    /// Derives a filesystem-safe filename from the record URL and timestamp
    fn filename_for(record: &PageRecord) -> String {
        let mut stem: String = record
            .url
            .replace("://", "_")
            .chars()
            .map(|c| if c == '/' || c == '?' || c == '&' { '_' } else { c })
            .collect();

        if stem.len() > MAX_STEM_LEN {
            let mut cut = MAX_STEM_LEN;
            while !stem.is_char_boundary(cut) {
                cut -= 1;
            }
            stem.truncate(cut);
        }

        format!(
            "{}_{}.json",
            stem,
            record.fetched_at.format("%Y%m%d_%H%M%S")
        )
    }
}

impl PageStore for JsonStore {
    fn persist(&self, record: &PageRecord) -> Result<PathBuf, StoreError> {
        let path = self.directory.join(Self::filename_for(record));
        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(&path, json)?;
        tracing::debug!(url = %record.url, path = %path.display(), "page record persisted");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn test_record(url: &str) -> PageRecord {
        PageRecord {
            url: url.to_string(),
            title: Some("T".to_string()),
            sanitized_html: "<p>x</p>".to_string(),
            text_content: vec!["x".to_string()],
            internal_links: BTreeSet::new(),
            external_links: BTreeSet::new(),
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_persist_writes_parseable_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path()).unwrap();

        let path = store.persist(&test_record("https://example.com/about")).unwrap();
        assert!(path.exists());

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["url"], "https://example.com/about");
    }

    #[test]
    fn test_filename_has_no_separators() {
        let record = test_record("https://example.com/a/b?q=1");
        let name = JsonStore::filename_for(&record);

        assert!(!name.contains("://"));
        assert!(!name.contains('/'));
        assert!(!name.contains('?'));
        assert!(name.ends_with(".json"));
    }

    #[test]
    fn test_long_urls_capped() {
        let long_url = format!("https://example.com/{}", "a".repeat(500));
        let record = test_record(&long_url);
        let name = JsonStore::filename_for(&record);

        assert!(name.len() < MAX_STEM_LEN + 40);
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep/output");
        let store = JsonStore::new(&nested).unwrap();

        store.persist(&test_record("https://example.com/")).unwrap();
        assert!(nested.exists());
    }
}
