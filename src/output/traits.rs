//! Page record type and the persistence collaborator interface

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while persisting a page record
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Store rejected record: {0}")]
    Rejected(String),
}

/// The structured output unit produced per successfully processed page
///
/// Immutable once built; owned by the sink until handed to persistence.
#[derive(Debug, Clone, Serialize)]
pub struct PageRecord {
    /// The fetched URL
    pub url: String,

    /// Page title, if the document had one
    pub title: Option<String>,

    /// Sanitized page markup (possibly truncated by the sink)
    pub sanitized_html: String,

    /// Flattened plain-text blocks in extraction order
    pub text_content: Vec<String>,

    /// Absolute URLs on allowed domains discovered on this page
    pub internal_links: BTreeSet<String>,

    /// Absolute URLs off the allowed domains; recorded, never fetched
    pub external_links: BTreeSet<String>,

    /// When the page was fetched
    pub fetched_at: DateTime<Utc>,
}

/// Persistence collaborator: stores one record, returns its location
pub trait PageStore: Send + Sync {
    fn persist(&self, record: &PageRecord) -> Result<PathBuf, StoreError>;
}
