//! Burrow: a bounded, domain-scoped website crawler
//!
//! This crate crawls a website outward from a set of seed URLs, sanitizes
//! and extracts structured content from each page, and recursively follows
//! internal links within configured depth and size limits.

pub mod config;
pub mod content;
pub mod crawler;
pub mod frontier;
pub mod output;
pub mod scope;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Burrow operations
#[derive(Debug, Error)]
pub enum BurrowError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Store error: {0}")]
    Store(#[from] output::StoreError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for Burrow operations
pub type Result<T> = std::result::Result<T, BurrowError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, FetchRequest, Fetcher, HttpFetcher};
pub use frontier::Frontier;
pub use output::{CrawlReport, JsonStore, PageRecord, PageStore, RecordSink};
pub use scope::CrawlScope;
pub use state::{FailureKind, PageStatus, SkipReason};
pub use url::{extract_domain, matches_domain, normalize_url};
