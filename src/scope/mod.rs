//! Crawl scope: the boundary deciding which URLs are eligible to fetch
//!
//! A [`CrawlScope`] is built once per run from the configuration and the
//! seed URLs, and is immutable for the lifetime of the crawl.

use crate::config::Config;
use crate::url::{extract_domain, matches_domain};
use crate::ConfigError;
use std::collections::BTreeSet;
use url::Url;

/// File extensions that are never fetched, regardless of domain
///
/// Covers document, archive, audio/video, image, and binary formats.
pub const DEFAULT_EXCLUDED_EXTENSIONS: &[&str] = &[
    // documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "rtf",
    // archives
    "zip", "rar", "7z", "tar", "gz", "bz2",
    // audio
    "mp3", "wav", "ogg", "flac", "m4a",
    // video
    "mp4", "avi", "mov", "wmv", "mkv", "webm", "flv",
    // images
    "jpg", "jpeg", "png", "gif", "bmp", "svg", "webp", "ico", "tiff",
    // binaries
    "iso", "dmg", "exe", "msi", "bin", "apk",
];

/// The configured boundary of a single crawl run
#[derive(Debug, Clone)]
pub struct CrawlScope {
    /// Domains whose URLs are internal (exact or dot-suffix match)
    pub allowed_domains: BTreeSet<String>,

    /// Maximum link depth from a seed URL
    pub max_depth: u32,

    /// Lowercased path extensions that are never fetched
    pub excluded_extensions: BTreeSet<String>,

    /// Upper bound on stored page content, in bytes
    pub max_content_bytes: usize,
}

impl CrawlScope {
    /// Derives the scope for a run from the configuration and parsed seeds
    ///
    /// Allowed domains are the seed hosts (lowercased, `www.` dropped).
    /// Fails if no seed yields a usable domain.
    pub fn from_config(config: &Config, seeds: &[Url]) -> Result<Self, ConfigError> {
        let mut allowed_domains = BTreeSet::new();
        for seed in seeds {
            match extract_domain(seed) {
                Some(domain) => {
                    allowed_domains.insert(domain);
                }
                None => {
                    return Err(ConfigError::InvalidUrl(format!(
                        "Seed URL '{}' has no usable host",
                        seed
                    )));
                }
            }
        }

        if allowed_domains.is_empty() {
            return Err(ConfigError::Validation(
                "No allowed domains could be derived from the seed URLs".to_string(),
            ));
        }

        let excluded_extensions = config
            .crawler
            .excluded_extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .collect();

        Ok(Self {
            allowed_domains,
            max_depth: config.crawler.max_depth,
            excluded_extensions,
            max_content_bytes: config.crawler.max_content_bytes,
        })
    }

    /// Returns true iff the URL is eligible for fetching
    ///
    /// Checks, in order: http/https scheme, host membership in the allowed
    /// domains, and that the path extension is not excluded. Pure function
    /// of the scope and the URL.
    pub fn is_in_scope(&self, url: &Url) -> bool {
        if url.scheme() != "http" && url.scheme() != "https" {
            return false;
        }

        let Some(host) = url.host_str() else {
            return false;
        };
        if !self.domain_allowed(host) {
            return false;
        }

        !self.extension_excluded(url.path())
    }

    /// Returns true if the host belongs to one of the allowed domains
    pub fn domain_allowed(&self, host: &str) -> bool {
        self.allowed_domains
            .iter()
            .any(|domain| matches_domain(domain, host))
    }

    /// Returns true if the path ends in an excluded extension
    ///
    /// The comparison is case-insensitive; paths without a dot in their
    /// final segment have no extension.
    pub fn extension_excluded(&self, path: &str) -> bool {
        let Some(last_segment) = path.rsplit('/').next() else {
            return false;
        };
        let Some((_, extension)) = last_segment.rsplit_once('.') else {
            return false;
        };
        if extension.is_empty() {
            return false;
        }
        self.excluded_extensions.contains(&extension.to_lowercase())
    }
}
