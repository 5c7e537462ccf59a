//! Link classification
//!
//! Resolves the raw hrefs extracted from a page against its base URL and
//! partitions them into internal links (eligible for further crawling)
//! and external links (recorded as terminal data, never fetched).
//! A failure resolving one href skips that href only.

use crate::scope::CrawlScope;
use crate::url::normalize_url;
use std::collections::BTreeSet;
use url::Url;

/// Schemes that can never become fetchable links
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// The internal/external split of one page's outbound links
#[derive(Debug, Clone, Default)]
pub struct LinkPartition {
    /// Normalized absolute URLs on the allowed domains
    pub internal: BTreeSet<Url>,

    /// Absolute URLs off the allowed domains
    pub external: BTreeSet<String>,
}

/// Classifies raw hrefs relative to a base URL within a crawl scope
pub fn classify_links(base: &Url, hrefs: &[String], scope: &CrawlScope) -> LinkPartition {
    let mut partition = LinkPartition::default();

    for raw in hrefs {
        let href = raw.trim();
        if href.is_empty() || href.starts_with('#') {
            continue;
        }

        let lower = href.to_lowercase();
        if SKIPPED_SCHEMES.iter().any(|s| lower.starts_with(s)) {
            continue;
        }

        let resolved = match base.join(href) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(href, error = %e, "failed to resolve href, skipped");
                continue;
            }
        };

        if resolved.scheme() != "http" && resolved.scheme() != "https" {
            continue;
        }

        if scope.extension_excluded(resolved.path()) {
            tracing::debug!(url = %resolved, "excluded extension, skipped");
            continue;
        }

        let Some(host) = resolved.host_str() else {
            continue;
        };

        if scope.domain_allowed(host) {
            match normalize_url(resolved.as_str()) {
                Ok(normalized) => {
                    partition.internal.insert(normalized);
                }
                Err(e) => {
                    tracing::debug!(url = %resolved, error = %e, "failed to normalize internal link, skipped");
                }
            }
        } else {
            partition.external.insert(resolved.to_string());
        }
    }

    partition
}
