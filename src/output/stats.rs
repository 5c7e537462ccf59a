//! Crawl summary statistics

use crate::state::{FailureKind, SkipReason};
use std::collections::HashMap;

/// A single per-page failure, kept for the final report
#[derive(Debug, Clone)]
pub struct PageFailure {
    /// The URL that failed
    pub url: String,

    /// Which stage failed
    pub kind: FailureKind,

    /// Error message from the failing stage
    pub message: String,
}

/// Running totals for one crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// Pages fetched, processed, and persisted
    pub processed: u64,

    /// Pages that failed fetching or persistence
    pub failed: u64,

    /// URLs rejected before or after fetch without being an error
    pub skipped: u64,

    /// Skip counts broken down by reason
    pub skips_by_reason: HashMap<SkipReason, u64>,

    /// External links recorded across all pages
    pub external_links: u64,

    /// Per-page failure detail
    pub failures: Vec<PageFailure>,

    /// URLs still queued when a stop signal ended the crawl
    pub cancelled_pending: u64,

    /// True if the crawl ended on a stop signal rather than exhaustion
    pub cancelled: bool,
}

impl CrawlReport {
    pub fn record_processed(&mut self) {
        self.processed += 1;
    }

    pub fn record_skip(&mut self, reason: SkipReason) {
        self.skipped += 1;
        *self.skips_by_reason.entry(reason).or_insert(0) += 1;
    }

    pub fn record_failure(&mut self, url: &str, kind: FailureKind, message: String) {
        self.failed += 1;
        self.failures.push(PageFailure {
            url: url.to_string(),
            kind,
            message,
        });
    }

    pub fn note_external_links(&mut self, count: u64) {
        self.external_links += count;
    }

    pub fn note_cancelled(&mut self, pending: u64) {
        self.cancelled = true;
        self.cancelled_pending = pending;
    }

    /// Count of skips recorded for one reason
    pub fn skips_for(&self, reason: SkipReason) -> u64 {
        self.skips_by_reason.get(&reason).copied().unwrap_or(0)
    }

    /// Prints the end-of-crawl summary to stdout
    pub fn print_summary(&self) {
        println!("=== Crawl Summary ===\n");

        println!("  Processed: {}", self.processed);
        println!("  Failed:    {}", self.failed);
        println!("  Skipped:   {}", self.skipped);
        println!("  External links recorded: {}", self.external_links);

        if !self.skips_by_reason.is_empty() {
            println!("\nSkips by reason:");
            let mut reasons: Vec<_> = self.skips_by_reason.iter().collect();
            reasons.sort_by_key(|(reason, _)| **reason);
            for (reason, count) in reasons {
                println!("  {}: {}", reason, count);
            }
        }

        if !self.failures.is_empty() {
            println!("\nFailures:");
            for failure in &self.failures {
                println!("  [{}] {}: {}", failure.kind, failure.url, failure.message);
            }
        }

        if self.cancelled {
            println!(
                "\nCrawl stopped early; {} queued URLs were not dispatched",
                self.cancelled_pending
            );
        }
    }
}
