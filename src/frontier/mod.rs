//! Frontier: the visited-set gate in front of every fetch
//!
//! The frontier admits each normalized URL exactly once per crawl run.
//! Admission is a single mutex-guarded check-and-insert so that concurrent
//! traversal steps racing on the same URL cannot both win; the lock is
//! never held across a suspension point.

use std::collections::HashSet;
use std::sync::Mutex;
use url::Url;

/// Tracks every URL admitted for fetching in the current run
#[derive(Debug, Default)]
pub struct Frontier {
    visited: Mutex<HashSet<String>>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically admits a URL, returning true only on first admission
    ///
    /// Callers must pass normalized URLs (see [`crate::url::normalize_url`])
    /// so that equivalent spellings collide.
    pub fn try_admit(&self, url: &Url) -> bool {
        let mut visited = self.visited.lock().unwrap();
        visited.insert(url.as_str().to_string())
    }

    /// Number of URLs admitted so far
    pub fn admitted_count(&self) -> usize {
        self.visited.lock().unwrap().len()
    }
}
