//! Crawler components: fetching, link classification, and traversal

pub mod coordinator;
pub mod fetcher;
pub mod links;
pub mod robots;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{
    build_http_client, FetchError, FetchErrorKind, FetchResponse, Fetcher, HttpFetcher,
};
pub use links::{classify_links, LinkPartition};
pub use robots::RobotsCache;

use url::Url;

/// A URL scheduled for fetching at a fixed depth
///
/// Created only after the frontier admits the URL; the depth is derived
/// from the admitting parent at admission time.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// The URL to fetch
    pub url: Url,

    /// Link distance from the seed that led here
    pub depth: u32,
}
