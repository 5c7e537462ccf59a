//! HTTP fetch collaborator
//!
//! The traversal engine talks to the network through the [`Fetcher`]
//! trait; [`HttpFetcher`] is the production implementation. It owns the
//! concerns the engine deliberately does not: redirects, robots.txt,
//! per-host politeness spacing, and response size enforcement.

use crate::config::Config;
use crate::crawler::robots::RobotsCache;
use reqwest::Client;
use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;
use url::Url;

/// A successfully fetched response
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// Final URL after redirects
    pub final_url: Url,

    /// HTTP status code
    pub status: u16,

    /// Content-Type header value, if present
    pub content_type: Option<String>,

    /// Decoded response body
    pub body: String,
}

impl FetchResponse {
    /// Returns true if the response declared an HTML content type
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.contains("text/html"))
            .unwrap_or(false)
    }
}

/// Classified fetch failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchErrorKind {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed")]
    Connect,

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("declared content length {0} exceeds the size limit")]
    TooLarge(usize),

    #[error("disallowed by robots.txt")]
    RobotsDenied,

    #[error("{0}")]
    Other(String),
}

/// A fetch failure for one URL
#[derive(Debug, Clone, Error)]
#[error("{kind} ({url})")]
pub struct FetchError {
    /// The URL that failed
    pub url: String,

    /// What went wrong
    pub kind: FetchErrorKind,
}

/// Fetch collaborator interface consumed by the traversal engine
///
/// Given a URL and a size hint, asynchronously yields a response or a
/// classified failure. Implementations own retries, redirects, robots
/// compliance, and politeness.
pub trait Fetcher: Send + Sync {
    fn fetch(
        &self,
        url: &Url,
        max_bytes: usize,
    ) -> impl Future<Output = Result<FetchResponse, FetchError>> + Send;
}

/// Builds the shared HTTP client
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Production fetcher backed by reqwest
pub struct HttpFetcher {
    client: Client,
    user_agent: String,
    politeness_delay: Duration,
    robots: RobotsCache,
    last_request: Mutex<HashMap<String, Instant>>,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let user_agent = config.user_agent.header_value();
        let client = build_http_client(&user_agent)?;

        Ok(Self {
            client,
            user_agent,
            politeness_delay: Duration::from_millis(config.crawler.politeness_delay_ms),
            robots: RobotsCache::new(),
            last_request: Mutex::new(HashMap::new()),
        })
    }

    /// Reserves the next request slot for a host, sleeping out the delay
    ///
    /// The slot is claimed under the lock and the sleep happens outside
    /// it, so concurrent fetches to one host space themselves out.
    async fn reserve_slot(&self, host: &str) {
        if self.politeness_delay.is_zero() {
            return;
        }

        let wait = {
            let mut last_request = self.last_request.lock().await;
            let now = Instant::now();
            let ready = match last_request.get(host) {
                Some(previous) => (*previous + self.politeness_delay).max(now),
                None => now,
            };
            last_request.insert(host.to_string(), ready);
            ready.saturating_duration_since(now)
        };

        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }

    async fn fetch_inner(
        &self,
        url: &Url,
        max_bytes: usize,
    ) -> Result<FetchResponse, FetchErrorKind> {
        if !self.robots.allows(&self.client, url, &self.user_agent).await {
            return Err(FetchErrorKind::RobotsDenied);
        }

        if let Some(host) = url.host_str() {
            self.reserve_slot(host).await;
        }

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchErrorKind::Status(status.as_u16()));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        if let Some(declared) = response.content_length() {
            if declared as usize > max_bytes {
                return Err(FetchErrorKind::TooLarge(declared as usize));
            }
        }

        // Stream the body, capping at max_bytes for servers that do not
        // declare a length.
        let mut response = response;
        let mut body_bytes: Vec<u8> = Vec::new();
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    if body_bytes.len() + chunk.len() > max_bytes {
                        let keep = max_bytes - body_bytes.len();
                        body_bytes.extend_from_slice(&chunk[..keep]);
                        tracing::warn!(
                            url = %url,
                            limit = max_bytes,
                            "response exceeded size limit, body capped"
                        );
                        break;
                    }
                    body_bytes.extend_from_slice(&chunk);
                }
                Ok(None) => break,
                Err(e) => return Err(classify_reqwest_error(e)),
            }
        }

        let body = String::from_utf8_lossy(&body_bytes).into_owned();

        Ok(FetchResponse {
            final_url,
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(
        &self,
        url: &Url,
        max_bytes: usize,
    ) -> impl Future<Output = Result<FetchResponse, FetchError>> + Send {
        async move {
            self.fetch_inner(url, max_bytes)
                .await
                .map_err(|kind| FetchError {
                    url: url.to_string(),
                    kind,
                })
        }
    }
}

fn classify_reqwest_error(error: reqwest::Error) -> FetchErrorKind {
    if error.is_timeout() {
        FetchErrorKind::Timeout
    } else if error.is_connect() {
        FetchErrorKind::Connect
    } else {
        FetchErrorKind::Other(error.to_string())
    }
}
