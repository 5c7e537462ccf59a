//! Per-host robots.txt caching and matching
//!
//! robots.txt is fetched at most once per scheme/host/port and consulted
//! before every GET. An unavailable or unreadable robots.txt means the
//! host allows everything.

use reqwest::Client;
use robotstxt::DefaultMatcher;
use std::collections::HashMap;
use tokio::sync::Mutex;
use url::Url;

/// Caches fetched robots.txt bodies per origin
#[derive(Debug, Default)]
pub struct RobotsCache {
    // None records a host whose robots.txt could not be fetched
    rules: Mutex<HashMap<String, Option<String>>>,
}

impl RobotsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the user agent may fetch the URL
    pub async fn allows(&self, client: &Client, url: &Url, user_agent: &str) -> bool {
        let Some(host) = url.host_str() else {
            return true;
        };

        let mut key = format!("{}://{}", url.scheme(), host);
        if let Some(port) = url.port() {
            key.push_str(&format!(":{}", port));
        }

        let cached = { self.rules.lock().await.get(&key).cloned() };
        let body = match cached {
            Some(body) => body,
            None => {
                let fetched = fetch_robots(client, url).await;
                self.rules.lock().await.insert(key, fetched.clone());
                fetched
            }
        };

        match body {
            Some(text) => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(&text, user_agent, url.as_str())
            }
            None => true,
        }
    }
}

/// Fetches robots.txt for the URL's origin; None means allow-all
async fn fetch_robots(client: &Client, url: &Url) -> Option<String> {
    let robots_url = url.join("/robots.txt").ok()?;

    let response = match client.get(robots_url.clone()).send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!(url = %robots_url, error = %e, "robots.txt unreachable, allowing all");
            return None;
        }
    };

    if !response.status().is_success() {
        tracing::debug!(url = %robots_url, status = %response.status(), "no robots.txt, allowing all");
        return None;
    }

    response.text().await.ok()
}
