//! Crawler coordinator - main traversal orchestration logic
//!
//! Drives the crawl as an explicit state machine over frontier entries:
//! every URL moves Pending -> Fetching -> {Processed | Failed | Skipped}.
//! A work queue feeds a bounded set of concurrent in-flight fetches; the
//! only suspension point is the fetch await. Sanitization, extraction,
//! and classification run inline once a response arrives.

use crate::config::Config;
use crate::content::{extract_content, sanitize_html};
use crate::crawler::fetcher::{FetchError, FetchResponse, Fetcher, HttpFetcher};
use crate::crawler::links::classify_links;
use crate::crawler::FetchRequest;
use crate::frontier::Frontier;
use crate::output::{CrawlReport, JsonStore, PageRecord, PageStore, RecordSink};
use crate::scope::CrawlScope;
use crate::state::{FailureKind, PageStatus, SkipReason};
use crate::url::normalize_url;
use crate::BurrowError;
use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use scraper::Html;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use url::Url;

/// Main crawler coordinator structure
///
/// Holds the per-run context: scope, frontier, collaborators, and the
/// stop signal. No state outlives the run.
pub struct Coordinator<F, S> {
    scope: CrawlScope,
    seeds: Vec<Url>,
    frontier: Frontier,
    fetcher: Arc<F>,
    sink: RecordSink<S>,
    max_in_flight: usize,
    cheap_sanitize_threshold: usize,
    shutdown_grace: Duration,
    stop: watch::Receiver<bool>,
}

impl<F: Fetcher, S: PageStore> Coordinator<F, S> {
    /// Creates a coordinator for one crawl run
    ///
    /// Seeds are normalized up front; the scope (allowed domains, depth,
    /// extension denylist, size limit) is derived from them and the
    /// configuration. Fails only on misconfiguration.
    pub fn new(
        config: &Config,
        fetcher: Arc<F>,
        store: S,
        stop: watch::Receiver<bool>,
    ) -> Result<Self, BurrowError> {
        let mut seeds = Vec::with_capacity(config.seeds.len());
        for seed in &config.seeds {
            seeds.push(normalize_url(seed)?);
        }

        let scope = CrawlScope::from_config(config, &seeds)?;
        let sink = RecordSink::new(store, scope.max_content_bytes);

        Ok(Self {
            scope,
            seeds,
            frontier: Frontier::new(),
            fetcher,
            sink,
            max_in_flight: config.crawler.max_concurrent_fetches as usize,
            cheap_sanitize_threshold: config.crawler.cheap_sanitize_threshold,
            shutdown_grace: Duration::from_millis(config.crawler.shutdown_grace_ms),
            stop,
        })
    }

    /// Runs the crawl to completion or until the stop signal fires
    ///
    /// Terminates when the work queue is empty and no fetch is
    /// outstanding. On a stop signal, queued URLs are discarded and
    /// in-flight fetches drain within the configured grace period.
    pub async fn run(&self) -> Result<CrawlReport, BurrowError> {
        let mut report = CrawlReport::default();
        let mut pending: VecDeque<FetchRequest> = VecDeque::new();
        let mut stop_rx = self.stop.clone();
        let mut stop_closed = false;

        for seed in &self.seeds {
            if !self.scope.is_in_scope(seed) {
                tracing::warn!(url = %seed, "seed is outside the crawl scope, skipped");
                report.record_skip(SkipReason::OutOfScope);
                continue;
            }
            if self.frontier.try_admit(seed) {
                pending.push_back(FetchRequest {
                    url: seed.clone(),
                    depth: 0,
                });
            } else {
                report.record_skip(SkipReason::AlreadyVisited);
            }
        }

        tracing::info!(
            seeds = pending.len(),
            domains = self.scope.allowed_domains.len(),
            max_depth = self.scope.max_depth,
            "starting crawl"
        );

        let start_time = Instant::now();
        let mut last_logged = 0;
        let mut in_flight = FuturesUnordered::new();

        while !pending.is_empty() || !in_flight.is_empty() {
            if *stop_rx.borrow() {
                tracing::info!(
                    pending = pending.len(),
                    "stop signal received, discarding queued fetches"
                );
                report.note_cancelled(pending.len() as u64);
                pending.clear();
                self.drain(&mut in_flight, &mut report).await;
                break;
            }

            while in_flight.len() < self.max_in_flight {
                let Some(request) = pending.pop_front() else {
                    break;
                };
                tracing::debug!(
                    url = %request.url,
                    depth = request.depth,
                    status = %PageStatus::Fetching,
                    "dispatching fetch"
                );
                let fetcher = Arc::clone(&self.fetcher);
                let max_bytes = self.scope.max_content_bytes;
                in_flight.push(async move {
                    let outcome = fetcher.fetch(&request.url, max_bytes).await;
                    (request, outcome)
                });
            }

            tokio::select! {
                joined = in_flight.next(), if !in_flight.is_empty() => {
                    if let Some((request, outcome)) = joined {
                        self.handle_fetch_outcome(request, outcome, &mut pending, &mut report);
                    }
                }
                changed = stop_rx.changed(), if !stop_closed => {
                    if changed.is_err() {
                        // sender dropped without signalling: no stop will come
                        stop_closed = true;
                    }
                }
            }

            let completed = report.processed + report.failed;
            if completed % 10 == 0 && completed != last_logged {
                last_logged = completed;
                let rate = completed as f64 / start_time.elapsed().as_secs_f64();
                tracing::info!(
                    processed = report.processed,
                    failed = report.failed,
                    pending = pending.len(),
                    in_flight = in_flight.len(),
                    pages_per_sec = rate,
                    "progress"
                );
            }
        }

        tracing::info!(
            processed = report.processed,
            failed = report.failed,
            skipped = report.skipped,
            admitted = self.frontier.admitted_count(),
            elapsed = ?start_time.elapsed(),
            "crawl complete"
        );

        Ok(report)
    }

    /// Drains in-flight fetches after a stop signal
    ///
    /// Completed responses are still processed and flushed to the sink,
    /// but links they discover are not scheduled. Fetches that outlive
    /// the grace period are dropped.
    async fn drain<Fut>(&self, in_flight: &mut FuturesUnordered<Fut>, report: &mut CrawlReport)
    where
        Fut: Future<Output = (FetchRequest, Result<FetchResponse, FetchError>)>,
    {
        if in_flight.is_empty() {
            return;
        }

        tracing::info!(
            outstanding = in_flight.len(),
            grace_ms = self.shutdown_grace.as_millis() as u64,
            "draining in-flight fetches"
        );

        let mut discarded = VecDeque::new();
        let drained = tokio::time::timeout(self.shutdown_grace, async {
            while let Some((request, outcome)) = in_flight.next().await {
                self.handle_fetch_outcome(request, outcome, &mut discarded, report);
            }
        })
        .await;

        if drained.is_err() {
            tracing::warn!(
                outstanding = in_flight.len(),
                "grace period elapsed, remaining fetches cancelled"
            );
        }
    }

    /// Routes one completed fetch to processing or failure accounting
    fn handle_fetch_outcome(
        &self,
        request: FetchRequest,
        outcome: Result<FetchResponse, FetchError>,
        pending: &mut VecDeque<FetchRequest>,
        report: &mut CrawlReport,
    ) {
        match outcome {
            Err(error) => {
                tracing::warn!(
                    url = %request.url,
                    error = %error.kind,
                    status = %PageStatus::Failed,
                    "fetch failed"
                );
                report.record_failure(request.url.as_str(), FailureKind::Fetch, error.kind.to_string());
            }
            Ok(response) => {
                if !response.is_html() || response.body.trim().is_empty() {
                    tracing::debug!(
                        url = %request.url,
                        content_type = response.content_type.as_deref().unwrap_or("none"),
                        status = %PageStatus::Skipped,
                        "no textual content"
                    );
                    report.record_skip(SkipReason::NoTextualContent);
                    return;
                }
                self.process_page(request, response, pending, report);
            }
        }
    }

    /// Sanitizes, extracts, classifies, persists, and schedules children
    fn process_page(
        &self,
        request: FetchRequest,
        response: FetchResponse,
        pending: &mut VecDeque<FetchRequest>,
        report: &mut CrawlReport,
    ) {
        let span = tracing::debug_span!("process", url = %request.url, depth = request.depth);
        let _guard = span.enter();

        let sanitized = sanitize_html(&response.body, self.cheap_sanitize_threshold);
        let document = Html::parse_document(&sanitized);
        let content = extract_content(&document);
        let links = classify_links(&response.final_url, &content.hrefs, &self.scope);

        let record = PageRecord {
            url: request.url.to_string(),
            title: content.title,
            sanitized_html: sanitized,
            text_content: content.text_blocks,
            internal_links: links.internal.iter().map(|u| u.to_string()).collect(),
            external_links: links.external.clone(),
            fetched_at: Utc::now(),
        };

        if let Err(error) = self.sink.submit(record) {
            tracing::warn!(
                error = %error,
                status = %PageStatus::Failed,
                "failed to persist page record"
            );
            report.record_failure(request.url.as_str(), FailureKind::Persist, error.to_string());
            return;
        }

        report.record_processed();
        report.note_external_links(links.external.len() as u64);
        tracing::debug!(
            internal = links.internal.len(),
            external = links.external.len(),
            status = %PageStatus::Processed,
            "page processed"
        );

        // child depth is fixed here, from the admitting parent
        let child_depth = request.depth + 1;
        for link in links.internal {
            if child_depth > self.scope.max_depth {
                report.record_skip(SkipReason::DepthExceeded);
                continue;
            }
            if !self.frontier.try_admit(&link) {
                report.record_skip(SkipReason::AlreadyVisited);
                continue;
            }
            tracing::debug!(
                url = %link,
                depth = child_depth,
                status = %PageStatus::Pending,
                "link admitted"
            );
            pending.push_back(FetchRequest {
                url: link,
                depth: child_depth,
            });
        }
    }
}

/// Runs a crawl with the production fetcher and JSON store
///
/// Wires ctrl-c to the stop signal so an interrupted crawl drains
/// gracefully and still prints its summary.
///
/// # Example
///
/// ```no_run
/// use burrow::config::load_config;
/// use burrow::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let report = run_crawl(config).await?;
/// report.print_summary();
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlReport, BurrowError> {
    let fetcher = Arc::new(HttpFetcher::new(&config)?);
    let store = JsonStore::new(&config.output.directory)?;

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping crawl");
            let _ = stop_tx.send(true);
        }
    });

    let coordinator = Coordinator::new(&config, fetcher, store, stop_rx)?;
    coordinator.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlerConfig;
    use crate::crawler::fetcher::FetchErrorKind;
    use crate::output::StoreError;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Serves canned HTML bodies and records every fetched URL
    struct ScriptedFetcher {
        pages: HashMap<String, String>,
        content_type: String,
        fetched: Mutex<Vec<String>>,
    }

    impl ScriptedFetcher {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.to_string()))
                    .collect(),
                content_type: "text/html".to_string(),
                fetched: Mutex::new(Vec::new()),
            }
        }

        fn fetched_urls(&self) -> Vec<String> {
            self.fetched.lock().unwrap().clone()
        }
    }

    impl Fetcher for ScriptedFetcher {
        fn fetch(
            &self,
            url: &Url,
            _max_bytes: usize,
        ) -> impl Future<Output = Result<FetchResponse, FetchError>> + Send {
            async move {
                self.fetched.lock().unwrap().push(url.to_string());
                match self.pages.get(url.as_str()) {
                    Some(body) => Ok(FetchResponse {
                        final_url: url.clone(),
                        status: 200,
                        content_type: Some(self.content_type.clone()),
                        body: body.clone(),
                    }),
                    None => Err(FetchError {
                        url: url.to_string(),
                        kind: FetchErrorKind::Status(404),
                    }),
                }
            }
        }
    }

    /// Captures persisted records in memory
    #[derive(Default, Clone)]
    struct MemoryStore {
        records: Arc<Mutex<Vec<PageRecord>>>,
        fail_for: Option<String>,
    }

    impl PageStore for MemoryStore {
        fn persist(&self, record: &PageRecord) -> Result<PathBuf, StoreError> {
            if self.fail_for.as_deref() == Some(record.url.as_str()) {
                return Err(StoreError::Rejected("store full".to_string()));
            }
            self.records.lock().unwrap().push(record.clone());
            Ok(PathBuf::from("memory"))
        }
    }

    fn test_config(seeds: &[&str], max_depth: u32) -> Config {
        Config {
            seeds: seeds.iter().map(|s| s.to_string()).collect(),
            crawler: CrawlerConfig {
                max_depth,
                politeness_delay_ms: 0,
                ..CrawlerConfig::default()
            },
            user_agent: Default::default(),
            output: Default::default(),
        }
    }

    fn never_stop() -> (watch::Sender<bool>, watch::Receiver<bool>) {
        watch::channel(false)
    }

    #[tokio::test]
    async fn test_each_url_fetched_once() {
        // root links a and b; both link back to root and to each other
        let fetcher = Arc::new(ScriptedFetcher::new(&[
            (
                "https://site.test/",
                r#"<a href="/a">A</a><a href="/b">B</a>"#,
            ),
            ("https://site.test/a", r#"<a href="/b">B</a><a href="/">home</a>"#),
            ("https://site.test/b", r#"<a href="/a">A</a>"#),
        ]));
        let store = MemoryStore::default();
        let (_tx, rx) = never_stop();

        let coordinator = Coordinator::new(
            &test_config(&["https://site.test/"], 3),
            Arc::clone(&fetcher),
            store.clone(),
            rx,
        )
        .unwrap();
        let report = coordinator.run().await.unwrap();

        assert_eq!(report.processed, 3);

        let mut fetched = fetcher.fetched_urls();
        fetched.sort();
        fetched.dedup();
        assert_eq!(fetched.len(), fetcher.fetched_urls().len(), "a URL was fetched twice");
        assert!(report.skips_for(SkipReason::AlreadyVisited) > 0);
    }

    #[tokio::test]
    async fn test_depth_boundary() {
        let fetcher = Arc::new(ScriptedFetcher::new(&[
            ("https://site.test/", r#"<a href="/l1">1</a>"#),
            ("https://site.test/l1", r#"<a href="/l2">2</a>"#),
            ("https://site.test/l2", r#"<a href="/l3">3</a>"#),
            ("https://site.test/l3", "<p>too deep</p>"),
        ]));
        let store = MemoryStore::default();
        let (_tx, rx) = never_stop();

        let coordinator = Coordinator::new(
            &test_config(&["https://site.test/"], 2),
            Arc::clone(&fetcher),
            store,
            rx,
        )
        .unwrap();
        let report = coordinator.run().await.unwrap();

        assert_eq!(report.processed, 3);
        assert_eq!(report.skips_for(SkipReason::DepthExceeded), 1);
        assert!(!fetcher
            .fetched_urls()
            .contains(&"https://site.test/l3".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_failure_does_not_stop_siblings() {
        let fetcher = Arc::new(ScriptedFetcher::new(&[
            (
                "https://site.test/",
                r#"<a href="/ok">ok</a><a href="/missing">gone</a>"#,
            ),
            ("https://site.test/ok", "<p>fine</p>"),
        ]));
        let store = MemoryStore::default();
        let (_tx, rx) = never_stop();

        let coordinator = Coordinator::new(
            &test_config(&["https://site.test/"], 3),
            fetcher,
            store.clone(),
            rx,
        )
        .unwrap();
        let report = coordinator.run().await.unwrap();

        assert_eq!(report.processed, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].url, "https://site.test/missing");
        assert_eq!(report.failures[0].kind, FailureKind::Fetch);
    }

    #[tokio::test]
    async fn test_external_links_recorded_not_fetched() {
        let fetcher = Arc::new(ScriptedFetcher::new(&[(
            "https://site.test/",
            r#"<a href="https://elsewhere.test/x">out</a>"#,
        )]));
        let store = MemoryStore::default();
        let (_tx, rx) = never_stop();

        let coordinator = Coordinator::new(
            &test_config(&["https://site.test/"], 3),
            Arc::clone(&fetcher),
            store.clone(),
            rx,
        )
        .unwrap();
        let report = coordinator.run().await.unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(report.external_links, 1);
        assert_eq!(fetcher.fetched_urls(), vec!["https://site.test/"]);

        let records = store.records.lock().unwrap();
        assert!(records[0]
            .external_links
            .contains("https://elsewhere.test/x"));
    }

    #[tokio::test]
    async fn test_persistence_failure_drops_page_only() {
        let fetcher = Arc::new(ScriptedFetcher::new(&[
            ("https://site.test/", r#"<a href="/a">A</a>"#),
            ("https://site.test/a", "<p>never reached</p>"),
        ]));
        let store = MemoryStore {
            fail_for: Some("https://site.test/".to_string()),
            ..Default::default()
        };
        let (_tx, rx) = never_stop();

        let coordinator = Coordinator::new(
            &test_config(&["https://site.test/"], 3),
            Arc::clone(&fetcher),
            store,
            rx,
        )
        .unwrap();
        let report = coordinator.run().await.unwrap();

        // the dropped page is not recursed into
        assert_eq!(report.failed, 1);
        assert_eq!(report.failures[0].kind, FailureKind::Persist);
        assert_eq!(fetcher.fetched_urls(), vec!["https://site.test/"]);
    }

    #[tokio::test]
    async fn test_non_html_response_skipped() {
        let mut fetcher = ScriptedFetcher::new(&[("https://site.test/", "plain text")]);
        fetcher.content_type = "text/plain".to_string();
        let store = MemoryStore::default();
        let (_tx, rx) = never_stop();

        let coordinator = Coordinator::new(
            &test_config(&["https://site.test/"], 3),
            Arc::new(fetcher),
            store.clone(),
            rx,
        )
        .unwrap();
        let report = coordinator.run().await.unwrap();

        assert_eq!(report.processed, 0);
        assert_eq!(report.skips_for(SkipReason::NoTextualContent), 1);
        assert!(store.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pre_signalled_stop_dispatches_nothing() {
        let fetcher = Arc::new(ScriptedFetcher::new(&[(
            "https://site.test/",
            "<p>never fetched</p>",
        )]));
        let store = MemoryStore::default();
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let coordinator = Coordinator::new(
            &test_config(&["https://site.test/"], 3),
            Arc::clone(&fetcher),
            store,
            rx,
        )
        .unwrap();
        let report = coordinator.run().await.unwrap();

        assert!(report.cancelled);
        assert_eq!(report.cancelled_pending, 1);
        assert!(fetcher.fetched_urls().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_seeds_admitted_once() {
        let fetcher = Arc::new(ScriptedFetcher::new(&[(
            "https://site.test/",
            "<p>home</p>",
        )]));
        let store = MemoryStore::default();
        let (_tx, rx) = never_stop();

        let coordinator = Coordinator::new(
            &test_config(&["https://site.test/", "https://SITE.test/#top"], 3),
            Arc::clone(&fetcher),
            store,
            rx,
        )
        .unwrap();
        let report = coordinator.run().await.unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(fetcher.fetched_urls().len(), 1);
        assert_eq!(report.skips_for(SkipReason::AlreadyVisited), 1);
    }

    #[tokio::test]
    async fn test_record_contents() {
        let fetcher = Arc::new(ScriptedFetcher::new(&[(
            "https://site.test/",
            r#"<html><head><title>Home</title><script>bad()</script></head>
               <body><p>welcome</p><a href="/next">next</a>
               <a href="https://other.test/">away</a></body></html>"#,
        ), ("https://site.test/next", "<p>next page</p>")]));
        let store = MemoryStore::default();
        let (_tx, rx) = never_stop();

        let coordinator = Coordinator::new(
            &test_config(&["https://site.test/"], 3),
            fetcher,
            store.clone(),
            rx,
        )
        .unwrap();
        coordinator.run().await.unwrap();

        let records = store.records.lock().unwrap();
        let home = records
            .iter()
            .find(|r| r.url == "https://site.test/")
            .unwrap();

        assert_eq!(home.title, Some("Home".to_string()));
        assert!(home.text_content.contains(&"welcome".to_string()));
        assert!(!home.sanitized_html.contains("bad()"));
        assert!(home.internal_links.contains("https://site.test/next"));
        assert!(home.external_links.contains("https://other.test/"));
    }
}
