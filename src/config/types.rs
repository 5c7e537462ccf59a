use crate::scope::DEFAULT_EXCLUDED_EXTENSIONS;
use serde::Deserialize;

/// Main configuration structure for Burrow
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// URLs the crawl starts from; allowed domains are derived from these
    pub seeds: Vec<String>,

    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum link depth from seed URLs
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Maximum number of concurrent in-flight fetches
    #[serde(rename = "max-concurrent-fetches", default = "default_max_concurrent")]
    pub max_concurrent_fetches: u32,

    /// Minimum time between requests to the same host (milliseconds)
    #[serde(rename = "politeness-delay-ms", default = "default_politeness_ms")]
    pub politeness_delay_ms: u64,

    /// Upper bound on fetched and stored page content, in bytes
    #[serde(rename = "max-content-bytes", default = "default_max_content_bytes")]
    pub max_content_bytes: usize,

    /// Inputs above this size take the cheap sanitization path, in bytes
    #[serde(
        rename = "cheap-sanitize-threshold",
        default = "default_cheap_threshold"
    )]
    pub cheap_sanitize_threshold: usize,

    /// How long in-flight fetches may drain after a stop signal (milliseconds)
    #[serde(rename = "shutdown-grace-ms", default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,

    /// Path extensions that are never fetched
    #[serde(rename = "excluded-extensions", default = "default_excluded_extensions")]
    pub excluded_extensions: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_concurrent_fetches: default_max_concurrent(),
            politeness_delay_ms: default_politeness_ms(),
            max_content_bytes: default_max_content_bytes(),
            cheap_sanitize_threshold: default_cheap_threshold(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
            excluded_extensions: default_excluded_extensions(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: String::new(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    pub fn header_value(&self) -> String {
        if self.contact_url.is_empty() {
            format!("{}/{}", self.crawler_name, self.crawler_version)
        } else {
            format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, self.contact_url
            )
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one JSON file per crawled page
    #[serde(default = "default_output_directory")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

fn default_max_depth() -> u32 {
    3
}

fn default_max_concurrent() -> u32 {
    16
}

fn default_politeness_ms() -> u64 {
    1000
}

fn default_max_content_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_cheap_threshold() -> usize {
    5 * 1024 * 1024
}

fn default_shutdown_grace_ms() -> u64 {
    5000
}

fn default_excluded_extensions() -> Vec<String> {
    DEFAULT_EXCLUDED_EXTENSIONS
        .iter()
        .map(|e| e.to_string())
        .collect()
}

fn default_crawler_name() -> String {
    "burrow".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_output_directory() -> String {
    "./output".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_gets_defaults() {
        let config: Config = toml::from_str(r#"seeds = ["https://example.com/"]"#).unwrap();

        assert_eq!(config.crawler.max_depth, 3);
        assert_eq!(config.crawler.max_concurrent_fetches, 16);
        assert_eq!(config.crawler.politeness_delay_ms, 1000);
        assert_eq!(config.crawler.max_content_bytes, 10 * 1024 * 1024);
        assert_eq!(config.crawler.cheap_sanitize_threshold, 5 * 1024 * 1024);
        assert!(config
            .crawler
            .excluded_extensions
            .contains(&"pdf".to_string()));
        assert_eq!(config.output.directory, "./output");
    }

    #[test]
    fn test_explicit_values_override_defaults() {
        let config: Config = toml::from_str(
            r#"
            seeds = ["https://example.com/"]

            [crawler]
            max-depth = 5
            max-concurrent-fetches = 4
            politeness-delay-ms = 250

            [output]
            directory = "/tmp/crawl"
            "#,
        )
        .unwrap();

        assert_eq!(config.crawler.max_depth, 5);
        assert_eq!(config.crawler.max_concurrent_fetches, 4);
        assert_eq!(config.crawler.politeness_delay_ms, 250);
        assert_eq!(config.output.directory, "/tmp/crawl");
    }

    #[test]
    fn test_user_agent_header_value() {
        let ua = UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "2.0".to_string(),
            contact_url: "https://example.com/bot".to_string(),
        };
        assert_eq!(ua.header_value(), "TestBot/2.0 (+https://example.com/bot)");

        let bare = UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "2.0".to_string(),
            contact_url: String::new(),
        };
        assert_eq!(bare.header_value(), "TestBot/2.0");
    }
}
