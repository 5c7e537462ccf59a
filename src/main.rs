//! Burrow main entry point
//!
//! Command-line interface for the Burrow website crawler.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Burrow: a bounded, domain-scoped website crawler
///
/// Burrow crawls a site outward from its seed URLs, sanitizes and extracts
/// page content, and writes one JSON record per page. Crawling stays on
/// the seed domains and within the configured depth.
#[derive(Parser, Debug)]
#[command(name = "burrow")]
#[command(version)]
#[command(about = "A bounded, domain-scoped website crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match burrow::config::load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, &config_hash)?;
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("burrow=info,warn"),
            1 => EnvFilter::new("burrow=debug,info"),
            2 => EnvFilter::new("burrow=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the crawl scope
fn handle_dry_run(config: &burrow::Config, config_hash: &str) -> anyhow::Result<()> {
    let seeds = config
        .seeds
        .iter()
        .map(|s| burrow::normalize_url(s))
        .collect::<Result<Vec<_>, _>>()?;
    let scope = burrow::CrawlScope::from_config(config, &seeds)?;

    println!("=== Burrow Dry Run ===\n");

    println!("Config hash: {}", config_hash);

    println!("\nCrawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );
    println!(
        "  Politeness delay: {}ms",
        config.crawler.politeness_delay_ms
    );
    println!("  Max content bytes: {}", config.crawler.max_content_bytes);
    println!(
        "  Cheap sanitize threshold: {}",
        config.crawler.cheap_sanitize_threshold
    );

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput directory: {}", config.output.directory);

    println!("\nSeed URLs ({}):", seeds.len());
    for seed in &seeds {
        println!("  - {}", seed);
    }

    println!("\nAllowed domains ({}):", scope.allowed_domains.len());
    for domain in &scope.allowed_domains {
        println!("  - {}", domain);
    }

    println!(
        "\nExcluded extensions: {}",
        scope
            .excluded_extensions
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    );

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: burrow::Config) -> anyhow::Result<()> {
    tracing::info!(
        seeds = config.seeds.len(),
        output = %config.output.directory,
        "starting crawl"
    );

    match burrow::crawler::run_crawl(config).await {
        Ok(report) => {
            report.print_summary();
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
