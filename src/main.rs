//! Sift main entry point
//!
//! This is the command-line interface for the Sift crawler.

use anyhow::{anyhow, Context};
use clap::Parser;
use sift_crawl::config::{load_config_with_hash, validate, Config};
use sift_crawl::crawler::{Coordinator, HttpFetcher, Primitives};
use sift_crawl::index::{Index, InMemoryIndex};
use sift_crawl::robots::load_policy;
use sift_crawl::url::{normalize_url, origin_host};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Sift: a polite, bounded same-host crawler
///
/// Sift crawls every page reachable from a seed URL on the seed's host,
/// respecting robots.txt, and builds a searchable index of the stemmed
/// page text.
#[derive(Parser, Debug)]
#[command(name = "sift")]
#[command(version)]
#[command(about = "A polite same-host crawler and indexer", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(value_name = "SEED_URL")]
    seed: String,

    /// Path to TOML configuration file (defaults are used if omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Search the finished index; may be given several times
    #[arg(long = "query", value_name = "TEXT")]
    queries: Vec<String>,

    /// Validate config and show the robots policy without crawling
    #[arg(long, conflicts_with = "queries")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            let config = Config::default();
            validate(&config)?;
            config
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, &cli.seed).await
    } else {
        handle_crawl(config, &cli.seed, &cli.queries).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sift_crawl=info,warn"),
            1 => EnvFilter::new("sift_crawl=debug,info"),
            2 => EnvFilter::new("sift_crawl=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the politeness policy
async fn handle_dry_run(config: &Config, seed: &str) -> anyhow::Result<()> {
    println!("=== Sift Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Fetch workers: {}", config.crawler.fetch_workers);
    println!("  Index workers: {}", config.crawler.index_workers);
    println!("  Queue capacity: {}", config.crawler.queue_capacity);
    println!(
        "  Default crawl delay: {}s",
        config.crawler.default_crawl_delay
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  Stem language: {:?}", config.crawler.stem_language);
    println!(
        "  Normalize punctuation: {}",
        config.crawler.normalize_punctuation
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    let seed_url = normalize_url(seed).with_context(|| format!("Invalid seed URL {}", seed))?;
    let host = origin_host(&seed_url).ok_or_else(|| anyhow!("Seed URL {} has no host", seed))?;
    let fetcher = HttpFetcher::from_config(&config.user_agent, &config.crawler)?;
    let policy = load_policy(&fetcher, &host, config.crawler.default_crawl_delay).await;

    println!("\nPoliteness policy for {}:", host);
    println!("  Crawl delay: {}s", policy.crawl_delay_seconds());
    println!(
        "  Disallow patterns ({}):",
        policy.disallowed_patterns().len()
    );
    for pattern in policy.disallowed_patterns() {
        println!("    - {}", pattern);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling at {}", seed_url);
    if !policy.is_allowed(seed_url.as_str()) {
        println!("! The seed itself is disallowed by robots.txt");
    }

    Ok(())
}

/// Handles the main crawl operation, then answers queries against the index
async fn handle_crawl(config: Config, seed: &str, queries: &[String]) -> anyhow::Result<()> {
    let index = Arc::new(InMemoryIndex::with_language(config.crawler.stem_language));
    let primitives = Primitives::http(&config)?;
    let coordinator = Coordinator::new(config, primitives)?;

    let report = match coordinator.run(seed, index.clone()).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };
    println!("{}", report);

    for query in queries {
        let hits = index.search(query);
        println!("\nResults for \"{}\" ({}):", query, hits.len());
        for (rank, hit) in hits.iter().take(10).enumerate() {
            println!("  {:>2}. {:.4}  {}", rank + 1, hit.score, hit.url);
        }
    }

    Ok(())
}
