//! Crawler coordinator - main crawl orchestration logic
//!
//! This module wires the pipeline together for one crawl run:
//! - Validating the base URL and resolving the origin host
//! - Loading the politeness policy from robots.txt
//! - Creating the two bounded queues and seeding the download queue
//! - Spawning the fetch and index worker pools
//! - Detecting termination, shutting the pools down and reporting

use crate::config::{validate, Config};
use crate::crawler::fetch_stage::{run_fetch_worker, FetchContext};
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::index_stage::{run_index_worker, IndexContext};
use crate::crawler::parser::{Extractor, HtmlExtractor};
use crate::crawler::pending::PendingWork;
use crate::crawler::queue::WorkQueue;
use crate::crawler::stats::{CrawlReport, FetchStats, IndexStats};
use crate::index::Index;
use crate::robots::load_policy;
use crate::state::VisitedSet;
use crate::text::{SnowballStemmer, Stemmer};
use crate::url::{origin_host, LinkCleaner, UrlCleaner};
use crate::{CrawlError, UrlError};
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// The pluggable collaborators a crawl runs on
#[derive(Clone)]
pub struct Primitives {
    pub fetcher: Arc<dyn Fetcher>,
    pub extractor: Arc<dyn Extractor>,
    pub cleaner: Arc<dyn LinkCleaner>,
    pub stemmer: Arc<dyn Stemmer>,
}

impl Primitives {
    /// Default primitives over a reqwest client built from `config`
    pub fn http(config: &Config) -> Result<Self, reqwest::Error> {
        let fetcher = HttpFetcher::from_config(&config.user_agent, &config.crawler)?;
        Ok(Self::with_fetcher(Arc::new(fetcher)))
    }

    /// Default extraction, cleaning and stemming over a custom fetcher
    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            extractor: Arc::new(HtmlExtractor),
            cleaner: Arc::new(UrlCleaner),
            stemmer: Arc::new(SnowballStemmer),
        }
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    primitives: Primitives,
}

/// The resolved starting point of a crawl
struct Seed {
    /// The base URL as given, used to resolve relative links
    base_url: Url,
    /// The canonical form of the base URL, the first task
    canonical: Url,
    /// `host[:port]` every followed link must share
    origin: String,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `primitives` - Fetch, extract, clean and stem implementations
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Configuration is valid
    /// * `Err(CrawlError)` - Configuration failed validation
    pub fn new(config: Config, primitives: Primitives) -> crate::Result<Self> {
        validate(&config)?;
        Ok(Self {
            config: Arc::new(config),
            primitives,
        })
    }

    /// Crawls every reachable same-host page under `base_url`
    ///
    /// Returns once no task is queued or in progress anywhere in the pipeline.
    /// Sites that keep producing new same-host links are crawled indefinitely.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The seed URL; must parse and have a host
    /// * `index` - Receives `(url, stemmed words)` for every fetched page
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Crawl finished
    /// * `Err(CrawlError)` - The base URL was invalid or a worker panicked
    pub async fn run(&self, base_url: &str, index: Arc<dyn Index>) -> crate::Result<CrawlReport> {
        let started = Instant::now();
        let crawler = &self.config.crawler;
        let seed = self.resolve_seed(base_url)?;
        tracing::info!("Starting crawl of {} (host {})", seed.canonical, seed.origin);

        let policy = Arc::new(
            load_policy(
                self.primitives.fetcher.as_ref(),
                &seed.origin,
                crawler.default_crawl_delay,
            )
            .await,
        );
        let visited = Arc::new(VisitedSet::with_seed(&seed.canonical));
        let pending = Arc::new(PendingWork::new());
        let download: WorkQueue<Url> = WorkQueue::bounded(crawler.queue_capacity);
        let extract = WorkQueue::bounded(crawler.queue_capacity);

        pending.add();
        if download.send(seed.canonical.clone()).await.is_err() {
            pending.done();
        }

        let fetch_ctx = FetchContext {
            download: download.clone(),
            extract: extract.clone(),
            policy,
            fetcher: Arc::clone(&self.primitives.fetcher),
            pending: Arc::clone(&pending),
        };
        let fetch_workers: Vec<_> = (0..crawler.fetch_workers)
            .map(|id| tokio::spawn(run_fetch_worker(id, fetch_ctx.clone())))
            .collect();

        let index_ctx = IndexContext {
            base_url: seed.base_url,
            origin: seed.origin,
            language: crawler.stem_language,
            normalize_punctuation: crawler.normalize_punctuation,
            extract: extract.clone(),
            download: download.clone(),
            extractor: Arc::clone(&self.primitives.extractor),
            cleaner: Arc::clone(&self.primitives.cleaner),
            stemmer: Arc::clone(&self.primitives.stemmer),
            visited: Arc::clone(&visited),
            index,
            pending: Arc::clone(&pending),
        };
        let index_workers: Vec<_> = (0..crawler.index_workers)
            .map(|id| tokio::spawn(run_index_worker(id, index_ctx.clone())))
            .collect();

        pending.wait_idle().await;
        tracing::info!("No work left, stopping workers");
        download.close();
        extract.close();

        let mut fetch_stats = FetchStats::default();
        for worker in fetch_workers {
            fetch_stats.merge(&worker.await?);
        }
        let mut index_stats = IndexStats::default();
        for worker in index_workers {
            index_stats.merge(&worker.await?);
        }

        let report = CrawlReport::new(
            seed.canonical.to_string(),
            &fetch_stats,
            &index_stats,
            visited.len(),
            started.elapsed(),
        );
        tracing::info!(
            "Crawl complete: {} pages indexed, {} URLs visited in {:.2}s",
            report.pages_indexed,
            report.urls_visited,
            report.elapsed.as_secs_f64()
        );
        Ok(report)
    }

    fn resolve_seed(&self, base_url: &str) -> crate::Result<Seed> {
        let invalid = |source: UrlError| CrawlError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        };

        let parsed = Url::parse(base_url).map_err(|e| invalid(UrlError::Parse(e.to_string())))?;
        if parsed.host_str().is_none() {
            return Err(invalid(UrlError::MissingHost));
        }

        let canonical = self
            .primitives
            .cleaner
            .clean(&parsed, &[parsed.to_string()])
            .into_iter()
            .next()
            .ok_or_else(|| invalid(UrlError::InvalidScheme(parsed.scheme().to_string())))?;
        let origin = origin_host(&canonical).ok_or_else(|| invalid(UrlError::MissingHost))?;

        Ok(Seed {
            base_url: parsed,
            canonical,
            origin,
        })
    }
}

/// Crawls `base_url` with the default configuration and HTTP primitives
///
/// # Example
///
/// ```no_run
/// use sift_crawl::{crawl, InMemoryIndex};
/// use std::sync::Arc;
///
/// # async fn run() -> sift_crawl::Result<()> {
/// let index = Arc::new(InMemoryIndex::new());
/// let report = crawl("https://example.com/", index.clone()).await?;
/// println!("{}", report);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(base_url: &str, index: Arc<dyn Index>) -> crate::Result<CrawlReport> {
    let config = Config::default();
    let primitives = Primitives::http(&config)?;
    Coordinator::new(config, primitives)?
        .run(base_url, index)
        .await
}
