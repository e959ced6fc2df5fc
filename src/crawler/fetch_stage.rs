//! Fetch workers
//!
//! A fetch worker takes URLs from the download queue, drops the ones robots.txt
//! disallows, downloads the rest and hands the bytes to the extraction stage.
//! After every download attempt, failed or not, the worker sleeps for the
//! crawl delay.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::pending::PendingWork;
use crate::crawler::queue::WorkQueue;
use crate::crawler::stats::FetchStats;
use crate::robots::PolitenessPolicy;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// A downloaded page waiting for extraction
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: Url,
    pub content: Vec<u8>,
}

/// Everything a fetch worker shares with its siblings
#[derive(Clone)]
pub struct FetchContext {
    pub download: WorkQueue<Url>,
    pub extract: WorkQueue<FetchedPage>,
    pub policy: Arc<PolitenessPolicy>,
    pub fetcher: Arc<dyn Fetcher>,
    pub pending: Arc<PendingWork>,
}

/// Runs one fetch worker until the download queue is closed and drained
///
/// # Arguments
///
/// * `id` - Worker number, used in log lines only
/// * `ctx` - Queues, policy and primitives shared by the pool
///
/// # Returns
///
/// The worker's counters and timing
pub async fn run_fetch_worker(id: usize, ctx: FetchContext) -> FetchStats {
    let mut stats = FetchStats::default();
    tracing::debug!("Fetch worker {} started", id);

    while let Some(url) = ctx.download.recv().await {
        let started = Instant::now();
        let contacted = fetch_one(&ctx, &url, &mut stats).await;
        stats.timing.record(started.elapsed());

        if contacted {
            tokio::time::sleep(ctx.policy.crawl_delay()).await;
        }
    }

    tracing::debug!("Fetch worker {} stopped", id);
    stats.timing.log_mean("Download");
    stats
}

/// Processes one download task, returning true if a request was sent to the server
async fn fetch_one(ctx: &FetchContext, url: &Url, stats: &mut FetchStats) -> bool {
    if !ctx.policy.is_allowed(url.as_str()) {
        tracing::debug!("Skipping {} (disallowed by robots.txt)", url);
        stats.disallowed += 1;
        ctx.pending.done();
        return false;
    }

    let content = match ctx.fetcher.download(url).await {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Failed to fetch {}: {}", url, e);
            stats.failed += 1;
            ctx.pending.done();
            return true;
        }
    };

    tracing::debug!("Fetched {} ({} bytes)", url, content.len());
    stats.fetched += 1;

    let page = FetchedPage {
        url: url.clone(),
        content,
    };
    if ctx.extract.send(page).await.is_err() {
        tracing::warn!("Extraction queue closed, dropping {}", url);
        ctx.pending.done();
    }

    true
}
