//! Extraction and index workers
//!
//! An index worker takes downloaded pages from the extraction queue and:
//! - extracts words and raw links
//! - stems every word, dropping the ones the stemmer rejects
//! - cleans links against the crawl's base URL and enqueues unseen same-host ones
//! - hands the stemmed words to the index
//!
//! New links are registered as pending before the page itself is released,
//! so the crawl can never look idle while a page still has children to add.
//! An index worker never blocks on a full download queue while it holds a page.

use crate::crawler::fetch_stage::FetchedPage;
use crate::crawler::parser::Extractor;
use crate::crawler::pending::PendingWork;
use crate::crawler::queue::WorkQueue;
use crate::crawler::stats::IndexStats;
use crate::index::Index;
use crate::state::VisitedSet;
use crate::text::{Language, Stemmer};
use crate::url::LinkCleaner;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::error::TrySendError;
use url::Url;

/// Everything an index worker shares with its siblings
#[derive(Clone)]
pub struct IndexContext {
    pub base_url: Url,
    pub origin: String,
    pub language: Language,
    pub normalize_punctuation: bool,
    pub extract: WorkQueue<FetchedPage>,
    pub download: WorkQueue<Url>,
    pub extractor: Arc<dyn Extractor>,
    pub cleaner: Arc<dyn LinkCleaner>,
    pub stemmer: Arc<dyn Stemmer>,
    pub visited: Arc<VisitedSet>,
    pub index: Arc<dyn Index>,
    pub pending: Arc<PendingWork>,
}

/// Runs one index worker until the extraction queue is closed and drained
///
/// Links that do not fit in the download queue wait in a per-worker overflow
/// instead of blocking the worker. While the overflow is non-empty the worker
/// moves it into the download queue as slots free up and keeps taking pages,
/// so a full download queue can never stall a fetch worker waiting on a full
/// extraction queue.
///
/// # Arguments
///
/// * `id` - Worker number, used in log lines only
/// * `ctx` - Queues, shared state and primitives shared by the pool
///
/// # Returns
///
/// The worker's counters and timing
pub async fn run_index_worker(id: usize, ctx: IndexContext) -> IndexStats {
    let mut stats = IndexStats::default();
    let mut overflow: VecDeque<Url> = VecDeque::new();
    tracing::debug!("Index worker {} started", id);

    loop {
        let next = if overflow.is_empty() {
            ctx.extract.recv().await
        } else {
            tokio::select! {
                slot = ctx.download.reserve() => {
                    match (slot, overflow.pop_front()) {
                        (Ok(permit), Some(link)) => {
                            permit.send(link);
                            stats.links_enqueued += 1;
                        }
                        (Err(_), Some(_)) => {
                            tracing::warn!("Download queue closed, dropping deferred link");
                            ctx.pending.done();
                        }
                        (_, None) => {}
                    }
                    continue;
                }
                page = ctx.extract.recv() => page,
            }
        };

        let Some(page) = next else {
            break;
        };
        let started = Instant::now();
        index_one(&ctx, page, &mut overflow, &mut stats);
        stats.timing.record(started.elapsed());
    }

    // Overflowed links are pending, so the queues are only closed once it is empty
    for link in overflow.drain(..) {
        tracing::warn!("Dropping deferred link {} at shutdown", link);
        ctx.pending.done();
    }

    tracing::debug!("Index worker {} stopped", id);
    stats.timing.log_mean("Index");
    stats
}

fn index_one(
    ctx: &IndexContext,
    page: FetchedPage,
    overflow: &mut VecDeque<Url>,
    stats: &mut IndexStats,
) {
    let extracted = ctx.extractor.extract(&page.content);

    let mut words = Vec::with_capacity(extracted.words.len());
    for word in &extracted.words {
        match ctx
            .stemmer
            .stem(word, ctx.language, ctx.normalize_punctuation)
        {
            Ok(stem) => words.push(stem),
            Err(e) => {
                tracing::debug!("Dropping word on {}: {}", page.url, e);
                stats.stem_failures += 1;
            }
        }
    }

    for link in ctx.cleaner.clean(&ctx.base_url, &extracted.hrefs) {
        if !ctx.visited.claim(&link, &ctx.origin) {
            continue;
        }

        ctx.pending.add();
        tracing::debug!("Enqueuing {}", link);
        if !overflow.is_empty() {
            overflow.push_back(link);
            continue;
        }
        match ctx.download.try_send(link) {
            Ok(()) => stats.links_enqueued += 1,
            Err(TrySendError::Full(link)) => overflow.push_back(link),
            Err(TrySendError::Closed(_)) => {
                tracing::warn!("Download queue closed while enqueuing links from {}", page.url);
                ctx.pending.done();
            }
        }
    }

    ctx.index.add_to_index(page.url.as_str(), words);
    stats.indexed += 1;
    tracing::info!("Indexed {}", page.url);

    ctx.pending.done();
}
