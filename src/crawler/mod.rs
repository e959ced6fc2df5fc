//! Crawler module for web page fetching and processing
//!
//! This module contains the crawl pipeline, including:
//! - The fetch and extract primitives and their default implementations
//! - Bounded work queues between the two worker stages
//! - Fetch workers that honour the politeness policy
//! - Index workers that stem words, follow links and feed the index
//! - Termination detection and overall crawl coordination

mod coordinator;
mod fetch_stage;
mod fetcher;
mod index_stage;
mod parser;
mod pending;
mod queue;
mod stats;

pub use coordinator::{crawl, Coordinator, Primitives};
pub use fetch_stage::{run_fetch_worker, FetchContext, FetchedPage};
pub use fetcher::{build_http_client, FetchError, Fetcher, HttpFetcher};
pub use index_stage::{run_index_worker, IndexContext};
pub use parser::{Extracted, Extractor, HtmlExtractor};
pub use pending::PendingWork;
pub use queue::{QueueClosed, WorkQueue};
pub use stats::{CrawlReport, FetchStats, IndexStats, WorkerTiming};
