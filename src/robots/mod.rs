//! Robots.txt handling module
//!
//! This module loads a host's robots.txt through the fetch primitive and turns
//! it into a [`PolitenessPolicy`]: a crawl delay plus disallow patterns.

mod parser;

pub use parser::{parse_robots, PolitenessPolicy, DEFAULT_CRAWL_DELAY};

use crate::crawler::Fetcher;
use url::Url;

/// Loads the politeness policy for a host
///
/// Fetches `http://<host>/robots.txt`. A missing or unreachable robots file is
/// not an error: it yields a policy with `default_delay` and no disallow rules.
///
/// # Arguments
///
/// * `fetcher` - The fetch primitive
/// * `host` - The origin host, optionally with a port (e.g. `example.com:8080`)
/// * `default_delay` - Delay in seconds used unless robots.txt sets one
pub async fn load_policy(fetcher: &dyn Fetcher, host: &str, default_delay: f64) -> PolitenessPolicy {
    let robots_url = match Url::parse(&format!("http://{}/robots.txt", host)) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Cannot build robots.txt URL for {}: {}", host, e);
            return PolitenessPolicy::allow_all(default_delay);
        }
    };

    match fetcher.download(&robots_url).await {
        Ok(body) => {
            let policy = parse_robots(&String::from_utf8_lossy(&body), default_delay);
            tracing::info!(
                "Loaded robots.txt for {}: crawl delay {}s, {} disallow rules",
                host,
                policy.crawl_delay_seconds(),
                policy.disallowed_patterns().len()
            );
            policy
        }
        Err(e) => {
            tracing::info!(
                "No robots file found for {} ({}), continuing standard crawling",
                host,
                e
            );
            PolitenessPolicy::allow_all(default_delay)
        }
    }
}
