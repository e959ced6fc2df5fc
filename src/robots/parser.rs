//! Robots.txt parser implementation
//!
//! A line-oriented state machine that only understands `User-agent`,
//! `Disallow` and `Crawl-delay`. Disallow rules are kept for the `*` group
//! alone, while any `Crawl-delay` line applies globally.

use regex::Regex;
use std::collections::BTreeSet;
use std::time::Duration;

/// Crawl delay used when robots.txt is missing or does not set one
pub const DEFAULT_CRAWL_DELAY: f64 = 0.1;

/// Politeness rules derived from a host's robots.txt
///
/// Immutable once built; fetch workers share it without locking.
#[derive(Debug, Clone)]
pub struct PolitenessPolicy {
    crawl_delay_seconds: f64,
    disallowed_patterns: BTreeSet<String>,
    matchers: Vec<Regex>,
}

impl Default for PolitenessPolicy {
    fn default() -> Self {
        Self::allow_all(DEFAULT_CRAWL_DELAY)
    }
}

impl PolitenessPolicy {
    /// Creates a policy with no disallow rules and the given delay
    pub fn allow_all(crawl_delay_seconds: f64) -> Self {
        Self {
            crawl_delay_seconds,
            disallowed_patterns: BTreeSet::new(),
            matchers: Vec::new(),
        }
    }

    /// Builds a policy from a delay and disallow patterns
    ///
    /// Patterns are regular expressions searched anywhere in the URL.
    /// Patterns that do not compile are logged and skipped.
    pub fn new<I, S>(crawl_delay_seconds: f64, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let disallowed_patterns: BTreeSet<String> = patterns.into_iter().map(Into::into).collect();
        let matchers = disallowed_patterns
            .iter()
            .filter_map(|pattern| match Regex::new(pattern) {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::warn!("Ignoring invalid disallow pattern {}: {}", pattern, e);
                    None
                }
            })
            .collect();

        Self {
            crawl_delay_seconds,
            disallowed_patterns,
            matchers,
        }
    }

    /// Seconds to wait after each allowed fetch
    pub fn crawl_delay_seconds(&self) -> f64 {
        self.crawl_delay_seconds
    }

    /// The crawl delay as a sleepable duration
    pub fn crawl_delay(&self) -> Duration {
        Duration::from_secs_f64(self.crawl_delay_seconds.max(0.0))
    }

    /// The disallow patterns in regex form
    pub fn disallowed_patterns(&self) -> &BTreeSet<String> {
        &self.disallowed_patterns
    }

    /// Checks a URL against every disallow pattern
    ///
    /// # Returns
    ///
    /// * `false` - If any pattern matches somewhere in the URL
    /// * `true` - Otherwise
    pub fn is_allowed(&self, url: &str) -> bool {
        !self.matchers.iter().any(|re| re.is_match(url))
    }
}

/// Group state while scanning robots.txt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    Ignoring,
    Wildcard,
}

/// Parses robots.txt content into a politeness policy
///
/// - `User-agent: *` enters the wildcard group; any other agent leaves it
/// - `Disallow:` inside the wildcard group adds a pattern, `*` becomes `.*`
/// - `Crawl-delay:` in any group overwrites the delay; the last one wins
/// - a malformed delay is logged and the previous value kept
///
/// Directive names are case-insensitive and `#` starts a comment.
pub fn parse_robots(content: &str, default_delay: f64) -> PolitenessPolicy {
    let mut group = Group::Ignoring;
    let mut crawl_delay = default_delay;
    let mut patterns = Vec::new();

    for line in content.lines() {
        let line = line.split('#').next().unwrap_or_default().trim();

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();

        match key.trim().to_ascii_lowercase().as_str() {
            "user-agent" => {
                group = if value == "*" {
                    Group::Wildcard
                } else {
                    Group::Ignoring
                };
            }
            "disallow" if group == Group::Wildcard => {
                // An empty Disallow means "allow everything"
                if !value.is_empty() {
                    patterns.push(path_to_pattern(value));
                }
            }
            "crawl-delay" => match value.parse::<f64>() {
                Ok(delay) if delay.is_finite() && delay >= 0.0 => crawl_delay = delay,
                _ => tracing::warn!("robots.txt crawl delay incorrectly formatted: {:?}", value),
            },
            _ => {}
        }
    }

    PolitenessPolicy::new(crawl_delay, patterns)
}

/// Converts a robots.txt path into a regex, rewriting `*` as `.*`
fn path_to_pattern(path: &str) -> String {
    path.split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*")
}
