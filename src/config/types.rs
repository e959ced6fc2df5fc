use crate::text::Language;
use serde::Deserialize;

/// Main configuration structure for Sift
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of fetch workers pulling from the download queue
    #[serde(rename = "fetch-workers")]
    pub fetch_workers: usize,

    /// Number of extraction/index workers pulling from the extract queue
    #[serde(rename = "index-workers")]
    pub index_workers: usize,

    /// Capacity of each of the two bounded queues
    #[serde(rename = "queue-capacity")]
    pub queue_capacity: usize,

    /// Crawl delay in seconds used when robots.txt does not set one
    #[serde(rename = "default-crawl-delay")]
    pub default_crawl_delay: f64,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Language passed to the stemmer
    #[serde(rename = "stem-language")]
    pub stem_language: Language,

    /// Whether the stemmer lowercases and strips punctuation first
    #[serde(rename = "normalize-punctuation")]
    pub normalize_punctuation: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            fetch_workers: 1,
            index_workers: 1,
            queue_capacity: 1000,
            default_crawl_delay: 0.1,
            request_timeout: 30,
            stem_language: Language::English,
            normalize_punctuation: true,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "Sift".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/sift".to_string(),
            contact_email: "crawler@example.com".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}
