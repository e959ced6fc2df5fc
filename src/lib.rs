//! Sift: a polite, bounded same-host crawler
//!
//! This crate crawls a single site starting from a seed URL. Pages flow through
//! a fetch stage and an extraction/index stage joined by bounded queues, links
//! are deduplicated through a shared visited set, robots.txt disallow rules and
//! crawl delay are honoured, and stemmed page text is fed to a pluggable index.

pub mod config;
pub mod crawler;
pub mod index;
pub mod robots;
pub mod state;
pub mod text;
pub mod url;

use thiserror::Error;

/// Main error type for Sift operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl { url: String, source: UrlError },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Sift operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Coordinator, CrawlReport, Primitives};
pub use index::{Hit, InMemoryIndex, Index};
pub use robots::PolitenessPolicy;
pub use state::VisitedSet;
