//! Configuration module for Sift
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section has defaults, so an empty file (or `Config::default()`) is a
//! valid configuration.
//!
//! # Example
//!
//! ```no_run
//! use sift_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sift.toml")).unwrap();
//! println!("Queue capacity: {}", config.crawler.queue_capacity);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{Config, CrawlerConfig, UserAgentConfig};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
