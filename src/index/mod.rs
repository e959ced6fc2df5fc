//! Search index module
//!
//! The crawler only ever calls [`Index::add_to_index`]; [`Index::search`] is
//! there for whoever consumes the finished index. [`InMemoryIndex`] is the
//! bundled implementation.

mod memory;

pub use memory::InMemoryIndex;

/// A ranked search result
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub url: String,
    pub score: f64,
}

/// Receives indexed pages and answers queries over them
///
/// Implementations are shared by every index worker, so ingest takes `&self`
/// and must synchronise internally.
pub trait Index: Send + Sync {
    /// Adds a page's stemmed words to the index
    ///
    /// Called once per fetched page, possibly with an empty word list.
    fn add_to_index(&self, url: &str, words: Vec<String>);

    /// Returns pages matching `query`, best match first
    fn search(&self, query: &str) -> Vec<Hit>;
}
