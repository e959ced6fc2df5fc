use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use url::Url;

use crate::url::origin_host;

/// The set of URLs already scheduled during one crawl run
///
/// A URL is inserted at most once and never removed. Every lookup and
/// mutation goes through a single lock, so a check followed by an insert
/// is one critical section.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    /// Creates an empty visited set
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a visited set with the seed URL already marked
    pub fn with_seed(seed: &Url) -> Self {
        let set = Self::new();
        set.lock().insert(seed.to_string());
        set
    }

    /// Claims a discovered link for fetching
    ///
    /// Under the lock, the link must be on `origin` and not yet visited; if both
    /// hold it is marked visited and `true` is returned. Callers enqueue the link
    /// only on `true`, so each same-host URL is scheduled at most once.
    pub fn claim(&self, link: &Url, origin: &str) -> bool {
        let mut urls = self.lock();
        let same_host = origin_host(link).as_deref() == Some(origin);
        same_host && urls.insert(link.to_string())
    }

    /// Returns true if the URL has been marked visited
    pub fn contains(&self, url: &str) -> bool {
        self.lock().contains(url)
    }

    /// Number of URLs marked visited
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing has been marked visited
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        // The set stays consistent even if a holder panicked: inserts are atomic
        self.urls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
