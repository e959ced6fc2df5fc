//! In-memory inverted index with TF-IDF ranking

use crate::index::{Hit, Index};
use crate::text::{Language, SnowballStemmer, Stemmer};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Postings {
    /// url -> (term -> occurrences)
    documents: HashMap<String, HashMap<String, usize>>,
    /// term -> urls containing it
    terms: HashMap<String, HashSet<String>>,
    /// url -> number of words ingested
    lengths: HashMap<String, usize>,
}

impl Postings {
    fn remove(&mut self, url: &str) {
        let Some(counts) = self.documents.remove(url) else {
            return;
        };
        for term in counts.keys() {
            if let Some(urls) = self.terms.get_mut(term) {
                urls.remove(url);
                if urls.is_empty() {
                    self.terms.remove(term);
                }
            }
        }
        self.lengths.remove(url);
    }
}

/// Thread-safe inverted index over stemmed words
///
/// Re-indexing a URL replaces its previous words. Queries are stemmed with the
/// same stemmer and language the crawl used, so `"crawling"` finds pages that
/// said `"crawled"`.
///
/// # Scoring
///
/// For each distinct query term present on a page the score gains
/// `tf * idf`, where `tf = occurrences / words on page` and
/// `idf = ln(1 + pages / pages containing term)`.
pub struct InMemoryIndex {
    postings: RwLock<Postings>,
    stemmer: Arc<dyn Stemmer>,
    language: Language,
}

impl Default for InMemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryIndex {
    /// Creates an empty index that stems English queries
    pub fn new() -> Self {
        Self::with_language(Language::English)
    }

    /// Creates an empty index that stems queries in `language`
    pub fn with_language(language: Language) -> Self {
        Self::with_stemmer(Arc::new(SnowballStemmer), language)
    }

    /// Creates an empty index with a custom query stemmer
    pub fn with_stemmer(stemmer: Arc<dyn Stemmer>, language: Language) -> Self {
        Self {
            postings: RwLock::new(Postings::default()),
            stemmer,
            language,
        }
    }

    /// Number of indexed pages
    pub fn len(&self) -> usize {
        self.read().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `url` has been indexed, even with no words
    pub fn contains(&self, url: &str) -> bool {
        self.read().documents.contains_key(url)
    }

    /// Indexed URLs in sorted order
    pub fn urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.read().documents.keys().cloned().collect();
        urls.sort();
        urls
    }

    fn read(&self) -> RwLockReadGuard<'_, Postings> {
        self.postings.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Postings> {
        self.postings.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn query_terms(&self, query: &str) -> HashSet<String> {
        query
            .split_whitespace()
            .filter_map(|word| match self.stemmer.stem(word, self.language, true) {
                Ok(stem) => Some(stem),
                Err(e) => {
                    tracing::trace!("Ignoring query word: {}", e);
                    None
                }
            })
            .collect()
    }
}

impl Index for InMemoryIndex {
    fn add_to_index(&self, url: &str, words: Vec<String>) {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let length = words.len();
        for word in words {
            *counts.entry(word).or_default() += 1;
        }

        let mut postings = self.write();
        postings.remove(url);
        for term in counts.keys() {
            postings
                .terms
                .entry(term.clone())
                .or_default()
                .insert(url.to_string());
        }
        postings.lengths.insert(url.to_string(), length);
        postings.documents.insert(url.to_string(), counts);
    }

    fn search(&self, query: &str) -> Vec<Hit> {
        let terms = self.query_terms(query);
        let postings = self.read();
        let total = postings.documents.len() as f64;

        let mut scores: HashMap<&str, f64> = HashMap::new();
        for term in &terms {
            let Some(urls) = postings.terms.get(term) else {
                continue;
            };
            let idf = (1.0 + total / urls.len() as f64).ln();

            for url in urls {
                let length = postings.lengths.get(url).copied().unwrap_or(0);
                let occurrences = postings
                    .documents
                    .get(url)
                    .and_then(|counts| counts.get(term))
                    .copied()
                    .unwrap_or(0);
                if length == 0 || occurrences == 0 {
                    continue;
                }
                let tf = occurrences as f64 / length as f64;
                *scores.entry(url.as_str()).or_default() += tf * idf;
            }
        }

        let mut hits: Vec<Hit> = scores
            .into_iter()
            .filter(|(_, score)| *score > 0.0)
            .map(|(url, score)| Hit {
                url: url.to_string(),
                score,
            })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.url.cmp(&b.url)));
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_empty_index_finds_nothing() {
        let index = InMemoryIndex::new();
        assert!(index.search("anything").is_empty());
        assert!(index.is_empty());
    }

    #[test]
    fn test_empty_page_is_recorded() {
        let index = InMemoryIndex::new();
        index.add_to_index("http://x.test/a", Vec::new());
        assert!(index.contains("http://x.test/a"));
        assert!(index.search("crawl").is_empty());
    }

    #[test]
    fn test_query_is_stemmed() {
        let index = InMemoryIndex::new();
        index.add_to_index("http://x.test/a", words("crawl the web"));
        let hits = index.search("Crawling");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].url, "http://x.test/a");
    }

    #[test]
    fn test_ranking_by_term_frequency() {
        let index = InMemoryIndex::new();
        index.add_to_index("http://x.test/a", words("rust crab crab crab"));
        index.add_to_index("http://x.test/b", words("rust crab tree tree"));
        index.add_to_index("http://x.test/c", words("tree leaf"));

        let hits = index.search("crab");
        let urls: Vec<&str> = hits.iter().map(|h| h.url.as_str()).collect();
        assert_eq!(urls, vec!["http://x.test/a", "http://x.test/b"]);
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn test_ties_sorted_by_url() {
        let index = InMemoryIndex::new();
        index.add_to_index("http://x.test/b", words("same"));
        index.add_to_index("http://x.test/a", words("same"));
        let urls: Vec<String> = index.search("same").into_iter().map(|h| h.url).collect();
        assert_eq!(urls, vec!["http://x.test/a", "http://x.test/b"]);
    }

    #[test]
    fn test_reindex_replaces_words() {
        let index = InMemoryIndex::new();
        index.add_to_index("http://x.test/a", words("old"));
        index.add_to_index("http://x.test/a", words("new"));
        assert!(index.search("old").is_empty());
        assert_eq!(index.search("new").len(), 1);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_punctuation_only_query() {
        let index = InMemoryIndex::new();
        index.add_to_index("http://x.test/a", words("word"));
        assert!(index.search("!!! ...").is_empty());
    }
}
