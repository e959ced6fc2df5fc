//! Snowball stemming
//!
//! Wraps the `rust-stemmers` Snowball algorithms behind the [`Stemmer`] trait.

use rust_stemmers::Algorithm;
use serde::Deserialize;
use thiserror::Error;

/// Errors produced while stemming a single word
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StemError {
    #[error("Nothing left to stem in '{0}' after normalization")]
    Empty(String),
}

/// Languages supported by the Snowball stemmer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    French,
    German,
    Italian,
    Portuguese,
    Spanish,
    Swedish,
    Norwegian,
    Russian,
}

impl Language {
    fn algorithm(self) -> Algorithm {
        match self {
            Language::English => Algorithm::English,
            Language::French => Algorithm::French,
            Language::German => Algorithm::German,
            Language::Italian => Algorithm::Italian,
            Language::Portuguese => Algorithm::Portuguese,
            Language::Spanish => Algorithm::Spanish,
            Language::Swedish => Algorithm::Swedish,
            Language::Norwegian => Algorithm::Norwegian,
            Language::Russian => Algorithm::Russian,
        }
    }
}

/// Reduces a word to its linguistic stem
pub trait Stemmer: Send + Sync {
    /// Stems `word` for `language`
    ///
    /// When `normalize_punctuation` is set the word is lowercased and stripped of
    /// leading and trailing punctuation before stemming.
    fn stem(
        &self,
        word: &str,
        language: Language,
        normalize_punctuation: bool,
    ) -> Result<String, StemError>;
}

/// Snowball stemmer backed by `rust-stemmers`
#[derive(Debug, Clone, Copy, Default)]
pub struct SnowballStemmer;

impl Stemmer for SnowballStemmer {
    fn stem(
        &self,
        word: &str,
        language: Language,
        normalize_punctuation: bool,
    ) -> Result<String, StemError> {
        let prepared = if normalize_punctuation {
            word.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        } else {
            word.to_string()
        };

        if prepared.is_empty() {
            return Err(StemError::Empty(word.to_string()));
        }

        let stemmer = rust_stemmers::Stemmer::create(language.algorithm());
        Ok(stemmer.stem(&prepared).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_stems() {
        let stemmer = SnowballStemmer;
        assert_eq!(
            stemmer.stem("running", Language::English, true).unwrap(),
            "run"
        );
        assert_eq!(
            stemmer.stem("crawling", Language::English, true).unwrap(),
            "crawl"
        );
    }

    #[test]
    fn test_punctuation_normalized() {
        let stemmer = SnowballStemmer;
        assert_eq!(
            stemmer.stem("\"Running!\"", Language::English, true).unwrap(),
            "run"
        );
    }

    #[test]
    fn test_punctuation_only_word_fails() {
        let stemmer = SnowballStemmer;
        let result = stemmer.stem("--!?", Language::English, true);
        assert_eq!(result, Err(StemError::Empty("--!?".to_string())));
    }

    #[test]
    fn test_empty_word_fails_without_normalization() {
        let stemmer = SnowballStemmer;
        assert!(stemmer.stem("", Language::English, false).is_err());
    }

    #[test]
    fn test_without_normalization_keeps_case() {
        let stemmer = SnowballStemmer;
        let stemmed = stemmer.stem("Running", Language::English, false).unwrap();
        assert!(stemmed.starts_with('R'));
    }
}
