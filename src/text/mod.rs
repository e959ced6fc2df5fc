//! Text processing for indexing
//!
//! Stemming of extracted page words before they reach the index.

mod stemmer;

pub use stemmer::{Language, SnowballStemmer, StemError, Stemmer};
