//! HTML parser for extracting words and links
//!
//! This module provides the extraction primitive: given raw page bytes it
//! returns the visible words and the raw `href` values found on the page.
//! Resolving and filtering hrefs is left to the link cleaner.

use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose text is never visible page content
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Words and raw hyperlink references found on a page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    /// Visible words, in document order
    pub words: Vec<String>,

    /// Raw `href` attribute values, in document order
    pub hrefs: Vec<String>,
}

/// Extracts words and hyperlink references from raw page content
pub trait Extractor: Send + Sync {
    fn extract(&self, content: &[u8]) -> Extracted;
}

/// Extractor backed by the `scraper` HTML parser
///
/// # Link Extraction Rules
///
/// **Include:** `<a href="...">` anywhere in the document
///
/// **Exclude:** `<a href="..." download>`
///
/// Words are the whitespace-separated tokens of text nodes outside `script`,
/// `style`, `noscript`, `template` and `head`. Punctuation is left attached;
/// the stemmer is responsible for stripping it.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExtractor;

impl Extractor for HtmlExtractor {
    fn extract(&self, content: &[u8]) -> Extracted {
        let html = String::from_utf8_lossy(content);
        let document = Html::parse_document(&html);

        Extracted {
            words: extract_words(&document),
            hrefs: extract_hrefs(&document),
        }
    }
}

/// Collects visible words from every text node
fn extract_words(document: &Html) -> Vec<String> {
    let mut words = Vec::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|el| SKIPPED_ELEMENTS.contains(&el.value().name()));
        if hidden {
            continue;
        }

        words.extend(text.split_whitespace().map(str::to_string));
    }

    words
}

/// Collects raw href values from anchor tags
fn extract_hrefs(document: &Html) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
