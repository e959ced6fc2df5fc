//! URL handling module for Sift
//!
//! This module provides the link-cleaning primitive used by extraction
//! workers: resolving raw hrefs against the crawl's base URL and
//! normalizing them into canonical, comparable URLs.

mod domain;
mod normalize;

pub use domain::origin_host;
pub use normalize::normalize_url;

use url::Url;

/// Turns raw hyperlink references into absolute, canonical URLs
pub trait LinkCleaner: Send + Sync {
    /// Resolves every href against `base` and returns the ones that survive cleaning
    fn clean(&self, base: &Url, hrefs: &[String]) -> Vec<Url>;
}

/// Default link cleaner built on [`normalize_url`]
///
/// Skipped hrefs:
/// - empty or fragment-only (same page anchors)
/// - `javascript:`, `mailto:`, `tel:` and `data:` schemes
/// - anything that does not resolve to an http(s) URL with a host
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlCleaner;

impl LinkCleaner for UrlCleaner {
    fn clean(&self, base: &Url, hrefs: &[String]) -> Vec<Url> {
        hrefs
            .iter()
            .filter_map(|href| resolve_link(base, href))
            .collect()
    }
}

/// Resolves and normalizes a single href, or returns None if it should be skipped
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    let absolute = match base.join(href) {
        Ok(url) => url,
        Err(e) => {
            tracing::trace!("Skipping href {}: {}", href, e);
            return None;
        }
    };

    match normalize_url(absolute.as_str()) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::trace!("Skipping href {}: {}", href, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("http://x.test/a").unwrap()
    }

    fn clean(hrefs: &[&str]) -> Vec<String> {
        let hrefs: Vec<String> = hrefs.iter().map(|s| s.to_string()).collect();
        UrlCleaner
            .clean(&base_url(), &hrefs)
            .into_iter()
            .map(|u| u.to_string())
            .collect()
    }

    #[test]
    fn test_relative_link_resolved_against_base() {
        assert_eq!(clean(&["/b"]), vec!["http://x.test/b"]);
        assert_eq!(clean(&["c"]), vec!["http://x.test/c"]);
    }

    #[test]
    fn test_absolute_link_kept() {
        assert_eq!(
            clean(&["http://other.test/c"]),
            vec!["http://other.test/c"]
        );
    }

    #[test]
    fn test_special_schemes_skipped() {
        assert!(clean(&[
            "javascript:void(0)",
            "mailto:test@example.com",
            "tel:+1234567890",
            "data:text/html,<h1>x</h1>",
            "JavaScript:alert(1)",
        ])
        .is_empty());
    }

    #[test]
    fn test_fragment_only_and_empty_skipped() {
        assert!(clean(&["#section", "", "   "]).is_empty());
    }

    #[test]
    fn test_non_http_scheme_skipped() {
        assert!(clean(&["ftp://x.test/file"]).is_empty());
    }

    #[test]
    fn test_fragment_removed_from_link() {
        assert_eq!(clean(&["/b#part"]), vec!["http://x.test/b"]);
    }

    #[test]
    fn test_order_preserved_and_duplicates_kept() {
        assert_eq!(
            clean(&["/b", "/c", "/b"]),
            vec!["http://x.test/b", "http://x.test/c", "http://x.test/b"]
        );
    }
}
