use url::Url;

/// Extracts the origin host of a URL, including an explicit port
///
/// Two URLs belong to the same crawl origin when their origin hosts are equal,
/// so `127.0.0.1:8080` and `127.0.0.1:9090` are different origins. The scheme's
/// default port is never included.
///
/// # Returns
///
/// * `Some(String)` - The lowercase `host` or `host:port`
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sift_crawl::url::origin_host;
///
/// let url = Url::parse("https://example.com/path").unwrap();
/// assert_eq!(origin_host(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/path").unwrap();
/// assert_eq!(origin_host(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn origin_host(url: &Url) -> Option<String> {
    let host = url.host_str().filter(|h| !h.is_empty())?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}
