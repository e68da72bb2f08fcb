use crate::CrawlError;
use url::{ParseError, Url};

/// Normalizes a URL into the crawl's deduplication key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or if it has no host
/// 2. Take the host (lowercased by the parser) and the port, if any
/// 3. Append the path
/// 4. Remove a single trailing slash
///
/// The scheme, query string and fragment are discarded, so
/// `https://example.com/page/?a=1#top` and `http://example.com/page` share a key.
/// The key is never used as a fetch URL.
///
/// Scheme-less input such as a key produced by this function is taken as
/// already normalized: only its query, fragment and one trailing slash are
/// removed. Normalizing a key therefore returns the same key.
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(String)` - The `host + path` key
/// * `Err(CrawlError::MalformedUrl)` - The input could not be parsed, or has a
///   scheme but no host
///
/// # Examples
///
/// ```
/// use site_crawler::url::normalize_url;
///
/// let key = normalize_url("https://blog.boot.dev/path/").unwrap();
/// assert_eq!(key, "blog.boot.dev/path");
/// assert_eq!(normalize_url(&key).unwrap(), key);
/// ```
pub fn normalize_url(url_str: &str) -> Result<String, CrawlError> {
    let url = match Url::parse(url_str) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => return Ok(normalize_key_text(url_str)),
        Err(e) => {
            return Err(CrawlError::MalformedUrl {
                url: url_str.to_string(),
                reason: e.to_string(),
            })
        }
    };

    let Some(host) = url.host_str() else {
        // `localhost:8080/page` parses as scheme `localhost` with an opaque path
        if is_host_port_key(url_str) {
            return Ok(normalize_key_text(url_str));
        }
        return Err(CrawlError::MalformedUrl {
            url: url_str.to_string(),
            reason: "missing host".to_string(),
        });
    };

    let mut key = match url.port() {
        Some(port) => format!("{}:{}{}", host, port, url.path()),
        None => format!("{}{}", host, url.path()),
    };

    if key.ends_with('/') {
        key.pop();
    }

    Ok(key)
}

/// Drops query, fragment and one trailing slash from scheme-less text
fn normalize_key_text(text: &str) -> String {
    let end = text.find(|c| c == '?' || c == '#').unwrap_or(text.len());
    let without_query = &text[..end];
    without_query
        .strip_suffix('/')
        .unwrap_or(without_query)
        .to_string()
}

/// True for `host:port` text with an optional path, query or fragment after the port
fn is_host_port_key(text: &str) -> bool {
    let Some((_, rest)) = text.split_once(':') else {
        return false;
    };
    let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && matches!(rest[digits..].chars().next(), None | Some('/' | '?' | '#'))
}
