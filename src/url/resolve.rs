use super::CrawlBase;

/// Resolves a raw `href`/`src` value to an absolute URL against the crawl base
///
/// # Resolution Rules
///
/// 1. A value already in scope of the base is returned unchanged
/// 2. A value starting with `http://` or `https://` is returned unchanged, even
///    though it points at another host and will later fail the scope check
/// 3. Anything else is appended to the base prefix (the seed without its
///    trailing slash), inserting a `/` when the value does not start with one
///
/// # Examples
///
/// ```
/// use site_crawler::url::{resolve_link, CrawlBase};
///
/// let base = CrawlBase::parse("https://blog.boot.dev").unwrap();
/// assert_eq!(resolve_link("/logo.png", &base), "https://blog.boot.dev/logo.png");
/// assert_eq!(resolve_link("https://blog.boot.dev", &base), "https://blog.boot.dev");
/// ```
pub fn resolve_link(raw: &str, base: &CrawlBase) -> String {
    if base.in_scope(raw) || is_absolute_http(raw) {
        return raw.to_string();
    }

    if raw.starts_with('/') {
        format!("{}{}", base.prefix(), raw)
    } else {
        format!("{}/{}", base.prefix(), raw)
    }
}

fn is_absolute_http(raw: &str) -> bool {
    let lower = raw.get(..8).unwrap_or(raw).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
