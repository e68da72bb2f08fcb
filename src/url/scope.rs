use crate::CrawlError;
use url::Url;

/// The seed of a crawl, used for scope checks and link resolution
///
/// Holds the textual prefix form of the seed: the parsed seed serialized
/// with a single trailing slash removed. `Url` always serializes an
/// empty path as `/`, so the prefix is what makes `https://blog.boot.dev`
/// itself match its own base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlBase {
    prefix: String,
}

impl CrawlBase {
    /// Parses a seed URL into a crawl base
    ///
    /// Only absolute `http`/`https` URLs with a host are accepted.
    pub fn parse(seed: &str) -> Result<Self, CrawlError> {
        let url = Url::parse(seed).map_err(|e| CrawlError::MalformedUrl {
            url: seed.to_string(),
            reason: e.to_string(),
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(CrawlError::MalformedUrl {
                url: seed.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        if url.host_str().is_none() {
            return Err(CrawlError::MalformedUrl {
                url: seed.to_string(),
                reason: "missing host".to_string(),
            });
        }

        let prefix = url
            .as_str()
            .strip_suffix('/')
            .unwrap_or(url.as_str())
            .to_string();
        Ok(Self { prefix })
    }

    /// The seed without its trailing slash
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns true if `candidate` belongs to this crawl
    ///
    /// The candidate must start with the base prefix, and the prefix must end
    /// on a URL component boundary: the next character is absent, `/`, `?` or
    /// `#`. `https://example.com2` is therefore out of scope for
    /// `https://example.com`.
    ///
    /// # Examples
    ///
    /// ```
    /// use site_crawler::url::CrawlBase;
    ///
    /// let base = CrawlBase::parse("https://blog.boot.dev").unwrap();
    /// assert!(base.in_scope("https://blog.boot.dev/path"));
    /// assert!(!base.in_scope("/logo.png"));
    /// assert!(!base.in_scope("https://blog.boot.dev.evil.tld/"));
    /// ```
    pub fn in_scope(&self, candidate: &str) -> bool {
        match candidate.strip_prefix(self.prefix.as_str()) {
            Some(rest) => matches!(rest.chars().next(), None | Some('/' | '?' | '#')),
            None => false,
        }
    }
}
