use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::fetcher::BypassClient;

lazy_static! {
    // Official Medium article URL shapes only; Medium-powered custom
    // domains are deliberately not recognized.
    static ref MEDIUM_URL: Regex = Regex::new(
        r"^https?://(www\.)?medium\.com/.+|^https?://medium\.com/.+|^https?://link\.medium\.com/.+|^https?://medium\.com/@[^/]+/[^/]+"
    ).unwrap();
}

/// Phrases the bypass service renders when it cannot resolve a link.
pub const FAILURE_MARKERS: &[&str] = &[
    "Oppps!",
    "Unable to identify the link as a Medium.com article",
    "Your emergency transponder code",
];

/// Pure pattern check, no network involved.
pub fn is_medium_url(url: &str) -> bool {
    MEDIUM_URL.is_match(url)
}

pub fn has_failure_markers(html: &str) -> bool {
    FAILURE_MARKERS.iter().any(|marker| html.contains(marker))
}

/// Pre-flight URL validation against the bypass service.
pub struct Validator {
    client: BypassClient,
}

impl Validator {
    pub fn new(client: BypassClient) -> Self {
        Self { client }
    }

    /// Fetch the bypass page for `url` through the relay and scan it for
    /// the known failure phrases. A relay error counts as a failed probe.
    pub async fn probe(&self, url: &str) -> bool {
        match self.client.fetch_page(url).await {
            Ok(html) => !has_failure_markers(&html),
            Err(e) => {
                debug!("probe for {} failed: {}", url, e);
                false
            }
        }
    }

    /// A URL is accepted when it matches the Medium shape and the bypass
    /// service can render it. Pattern mismatches are rejected up front
    /// without touching the network.
    pub async fn validate(&self, url: &str) -> bool {
        if !is_medium_url(url) {
            return false;
        }
        self.probe(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_medium_urls() {
        assert!(is_medium_url("https://medium.com/@alice/my-post"));
        assert!(is_medium_url("https://www.medium.com/some-publication/post-123"));
        assert!(is_medium_url("http://medium.com/swlh/a-story"));
        assert!(is_medium_url("https://link.medium.com/abc123"));
    }

    #[test]
    fn test_rejects_non_medium_urls() {
        assert!(!is_medium_url("https://example.com/@alice/my-post"));
        assert!(!is_medium_url("https://dev.to/alice/my-post"));
        assert!(!is_medium_url("not a url at all"));
        assert!(!is_medium_url("ftp://medium.com/@alice/my-post"));
        // bare host without an article path
        assert!(!is_medium_url("https://medium.com/"));
    }

    #[test]
    fn test_failure_markers() {
        assert!(has_failure_markers("<html><body><h1>Oppps!</h1></body></html>"));
        assert!(has_failure_markers(
            "Unable to identify the link as a Medium.com article"
        ));
        assert!(!has_failure_markers("<html><body><h1>A story</h1></body></html>"));
    }
}
