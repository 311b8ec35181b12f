use std::time::Duration;

use serde::Deserialize;
use tracing::info;
use url::Url;

use fr_core::{Error, Result};

/// Third-party service that renders paywalled Medium articles in full.
pub const BYPASS_HOST: &str = "https://freedium.cfd";

/// Public CORS relay that fetches an arbitrary URL server-side and hands
/// back its body in a JSON envelope.
pub const RELAY_ENDPOINT: &str = "https://api.allorigins.win/get";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Anything shorter is treated as a failed fetch, not a real article page.
const MIN_PLAUSIBLE_LENGTH: usize = 100;

#[derive(Debug, Deserialize)]
struct RelayEnvelope {
    contents: Option<String>,
}

/// HTTP client for the bypass-service-through-relay fetch path.
#[derive(Clone)]
pub struct BypassClient {
    client: reqwest::Client,
    bypass_host: String,
    relay_endpoint: String,
}

impl BypassClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_endpoints(BYPASS_HOST, RELAY_ENDPOINT, timeout)
    }

    pub fn with_endpoints(
        bypass_host: &str,
        relay_endpoint: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            bypass_host: bypass_host.to_string(),
            relay_endpoint: relay_endpoint.to_string(),
        })
    }

    /// `https://freedium.cfd/<original-url>`
    pub fn bypass_url(&self, url: &str) -> String {
        format!("{}/{}", self.bypass_host, url)
    }

    /// Relay endpoint with the bypass URL as an encoded `url` query param.
    pub fn relay_url(&self, url: &str) -> Result<Url> {
        Url::parse_with_params(&self.relay_endpoint, &[("url", self.bypass_url(url))])
            .map_err(|e| Error::Fetch(format!("Failed to build relay URL: {}", e)))
    }

    /// Fetch the bypassed article page for `url` through the relay.
    ///
    /// Single attempt, no retry or backoff; any failure propagates to the
    /// caller. Dropping the returned future cancels the in-flight request.
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        let bypass_url = self.bypass_url(url);
        info!("🌐 Fetching from bypass service: {}", bypass_url);

        let response = self.client.get(self.relay_url(url)?).send().await?;
        if !response.status().is_success() {
            return Err(Error::Fetch(format!(
                "HTTP error! status: {}",
                response.status()
            )));
        }

        let envelope: RelayEnvelope = response.json().await?;
        Self::unwrap_envelope(envelope)
    }

    fn unwrap_envelope(envelope: RelayEnvelope) -> Result<String> {
        match envelope.contents {
            Some(html) if html.len() >= MIN_PLAUSIBLE_LENGTH => Ok(html),
            _ => Err(Error::Fetch(
                "No content received from Freedium".to_string(),
            )),
        }
    }
}
