//! Listing page retrieval.
//!
//! [`Fetch`] is the seam between the pipeline and the network, so the
//! aggregator can be driven by canned pages in tests. [`HttpFetcher`] is the
//! real implementation on top of `reqwest`.

use crate::error::FetchError;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

/// Browser identification sent with every request. Several outlets serve
/// reduced or empty pages to unknown clients.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) \
    Chrome/114.0.0.0 Safari/537.36";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Retrieve the raw body of a page.
pub trait Fetch {
    /// Fetch `url` and return the response body.
    ///
    /// Fails on transport errors and on any non-2xx status.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// HTTP fetcher with a fixed user agent and per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self::from_client(client))
    }

    /// Wrap a preconfigured client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        debug!(bytes = body.len(), %status, "Fetched page");
        Ok(body.to_vec())
    }
}
