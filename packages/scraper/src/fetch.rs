//! HTTP page fetcher.
//!
//! Issues a single timed `GET` against the modem and hands back the body.

use crate::{FetchError, PageFetcher, ScrapeConfig};

/// [`PageFetcher`] backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    /// Builds a fetcher with a fresh client.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, config: &ScrapeConfig) -> Result<String, FetchError> {
        log::debug!("Fetching {}", config.url);

        let response = self
            .client
            .get(&config.url)
            .timeout(config.timeout)
            .send()
            .await
            .map_err(|e| classify_error(e, config))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: config.url.clone(),
            });
        }

        response.text().await.map_err(|e| classify_error(e, config))
    }
}

/// Separates timeouts from other transport failures.
fn classify_error(e: reqwest::Error, config: &ScrapeConfig) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout(config.timeout)
    } else {
        FetchError::Http(e)
    }
}
