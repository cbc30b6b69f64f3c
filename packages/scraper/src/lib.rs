#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Extraction pipeline for cable modem status pages.
//!
//! The modem firmware serves a loosely structured HTML page whose bonded
//! channel tables are only identifiable by a caption cell. This crate
//! provides each stage of turning that page into typed channel records:
//!
//! * [`fetch`] retrieves the raw markup through the [`PageFetcher`] trait.
//! * [`html_table`] flattens the markup into [`html_table::Table`] grids
//!   behind the [`html_table::TableSource`] trait.
//! * [`locate`] finds the table captioned for a [`ChannelSection`].
//! * [`classify`] tells data rows apart from repeated headers and totals.
//! * [`parsing`] converts data rows into [`ChannelRecord`]s.
//!
//! Publishing the records is left to the caller.

pub mod classify;
pub mod fetch;
pub mod html_table;
pub mod locate;
pub mod parsing;

use std::time::Duration;

use moto_exporter_channel_models::ChannelSection;

pub use moto_exporter_channel_models::ChannelRecord;

/// How long a single page fetch may take before it is abandoned.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Conventional management address of Motorola cable modems.
pub const DEFAULT_URL: &str = "http://192.168.100.1/MotoConnection.asp";

/// Errors raised while retrieving the status page.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// An HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The modem did not answer within the configured timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The modem answered with a non-success status.
    #[error("Unexpected status {status} from {url}")]
    Status {
        /// The status code returned.
        status: reqwest::StatusCode,
        /// The URL that was requested.
        url: String,
    },
}

/// Errors that abort a whole scrape or a whole section of it.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// The status page could not be retrieved.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Walking the markup failed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// No table carries the caption for this section.
    #[error("Could not find the {0} table (no row captioned '{caption}')", caption = .0.caption())]
    SectionNotFound(ChannelSection),
}

/// Where and how to fetch the status page.
///
/// Built once at start-up and handed to the scrape orchestrator, which only
/// ever reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeConfig {
    /// The status page URL.
    pub url: String,
    /// Upper bound on a single fetch.
    pub timeout: Duration,
}

impl ScrapeConfig {
    /// Creates a new `ScrapeConfig` for the given URL with the default
    /// timeout.
    #[must_use]
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the fetch timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}

/// Retrieves the raw status page markup.
///
/// Implementations must honour [`ScrapeConfig::timeout`]; exceeding it is
/// reported as [`FetchError::Timeout`] rather than blocking the caller.
pub trait PageFetcher: Send + Sync {
    /// Fetches the page at [`ScrapeConfig::url`] and returns its body.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request fails, times out, or the
    /// response status is not a success.
    fn fetch(
        &self,
        config: &ScrapeConfig,
    ) -> impl std::future::Future<Output = Result<String, FetchError>> + Send;
}
