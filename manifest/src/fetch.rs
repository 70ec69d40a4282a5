//! Manifest asset download.
//!
//! The fetcher issues one GET and hands back the response body unread, so
//! callers that want to stream can do so; the resolver is the one that
//! buffers it.

use std::io::Read;
use std::time::Duration;

/// Trait for downloading a release asset by URL.
///
/// Abstractions allow tests to mock HTTP behaviour without network access.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use wpt_manifest::fetch::HttpFetcher;
///
/// let fetcher = HttpFetcher::new(Duration::from_secs(30));
/// // Use fetcher.fetch(url) in production
/// # let _ = fetcher;
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait AssetFetcher {
    /// Start downloading `url` and return the unread body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or returns an error status.
    fn fetch(&self, url: &str) -> Result<Box<dyn Read>, FetchError>;
}

/// Errors arising from asset downloads.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("download failed for {url}: {reason}")]
    Http {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The asset was not found (HTTP 404).
    #[error("asset not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },
}

/// HTTP-based fetcher using `ureq`.
#[derive(Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    /// Create a fetcher whose requests are bounded by `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl AssetFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Box<dyn Read>, FetchError> {
        log::debug!("downloading {url}");
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        Ok(Box::new(response.into_body().into_reader()))
    }
}

/// Map a ureq error to a [`FetchError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> FetchError {
    match err {
        ureq::Error::StatusCode(404) => FetchError::NotFound {
            url: url.to_owned(),
        },
        other => FetchError::Http {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
