//! Release host client.
//!
//! The resolver talks to the release host through [`ReleaseHost`] so that
//! tests can stub the three calls it needs. [`GitHubClient`] is the
//! production implementation over the GitHub REST API using a blocking
//! `ureq` agent.

use super::model::{Issue, IssueSearch, Release};
use super::release_tag::ReleaseTag;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

/// Default GitHub REST API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Media type requested from the GitHub REST API.
const ACCEPT: &str = "application/vnd.github+json";

/// Pinned REST API version.
const API_VERSION: &str = "2022-11-28";

/// User agent sent with every request; GitHub rejects requests without one.
const USER_AGENT: &str = concat!("wpt-manifest/", env!("CARGO_PKG_VERSION"));

/// An `owner/name` repository on the release host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    owner: String,
    name: String,
}

impl Repository {
    /// Create a repository reference.
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// The `web-platform-tests/wpt` repository.
    #[must_use]
    pub fn wpt() -> Self {
        Self::new("web-platform-tests", "wpt")
    }

}

impl Default for Repository {
    fn default() -> Self {
        Self::wpt()
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Errors arising from release host calls.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The HTTP request failed or returned an error status.
    #[error("request to {url} failed: {reason}")]
    Http {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The host answered 404 for the requested resource.
    #[error("not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// The response body was not the expected JSON payload.
    #[error("unexpected response from {url}: {reason}")]
    Decode {
        /// The URL whose response could not be decoded.
        url: String,
        /// Description of the decoding failure.
        reason: String,
    },
}

/// The release host calls the resolver depends on.
///
/// Implementations are bound to one repository. Release URLs and the issue
/// search query are both built from [`ReleaseHost::repository`].
#[cfg_attr(test, mockall::automock)]
pub trait ReleaseHost {
    /// Return the repository this host serves releases for.
    fn repository(&self) -> &Repository;

    /// Fetch the repository's latest published release.
    ///
    /// # Errors
    ///
    /// Returns a [`HostError`] if the request fails or the release is missing.
    fn latest_release(&self) -> Result<Release, HostError>;

    /// Fetch the release published under `tag`.
    ///
    /// # Errors
    ///
    /// Returns a [`HostError`] if the request fails or no such release exists.
    fn release_by_tag(&self, tag: ReleaseTag) -> Result<Release, HostError>;

    /// Run an issue search and return the first page of results.
    ///
    /// # Errors
    ///
    /// Returns a [`HostError`] if the search request fails.
    fn search_issues(&self, query: &str) -> Result<Vec<Issue>, HostError>;
}

/// GitHub REST implementation of [`ReleaseHost`].
#[derive(Clone)]
pub struct GitHubClient {
    agent: ureq::Agent,
    api_base: String,
    repository: Repository,
    token: Option<String>,
}

impl GitHubClient {
    /// Create a client for `repository` rooted at `api_base`.
    ///
    /// Every request is bounded by `timeout`. No request is made here.
    #[must_use]
    pub fn new(api_base: &str, repository: Repository, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            api_base: api_base.trim_end_matches('/').to_owned(),
            repository,
            token: None,
        }
    }

    /// Attach a bearer token sent with every API request.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// URL of the latest-release endpoint.
    #[must_use]
    pub fn latest_release_url(&self) -> String {
        format!("{}/repos/{}/releases/latest", self.api_base, self.repository)
    }

    /// URL of the release-by-tag endpoint for `tag`.
    #[must_use]
    pub fn release_by_tag_url(&self, tag: ReleaseTag) -> String {
        format!(
            "{}/repos/{}/releases/tags/{tag}",
            self.api_base, self.repository
        )
    }

    /// URL of the issue search endpoint, without the query string.
    #[must_use]
    pub fn search_issues_url(&self) -> String {
        format!("{}/search/issues", self.api_base)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: Option<&str>,
    ) -> Result<T, HostError> {
        let mut request = self
            .agent
            .get(url)
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", USER_AGENT);
        if let Some(q) = query {
            request = request.query("q", q);
        }
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request.call().map_err(|e| map_ureq_error(url, &e))?;
        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| HostError::Http {
                url: url.to_owned(),
                reason: e.to_string(),
            })?;
        serde_json::from_str(&body).map_err(|e| HostError::Decode {
            url: url.to_owned(),
            reason: e.to_string(),
        })
    }
}

impl ReleaseHost for GitHubClient {
    fn repository(&self) -> &Repository {
        &self.repository
    }

    fn latest_release(&self) -> Result<Release, HostError> {
        let url = self.latest_release_url();
        log::debug!("fetching latest release from {url}");
        self.get_json(&url, None)
    }

    fn release_by_tag(&self, tag: ReleaseTag) -> Result<Release, HostError> {
        let url = self.release_by_tag_url(tag);
        log::debug!("fetching release {tag} from {url}");
        self.get_json(&url, None)
    }

    fn search_issues(&self, query: &str) -> Result<Vec<Issue>, HostError> {
        let url = self.search_issues_url();
        log::debug!("searching issues with query {query:?}");
        let search: IssueSearch = self.get_json(&url, Some(query))?;
        log::debug!(
            "search matched {} issues, {} on the first page",
            search.total_count,
            search.items.len()
        );
        Ok(search.items)
    }
}

/// Map a ureq error to a [`HostError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> HostError {
    match err {
        ureq::Error::StatusCode(404) => HostError::NotFound {
            url: url.to_owned(),
        },
        other => HostError::Http {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
