//! Commit-to-manifest resolution.
//!
//! Runs release lookup, asset selection and asset download in order, then
//! buffers the downloaded body. Every stage fails fast; nothing is cached
//! here (see [`crate::memo`] for caller-side caching).

use std::io::Read;

use crate::asset::{ManifestSha, select_manifest_asset};
use crate::commit::CommitId;
use crate::config::Config;
use crate::error::{ManifestError, Result};
use crate::fetch::{AssetFetcher, HttpFetcher};
use crate::github::client::{GitHubClient, ReleaseHost, Repository};
use crate::lookup::find_release;

/// A manifest resolved for a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedManifest {
    /// The full SHA embedded in the manifest asset's name.
    ///
    /// This can differ from the requested identifier, which may be an
    /// abbreviation or `latest`.
    pub sha: ManifestSha,
    /// The asset bytes exactly as served (normally gzipped JSON).
    pub bytes: Vec<u8>,
}

/// Anything that can resolve a commit to its manifest.
#[cfg_attr(test, mockall::automock)]
pub trait ManifestSource {
    /// Resolve `commit` to its manifest SHA and bytes.
    ///
    /// # Errors
    ///
    /// Returns the [`ManifestError`] of the first stage that failed.
    fn resolve(&self, commit: &CommitId) -> Result<ResolvedManifest>;
}

/// Resolves commits against a release host.
///
/// # Examples
///
/// ```no_run
/// use wpt_manifest::commit::CommitId;
/// use wpt_manifest::config::Config;
/// use wpt_manifest::resolver::{ManifestSource, Resolver};
///
/// let resolver = Resolver::from_config(&Config::default(), None);
/// let manifest = resolver.resolve(&CommitId::Latest)?;
/// println!("{} ({} bytes)", manifest.sha, manifest.bytes.len());
/// # Ok::<(), wpt_manifest::error::ManifestError>(())
/// ```
pub struct Resolver<H, F> {
    host: H,
    fetcher: F,
}

impl<H: ReleaseHost, F: AssetFetcher> Resolver<H, F> {
    /// Create a resolver from its collaborators.
    ///
    /// Releases are searched for and fetched in `host.repository()`.
    #[must_use]
    pub fn new(host: H, fetcher: F) -> Self {
        Self { host, fetcher }
    }

    /// Return the repository releases are looked up in.
    #[must_use]
    pub fn repository(&self) -> &Repository {
        self.host.repository()
    }
}

impl Resolver<GitHubClient, HttpFetcher> {
    /// Create a resolver backed by the GitHub REST API.
    ///
    /// `token`, when given, is sent as a bearer token on API calls only.
    #[must_use]
    pub fn from_config(config: &Config, token: Option<&str>) -> Self {
        let timeout = config.http_timeout();
        let mut host = GitHubClient::new(config.api_base(), config.repository(), timeout);
        if let Some(value) = token {
            host = host.with_token(value);
        }
        Self::new(host, HttpFetcher::new(timeout))
    }
}

impl<H: ReleaseHost, F: AssetFetcher> ManifestSource for Resolver<H, F> {
    fn resolve(&self, commit: &CommitId) -> Result<ResolvedManifest> {
        let found = find_release(&self.host, commit)?;
        let selected = select_manifest_asset(found.tag, &found.release.assets)?;
        log::debug!(
            "release {} carries manifest {} at {}",
            found.tag,
            selected.sha,
            selected.download_url
        );

        let mut body = match self.fetcher.fetch(&selected.download_url) {
            Ok(body) => body,
            Err(source) => {
                return Err(ManifestError::Fetch {
                    sha: selected.sha,
                    source,
                });
            }
        };
        let mut bytes = Vec::new();
        if let Err(source) = body.read_to_end(&mut bytes) {
            return Err(ManifestError::ReadBody {
                sha: selected.sha,
                source,
            });
        }

        Ok(ResolvedManifest {
            sha: selected.sha,
            bytes,
        })
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
