//! Error types for manifest resolution.
//!
//! Each stage of the resolution chain fails with its own variant so that
//! callers can tell a transport failure from a release that simply has no
//! manifest attached. No variant triggers a retry or a fallback to another
//! lookup strategy.

use crate::asset::ManifestSha;
use crate::fetch::FetchError;
use crate::github::client::HostError;
use crate::github::release_tag::ReleaseTag;
use thiserror::Error;

/// Errors that can occur while resolving a commit to its manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The commit identifier is neither `latest` nor a 7–40 character hex SHA.
    #[error("invalid commit identifier \"{value}\": {reason}")]
    InvalidCommit {
        /// The rejected identifier.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// A call to the release host (search or release fetch) failed.
    #[error(transparent)]
    Lookup(#[from] HostError),

    /// The issue search returned no candidates for the commit.
    #[error("no search results found for SHA {commit}")]
    NoSearchResults {
        /// The commit identifier that was searched for.
        commit: String,
    },

    /// The release exists but carries no assets.
    #[error("no assets found for {tag} release")]
    NoAssets {
        /// The tag of the release that was inspected.
        tag: ReleaseTag,
    },

    /// None of the release's assets is named `MANIFEST-<sha>.json.gz`.
    #[error("no manifest asset found for release {tag}")]
    NoMatchingAsset {
        /// The tag of the release that was inspected.
        tag: ReleaseTag,
    },

    /// Downloading the matched manifest asset failed.
    #[error("failed to fetch manifest {sha}: {source}")]
    Fetch {
        /// The SHA extracted from the asset name before the download failed.
        sha: ManifestSha,
        /// The underlying download error.
        #[source]
        source: FetchError,
    },

    /// The manifest download started but its body could not be read.
    #[error("failed to read manifest {sha}: {source}")]
    ReadBody {
        /// The SHA extracted from the asset name.
        sha: ManifestSha,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ManifestError {
    /// Return the SHA that had already been resolved when the error occurred.
    ///
    /// Only the download stages know a SHA. The value is informational: it
    /// names the asset that failed and says nothing about its validity.
    #[must_use]
    pub fn partial_sha(&self) -> Option<&ManifestSha> {
        match self {
            Self::Fetch { sha, .. } | Self::ReadBody { sha, .. } => Some(sha),
            _ => None,
        }
    }
}

/// Result type alias using [`ManifestError`].
pub type Result<T> = std::result::Result<T, ManifestError>;
