//! GitHub REST payloads consumed by the resolver.
//!
//! Only the fields the resolver reads are modelled; serde ignores the rest.

use serde::Deserialize;

/// A published release and its downloadable assets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    /// The git tag the release is attached to.
    pub tag_name: String,
    /// Assets in the order the host returned them.
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// A single downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Asset {
    /// The asset filename.
    pub name: String,
    /// Direct download URL for the asset contents.
    pub browser_download_url: String,
}

impl Asset {
    /// Create an asset record.
    #[must_use]
    pub fn new(name: impl Into<String>, browser_download_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            browser_download_url: browser_download_url.into(),
        }
    }
}

/// An issue or pull request returned by the issue search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Issue {
    /// The issue (or pull request) number.
    pub number: u64,
}

/// The body of `GET /search/issues`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueSearch {
    /// Total number of matches reported by the host.
    #[serde(default)]
    pub total_count: u64,
    /// The first page of matching issues.
    #[serde(default)]
    pub items: Vec<Issue>,
}
