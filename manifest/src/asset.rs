//! Manifest asset recognition and selection.
//!
//! Each merge release carries a gzipped manifest named
//! `MANIFEST-<sha>.json.gz`, where `<sha>` is the full 40-character commit
//! hash. The pattern is compiled once and shared read-only.

use crate::error::{ManifestError, Result};
use crate::github::model::Asset;
use crate::github::release_tag::ReleaseTag;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Length of a full SHA-1 hex string.
const SHA_LEN: usize = 40;

/// Pattern for a manifest asset filename; the full SHA is capture group 1.
///
/// The pattern is a fixed literal, so compilation cannot fail at runtime once
/// `asset_pattern_compiles` passes.
static ASSET_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^MANIFEST-([0-9a-fA-F]{40})\.json\.gz$")
        .unwrap_or_else(|error| panic!("manifest asset pattern: {error}"))
});

/// A full 40-character SHA taken from a manifest asset name.
///
/// # Examples
///
/// ```
/// use wpt_manifest::asset::ManifestSha;
///
/// let sha = ManifestSha::try_from("1111111111111111111111111111111111111111").unwrap();
/// assert_eq!(sha.as_str().len(), 40);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ManifestSha(String);

impl ManifestSha {
    /// Return the SHA as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Error returned when a string is not a 40-character hex SHA.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a 40-character hex SHA: \"{0}\"")]
pub struct InvalidManifestSha(pub String);

impl TryFrom<&str> for ManifestSha {
    type Error = InvalidManifestSha;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        if value.len() == SHA_LEN && value.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Self(value.to_owned()))
        } else {
            Err(InvalidManifestSha(value.to_owned()))
        }
    }
}

impl AsRef<str> for ManifestSha {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ManifestSha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Return the embedded SHA if `name` is a manifest asset filename.
///
/// # Examples
///
/// ```
/// use wpt_manifest::asset::parse_asset_name;
///
/// let name = "MANIFEST-1111111111111111111111111111111111111111.json.gz";
/// assert!(parse_asset_name(name).is_some());
/// assert!(parse_asset_name("MANIFEST-abc.json.gz").is_none());
/// ```
#[must_use]
pub fn parse_asset_name(name: &str) -> Option<ManifestSha> {
    ASSET_PATTERN
        .captures(name)
        .and_then(|captures| captures.get(1))
        .map(|sha| ManifestSha(sha.as_str().to_owned()))
}

/// The manifest asset chosen from a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedAsset {
    /// The SHA embedded in the asset name.
    pub sha: ManifestSha,
    /// Where to download the asset from.
    pub download_url: String,
}

/// Pick the first asset whose name matches the manifest pattern.
///
/// Assets are scanned in the order given; later matches are ignored.
///
/// # Errors
///
/// Returns [`ManifestError::NoMatchingAsset`] carrying `tag` when no asset
/// matches.
pub fn select_manifest_asset(tag: ReleaseTag, assets: &[Asset]) -> Result<SelectedAsset> {
    assets
        .iter()
        .find_map(|asset| {
            parse_asset_name(&asset.name).map(|sha| SelectedAsset {
                sha,
                download_url: asset.browser_download_url.clone(),
            })
        })
        .ok_or(ManifestError::NoMatchingAsset { tag })
}
