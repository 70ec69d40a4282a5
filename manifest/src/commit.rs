//! Commit identifiers accepted by the resolver.
//!
//! An identifier is either the sentinel `latest` or an abbreviated/full git
//! SHA of 7–40 hex characters. The SHA is kept exactly as given because it is
//! embedded verbatim in the issue search query.

use crate::error::{ManifestError, Result};
use std::fmt;
use std::str::FromStr;

/// The sentinel that selects the most recent release.
pub const LATEST: &str = "latest";

/// Minimum length of an abbreviated git SHA (7 hex characters).
const MIN_LEN: usize = 7;

/// Maximum length of a full git SHA-1 (40 hex characters).
const MAX_LEN: usize = 40;

/// A validated commit identifier.
///
/// # Examples
///
/// ```
/// use wpt_manifest::commit::CommitId;
///
/// let latest: CommitId = "latest".parse().unwrap();
/// assert!(latest.is_latest());
///
/// let sha: CommitId = "abc1234".parse().unwrap();
/// assert_eq!(sha.to_string(), "abc1234");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommitId {
    /// The most recent published release.
    Latest,
    /// A hex SHA prefix or full SHA.
    Sha(ShaPrefix),
}

/// A validated 7–40 character hex SHA, case preserved.
///
/// Only obtainable through [`TryFrom`] or [`FromStr`], so every value has
/// passed validation.
///
/// # Examples
///
/// ```
/// use wpt_manifest::commit::ShaPrefix;
///
/// assert!(ShaPrefix::try_from("abc1234").is_ok());
/// assert!(ShaPrefix::try_from("x repo:evil/repo").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaPrefix(String);

impl ShaPrefix {
    /// Return the SHA as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for ShaPrefix {
    type Error = ManifestError;

    fn try_from(value: &str) -> Result<Self> {
        validate_sha(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl FromStr for ShaPrefix {
    type Err = ManifestError;

    fn from_str(value: &str) -> Result<Self> {
        Self::try_from(value)
    }
}

impl fmt::Display for ShaPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl CommitId {
    /// Return true for the `latest` sentinel.
    #[must_use]
    pub fn is_latest(&self) -> bool {
        matches!(self, Self::Latest)
    }

    /// Return the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Latest => LATEST,
            Self::Sha(sha) => sha.as_str(),
        }
    }
}

impl FromStr for CommitId {
    type Err = ManifestError;

    fn from_str(value: &str) -> Result<Self> {
        if value == LATEST {
            return Ok(Self::Latest);
        }
        ShaPrefix::try_from(value).map(Self::Sha)
    }
}

impl TryFrom<&str> for CommitId {
    type Error = ManifestError;

    fn try_from(value: &str) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a release is located for a commit identifier.
///
/// Chosen once from the [`CommitId`]; the two variants never mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStrategy<'a> {
    /// Ask the host for its latest release directly.
    Latest,
    /// Search the issue tracker for the SHA and follow the merge release tag.
    Search {
        /// The SHA to search for.
        sha: &'a str,
    },
}

impl<'a> From<&'a CommitId> for LookupStrategy<'a> {
    fn from(commit: &'a CommitId) -> Self {
        match commit {
            CommitId::Latest => Self::Latest,
            CommitId::Sha(sha) => Self::Search { sha: sha.as_str() },
        }
    }
}

fn invalid(value: &str, reason: String) -> ManifestError {
    ManifestError::InvalidCommit {
        value: value.to_owned(),
        reason,
    }
}

fn validate_sha(value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(invalid(value, "identifier must not be empty".to_owned()));
    }
    if value.len() < MIN_LEN {
        return Err(invalid(
            value,
            format!(
                "SHA must be at least {MIN_LEN} characters, got {}",
                value.len()
            ),
        ));
    }
    if value.len() > MAX_LEN {
        return Err(invalid(
            value,
            format!(
                "SHA must be at most {MAX_LEN} characters, got {}",
                value.len()
            ),
        ));
    }
    if let Some(bad) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(invalid(value, format!("non-hex character '{bad}'")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn latest_sentinel_parses_to_latest() {
        let commit: CommitId = "latest".parse().expect("latest parses");
        assert_eq!(commit, CommitId::Latest);
        assert_eq!(commit.as_str(), "latest");
    }

    #[rstest]
    #[case::abbreviated("abc1234")]
    #[case::mixed_case("AbC1234dEf")]
    #[case::full("0123456789abcdef0123456789abcdef01234567")]
    fn accepts_hex_shas(#[case] value: &str) {
        let commit = CommitId::try_from(value).expect("valid sha");
        let CommitId::Sha(sha) = &commit else {
            panic!("expected a SHA, got {commit:?}");
        };
        assert_eq!(sha.as_str(), value);
        assert_eq!(commit.to_string(), value);
    }

    #[rstest]
    #[case::empty("")]
    #[case::too_short("abc123")]
    #[case::too_long("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa")]
    #[case::non_hex("abc123g")]
    #[case::query_injection("abc1234 repo:evil/repo")]
    #[case::wrong_case_sentinel("LATEST")]
    fn rejects_malformed_identifiers(#[case] value: &str) {
        let err = CommitId::try_from(value).expect_err("should be rejected");
        assert!(matches!(err, ManifestError::InvalidCommit { .. }));
    }

    #[rstest]
    #[case::search_qualifier("x repo:evil/repo")]
    #[case::empty("")]
    #[case::padded(" abc1234")]
    fn sha_prefix_rejects_query_text(#[case] value: &str) {
        let err = ShaPrefix::try_from(value).expect_err("should be rejected");
        assert!(matches!(err, ManifestError::InvalidCommit { .. }));
        assert!(value.parse::<ShaPrefix>().is_err());
    }

    #[test]
    fn strategy_for_latest_is_latest() {
        assert_eq!(LookupStrategy::from(&CommitId::Latest), LookupStrategy::Latest);
    }

    #[test]
    fn strategy_for_sha_searches_with_verbatim_sha() {
        let commit = CommitId::Sha(ShaPrefix::try_from("AbC1234").expect("valid sha"));
        assert_eq!(
            LookupStrategy::from(&commit),
            LookupStrategy::Search { sha: "AbC1234" }
        );
    }
}
