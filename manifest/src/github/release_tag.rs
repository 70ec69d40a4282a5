//! Release tags used by the web-platform-tests manifest releases.
//!
//! Every merged pull request publishes a release tagged `merge_pr_<N>`,
//! where `N` is the pull request number. The newest one is also reachable
//! as the host's `latest` release.

use std::fmt;

/// Prefix of the per-merge release tags.
const MERGE_PR_PREFIX: &str = "merge_pr_";

/// The tag of the release that was (or will be) inspected.
///
/// # Examples
///
/// ```
/// use wpt_manifest::github::release_tag::ReleaseTag;
///
/// assert_eq!(ReleaseTag::Latest.to_string(), "latest");
/// assert_eq!(ReleaseTag::MergePr(1234).to_string(), "merge_pr_1234");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseTag {
    /// The host's latest release.
    Latest,
    /// The release published for a merged pull request.
    MergePr(u64),
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::MergePr(number) => write!(f, "{MERGE_PR_PREFIX}{number}"),
        }
    }
}
