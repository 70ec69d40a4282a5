//! Release lookup for a commit identifier.
//!
//! Manifest releases are tagged per merged pull request rather than per
//! commit, so a SHA is first mapped to the pull request that mentions it
//! (via issue search) and then to that pull request's `merge_pr_<N>`
//! release. The `latest` sentinel skips the search entirely.

use crate::commit::{CommitId, LookupStrategy};
use crate::error::{ManifestError, Result};
use crate::github::client::{ReleaseHost, Repository};
use crate::github::model::Release;
use crate::github::release_tag::ReleaseTag;

/// A release located for a commit, with the tag used to find it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundRelease {
    /// The tag the release was fetched by.
    pub tag: ReleaseTag,
    /// The release record; its asset list is never empty.
    pub release: Release,
}

/// Build the issue search query for `sha` within `repository`.
///
/// # Examples
///
/// ```
/// use wpt_manifest::github::client::Repository;
/// use wpt_manifest::lookup::search_query;
///
/// assert_eq!(
///     search_query("abc1234", &Repository::wpt()),
///     "SHA:abc1234 repo:web-platform-tests/wpt"
/// );
/// ```
#[must_use]
pub fn search_query(sha: &str, repository: &Repository) -> String {
    format!("SHA:{sha} repo:{repository}")
}

/// Find the release that should carry the manifest for `commit`.
///
/// The search query is scoped to `host.repository()`, the same repository
/// the release is then fetched from.
///
/// # Errors
///
/// - [`ManifestError::Lookup`] when a host call fails.
/// - [`ManifestError::NoSearchResults`] when the search finds no issue.
/// - [`ManifestError::NoAssets`] when the release has no assets.
pub fn find_release(host: &dyn ReleaseHost, commit: &CommitId) -> Result<FoundRelease> {
    let (tag, release) = match LookupStrategy::from(commit) {
        LookupStrategy::Latest => {
            log::debug!("looking up latest release of {}", host.repository());
            (ReleaseTag::Latest, host.latest_release()?)
        }
        LookupStrategy::Search { sha } => {
            let tag = merge_tag_for_sha(host, sha)?;
            log::debug!("looking up release {tag} for {sha}");
            (tag, host.release_by_tag(tag)?)
        }
    };

    if release.assets.is_empty() {
        return Err(ManifestError::NoAssets { tag });
    }
    Ok(FoundRelease { tag, release })
}

fn merge_tag_for_sha(host: &dyn ReleaseHost, sha: &str) -> Result<ReleaseTag> {
    let query = search_query(sha, host.repository());
    let issues = host.search_issues(&query)?;
    let first = issues
        .first()
        .ok_or_else(|| ManifestError::NoSearchResults {
            commit: sha.to_owned(),
        })?;
    if issues.len() > 1 {
        log::debug!(
            "search for {sha} matched {} issues; using #{}",
            issues.len(),
            first.number
        );
    }
    Ok(ReleaseTag::MergePr(first.number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::client::{HostError, MockReleaseHost};
    use crate::github::model::{Asset, Issue};
    use mockall::predicate::eq;

    fn release_with_assets(tag: &str, names: &[&str]) -> Release {
        Release {
            tag_name: tag.to_owned(),
            assets: names
                .iter()
                .map(|name| Asset::new(*name, format!("https://example.test/{name}")))
                .collect(),
        }
    }

    fn host_for(repository: Repository) -> MockReleaseHost {
        let mut host = MockReleaseHost::new();
        host.expect_repository().return_const(repository);
        host
    }

    fn wpt_host() -> MockReleaseHost {
        host_for(Repository::wpt())
    }

    fn sha(value: &str) -> CommitId {
        CommitId::try_from(value).expect("valid sha")
    }

    #[test]
    fn latest_uses_latest_release_and_never_searches() {
        let mut host = wpt_host();
        host.expect_latest_release()
            .times(1)
            .returning(|| Ok(release_with_assets("merge_pr_5", &["README.md"])));
        host.expect_search_issues().never();
        host.expect_release_by_tag().never();

        let found = find_release(&host, &CommitId::Latest).expect("found");
        assert_eq!(found.tag, ReleaseTag::Latest);
    }

    #[test]
    fn sha_search_uses_exact_query_and_first_issue() {
        let mut host = wpt_host();
        host.expect_search_issues()
            .with(eq("SHA:abc1234 repo:web-platform-tests/wpt"))
            .times(1)
            .returning(|_| Ok(vec![Issue { number: 123 }, Issue { number: 456 }]));
        host.expect_release_by_tag()
            .with(eq(ReleaseTag::MergePr(123)))
            .times(1)
            .returning(|_| Ok(release_with_assets("merge_pr_123", &["README.md"])));
        host.expect_latest_release().never();

        let found = find_release(&host, &sha("abc1234")).expect("found");
        assert_eq!(found.tag, ReleaseTag::MergePr(123));
        assert_eq!(found.release.tag_name, "merge_pr_123");
    }

    #[test]
    fn empty_search_reports_commit() {
        let mut host = wpt_host();
        host.expect_search_issues().returning(|_| Ok(Vec::new()));
        host.expect_release_by_tag().never();
        host.expect_latest_release().never();

        let err = find_release(&host, &sha("abc1234")).expect_err("no results");
        assert!(matches!(err, ManifestError::NoSearchResults { ref commit } if commit == "abc1234"));
    }

    #[test]
    fn search_failure_propagates_without_fallback() {
        let mut host = wpt_host();
        host.expect_search_issues().returning(|_| {
            Err(HostError::Http {
                url: "https://api.example.test/search/issues".to_owned(),
                reason: "connection reset".to_owned(),
            })
        });
        host.expect_latest_release().never();
        host.expect_release_by_tag().never();

        let err = find_release(&host, &sha("abc1234")).expect_err("fails");
        assert!(matches!(err, ManifestError::Lookup(HostError::Http { .. })));
    }

    #[test]
    fn missing_release_propagates_host_error() {
        let mut host = wpt_host();
        host.expect_search_issues()
            .returning(|_| Ok(vec![Issue { number: 8 }]));
        host.expect_release_by_tag().returning(|_| {
            Err(HostError::NotFound {
                url: "https://api.example.test/releases/tags/merge_pr_8".to_owned(),
            })
        });

        let err = find_release(&host, &sha("abc1234")).expect_err("fails");
        assert!(matches!(err, ManifestError::Lookup(HostError::NotFound { .. })));
    }

    #[test]
    fn release_without_assets_reports_tag() {
        let mut host = wpt_host();
        host.expect_search_issues()
            .returning(|_| Ok(vec![Issue { number: 31 }]));
        host.expect_release_by_tag()
            .returning(|_| Ok(release_with_assets("merge_pr_31", &[])));

        let err = find_release(&host, &sha("abc1234")).expect_err("fails");
        assert!(matches!(
            err,
            ManifestError::NoAssets { tag: ReleaseTag::MergePr(31) }
        ));
        assert!(err.to_string().contains("merge_pr_31"));
    }

    #[test]
    fn query_uses_configured_repository() {
        let repository = Repository::new("someone", "fork");
        assert_eq!(
            search_query("deadbeef", &repository),
            "SHA:deadbeef repo:someone/fork"
        );
    }

    #[test]
    fn search_is_scoped_to_the_hosts_repository() {
        let mut host = host_for(Repository::new("someone", "fork"));
        host.expect_search_issues()
            .with(eq("SHA:abc1234 repo:someone/fork"))
            .times(1)
            .returning(|_| Ok(vec![Issue { number: 5 }]));
        host.expect_release_by_tag()
            .with(eq(ReleaseTag::MergePr(5)))
            .times(1)
            .returning(|_| Ok(release_with_assets("merge_pr_5", &["README.md"])));

        let found = find_release(&host, &sha("abc1234")).expect("found");
        assert_eq!(found.tag, ReleaseTag::MergePr(5));
    }
}
