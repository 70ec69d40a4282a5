//! BDD tests for commit-to-manifest resolution.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::Cell;
use std::io::Read;
use std::rc::Rc;
use wpt_manifest::commit::CommitId;
use wpt_manifest::error::ManifestError;
use wpt_manifest::fetch::{AssetFetcher, FetchError};
use wpt_manifest::github::client::{HostError, ReleaseHost, Repository};
use wpt_manifest::github::model::{Asset, Issue, Release};
use wpt_manifest::github::release_tag::ReleaseTag;
use wpt_manifest::resolver::{ManifestSource, ResolvedManifest, Resolver};

const MANIFEST_BYTES: &[u8] = b"\x1f\x8bstub manifest";

/// How the stub host answers the issue search.
#[derive(Clone)]
enum SearchBehaviour {
    /// Return a single issue with this number.
    Issue(u64),
    /// Return no issues.
    Empty,
    /// Fail with a transport error.
    Unavailable,
}

/// Call records shared between the world and the stub host.
#[derive(Default)]
struct Calls {
    searched: Cell<bool>,
    latest_requested: Cell<bool>,
}

/// A stub release host driven by the scenario's `Given` steps.
struct StubHost {
    repository: Repository,
    search: Option<SearchBehaviour>,
    tagged: Option<(String, Release)>,
    latest: Option<Release>,
    calls: Rc<Calls>,
}

impl ReleaseHost for StubHost {
    fn repository(&self) -> &Repository {
        &self.repository
    }

    fn latest_release(&self) -> Result<Release, HostError> {
        self.calls.latest_requested.set(true);
        self.latest.clone().ok_or_else(|| HostError::NotFound {
            url: "stub://releases/latest".to_owned(),
        })
    }

    fn release_by_tag(&self, tag: ReleaseTag) -> Result<Release, HostError> {
        match &self.tagged {
            Some((name, release)) if *name == tag.to_string() => Ok(release.clone()),
            _ => Err(HostError::NotFound {
                url: format!("stub://releases/tags/{tag}"),
            }),
        }
    }

    fn search_issues(&self, _query: &str) -> Result<Vec<Issue>, HostError> {
        self.calls.searched.set(true);
        match self.search.clone().unwrap_or(SearchBehaviour::Empty) {
            SearchBehaviour::Issue(number) => Ok(vec![Issue { number }]),
            SearchBehaviour::Empty => Ok(Vec::new()),
            SearchBehaviour::Unavailable => Err(HostError::Http {
                url: "stub://search/issues".to_owned(),
                reason: "connection refused".to_owned(),
            }),
        }
    }
}

/// A stub fetcher that serves fixed bytes for any URL.
struct StubFetcher;

impl AssetFetcher for StubFetcher {
    fn fetch(&self, _url: &str) -> Result<Box<dyn Read>, FetchError> {
        Ok(Box::new(MANIFEST_BYTES))
    }
}

#[derive(Default)]
struct ResolveWorld {
    search: Option<SearchBehaviour>,
    tagged: Option<(String, Release)>,
    latest: Option<Release>,
    calls: Rc<Calls>,
    result: Option<Result<ResolvedManifest, ManifestError>>,
}

#[fixture]
fn world() -> ResolveWorld {
    ResolveWorld::default()
}

fn manifest_release(tag: &str, sha: &str) -> Release {
    let name = format!("MANIFEST-{sha}.json.gz");
    Release {
        tag_name: tag.to_owned(),
        assets: vec![
            Asset::new("README.md", "stub://download/README.md"),
            Asset::new(name.clone(), format!("stub://download/{name}")),
        ],
    }
}

#[given("pull request {number} mentions the commit")]
fn given_pull_request(world: &mut ResolveWorld, number: String) {
    let number = number.parse().expect("numeric pull request");
    world.search = Some(SearchBehaviour::Issue(number));
}

#[given("no pull request mentions the commit")]
fn given_no_pull_request(world: &mut ResolveWorld) {
    world.search = Some(SearchBehaviour::Empty);
}

#[given("the issue search is unavailable")]
fn given_search_unavailable(world: &mut ResolveWorld) {
    world.search = Some(SearchBehaviour::Unavailable);
    world.latest = Some(manifest_release("latest", &"9".repeat(40)));
}

#[given("release \"{tag}\" carries the manifest for \"{sha}\"")]
fn given_tagged_release(world: &mut ResolveWorld, tag: String, sha: String) {
    let release = manifest_release(&tag, &sha);
    world.tagged = Some((tag, release));
}

#[given("release \"{tag}\" has no assets")]
fn given_empty_release(world: &mut ResolveWorld, tag: String) {
    let release = Release {
        tag_name: tag.clone(),
        assets: Vec::new(),
    };
    world.tagged = Some((tag, release));
}

#[given("the latest release carries the manifest for \"{sha}\"")]
fn given_latest_release(world: &mut ResolveWorld, sha: String) {
    world.latest = Some(manifest_release("merge_pr_1", &sha));
}

#[when("commit \"{commit}\" is resolved")]
fn when_resolved(world: &mut ResolveWorld, commit: String) {
    let host = StubHost {
        repository: Repository::wpt(),
        search: world.search.clone(),
        tagged: world.tagged.clone(),
        latest: world.latest.clone(),
        calls: Rc::clone(&world.calls),
    };
    let resolver = Resolver::new(host, StubFetcher);
    let commit = CommitId::try_from(commit.as_str()).expect("valid commit");
    world.result = Some(resolver.resolve(&commit));
}

#[then("the resolved SHA is \"{sha}\"")]
fn then_resolved_sha(world: &mut ResolveWorld, sha: String) {
    match world.result.as_ref().expect("result set") {
        Ok(manifest) => assert_eq!(manifest.sha.as_str(), sha),
        Err(err) => panic!("expected success, got {err}"),
    }
}

#[then("the manifest bytes are returned")]
fn then_bytes_returned(world: &mut ResolveWorld) {
    match world.result.as_ref().expect("result set") {
        Ok(manifest) => assert_eq!(manifest.bytes, MANIFEST_BYTES),
        Err(err) => panic!("expected success, got {err}"),
    }
}

#[then("no issue search was made")]
fn then_no_search(world: &mut ResolveWorld) {
    assert!(!world.calls.searched.get(), "search should not be called");
}

#[then("the latest release was never requested")]
fn then_latest_not_requested(world: &mut ResolveWorld) {
    assert!(
        !world.calls.latest_requested.get(),
        "latest release should not be requested"
    );
}

#[then("resolution fails mentioning \"{keyword}\"")]
fn then_fails_mentioning(world: &mut ResolveWorld, keyword: String) {
    match world.result.as_ref().expect("result set") {
        Ok(manifest) => panic!("expected failure, got {}", manifest.sha),
        Err(err) => {
            let message = err.to_string().to_lowercase();
            assert!(
                message.contains(&keyword.to_lowercase()),
                "expected '{keyword}' in: {err}"
            );
        }
    }
}

#[scenario(
    path = "tests/features/resolve_manifest.feature",
    name = "Abbreviated SHA resolves through the merge release"
)]
fn scenario_sha_resolves(world: ResolveWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/resolve_manifest.feature",
    name = "Latest resolves without searching"
)]
fn scenario_latest_resolves(world: ResolveWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/resolve_manifest.feature",
    name = "Release without assets is reported with its tag"
)]
fn scenario_release_without_assets(world: ResolveWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/resolve_manifest.feature",
    name = "Unknown commit reports missing search results"
)]
fn scenario_unknown_commit(world: ResolveWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/resolve_manifest.feature",
    name = "Search outage is not retried against latest"
)]
fn scenario_search_outage(world: ResolveWorld) {
    let _ = world;
}
