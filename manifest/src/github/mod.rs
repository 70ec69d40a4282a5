//! GitHub release host access.
//!
//! # Sub-modules
//!
//! - [`client`] - `ReleaseHost` trait and the `ureq`-backed `GitHubClient`.
//! - [`model`] - Deserialized release, asset, and issue payloads.
//! - [`release_tag`] - Release tag naming (`latest`, `merge_pr_<N>`).

pub mod client;
pub mod model;
pub mod release_tag;
