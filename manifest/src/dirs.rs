//! Platform directory resolution.
//!
//! Wraps `directories-next` behind a trait so callers and tests can supply
//! their own locations.

use directories_next::ProjectDirs;
use std::path::PathBuf;

/// Source of per-user base directories.
pub trait BaseDirs {
    /// Directory for cached manifests, or `None` when no home is known.
    fn cache_dir(&self) -> Option<PathBuf>;
}

/// [`BaseDirs`] backed by the operating system conventions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBaseDirs;

impl BaseDirs for SystemBaseDirs {
    fn cache_dir(&self) -> Option<PathBuf> {
        ProjectDirs::from("org", "web-platform-tests", "wpt-manifest")
            .map(|dirs| dirs.cache_dir().to_path_buf())
    }
}
