//! Cache-aside resolution.
//!
//! Resolutions take several host round trips, so callers usually keep the
//! result for a while. [`resolve_cached`] does that with any
//! [`ManifestSource`] and any [`CacheStore`] without tying the two
//! together. Cache problems are logged and never fail a resolution.

use crate::asset::ManifestSha;
use crate::cache::CacheStore;
use crate::commit::CommitId;
use crate::error::Result;
use crate::resolver::{ManifestSource, ResolvedManifest};

/// Length of the SHA prefix in an encoded cache value.
const SHA_LEN: usize = 40;

/// Where a resolution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Served from the cache store.
    Cache,
    /// Resolved against the release host.
    Host,
}

/// Return the cache key used for `commit`.
///
/// # Examples
///
/// ```
/// use wpt_manifest::commit::CommitId;
/// use wpt_manifest::memo::cache_key;
///
/// assert_eq!(cache_key(&CommitId::Latest), "manifest:latest");
/// ```
#[must_use]
pub fn cache_key(commit: &CommitId) -> String {
    format!("manifest:{commit}")
}

/// Resolve `commit`, serving from `store` when it holds a live entry.
///
/// On a miss the fresh resolution is written back to `store`.
///
/// # Errors
///
/// Returns the source's error when the cache misses and resolution fails.
pub fn resolve_cached(
    source: &dyn ManifestSource,
    store: &dyn CacheStore,
    commit: &CommitId,
) -> Result<(ResolvedManifest, Provenance)> {
    let key = cache_key(commit);
    match store.get(&key) {
        Ok(Some(value)) => match decode(&value) {
            Some(manifest) => {
                log::debug!("cache hit for {key}");
                return Ok((manifest, Provenance::Cache));
            }
            None => log::warn!("ignoring malformed cache entry for {key}"),
        },
        Ok(None) => log::debug!("cache miss for {key}"),
        Err(err) => log::warn!("cache read failed for {key}: {err}"),
    }

    let manifest = source.resolve(commit)?;
    if let Err(err) = store.put(&key, &encode(&manifest)) {
        log::warn!("cache write failed for {key}: {err}");
    }
    Ok((manifest, Provenance::Host))
}

fn encode(manifest: &ResolvedManifest) -> Vec<u8> {
    let mut value = Vec::with_capacity(SHA_LEN + manifest.bytes.len());
    value.extend_from_slice(manifest.sha.as_str().as_bytes());
    value.extend_from_slice(&manifest.bytes);
    value
}

fn decode(value: &[u8]) -> Option<ResolvedManifest> {
    if value.len() < SHA_LEN {
        return None;
    }
    let (sha, bytes) = value.split_at(SHA_LEN);
    let sha = ManifestSha::try_from(std::str::from_utf8(sha).ok()?).ok()?;
    Some(ResolvedManifest {
        sha,
        bytes: bytes.to_vec(),
    })
}
