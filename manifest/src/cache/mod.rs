//! Time-bounded key/value stores for memoizing resolutions.
//!
//! The resolver never touches a store; callers build one from a
//! [`CacheStoreFactory`] and decide what to keep in it.
//!
//! # Sub-modules
//!
//! - [`directory`] - On-disk store shared by all handles on one directory.
//! - [`memory`] - In-process store private to one handle.

pub mod directory;
pub mod memory;

use std::path::PathBuf;
use std::time::Duration;

pub use directory::DirectoryCacheStore;
pub use memory::MemoryCacheStore;

/// A read/write byte store whose entries expire a fixed time after writing.
pub trait CacheStore {
    /// Return the lifetime given to entries written through this handle.
    fn ttl(&self) -> Duration;

    /// Read the value stored under `key`, if present and not expired.
    ///
    /// # Errors
    ///
    /// Returns a [`CacheError`] if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`CacheError`] if the backing storage cannot be written.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), CacheError>;
}

/// Errors arising from cache storage.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Reading or writing a cache file failed.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An entry's metadata could not be serialized.
    #[error("failed to encode cache entry: {source}")]
    Encode {
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },
}

/// Where stores produced by a [`CacheStoreFactory`] keep their data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheBackend {
    /// Process memory; each store handle is independent.
    Memory,
    /// Files under a directory shared by every handle pointing at it.
    Directory(PathBuf),
}

/// Builds [`CacheStore`] handles bound to a TTL.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use wpt_manifest::cache::{CacheBackend, CacheStore, CacheStoreFactory};
///
/// let factory = CacheStoreFactory::new(CacheBackend::Memory);
/// let store = factory.new_cache_store(Duration::from_secs(60));
/// store.put("manifest:latest", b"bytes").unwrap();
/// assert_eq!(store.get("manifest:latest").unwrap(), Some(b"bytes".to_vec()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStoreFactory {
    backend: CacheBackend,
}

impl CacheStoreFactory {
    /// Create a factory for `backend`.
    #[must_use]
    pub fn new(backend: CacheBackend) -> Self {
        Self { backend }
    }

    /// Create a new store handle whose entries live for `ttl`.
    ///
    /// Performs no I/O; storage is touched on the first read or write.
    #[must_use]
    pub fn new_cache_store(&self, ttl: Duration) -> Box<dyn CacheStore> {
        match &self.backend {
            CacheBackend::Memory => Box::new(MemoryCacheStore::new(ttl)),
            CacheBackend::Directory(root) => Box::new(DirectoryCacheStore::new(root.clone(), ttl)),
        }
    }
}
