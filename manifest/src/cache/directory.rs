//! On-disk cache store.
//!
//! Each entry is two files named after the SHA-256 of its key:
//! `<digest>.bin` holds the value and `<digest>.json` records the key and
//! the absolute expiry in Unix milliseconds. Both are written through a
//! temporary file and renamed into place, the sidecar last.

use super::{CacheError, CacheStore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const VALUE_EXTENSION: &str = "bin";
const META_EXTENSION: &str = "json";

#[derive(Debug, Serialize, Deserialize)]
struct EntryMeta {
    key: String,
    expires_at_millis: u64,
}

/// A [`CacheStore`] persisted under a directory.
///
/// Handles on the same directory see each other's entries. The directory
/// is created by the first write.
#[derive(Debug, Clone)]
pub struct DirectoryCacheStore {
    root: PathBuf,
    ttl: Duration,
}

impl DirectoryCacheStore {
    /// Create a store rooted at `root` whose entries live for `ttl`.
    #[must_use]
    pub fn new(root: PathBuf, ttl: Duration) -> Self {
        Self { root, ttl }
    }

    fn entry_path(&self, key: &str, extension: &str) -> PathBuf {
        let digest = format!("{:x}", Sha256::digest(key.as_bytes()));
        self.root.join(format!("{digest}.{extension}"))
    }

    fn read_meta(&self, path: &Path, key: &str) -> Result<Option<EntryMeta>, CacheError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(CacheError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        match serde_json::from_str::<EntryMeta>(&text) {
            Ok(meta) if meta.key == key => Ok(Some(meta)),
            Ok(_) | Err(_) => {
                log::warn!("discarding unreadable cache entry {}", path.display());
                self.remove_entry(key);
                Ok(None)
            }
        }
    }

    fn remove_entry(&self, key: &str) {
        for extension in [META_EXTENSION, VALUE_EXTENSION] {
            let path = self.entry_path(key, extension);
            if let Err(err) = std::fs::remove_file(&path) {
                if err.kind() != ErrorKind::NotFound {
                    log::debug!("could not remove {}: {err}", path.display());
                }
            }
        }
    }

    fn write_atomic(&self, path: &Path, contents: &[u8]) -> Result<(), CacheError> {
        let io_error = |source| CacheError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut file = tempfile::NamedTempFile::new_in(&self.root).map_err(io_error)?;
        file.write_all(contents).map_err(io_error)?;
        file.persist(path).map_err(|err| io_error(err.error))?;
        Ok(())
    }
}

impl CacheStore for DirectoryCacheStore {
    fn ttl(&self) -> Duration {
        self.ttl
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let meta_path = self.entry_path(key, META_EXTENSION);
        let Some(meta) = self.read_meta(&meta_path, key)? else {
            return Ok(None);
        };
        if unix_millis(SystemTime::now()) >= meta.expires_at_millis {
            self.remove_entry(key);
            return Ok(None);
        }

        let value_path = self.entry_path(key, VALUE_EXTENSION);
        match std::fs::read(&value_path) {
            Ok(value) => Ok(Some(value)),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CacheError::Io {
                path: value_path,
                source,
            }),
        }
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.root).map_err(|source| CacheError::Io {
            path: self.root.clone(),
            source,
        })?;

        let meta = EntryMeta {
            key: key.to_owned(),
            expires_at_millis: SystemTime::now()
                .checked_add(self.ttl)
                .map_or(u64::MAX, unix_millis),
        };
        let meta_json =
            serde_json::to_vec(&meta).map_err(|source| CacheError::Encode { source })?;

        self.write_atomic(&self.entry_path(key, VALUE_EXTENSION), value)?;
        self.write_atomic(&self.entry_path(key, META_EXTENSION), &meta_json)
    }
}

fn unix_millis(time: SystemTime) -> u64 {
    let since_epoch = time.duration_since(UNIX_EPOCH).unwrap_or_default();
    u64::try_from(since_epoch.as_millis()).unwrap_or(u64::MAX)
}
