//! Configuration for the resolver and the CLI.
//!
//! Values come from an optional TOML file; every key is optional and falls
//! back to the defaults below. Tokens are never read from the file; pass
//! them with `--token` or `GITHUB_TOKEN`.

use crate::github::client::{DEFAULT_API_BASE, Repository};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_OWNER: &str = "web-platform-tests";
const DEFAULT_REPO: &str = "wpt";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CACHE_TTL_SECS: u64 = 600;

/// Resolver and cache settings.
///
/// # Examples
///
/// ```
/// use wpt_manifest::config::Config;
///
/// let config = Config::parse("repo = \"wpt-fork\"").unwrap();
/// assert_eq!(config.repository().to_string(), "web-platform-tests/wpt-fork");
/// assert_eq!(config.http_timeout().as_secs(), 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    api_base: String,
    owner: String,
    repo: String,
    http_timeout_secs: u64,
    cache_ttl_secs: u64,
    cache_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            owner: DEFAULT_OWNER.to_owned(),
            repo: DEFAULT_REPO.to_owned(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            cache_dir: None,
        }
    }
}

/// Errors arising from loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// The file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid configuration TOML.
    #[error("invalid config file {path}: {source}")]
    Parse {
        /// The file that failed to parse.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
}

impl Config {
    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the TOML error for malformed input or unknown keys.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid configuration.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Return the REST API base URL.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Return the repository releases are published in.
    #[must_use]
    pub fn repository(&self) -> Repository {
        Repository::new(self.owner.clone(), self.repo.clone())
    }

    /// Return the per-request timeout.
    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Return the lifetime of cached resolutions.
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Return the configured cache directory, if any.
    #[must_use]
    pub fn cache_dir(&self) -> Option<&Path> {
        self.cache_dir.as_deref()
    }

    /// Override the cache directory.
    pub fn set_cache_dir(&mut self, dir: PathBuf) {
        self.cache_dir = Some(dir);
    }

    /// Override the cache lifetime.
    pub fn set_cache_ttl(&mut self, ttl: Duration) {
        self.cache_ttl_secs = ttl.as_secs();
    }
}
