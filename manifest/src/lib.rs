//! Manifest resolution for web-platform-tests releases.
//!
//! This crate maps a commit identifier (an abbreviated or full SHA, or the
//! sentinel `latest`) to the `MANIFEST-<sha>.json.gz` asset published on the
//! matching GitHub release, and hands back the canonical SHA together with
//! the raw asset bytes. It also provides time-bounded cache stores that
//! callers can use to memoize those resolutions.
//!
//! # Modules
//!
//! - [`asset`] - Manifest asset filename pattern and asset selection
//! - [`cache`] - Cache store trait, factory, and backends
//! - [`cli`] - Command-line argument definitions
//! - [`commit`] - Commit identifier parsing and lookup strategy
//! - [`config`] - TOML configuration with defaults
//! - [`dirs`] - Platform-specific directory resolution
//! - [`error`] - Resolution error taxonomy
//! - [`fetch`] - Asset download trait and HTTP implementation
//! - [`github`] - GitHub release host client and payload models
//! - [`gzip`] - Manifest decompression helper
//! - [`lookup`] - Release lookup by commit identifier
//! - [`memo`] - Cache-aside resolution for callers
//! - [`output`] - Stderr helpers for the CLI
//! - [`resolver`] - Lookup, selection, and fetch orchestration

pub mod asset;
pub mod cache;
pub mod cli;
pub mod commit;
pub mod config;
pub mod dirs;
pub mod error;
pub mod fetch;
pub mod github;
pub mod gzip;
pub mod lookup;
pub mod memo;
pub mod output;
pub mod resolver;
