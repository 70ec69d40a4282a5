//! CLI argument definitions for `wpt-manifest`.
//!
//! Kept apart from the entrypoint so that argument parsing can be tested
//! without running a resolution.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Fetch web-platform-tests MANIFEST release assets.
#[derive(Parser, Debug)]
#[command(name = "wpt-manifest")]
#[command(version, about)]
#[command(long_about = concat!(
    "Fetch web-platform-tests MANIFEST release assets.\n\n",
    "Every merged wpt pull request publishes a GitHub release carrying ",
    "MANIFEST-<sha>.json.gz. This tool finds that release for a commit SHA ",
    "(or the latest release) and downloads the manifest.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Download the latest manifest:\n",
    "    $ wpt-manifest fetch latest -o MANIFEST.json.gz\n\n",
    "  Print the decompressed manifest for a commit:\n",
    "    $ wpt-manifest fetch 4f5a1b2 --decompress\n\n",
    "  Bypass the local cache:\n",
    "    $ wpt-manifest fetch latest --no-cache -o MANIFEST.json.gz",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Read settings from this TOML file.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Resolve a commit and download its manifest.
    Fetch(FetchArgs),
}

/// Arguments for the fetch command.
#[derive(Parser, Debug, Clone, Default)]
pub struct FetchArgs {
    /// Commit SHA (7–40 hex characters) or `latest`.
    #[arg(value_name = "COMMIT")]
    pub commit: String,

    /// Write the manifest to this file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<Utf8PathBuf>,

    /// Gunzip the manifest before writing it.
    #[arg(long)]
    pub decompress: bool,

    /// Always resolve against GitHub; do not read or write the cache.
    #[arg(long)]
    pub no_cache: bool,

    /// Cache directory [default: platform-specific].
    #[arg(long, value_name = "DIR", conflicts_with = "no_cache")]
    pub cache_dir: Option<Utf8PathBuf>,

    /// Lifetime of cached resolutions in seconds.
    #[arg(long, value_name = "SECS", conflicts_with = "no_cache")]
    pub cache_ttl: Option<u64>,

    /// GitHub token for API requests.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}
