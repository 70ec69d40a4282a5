//! `wpt-manifest` CLI entrypoint.
//!
//! Resolves a commit to its MANIFEST release asset, memoizing resolutions in
//! a local cache directory, and writes the bytes to a file or stdout.

use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use wpt_manifest::cache::{CacheBackend, CacheStoreFactory};
use wpt_manifest::cli::{Cli, Command, FetchArgs};
use wpt_manifest::commit::CommitId;
use wpt_manifest::config::{Config, ConfigError};
use wpt_manifest::dirs::{BaseDirs, SystemBaseDirs};
use wpt_manifest::error::ManifestError;
use wpt_manifest::gzip::decompress;
use wpt_manifest::memo::{Provenance, resolve_cached};
use wpt_manifest::output::{resolved_message, write_stderr_line};
use wpt_manifest::resolver::{ManifestSource, ResolvedManifest, Resolver};

/// Errors surfaced by the CLI.
#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("manifest {sha} is not valid gzip: {source}")]
    Decompress {
        sha: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write manifest to {target}: {source}")]
    Write {
        target: String,
        #[source]
        source: std::io::Error,
    },
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &SystemBaseDirs, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_err()
    {
        // A subscriber is already installed.
    }
}

fn run(
    cli: &Cli,
    dirs: &dyn BaseDirs,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<(), AppError> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path.as_std_path())?,
        None => Config::default(),
    };

    match &cli.command {
        Command::Fetch(args) => {
            apply_overrides(&mut config, args);
            let resolver = Resolver::from_config(&config, args.token.as_deref());
            let cache_dir = cache_dir_for(&config, args, dirs);
            fetch(
                &resolver,
                &FetchContext {
                    args,
                    cache_dir,
                    cache_ttl: config.cache_ttl(),
                    quiet: cli.quiet,
                },
                stdout,
                stderr,
            )
        }
    }
}

struct FetchContext<'a> {
    args: &'a FetchArgs,
    cache_dir: Option<PathBuf>,
    cache_ttl: Duration,
    quiet: bool,
}

fn apply_overrides(config: &mut Config, args: &FetchArgs) {
    if let Some(dir) = &args.cache_dir {
        config.set_cache_dir(dir.clone().into_std_path_buf());
    }
    if let Some(secs) = args.cache_ttl {
        config.set_cache_ttl(Duration::from_secs(secs));
    }
}

/// Pick the cache directory, or `None` when caching is off or impossible.
fn cache_dir_for(config: &Config, args: &FetchArgs, dirs: &dyn BaseDirs) -> Option<PathBuf> {
    if args.no_cache {
        return None;
    }
    config
        .cache_dir()
        .map(std::path::Path::to_path_buf)
        .or_else(|| dirs.cache_dir())
}

fn fetch(
    source: &dyn ManifestSource,
    context: &FetchContext<'_>,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<(), AppError> {
    let commit: CommitId = context.args.commit.parse()?;

    let (manifest, provenance) = match &context.cache_dir {
        Some(dir) => {
            let factory = CacheStoreFactory::new(CacheBackend::Directory(dir.clone()));
            let store = factory.new_cache_store(context.cache_ttl);
            resolve_cached(source, store.as_ref(), &commit)?
        }
        None => (source.resolve(&commit)?, Provenance::Host),
    };

    if !context.quiet {
        write_stderr_line(
            stderr,
            resolved_message(
                commit.as_str(),
                manifest.sha.as_str(),
                manifest.bytes.len(),
                provenance == Provenance::Cache,
            ),
        );
    }

    write_manifest(&manifest, context.args, stdout)
}

fn write_manifest(
    manifest: &ResolvedManifest,
    args: &FetchArgs,
    stdout: &mut dyn Write,
) -> Result<(), AppError> {
    let decoded;
    let bytes: &[u8] = if args.decompress {
        decoded = decompress(&manifest.bytes).map_err(|source| AppError::Decompress {
            sha: manifest.sha.to_string(),
            source,
        })?;
        &decoded
    } else {
        &manifest.bytes
    };

    match &args.output {
        Some(path) => std::fs::write(path, bytes).map_err(|source| AppError::Write {
            target: path.to_string(),
            source,
        }),
        None => stdout
            .write_all(bytes)
            .and_then(|()| stdout.flush())
            .map_err(|source| AppError::Write {
                target: "stdout".to_owned(),
                source,
            }),
    }
}

fn exit_code_for_run_result(result: Result<(), AppError>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}
