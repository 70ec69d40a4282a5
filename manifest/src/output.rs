//! Output helpers for the CLI.
//!
//! Progress and errors go to stderr so that manifest bytes written to
//! stdout stay clean.

use std::io::Write;

/// Write one line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Format the summary line printed after a successful fetch.
#[must_use]
pub fn resolved_message(requested: &str, sha: &str, len: usize, cached: bool) -> String {
    let source = if cached { "cache" } else { "GitHub" };
    format!("Resolved {requested} to {sha} ({len} bytes, from {source})")
}
