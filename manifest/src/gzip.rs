//! Manifest decompression.
//!
//! Release assets are gzipped JSON. The resolver returns them untouched;
//! callers that want the document itself run it through [`decompress`].

use flate2::read::GzDecoder;
use std::io::Read;

/// Gunzip `bytes` into a new buffer.
///
/// # Errors
///
/// Returns an I/O error if `bytes` is not a valid gzip stream.
pub fn decompress(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(bytes);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}
