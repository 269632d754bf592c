//! Decompression gate for the post-header payload.
//!
//! A container either stores its sections as-is or as one zlib stream covering
//! everything after the header:
//! - flag clear: the body bytes are the working buffer
//! - `CTF_F_COMPRESS` set: the body is inflated with flate2 into a fresh buffer

use std::io::Read;

use flate2::read::ZlibDecoder;
use log::trace;

use crate::error::{CtfError, Result};
use crate::format::CtfHeader;

/// Produce the working buffer from the raw body bytes that follow the header.
///
/// # Errors
/// Returns [`CtfError::Decompression`] when the compress flag is set and the body is
/// not a valid zlib stream.
pub fn inflate_body(header: &CtfHeader, body: Vec<u8>) -> Result<Vec<u8>> {
    if !header.is_compressed() {
        trace!("No compression, using {} body bytes", body.len());
        return Ok(body);
    }

    let mut output = Vec::with_capacity(body.len().saturating_mul(4));
    ZlibDecoder::new(body.as_slice())
        .read_to_end(&mut output)
        .map_err(CtfError::Decompression)?;
    trace!(
        "Decompressed with Zlib: {} bytes -> {} bytes",
        body.len(),
        output.len()
    );
    Ok(output)
}
