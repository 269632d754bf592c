//! Error type shared by the header reader, the decompression gate and the type decoder.

use thiserror::Error;

/// Errors produced while opening or decoding a CTF container.
#[derive(Debug, Error)]
pub enum CtfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("bad magic: expected 0xcff1, found {0:#06x}")]
    BadMagic(u16),
    #[error("unsupported version: {0} (supported: {1})")]
    UnsupportedVersion(u8, u8),
    #[error("unknown flags: {0:#04x}")]
    UnknownFlags(u8),
    #[error("decompression failed: {0}")]
    Decompression(#[source] std::io::Error),
    /// The buffer ends before a declared field (or a string terminator) does.
    #[error("truncated record: need {needed} bytes at offset {offset}, buffer holds {len}")]
    Truncated {
        offset: usize,
        needed: usize,
        len: usize,
    },
    /// Type indices are 1-based; 0 and anything past the last record land here.
    #[error("type index out of bounds: {0}")]
    IndexOutOfBounds(usize),
}

/// Convenience `Result` alias using [`CtfError`].
pub type Result<T> = std::result::Result<T, CtfError>;
