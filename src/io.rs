//! Primitive field readers: big-endian integers and null-terminated strings.
//!
//! Every CTF field is big-endian. Reads are bounds-checked against the working buffer
//! and report [`CtfError::Truncated`] instead of panicking on short input.

use crate::error::{CtfError, Result};

/// Fixed-width integer that can be decoded from big-endian bytes.
pub trait BeRead: Sized {
    /// Encoded width in bytes.
    const SIZE: usize;

    /// Decode from exactly `SIZE` bytes. Callers guarantee the length.
    fn from_be_slice(bytes: &[u8]) -> Self;
}

macro_rules! impl_be_read {
    ($($ty:ty),*) => {
        $(
            impl BeRead for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn from_be_slice(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    <$ty>::from_be_bytes(raw)
                }
            }
        )*
    };
}

impl_be_read!(u8, u16, u32, u64, i8, i16, i32, i64);

/// Read a big-endian `T` at `*offset` and advance the offset past it.
pub fn read_be_at<T: BeRead>(data: &[u8], offset: &mut usize) -> Result<T> {
    let start = *offset;
    let end = start
        .checked_add(T::SIZE)
        .filter(|&end| end <= data.len())
        .ok_or(CtfError::Truncated {
            offset: start,
            needed: T::SIZE,
            len: data.len(),
        })?;

    *offset = end;
    Ok(T::from_be_slice(&data[start..end]))
}

/// Read the null-terminated string starting at absolute position `pos`.
///
/// The terminator must lie inside `data`. Invalid UTF-8 is replaced, not rejected.
pub fn read_cstr_at(data: &[u8], pos: usize) -> Result<String> {
    let tail = data.get(pos..).ok_or(CtfError::Truncated {
        offset: pos,
        needed: 1,
        len: data.len(),
    })?;
    let nul = tail
        .iter()
        .position(|&b| b == 0)
        .ok_or(CtfError::Truncated {
            offset: pos,
            needed: tail.len() + 1,
            len: data.len(),
        })?;

    Ok(String::from_utf8_lossy(&tail[..nul]).into_owned())
}

/// Cursor over the working buffer. Each decoder owns one, so two walks over the same
/// buffer never share a position.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        ByteCursor { data, pos: 0 }
    }

    /// Cursor positioned at `pos`. Positions past the end are allowed; the next read fails.
    #[must_use]
    pub fn at(data: &'a [u8], pos: usize) -> Self {
        ByteCursor { data, pos }
    }

    #[must_use]
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn read<T: BeRead>(&mut self) -> Result<T> {
        read_be_at(self.data, &mut self.pos)
    }

    /// Read `count` consecutive values of `T`.
    pub fn read_array<T: BeRead>(&mut self, count: usize) -> Result<Vec<T>> {
        let needed = count.saturating_mul(T::SIZE);
        if self.data.len().saturating_sub(self.pos) < needed {
            return Err(CtfError::Truncated {
                offset: self.pos,
                needed,
                len: self.data.len(),
            });
        }
        (0..count).map(|_| self.read()).collect()
    }
}
