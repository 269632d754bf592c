//! CTF reader: open a container, validate its header, expose its type records.
//!
//! The body after the header is loaded (and inflated if flagged) once at open time.
//! Records are decoded on demand; nothing is cached between walks.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use log::debug;

use crate::compression::inflate_body;
use crate::decoder::{decode_type, StringTable};
use crate::error::{CtfError, Result};
use crate::format::{CtfHeader, CTF_HEADER_LEN};
use crate::io::ByteCursor;
use crate::types::CtfType;

/// Read and validate the header from the start of `source`.
///
/// Leaves the source positioned just past the header.
pub fn read_header<R: Read + Seek>(source: &mut R) -> Result<CtfHeader> {
    source.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::with_capacity(CTF_HEADER_LEN);
    source
        .by_ref()
        .take(CTF_HEADER_LEN as u64)
        .read_to_end(&mut bytes)?;
    CtfHeader::parse(&bytes)
}

/// CTF container: parsed header plus the working buffer all records are read from.
#[derive(Debug, Clone)]
pub struct CtfReader {
    /// Parsed header.
    pub header: CtfHeader,
    /// Post-header bytes, inflated when the header says so.
    data: Vec<u8>,
}

impl CtfReader {
    /// Open a file holding a raw CTF container (e.g. an extracted `.SUNW_ctf` section).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Read a container from any seekable source.
    pub fn from_reader<R: Read + Seek>(mut source: R) -> Result<Self> {
        let header = read_header(&mut source)?;

        let mut body = Vec::new();
        source.read_to_end(&mut body)?;
        let data = inflate_body(&header, body)?;

        debug!(
            "CTF header: flags={:#x} parent_name={} typeoff={:#x} stroff={:#x} strlen={:#x}",
            header.flags,
            header.parent_name,
            header.type_offset,
            header.string_offset,
            header.string_len
        );
        debug!(
            "working buffer: {} bytes, child container: {}",
            data.len(),
            header.is_child()
        );

        Ok(CtfReader { header, data })
    }

    /// Read a container held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(std::io::Cursor::new(bytes))
    }

    /// Whether this container imports its parent's type namespace.
    #[must_use]
    pub fn is_child(&self) -> bool {
        self.header.is_child()
    }

    /// The working buffer (post-header, decompressed).
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// String section view for resolving arbitrary name offsets.
    #[must_use]
    pub fn strings(&self) -> StringTable<'_> {
        StringTable::new(&self.data, self.header.string_offset as usize)
    }

    /// Lazily decode every type record, starting over from the type section each call.
    #[must_use]
    pub fn iter_types(&self) -> TypeIter<'_> {
        TypeIter {
            cursor: ByteCursor::at(&self.data, self.header.type_offset as usize),
            strings: self.strings(),
            end: self.header.string_offset as usize,
            done: false,
        }
    }

    /// Return the type with the given 1-based index.
    ///
    /// Walks the record stream from the start; records are variable-length. A record
    /// that fails to decode before `index` is reached fails the lookup with its error.
    pub fn get_type(&self, index: usize) -> Result<CtfType> {
        if index == 0 {
            return Err(CtfError::IndexOutOfBounds(index));
        }
        for (i, ty) in self.iter_types().enumerate() {
            let ty = ty?;
            if i + 1 == index {
                return Ok(ty);
            }
        }
        Err(CtfError::IndexOutOfBounds(index))
    }

    /// Number of type records. Fails on the first record that does not decode.
    pub fn type_count(&self) -> Result<usize> {
        self.iter_types()
            .try_fold(0usize, |count, ty| ty.map(|_| count + 1))
    }
}

/// Lazy walk over the type section. Stops at the string section or after the first error.
#[derive(Debug, Clone)]
pub struct TypeIter<'a> {
    cursor: ByteCursor<'a>,
    strings: StringTable<'a>,
    end: usize,
    done: bool,
}

impl Iterator for TypeIter<'_> {
    type Item = Result<CtfType>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.cursor.pos() >= self.end {
            return None;
        }
        let item = decode_type(&mut self.cursor, &self.strings);
        if item.is_err() {
            self.done = true;
        }
        Some(item)
    }
}

impl std::iter::FusedIterator for TypeIter<'_> {}
