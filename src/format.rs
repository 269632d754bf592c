//! CTF binary format types and constants.
//!
//! Defines the header layout, the type-kind tags and the info-word bit fields of the
//! Compact Type Format, version 2. All multi-byte fields are big-endian.

use std::ops::Range;

use crate::error::{CtfError, Result};
use crate::io::read_be_at;

/// Magic number at offset 0 of every CTF container.
pub const CTF_MAGIC: u16 = 0xcff1;

/// The only format version this reader understands.
pub const CTF_VERSION: u8 = 2;

/// Header flag: everything after the header is one zlib stream.
pub const CTF_F_COMPRESS: u8 = 0x1;

/// All flag bits a valid header may carry.
pub const CTF_FLAG_MASK: u8 = CTF_F_COMPRESS;

/// Size of the on-disk header in bytes.
pub const CTF_HEADER_LEN: usize = 36;

/// Struct/union size at or above which members use the long encoding.
pub const CTF_LSTRUCT_THRESH: u16 = 8192;

/// Largest inline size; anything above is followed by a 64-bit extended size.
pub const CTF_MAX_SIZE: u16 = 0xfffe;

/// Inline size value announcing an extended size block.
pub const CTF_LSIZE_SENT: u16 = 0xffff;

/// Mask of the variable-length count in the info word.
pub const CTF_MAX_VLEN: u16 = 0x03ff;

pub const CTF_K_UNKNOWN: u8 = 0;
pub const CTF_K_INTEGER: u8 = 1;
pub const CTF_K_FLOAT: u8 = 2;
pub const CTF_K_POINTER: u8 = 3;
pub const CTF_K_ARRAY: u8 = 4;
pub const CTF_K_FUNCTION: u8 = 5;
pub const CTF_K_STRUCT: u8 = 6;
pub const CTF_K_UNION: u8 = 7;
pub const CTF_K_ENUM: u8 = 8;
pub const CTF_K_FORWARD: u8 = 9;
pub const CTF_K_TYPEDEF: u8 = 10;
pub const CTF_K_VOLATILE: u8 = 11;
pub const CTF_K_CONST: u8 = 12;
pub const CTF_K_RESTRICT: u8 = 13;

/// Kind tag: top 5 bits of the info word.
#[must_use]
pub const fn info_kind(info: u16) -> u8 {
    ((info & 0xf800) >> 11) as u8
}

/// Variable-length count: low 10 bits of the info word.
#[must_use]
pub const fn info_vlen(info: u16) -> u16 {
    info & CTF_MAX_VLEN
}

/// Root flag of the info word (bit 10): the type is visible at file scope.
#[must_use]
pub const fn info_is_root(info: u16) -> bool {
    info & 0x0400 != 0
}

/// Defined type kinds. Raw kinds outside 0..=13 have no variant and decode without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Kind {
    Unknown,
    Integer,
    Float,
    Pointer,
    Array,
    Function,
    Struct,
    Union,
    Enum,
    Forward,
    Typedef,
    Volatile,
    Const,
    Restrict,
}

impl Kind {
    /// Map a raw kind tag; `None` for values the format does not define.
    #[must_use]
    pub fn from_raw(raw: u8) -> Option<Self> {
        Some(match raw {
            CTF_K_UNKNOWN => Kind::Unknown,
            CTF_K_INTEGER => Kind::Integer,
            CTF_K_FLOAT => Kind::Float,
            CTF_K_POINTER => Kind::Pointer,
            CTF_K_ARRAY => Kind::Array,
            CTF_K_FUNCTION => Kind::Function,
            CTF_K_STRUCT => Kind::Struct,
            CTF_K_UNION => Kind::Union,
            CTF_K_ENUM => Kind::Enum,
            CTF_K_FORWARD => Kind::Forward,
            CTF_K_TYPEDEF => Kind::Typedef,
            CTF_K_VOLATILE => Kind::Volatile,
            CTF_K_CONST => Kind::Const,
            CTF_K_RESTRICT => Kind::Restrict,
            _ => return None,
        })
    }

    /// Upper-case label used in dumps.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Kind::Unknown => "UNKNOWN",
            Kind::Integer => "INTEGER",
            Kind::Float => "FLOAT",
            Kind::Pointer => "POINTER",
            Kind::Array => "ARRAY",
            Kind::Function => "FUNCTION",
            Kind::Struct => "STRUCT",
            Kind::Union => "UNION",
            Kind::Enum => "ENUM",
            Kind::Forward => "FORWARD",
            Kind::Typedef => "TYPEDEF",
            Kind::Volatile => "VOLATILE",
            Kind::Const => "CONST",
            Kind::Restrict => "RESTRICT",
        }
    }

    /// Kinds whose size/type field names another type rather than a byte size.
    /// A forward's field is not a type id, so it is not one of them.
    #[must_use]
    pub fn is_reference(self) -> bool {
        matches!(
            self,
            Kind::Pointer
                | Kind::Typedef
                | Kind::Volatile
                | Kind::Const
                | Kind::Restrict
                | Kind::Function
        )
    }
}

/// Parsed CTF header. Read once at open time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CtfHeader {
    pub magic: u16,
    pub version: u8,
    pub flags: u8,
    /// Label in the parent container this one was built against.
    pub parent_label: u32,
    /// String offset of the parent container's name; 0 for a root container.
    pub parent_name: u32,
    pub label_offset: u32,
    pub object_offset: u32,
    pub function_offset: u32,
    /// Start of the type record stream in the working buffer.
    pub type_offset: u32,
    /// End of the type record stream and base for every name offset.
    pub string_offset: u32,
    pub string_len: u32,
}

impl CtfHeader {
    /// Parse and validate the header from its leading bytes.
    ///
    /// Validation order is magic, version, flags; the first violation wins.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < CTF_HEADER_LEN {
            return Err(CtfError::Truncated {
                offset: 0,
                needed: CTF_HEADER_LEN,
                len: bytes.len(),
            });
        }

        let mut offset = 0;
        let magic: u16 = read_be_at(bytes, &mut offset)?;
        let version: u8 = read_be_at(bytes, &mut offset)?;
        let flags: u8 = read_be_at(bytes, &mut offset)?;

        if magic != CTF_MAGIC {
            return Err(CtfError::BadMagic(magic));
        }
        if version != CTF_VERSION {
            return Err(CtfError::UnsupportedVersion(version, CTF_VERSION));
        }
        if flags & !CTF_FLAG_MASK != 0 {
            return Err(CtfError::UnknownFlags(flags));
        }

        Ok(CtfHeader {
            magic,
            version,
            flags,
            parent_label: read_be_at(bytes, &mut offset)?,
            parent_name: read_be_at(bytes, &mut offset)?,
            label_offset: read_be_at(bytes, &mut offset)?,
            object_offset: read_be_at(bytes, &mut offset)?,
            function_offset: read_be_at(bytes, &mut offset)?,
            type_offset: read_be_at(bytes, &mut offset)?,
            string_offset: read_be_at(bytes, &mut offset)?,
            string_len: read_be_at(bytes, &mut offset)?,
        })
    }

    #[must_use]
    pub fn is_compressed(&self) -> bool {
        self.flags & CTF_F_COMPRESS != 0
    }

    /// A child container imports its parent's types; only the flag is exposed here.
    #[must_use]
    pub fn is_child(&self) -> bool {
        self.parent_name != 0
    }

    /// Byte range of the type record stream in the working buffer.
    #[must_use]
    pub fn type_section(&self) -> Range<usize> {
        self.type_offset as usize..self.string_offset as usize
    }

    /// Byte range of the string section in the working buffer.
    #[must_use]
    pub fn string_section(&self) -> Range<usize> {
        let start = self.string_offset as usize;
        start..start.saturating_add(self.string_len as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(magic: u16, version: u8, flags: u8) -> Vec<u8> {
        let mut out = Vec::with_capacity(CTF_HEADER_LEN);
        out.extend_from_slice(&magic.to_be_bytes());
        out.push(version);
        out.push(flags);
        for field in [0u32, 7, 0, 0, 0, 0x10, 0x40, 0x20] {
            out.extend_from_slice(&field.to_be_bytes());
        }
        out
    }

    #[test]
    fn info_word_bit_fields() {
        let info = (u16::from(CTF_K_STRUCT) << 11) | 0x0400 | 3;
        assert_eq!(info_kind(info), CTF_K_STRUCT);
        assert_eq!(info_vlen(info), 3);
        assert!(info_is_root(info));
        assert_eq!(info_kind(0xffff), 31);
        assert_eq!(info_vlen(0xffff), 0x3ff);
    }

    #[test]
    fn kind_from_raw_covers_defined_tags_only() {
        for raw in 0..=13 {
            assert!(Kind::from_raw(raw).is_some(), "kind {raw}");
        }
        assert_eq!(Kind::from_raw(CTF_K_RESTRICT), Some(Kind::Restrict));
        assert_eq!(Kind::from_raw(14), None);
        assert_eq!(Kind::from_raw(31), None);
        assert!(Kind::Typedef.is_reference());
        assert!(Kind::Function.is_reference());
        assert!(!Kind::Struct.is_reference());
        assert!(!Kind::Forward.is_reference());
        assert_eq!(Kind::Restrict.name(), "RESTRICT");
    }

    #[test]
    fn parse_valid_header() {
        let header = CtfHeader::parse(&header_bytes(CTF_MAGIC, 2, 1)).unwrap();
        assert!(header.is_compressed());
        assert!(header.is_child());
        assert_eq!(header.type_section(), 0x10..0x40);
        assert_eq!(header.string_section(), 0x40..0x60);
    }

    #[test]
    fn validation_order_is_magic_version_flags() {
        assert!(matches!(
            CtfHeader::parse(&header_bytes(0xbeef, 9, 0x80)),
            Err(CtfError::BadMagic(0xbeef))
        ));
        assert!(matches!(
            CtfHeader::parse(&header_bytes(CTF_MAGIC, 3, 0x80)),
            Err(CtfError::UnsupportedVersion(3, 2))
        ));
        assert!(matches!(
            CtfHeader::parse(&header_bytes(CTF_MAGIC, 2, 0x02)),
            Err(CtfError::UnknownFlags(0x02))
        ));
    }

    #[test]
    fn short_header_is_truncated() {
        let bytes = header_bytes(CTF_MAGIC, 2, 0);
        assert!(matches!(
            CtfHeader::parse(&bytes[..20]),
            Err(CtfError::Truncated { needed: 36, len: 20, .. })
        ));
    }
}
