//! Decoded type records.
//!
//! A [`CtfType`] keeps the raw header words of the record next to its resolved name and
//! a kind-specific [`TypeData`] payload. Names are copied out of the string section;
//! the raw offsets are kept so a record can be traced back to the buffer.

use crate::format::{info_is_root, info_kind, info_vlen, Kind, CTF_MAX_SIZE};

/// Integer format flags (top byte of an INTEGER encoding word).
pub const CTF_INT_SIGNED: u8 = 0x01;
pub const CTF_INT_CHAR: u8 = 0x02;
pub const CTF_INT_BOOL: u8 = 0x04;
pub const CTF_INT_VARARGS: u8 = 0x08;

const FP_NAMES: [&str; 12] = [
    "SINGLE", "DOUBLE", "CPLX", "DCPLX", "LDCPLX", "LDOUBLE", "INTRVL", "DINTRVL", "LDINTRVL",
    "IMAGRY", "DIMAGRY", "LDIMAGRY",
];

/// Opaque INTEGER/FLOAT encoding word: format byte, bit offset, bit width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Encoding(pub u32);

impl Encoding {
    #[must_use]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Integer flags or float format, bits 24..32.
    #[must_use]
    pub fn format(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Bit offset of the value within its storage, bits 16..24.
    #[must_use]
    pub fn offset(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Width in bits, bits 0..16.
    #[must_use]
    pub fn bits(self) -> u16 {
        self.0 as u16
    }
}

/// Render integer format flags the way ctfdump prints them. `SIGNED | BOOL` gets a
/// name too; anything else outside the table prints as hex.
#[must_use]
pub fn int_encoding_name(format: u8) -> String {
    const NAMES: [&str; 5] = ["SIGNED", "CHAR", "SIGNED CHAR", "BOOL", "SIGNED BOOL"];

    if format == CTF_INT_VARARGS {
        return "VARARGS".to_string();
    }
    match format {
        1..=5 => NAMES[usize::from(format) - 1].to_string(),
        _ => format!("{format:#x}"),
    }
}

/// Render a float format code.
#[must_use]
pub fn float_encoding_name(format: u8) -> String {
    match format {
        1..=12 => FP_NAMES[usize::from(format) - 1].to_string(),
        _ => format!("{format:#x}"),
    }
}

/// ARRAY payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ArrayInfo {
    pub contents: u16,
    pub index: u16,
    pub nelems: u32,
}

/// FUNCTION payload. Odd argument counts carry one padding slot on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FunctionArgs {
    pub args: Vec<u16>,
    pub padding: Option<u16>,
}

impl FunctionArgs {
    /// Number of 16-bit slots the payload occupied.
    #[must_use]
    pub fn slots(&self) -> usize {
        self.args.len() + usize::from(self.padding.is_some())
    }
}

/// Struct/union member, short form (record size below 8192).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Member {
    pub name_offset: u32,
    pub name: String,
    pub type_index: u16,
    pub offset: u16,
}

/// Struct/union member, long form (record size 8192 and up).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LongMember {
    pub name_offset: u32,
    pub name: String,
    pub type_index: u16,
    pub pad: u16,
    pub offset: u64,
}

/// Member list of a struct or union. One encoding per record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Members {
    Short(Vec<Member>),
    Long(Vec<LongMember>),
}

impl Members {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Members::Short(m) => m.len(),
            Members::Long(m) => m.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn is_long(&self) -> bool {
        matches!(self, Members::Long(_))
    }

    /// `(name, type index, offset)` for every member regardless of encoding.
    pub fn iter(&self) -> Box<dyn Iterator<Item = (&str, u16, u64)> + '_> {
        match self {
            Members::Short(m) => Box::new(
                m.iter()
                    .map(|m| (m.name.as_str(), m.type_index, u64::from(m.offset))),
            ),
            Members::Long(m) => {
                Box::new(m.iter().map(|m| (m.name.as_str(), m.type_index, m.offset)))
            }
        }
    }
}

/// Enumerator.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EnumMember {
    pub name_offset: u32,
    pub name: String,
    pub value: i32,
}

/// Kind-specific payload of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TypeData {
    Integer(Encoding),
    Float(Encoding),
    Array(ArrayInfo),
    Function(FunctionArgs),
    Struct(Members),
    Union(Members),
    Enum(Vec<EnumMember>),
    /// Pointers, typedefs, qualifiers, forwards, UNKNOWN and undefined kinds.
    None,
}

/// One decoded type record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CtfType {
    /// Byte position of the record in the working buffer.
    pub position: usize,
    pub name_offset: u32,
    pub name: String,
    pub info: u16,
    /// Byte size for defining kinds, referenced type index for aliasing kinds.
    pub size_or_type: u16,
    /// Present only when `size_or_type` exceeds [`CTF_MAX_SIZE`].
    pub lsize: Option<u64>,
    pub data: TypeData,
}

impl CtfType {
    #[must_use]
    pub fn kind_raw(&self) -> u8 {
        info_kind(self.info)
    }

    /// `None` when the kind tag is not one the format defines.
    #[must_use]
    pub fn kind(&self) -> Option<Kind> {
        Kind::from_raw(self.kind_raw())
    }

    #[must_use]
    pub fn vlen(&self) -> u16 {
        info_vlen(self.info)
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        info_is_root(self.info)
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }

    /// Authoritative size: the extended size when present, the inline one otherwise.
    #[must_use]
    pub fn size(&self) -> u64 {
        match self.lsize {
            Some(lsize) if self.size_or_type > CTF_MAX_SIZE => lsize,
            _ => u64::from(self.size_or_type),
        }
    }

    /// The union field read as a type index.
    #[must_use]
    pub fn type_ref(&self) -> u16 {
        self.size_or_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_fields() {
        let enc = Encoding(0x0103_0020);
        assert_eq!(enc.format(), CTF_INT_SIGNED);
        assert_eq!(enc.offset(), 3);
        assert_eq!(enc.bits(), 32);
        assert_eq!(enc.raw(), 0x0103_0020);
    }

    #[test]
    fn int_encoding_names_match_ctfdump() {
        assert_eq!(int_encoding_name(CTF_INT_SIGNED), "SIGNED");
        assert_eq!(int_encoding_name(CTF_INT_CHAR), "CHAR");
        assert_eq!(int_encoding_name(CTF_INT_SIGNED | CTF_INT_CHAR), "SIGNED CHAR");
        assert_eq!(int_encoding_name(CTF_INT_BOOL), "BOOL");
        assert_eq!(int_encoding_name(CTF_INT_SIGNED | CTF_INT_BOOL), "SIGNED BOOL");
        assert_eq!(int_encoding_name(CTF_INT_VARARGS), "VARARGS");
        assert_eq!(int_encoding_name(0), "0x0");
        assert_eq!(int_encoding_name(0x10), "0x10");
    }

    #[test]
    fn float_encoding_names() {
        assert_eq!(float_encoding_name(1), "SINGLE");
        assert_eq!(float_encoding_name(2), "DOUBLE");
        assert_eq!(float_encoding_name(12), "LDIMAGRY");
        assert_eq!(float_encoding_name(13), "0xd");
    }

    #[test]
    fn members_iter_widens_short_offsets() {
        let members = Members::Short(vec![Member {
            name_offset: 1,
            name: "a".to_string(),
            type_index: 2,
            offset: 32,
        }]);
        let flat: Vec<_> = members.iter().collect();
        assert_eq!(flat, vec![("a", 2, 32)]);
        assert!(!members.is_long());
    }

    #[test]
    fn size_prefers_extended_block() {
        let mut ty = CtfType {
            position: 0,
            name_offset: 0,
            name: String::new(),
            info: 0,
            size_or_type: 0xffff,
            lsize: Some(0x1_0000_0000),
            data: TypeData::None,
        };
        assert_eq!(ty.size(), 0x1_0000_0000);
        ty.size_or_type = 16;
        ty.lsize = None;
        assert_eq!(ty.size(), 16);
        assert!(ty.is_anonymous());
    }
}
