//! ctfdump-style text rendering of decoded records.

use std::fmt;

use crate::format::{CtfHeader, Kind};
use crate::types::{float_encoding_name, int_encoding_name, CtfType, TypeData};

fn display_name(ty: &CtfType) -> &str {
    if ty.is_anonymous() {
        "(anon)"
    } else {
        &ty.name
    }
}

/// One record with its 1-based index, in ctfdump layout. Multi-line for structs,
/// unions and enums.
#[derive(Debug, Clone, Copy)]
pub struct TypeLine<'a> {
    pub index: usize,
    pub ty: &'a CtfType,
}

impl fmt::Display for TypeLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let TypeLine { index, ty } = *self;
        let name = display_name(ty);

        match (ty.kind(), &ty.data) {
            (Some(Kind::Integer), TypeData::Integer(enc)) => write!(
                f,
                "  [{index}] INTEGER {name} encoding={} offset={} bits={}",
                int_encoding_name(enc.format()),
                enc.offset(),
                enc.bits()
            ),
            (Some(Kind::Float), TypeData::Float(enc)) => write!(
                f,
                "  [{index}] FLOAT {name} encoding={} offset={} bits={}",
                float_encoding_name(enc.format()),
                enc.offset(),
                enc.bits()
            ),
            (Some(Kind::Array), TypeData::Array(arr)) => write!(
                f,
                "  [{index}] ARRAY {name} content: {} index: {} nelems: {}",
                arr.contents, arr.index, arr.nelems
            ),
            (Some(kind @ (Kind::Struct | Kind::Union)), TypeData::Struct(members))
            | (Some(kind @ (Kind::Struct | Kind::Union)), TypeData::Union(members)) => {
                write!(f, "  [{index}] {} {name} ({} bytes)", kind.name(), ty.size())?;
                for (member, type_index, offset) in members.iter() {
                    let member = if member.is_empty() { "unknown" } else { member };
                    write!(f, "\n\t{member} type={type_index} off={offset}")?;
                }
                Ok(())
            }
            (Some(Kind::Enum), TypeData::Enum(members)) => {
                write!(f, "  [{index}] ENUM {name}")?;
                for member in members {
                    write!(f, "\n\t{} = {}", member.name, member.value)?;
                }
                Ok(())
            }
            (Some(Kind::Function), TypeData::Function(args)) => {
                let list: Vec<String> = args.args.iter().map(u16::to_string).collect();
                let name: &str = if ty.is_anonymous() { "anon" } else { &ty.name };
                write!(
                    f,
                    "  [{index}] FUNCTION ({name}) returns: {} args: ({})",
                    ty.type_ref(),
                    list.join(", ")
                )
            }
            (Some(kind), _) if kind.is_reference() => write!(
                f,
                "  <{index}> {} {name} refers to {}",
                kind.name(),
                ty.type_ref()
            ),
            (Some(kind), _) => write!(f, "  [{index}] {} {name}", kind.name()),
            (None, _) => write!(f, "  [{index}] KIND({}) {name}", ty.kind_raw()),
        }
    }
}

/// Header fields in ctfdump layout, one per line.
#[derive(Debug, Clone, Copy)]
pub struct HeaderLines<'a>(pub &'a CtfHeader);

impl fmt::Display for HeaderLines<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = self.0;
        writeln!(f, "  cth_magic    = {:#x}", header.magic)?;
        writeln!(f, "  cth_version  = {}", header.version)?;
        writeln!(f, "  cth_flags    = {:#x}", header.flags)?;
        writeln!(f, "  cth_parlabel = {}", header.parent_label)?;
        writeln!(f, "  cth_parname  = {}", header.parent_name)?;
        writeln!(f, "  cth_lbloff   = {}", header.label_offset)?;
        writeln!(f, "  cth_objtoff  = {}", header.object_offset)?;
        writeln!(f, "  cth_funcoff  = {}", header.function_offset)?;
        writeln!(f, "  cth_typeoff  = {}", header.type_offset)?;
        writeln!(f, "  cth_stroff   = {}", header.string_offset)?;
        write!(f, "  cth_strlen   = {}", header.string_len)
    }
}

/// Render one record with its 1-based index.
#[must_use]
pub fn format_type(index: usize, ty: &CtfType) -> String {
    TypeLine { index, ty }.to_string()
}

/// Render the header fields, one per line.
#[must_use]
pub fn format_header(header: &CtfHeader) -> String {
    HeaderLines(header).to_string()
}
