//! Type record decoder.
//!
//! One call decodes one record: the common record header, the optional extended size,
//! then the payload selected by the kind tag. Names are resolved against the string
//! section of the same working buffer.

use log::trace;

use crate::error::Result;
use crate::format::{
    info_kind, info_vlen, CTF_K_ARRAY, CTF_K_ENUM, CTF_K_FLOAT, CTF_K_FUNCTION, CTF_K_INTEGER,
    CTF_K_STRUCT, CTF_K_UNION, CTF_LSTRUCT_THRESH, CTF_MAX_SIZE,
};
use crate::io::{read_cstr_at, ByteCursor};
use crate::types::{
    ArrayInfo, CtfType, Encoding, EnumMember, FunctionArgs, LongMember, Member, Members, TypeData,
};

/// View of the string section: names are `base + offset` into the working buffer.
#[derive(Debug, Clone, Copy)]
pub struct StringTable<'a> {
    data: &'a [u8],
    base: usize,
}

impl<'a> StringTable<'a> {
    #[must_use]
    pub fn new(data: &'a [u8], base: usize) -> Self {
        StringTable { data, base }
    }

    /// Resolve a name offset to its null-terminated string.
    pub fn resolve(&self, offset: u32) -> Result<String> {
        read_cstr_at(self.data, self.base.saturating_add(offset as usize))
    }
}

/// Member encoding of a struct/union, fixed once per record by its inline size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberLayout {
    Short,
    Long,
}

impl MemberLayout {
    #[must_use]
    pub fn for_size(size: u16) -> Self {
        if size >= CTF_LSTRUCT_THRESH {
            MemberLayout::Long
        } else {
            MemberLayout::Short
        }
    }
}

/// Decode the record at the cursor and leave the cursor on the next one.
pub fn decode_type(cursor: &mut ByteCursor<'_>, strings: &StringTable<'_>) -> Result<CtfType> {
    let position = cursor.pos();
    let name_offset: u32 = cursor.read()?;
    let name = strings.resolve(name_offset)?;
    let info: u16 = cursor.read()?;
    let size_or_type: u16 = cursor.read()?;

    let lsize = if size_or_type > CTF_MAX_SIZE {
        let hi: u32 = cursor.read()?;
        let lo: u32 = cursor.read()?;
        Some((u64::from(hi) << 32) | u64::from(lo))
    } else {
        None
    };

    let kind = info_kind(info);
    let vlen = usize::from(info_vlen(info));
    trace!("type record at {position:#x}: kind={kind} vlen={vlen} size/type={size_or_type:#x}");

    let data = match kind {
        CTF_K_INTEGER => TypeData::Integer(Encoding(cursor.read()?)),
        CTF_K_FLOAT => TypeData::Float(Encoding(cursor.read()?)),
        CTF_K_ARRAY => TypeData::Array(ArrayInfo {
            contents: cursor.read()?,
            index: cursor.read()?,
            nelems: cursor.read()?,
        }),
        CTF_K_FUNCTION => TypeData::Function(decode_function(cursor, vlen)?),
        CTF_K_STRUCT => TypeData::Struct(decode_members(
            cursor,
            strings,
            vlen,
            MemberLayout::for_size(size_or_type),
        )?),
        CTF_K_UNION => TypeData::Union(decode_members(
            cursor,
            strings,
            vlen,
            MemberLayout::for_size(size_or_type),
        )?),
        CTF_K_ENUM => TypeData::Enum(decode_enum(cursor, strings, vlen)?),
        // Pointers, qualifiers, typedefs, forwards and undefined tags carry nothing more.
        _ => TypeData::None,
    };

    Ok(CtfType {
        position,
        name_offset,
        name,
        info,
        size_or_type,
        lsize,
        data,
    })
}

/// Argument slots are padded to an even count; the pad slot is read and kept.
fn decode_function(cursor: &mut ByteCursor<'_>, vlen: usize) -> Result<FunctionArgs> {
    let mut args = cursor.read_array::<u16>(vlen + (vlen & 1))?;
    let padding = if vlen & 1 == 1 { args.pop() } else { None };
    Ok(FunctionArgs { args, padding })
}

/// Decode `count` struct/union members in the given layout.
pub fn decode_members(
    cursor: &mut ByteCursor<'_>,
    strings: &StringTable<'_>,
    count: usize,
    layout: MemberLayout,
) -> Result<Members> {
    match layout {
        MemberLayout::Short => {
            let mut members = Vec::with_capacity(count);
            for _ in 0..count {
                let name_offset: u32 = cursor.read()?;
                members.push(Member {
                    name_offset,
                    name: strings.resolve(name_offset)?,
                    type_index: cursor.read()?,
                    offset: cursor.read()?,
                });
            }
            Ok(Members::Short(members))
        }
        MemberLayout::Long => {
            let mut members = Vec::with_capacity(count);
            for _ in 0..count {
                let name_offset: u32 = cursor.read()?;
                let name = strings.resolve(name_offset)?;
                let type_index: u16 = cursor.read()?;
                let pad: u16 = cursor.read()?;
                let hi: u32 = cursor.read()?;
                let lo: u32 = cursor.read()?;
                members.push(LongMember {
                    name_offset,
                    name,
                    type_index,
                    pad,
                    offset: (u64::from(hi) << 32) | u64::from(lo),
                });
            }
            Ok(Members::Long(members))
        }
    }
}

fn decode_enum(
    cursor: &mut ByteCursor<'_>,
    strings: &StringTable<'_>,
    count: usize,
) -> Result<Vec<EnumMember>> {
    let mut members = Vec::with_capacity(count);
    for _ in 0..count {
        let name_offset: u32 = cursor.read()?;
        members.push(EnumMember {
            name_offset,
            name: strings.resolve(name_offset)?,
            value: cursor.read()?,
        });
    }
    Ok(members)
}
