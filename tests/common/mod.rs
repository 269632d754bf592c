//! Fixture builder: assembles CTF container images (header + type section + string section).

#![allow(dead_code)]

use std::io::Write;

use ctf::format::{CTF_F_COMPRESS, CTF_MAGIC, CTF_VERSION};

/// Builds a container whose body is `[type records][string section]`.
pub struct CtfBuilder {
    pub magic: u16,
    pub version: u8,
    pub flags: u8,
    pub parent_name: u32,
    types: Vec<u8>,
    strings: Vec<u8>,
    count: usize,
}

impl CtfBuilder {
    pub fn new() -> Self {
        CtfBuilder {
            magic: CTF_MAGIC,
            version: CTF_VERSION,
            flags: 0,
            parent_name: 0,
            types: Vec::new(),
            // Offset 0 is the empty name.
            strings: vec![0],
            count: 0,
        }
    }

    /// Append a string to the string section and return its offset; "" maps to 0.
    pub fn string(&mut self, s: &str) -> u32 {
        if s.is_empty() {
            return 0;
        }
        let offset = self.strings.len() as u32;
        self.strings.extend_from_slice(s.as_bytes());
        self.strings.push(0);
        offset
    }

    /// Record header: name, info word (kind, vlen), size/type field.
    pub fn record(&mut self, name: &str, kind: u8, vlen: u16, size_or_type: u16) -> &mut Self {
        let name = self.string(name);
        self.count += 1;
        self.u32(name);
        self.u16((u16::from(kind) << 11) | vlen);
        self.u16(size_or_type)
    }

    pub fn u16(&mut self, v: u16) -> &mut Self {
        self.types.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.types.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn i32(&mut self, v: i32) -> &mut Self {
        self.types.extend_from_slice(&v.to_be_bytes());
        self
    }

    /// Short struct/union member.
    pub fn member(&mut self, name: &str, type_index: u16, offset: u16) -> &mut Self {
        let name = self.string(name);
        self.u32(name).u16(type_index).u16(offset)
    }

    /// Long struct/union member; the 64-bit offset is split into hi/lo words.
    pub fn long_member(&mut self, name: &str, type_index: u16, offset: u64) -> &mut Self {
        let name = self.string(name);
        self.u32(name)
            .u16(type_index)
            .u16(0)
            .u32((offset >> 32) as u32)
            .u32(offset as u32)
    }

    pub fn enumerator(&mut self, name: &str, value: i32) -> &mut Self {
        let name = self.string(name);
        self.u32(name).i32(value)
    }

    /// Number of records added through `record`.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn compressed(&mut self) -> &mut Self {
        self.flags |= CTF_F_COMPRESS;
        self
    }

    /// Uncompressed body: type section at 0, string section right after it.
    pub fn body(&self) -> Vec<u8> {
        let mut body = self.types.clone();
        body.extend_from_slice(&self.strings);
        body
    }

    /// Full container image.
    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.magic.to_be_bytes());
        out.push(self.version);
        out.push(self.flags);
        let stroff = self.types.len() as u32;
        for field in [
            0u32,             // parent label
            self.parent_name, // parent name
            0,                // label section
            0,                // object section
            0,                // function section
            0,                // type section
            stroff,
            self.strings.len() as u32,
        ] {
            out.extend_from_slice(&field.to_be_bytes());
        }

        let body = self.body();
        if self.flags & CTF_F_COMPRESS != 0 {
            let mut encoder =
                flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(&body).unwrap();
            out.extend_from_slice(&encoder.finish().unwrap());
        } else {
            out.extend_from_slice(&body);
        }
        out
    }
}

/// A small type graph touching every payload shape.
///
/// 1 int, 2 char, 3 pointer->2, 4 array of 1, 5 function returning 1 (args 1, 3),
/// 6 struct point, 7 union value, 8 enum color, 9 typedef -> 6, 10 const -> 1,
/// 11 float double, 12 forward struct node.
pub fn sample_graph() -> CtfBuilder {
    use ctf::format::*;

    let mut b = CtfBuilder::new();
    b.record("int", CTF_K_INTEGER, 0, 4).u32(0x0100_0020);
    b.record("char", CTF_K_INTEGER, 0, 1).u32(0x0300_0008);
    b.record("", CTF_K_POINTER, 0, 2);
    b.record("", CTF_K_ARRAY, 0, 0).u16(1).u16(1).u32(16);
    b.record("", CTF_K_FUNCTION, 2, 1).u16(1).u16(3);
    b.record("point", CTF_K_STRUCT, 2, 8)
        .member("x", 1, 0)
        .member("y", 1, 32);
    b.record("value", CTF_K_UNION, 2, 4)
        .member("i", 1, 0)
        .member("c", 2, 0);
    b.record("color", CTF_K_ENUM, 3, 4)
        .enumerator("RED", 0)
        .enumerator("GREEN", 1)
        .enumerator("NONE", -1);
    b.record("point_t", CTF_K_TYPEDEF, 0, 6);
    b.record("", CTF_K_CONST, 0, 1);
    b.record("double", CTF_K_FLOAT, 0, 8).u32(0x0200_0040);
    b.record("node", CTF_K_FORWARD, 0, 0);
    b
}
