//! CTF (Compact Type Format) — reader for the C type graphs embedded in object files.
//!
//! This crate provides:
//! - **Format types** (`format`): header, kind tags, info-word helpers, constants (CTF_MAGIC, etc.).
//! - **Field readers** (`io`): bounds-checked big-endian integers and null-terminated strings.
//! - **Decompression** (`compression`): zlib gate for containers flagged `CTF_F_COMPRESS`.
//! - **Records** (`types`, `decoder`): the decoded type model and the per-record decoder.
//! - **Reader** (`reader`): `CtfReader::open(path)`, `iter_types()` and 1-based `get_type(n)`.
//! - **Dump** (`dump`): ctfdump-style rendering used by the `ctfdump` binary.
//!
//! Child containers are recognized (`is_child`) but their parent's types are not imported.

pub mod compression;
pub mod decoder;
pub mod dump;
pub mod error;
pub mod format;
pub mod io;
pub mod reader;
pub mod types;

pub use decoder::{decode_type, MemberLayout, StringTable};
pub use error::{CtfError, Result};
pub use format::{CtfHeader, Kind, CTF_F_COMPRESS, CTF_HEADER_LEN, CTF_MAGIC, CTF_VERSION};
pub use reader::{read_header, CtfReader, TypeIter};
pub use types::{
    ArrayInfo, CtfType, Encoding, EnumMember, FunctionArgs, LongMember, Member, Members, TypeData,
};
