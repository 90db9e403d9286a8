//! Decoder for R2K object modules.
//!
//! An R2K module is a big-endian file produced by the R2K assembler and
//! linker: a fixed 52-byte header, the raw section contents, then the
//! relocation, reference and symbol tables, and finally a pool of
//! NUL-terminated strings that the tables refer to by byte offset.
//!
//! Everything is decoded from an in-memory byte slice with explicit bounds
//! checks. Region offsets are derived from the sizes declared in the header
//! and verified against the slice length before any record is read.
//!
//! # Usage
//!
//! ```
//! use r2k_object::ObjectModule;
//!
//! fn dump(data: &[u8]) {
//!     let module = ObjectModule::parse(data).expect("valid module");
//!     for sym in &module.symbols {
//!         let _name = module.strings.get(sym.name_offset).expect("valid name");
//!         // value, flags, name ...
//!     }
//! }
//! ```

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod endian;
pub mod header;
pub mod layout;
pub mod module;
pub mod strings;
pub mod table;

pub use endian::{half_from_big_endian, word_from_big_endian};
pub use header::{
    HEADER_SIZE, ModuleHeader, ModuleKind, ModuleVersion, ObjError, R2K_MAGIC, Region,
    SECTION_COUNT, SectionDescriptor, SectionId, SectionKind, SectionSizes,
};
pub use layout::{Layout, REFERENCE_ENTRY_SIZE, RELOCATION_ENTRY_SIZE, SYMBOL_ENTRY_SIZE};
pub use module::ObjectModule;
pub use strings::{MAX_STRING_POOL, StringPool};
pub use table::{Record, RecordIter, ReferenceEntry, RelocationEntry, SymbolEntry, read_table};
