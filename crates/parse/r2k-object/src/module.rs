//! Whole-module decoding.
//!
//! [`ObjectModule::parse`] runs the decode pipeline for one file: header,
//! region layout, string pool, then the three tables.

use alloc::vec::Vec;

use crate::header::{ModuleHeader, ObjError};
use crate::layout::Layout;
use crate::strings::StringPool;
use crate::table::{ReferenceEntry, RelocationEntry, SymbolEntry, read_table};

/// A fully decoded R2K module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectModule {
    /// The module header.
    pub header: ModuleHeader,
    /// Region offsets derived from the header.
    pub layout: Layout,
    /// The string pool.
    pub strings: StringPool,
    /// Relocation records, in file order.
    pub relocations: Vec<RelocationEntry>,
    /// Reference records, in file order.
    pub references: Vec<ReferenceEntry>,
    /// Symbol records, in file order.
    pub symbols: Vec<SymbolEntry>,
}

impl ObjectModule {
    /// Decode a complete module from the bytes of one file.
    ///
    /// The region layout is checked against the file length before any
    /// table or the string pool is read.
    ///
    /// # Errors
    ///
    /// Returns [`ObjError::BadMagic`] if the file is not an R2K module and
    /// [`ObjError::Truncated`] if any declared region runs past the end of
    /// `data`.
    pub fn parse(data: &[u8]) -> Result<Self, ObjError> {
        let header = ModuleHeader::parse(data)?;
        let sections = &header.sections;

        let layout = Layout::new(sections);
        layout.validate(data.len())?;

        let strings = StringPool::read(data, layout.string_pool_offset, sections.string_pool_len)?;
        let relocations = read_table(data, layout.relocation_offset, sections.relocation_count)?;
        let references = read_table(data, layout.reference_offset, sections.reference_count)?;
        let symbols = read_table(data, layout.symbol_offset, sections.symbol_count)?;

        Ok(Self {
            header,
            layout,
            strings,
            relocations,
            references,
            symbols,
        })
    }
}
