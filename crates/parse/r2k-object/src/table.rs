//! Relocation, reference and symbol tables.
//!
//! Each table is a run of fixed-size big-endian records. Name fields are
//! left as string-pool offsets; resolve them with
//! [`StringPool::get`](crate::StringPool::get) when needed.

use alloc::vec::Vec;
use core::marker::PhantomData;

use crate::endian::{be_u32, read_u32};
use crate::header::{ObjError, Region};
use crate::layout::{REFERENCE_ENTRY_SIZE, RELOCATION_ENTRY_SIZE, SYMBOL_ENTRY_SIZE};

/// A fixed-size table record.
pub trait Record: Sized {
    /// On-disk size of one record in bytes.
    const SIZE: u64;
    /// Region reported when the table does not fit in the file.
    const REGION: Region;

    /// Decode one record from `data` at `offset`.
    ///
    /// The caller must ensure `offset + SIZE <= data.len()`.
    fn parse(data: &[u8], offset: usize) -> Self;
}

/// A relocation record: a location that must be patched when linking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelocationEntry {
    /// Address of the item to relocate, relative to its section.
    pub addr: u32,
    /// Section the address lies in.
    pub section: u8,
    /// Relocation type code.
    pub reloc_type: u8,
}

impl Record for RelocationEntry {
    const SIZE: u64 = RELOCATION_ENTRY_SIZE;
    const REGION: Region = Region::RelocationTable;

    fn parse(data: &[u8], offset: usize) -> Self {
        let b = &data[offset..];
        Self {
            addr: be_u32(b, 0),
            section: b[4],
            reloc_type: b[5],
            // 6..8 padding
        }
    }
}

/// A reference record: a use of a symbol that must be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceEntry {
    /// Address of the referencing item.
    pub addr: u32,
    /// String-pool offset of the referenced symbol's name.
    pub symbol_name_offset: u32,
    /// Section the address lies in.
    pub section: u8,
    /// Reference type code.
    pub ref_type: u8,
}

impl Record for ReferenceEntry {
    const SIZE: u64 = REFERENCE_ENTRY_SIZE;
    const REGION: Region = Region::ReferenceTable;

    fn parse(data: &[u8], offset: usize) -> Self {
        let mut pos = offset;
        let addr = read_u32(data, &mut pos);
        let symbol_name_offset = read_u32(data, &mut pos);
        Self {
            addr,
            symbol_name_offset,
            section: data[pos],
            ref_type: data[pos + 1],
        }
    }
}

/// A symbol table record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolEntry {
    /// Symbol flags.
    pub flags: u32,
    /// Symbol value (usually an address).
    pub value: u32,
    /// String-pool offset of the symbol's name.
    pub name_offset: u32,
}

impl Record for SymbolEntry {
    const SIZE: u64 = SYMBOL_ENTRY_SIZE;
    const REGION: Region = Region::SymbolTable;

    fn parse(data: &[u8], offset: usize) -> Self {
        let mut pos = offset;
        Self {
            flags: read_u32(data, &mut pos),
            value: read_u32(data, &mut pos),
            name_offset: read_u32(data, &mut pos),
        }
    }
}

/// An iterator over the records of one table.
pub struct RecordIter<'a, T> {
    data: &'a [u8],
    offset: usize,
    remaining: usize,
    _record: PhantomData<T>,
}

impl<'a, T: Record> RecordIter<'a, T> {
    /// Create an iterator over `count` records starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`ObjError::Truncated`] if the table does not fit in `data`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "table end was checked against data.len()"
    )]
    pub fn new(data: &'a [u8], offset: u64, count: u32) -> Result<Self, ObjError> {
        let end = offset.saturating_add(T::SIZE * u64::from(count));
        if end > data.len() as u64 {
            return Err(ObjError::Truncated {
                region: T::REGION,
                end,
                len: data.len(),
            });
        }
        Ok(Self {
            data,
            offset: offset as usize,
            remaining: count as usize,
            _record: PhantomData,
        })
    }
}

impl<T: Record> Iterator for RecordIter<'_, T> {
    type Item = T;

    #[expect(clippy::cast_possible_truncation, reason = "record sizes are small")]
    fn next(&mut self) -> Option<T> {
        if self.remaining == 0 {
            return None;
        }
        let record = T::parse(self.data, self.offset);
        self.offset += T::SIZE as usize;
        self.remaining -= 1;
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Record> ExactSizeIterator for RecordIter<'_, T> {}

/// Read `count` records starting at `offset`.
///
/// # Errors
///
/// Returns [`ObjError::Truncated`] if the table does not fit in `data`.
pub fn read_table<T: Record>(data: &[u8], offset: u64, count: u32) -> Result<Vec<T>, ObjError> {
    Ok(RecordIter::<T>::new(data, offset, count)?.collect())
}
