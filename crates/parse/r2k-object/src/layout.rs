//! File offsets of the variable-length regions.
//!
//! Regions follow the header back to back, in this order:
//!
//! ```text
//! header | text rdata data sdata sbss bss | reloc | ref | symtab | strings
//! ```
//!
//! Nothing in the file records where a region starts; every offset is
//! derived from the sizes declared in the header.

use crate::header::{HEADER_SIZE, ObjError, Region, SectionSizes};

/// On-disk size of a relocation record: address, section, type, 2 bytes padding.
pub const RELOCATION_ENTRY_SIZE: u64 = 8;

/// On-disk size of a reference record.
pub const REFERENCE_ENTRY_SIZE: u64 = 12;

/// On-disk size of a symbol record.
pub const SYMBOL_ENTRY_SIZE: u64 = 12;

/// Byte offsets of each region, computed from the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Start of the relocation table (end of the byte-length sections).
    pub relocation_offset: u64,
    /// Start of the reference table.
    pub reference_offset: u64,
    /// Start of the symbol table.
    pub symbol_offset: u64,
    /// Start of the string pool.
    pub string_pool_offset: u64,
    /// String pool length rounded up to a multiple of 4.
    pub string_pool_size: u64,
}

impl Layout {
    /// Derive region offsets from the header's section descriptors.
    ///
    /// The string pool offset is the running sum of everything before it;
    /// the table offsets are then taken backwards from it. All arithmetic
    /// is in `u64`, so no declared combination of `u32` sizes can overflow.
    #[must_use]
    pub fn new(sections: &SectionSizes) -> Self {
        let relocations = RELOCATION_ENTRY_SIZE * u64::from(sections.relocation_count);
        let references = REFERENCE_ENTRY_SIZE * u64::from(sections.reference_count);
        let symbols = SYMBOL_ENTRY_SIZE * u64::from(sections.symbol_count);

        let string_pool_offset =
            HEADER_SIZE as u64 + sections.byte_regions_size() + relocations + references + symbols;
        let symbol_offset = string_pool_offset - symbols;
        let reference_offset = symbol_offset - references;
        let relocation_offset = reference_offset - relocations;

        Self {
            relocation_offset,
            reference_offset,
            symbol_offset,
            string_pool_offset,
            string_pool_size: u64::from(sections.string_pool_len).next_multiple_of(4),
        }
    }

    /// One past the last byte of the module.
    #[must_use]
    pub fn end(&self) -> u64 {
        self.string_pool_offset + self.string_pool_size
    }

    /// Check every region against a file of `file_len` bytes.
    ///
    /// Regions are checked in file order so the error names the first one
    /// that runs past the end.
    ///
    /// # Errors
    ///
    /// Returns [`ObjError::Truncated`] for the first region that does not fit.
    pub fn validate(&self, file_len: usize) -> Result<(), ObjError> {
        let regions = [
            (Region::Sections, self.relocation_offset),
            (Region::RelocationTable, self.reference_offset),
            (Region::ReferenceTable, self.symbol_offset),
            (Region::SymbolTable, self.string_pool_offset),
            (Region::StringPool, self.end()),
        ];
        for (region, end) in regions {
            if end > file_len as u64 {
                return Err(ObjError::Truncated {
                    region,
                    end,
                    len: file_len,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(bytes: [u32; 6], reloc: u32, refs: u32, syms: u32, strings: u32) -> SectionSizes {
        let [a, b, c, d, e, f] = bytes;
        SectionSizes::from_values([a, b, c, d, e, f, reloc, refs, syms, strings])
    }

    #[test]
    fn empty_module_layout() {
        let layout = Layout::new(&SectionSizes::default());
        assert_eq!(layout.relocation_offset, 52);
        assert_eq!(layout.string_pool_offset, 52);
        assert_eq!(layout.end(), 52);
        assert_eq!(layout.validate(52), Ok(()));
    }

    #[test]
    fn offsets_accumulate_in_file_order() {
        let layout = Layout::new(&sizes([12, 4, 8, 0, 16, 32], 2, 3, 4, 10));
        // bss and sbss sizes count toward the byte regions as declared.
        assert_eq!(layout.relocation_offset, 52 + 72);
        assert_eq!(layout.reference_offset, 52 + 72 + 2 * 8);
        assert_eq!(layout.symbol_offset, 52 + 72 + 2 * 8 + 3 * 12);
        assert_eq!(layout.string_pool_offset, 52 + 72 + 2 * 8 + 3 * 12 + 4 * 12);
        assert_eq!(layout.string_pool_size, 12);
        assert_eq!(layout.end(), layout.string_pool_offset + 12);
    }

    #[test]
    fn offsets_are_ordered() {
        let counts = [0u32, 1, 7, 1000, u32::MAX];
        for &reloc in &counts {
            for &refs in &counts {
                for &syms in &counts {
                    let l = Layout::new(&sizes([u32::MAX; 6], reloc, refs, syms, 0));
                    assert!(l.relocation_offset <= l.reference_offset);
                    assert!(l.reference_offset <= l.symbol_offset);
                    assert!(l.symbol_offset <= l.string_pool_offset);
                    assert_eq!(l.relocation_offset, 52 + 6 * u64::from(u32::MAX));
                }
            }
        }
    }

    #[test]
    fn string_pool_rounds_to_word() {
        for (declared, rounded) in [(0, 0), (1, 4), (4, 4), (5, 8), (u32::MAX, 1 << 32)] {
            let l = Layout::new(&sizes([0; 6], 0, 0, 0, declared));
            assert_eq!(l.string_pool_size, rounded);
        }
    }

    #[test]
    fn validate_names_first_short_region() {
        let layout = Layout::new(&sizes([8, 0, 0, 0, 0, 0], 1, 1, 1, 4));
        let full = usize::try_from(layout.end()).unwrap();
        assert_eq!(layout.validate(full), Ok(()));

        let cases = [
            (59, Region::Sections, 60),
            (60, Region::RelocationTable, 68),
            (70, Region::ReferenceTable, 80),
            (91, Region::SymbolTable, 92),
            (95, Region::StringPool, 96),
        ];
        for (len, region, end) in cases {
            assert_eq!(
                layout.validate(len),
                Err(ObjError::Truncated { region, end, len })
            );
        }
    }

    #[test]
    fn huge_declared_counts_are_truncation_not_overflow() {
        let layout = Layout::new(&sizes([0; 6], u32::MAX, u32::MAX, u32::MAX, u32::MAX));
        assert!(matches!(
            layout.validate(4096),
            Err(ObjError::Truncated { region: Region::RelocationTable, .. })
        ));
    }
}
