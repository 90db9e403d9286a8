//! R2K module header parsing.
//!
//! The header is 52 bytes, all fields big-endian:
//!
//! | Offset | Size | Field                                   |
//! |--------|------|-----------------------------------------|
//! | 0      | 2    | magic (`0xFACE`)                        |
//! | 2      | 2    | version (packed build date)             |
//! | 4      | 4    | reserved                                |
//! | 8      | 4    | entry point (0 for object modules)      |
//! | 12     | 40   | ten section descriptors, 4 bytes each   |

use core::fmt;

use crate::endian::{read_u16, read_u32};

/// Magic number identifying an R2K module.
pub const R2K_MAGIC: u16 = 0xface;

/// Size of the fixed module header in bytes.
pub const HEADER_SIZE: usize = 52;

/// Number of section descriptors in the header.
pub const SECTION_COUNT: usize = 10;

/// A region of the module file, used to report where truncation occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// The fixed 52-byte header.
    Header,
    /// Raw section contents (text through bss).
    Sections,
    /// Relocation records.
    RelocationTable,
    /// Reference records.
    ReferenceTable,
    /// Symbol records.
    SymbolTable,
    /// The string pool.
    StringPool,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Header => "header",
            Self::Sections => "section data",
            Self::RelocationTable => "relocation table",
            Self::ReferenceTable => "reference table",
            Self::SymbolTable => "symbol table",
            Self::StringPool => "string pool",
        };
        f.write_str(name)
    }
}

/// Errors that can occur when decoding an R2K module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjError {
    /// The header magic is not [`R2K_MAGIC`].
    BadMagic {
        /// Magic value actually found.
        found: u16,
    },
    /// A region declared by the header extends past the end of the file.
    Truncated {
        /// Region that would be read past the end.
        region: Region,
        /// File offset one past the last byte the region needs.
        end: u64,
        /// Actual file length.
        len: usize,
    },
    /// A string-pool lookup at or beyond the end of the pool.
    InvalidOffset {
        /// Requested offset.
        offset: u32,
        /// String pool length.
        len: usize,
    },
    /// The declared string pool exceeds [`MAX_STRING_POOL`](crate::MAX_STRING_POOL).
    StringPoolTooLarge {
        /// Declared length in bytes.
        len: u32,
    },
}

impl fmt::Display for ObjError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadMagic { found } => {
                write!(f, "not an R2K object module (magic number {found:#06x})")
            }
            Self::Truncated { region, end, len } => {
                write!(f, "{region} truncated: needs {end} bytes, file has {len}")
            }
            Self::InvalidOffset { offset, len } => {
                write!(f, "string offset {offset:#x} outside {len}-byte string pool")
            }
            Self::StringPoolTooLarge { len } => {
                write!(f, "declared string pool of {len} bytes exceeds limit")
            }
        }
    }
}

impl core::error::Error for ObjError {}

/// Build date packed into the header version field.
///
/// Bits 15..9 hold the year offset, 8..5 the month and 4..0 the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleVersion {
    /// Years since 2000.
    pub year: u8,
    /// Month, 1-12 in well-formed modules.
    pub month: u8,
    /// Day of month, 1-31 in well-formed modules.
    pub day: u8,
}

impl ModuleVersion {
    /// Unpack a raw header version field.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "each field is masked to fit in a byte"
    )]
    pub const fn from_raw(raw: u16) -> Self {
        Self {
            year: ((raw >> 9) & 0x7f) as u8,
            month: ((raw >> 5) & 0x0f) as u8,
            day: (raw & 0x1f) as u8,
        }
    }
}

impl fmt::Display for ModuleVersion {
    /// Renders as `2YYY/MM/DD`. The leading `2` is fixed: year offsets are
    /// always counted from 2000.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "2{:03}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

/// Whether a module still needs linking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    /// Entry point is zero: relocatable, must be linked.
    ObjectModule,
    /// Entry point is non-zero: directly executable.
    LoadModule,
}

/// What a section descriptor's value measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Size of a region in bytes.
    ByteLength,
    /// Number of fixed-size records in a table.
    EntryCount,
}

impl SectionKind {
    /// Unit label used when listing sections.
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::ByteLength => "bytes",
            Self::EntryCount => "entries",
        }
    }
}

/// The ten header sections, in on-disk descriptor order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionId {
    /// Program text.
    Text,
    /// Read-only data.
    Rdata,
    /// Initialized data.
    Data,
    /// Small initialized data.
    Sdata,
    /// Small uninitialized data.
    Sbss,
    /// Uninitialized data.
    Bss,
    /// Relocation table.
    Reloc,
    /// Reference table.
    Ref,
    /// Symbol table.
    Symtab,
    /// String pool.
    Strings,
}

impl SectionId {
    /// All sections in descriptor order.
    pub const ALL: [Self; SECTION_COUNT] = [
        Self::Text,
        Self::Rdata,
        Self::Data,
        Self::Sdata,
        Self::Sbss,
        Self::Bss,
        Self::Reloc,
        Self::Ref,
        Self::Symtab,
        Self::Strings,
    ];

    /// Section name as printed in reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Rdata => "rdata",
            Self::Data => "data",
            Self::Sdata => "sdata",
            Self::Sbss => "sbss",
            Self::Bss => "bss",
            Self::Reloc => "reloc",
            Self::Ref => "ref",
            Self::Symtab => "symtab",
            Self::Strings => "strings",
        }
    }

    /// Whether the descriptor holds a byte length or an entry count.
    #[must_use]
    pub const fn kind(self) -> SectionKind {
        match self {
            Self::Reloc | Self::Ref | Self::Symtab => SectionKind::EntryCount,
            _ => SectionKind::ByteLength,
        }
    }
}

/// One header section descriptor, for ordered display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionDescriptor {
    /// Which section this describes.
    pub id: SectionId,
    /// Byte length or entry count, depending on [`SectionId::kind`].
    pub value: u32,
}

impl SectionDescriptor {
    /// Section name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.id.name()
    }

    /// Descriptor kind.
    #[must_use]
    pub const fn kind(&self) -> SectionKind {
        self.id.kind()
    }
}

/// Decoded section descriptors, by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionSizes {
    /// Text size in bytes.
    pub text: u32,
    /// Read-only data size in bytes.
    pub rdata: u32,
    /// Data size in bytes.
    pub data: u32,
    /// Small data size in bytes.
    pub sdata: u32,
    /// Small bss size in bytes.
    pub sbss: u32,
    /// Bss size in bytes.
    pub bss: u32,
    /// Number of relocation records.
    pub relocation_count: u32,
    /// Number of reference records.
    pub reference_count: u32,
    /// Number of symbol records.
    pub symbol_count: u32,
    /// String pool length in bytes, before rounding to a word multiple.
    pub string_pool_len: u32,
}

impl SectionSizes {
    /// Build from raw descriptor values in on-disk order.
    #[must_use]
    pub const fn from_values(v: [u32; SECTION_COUNT]) -> Self {
        Self {
            text: v[0],
            rdata: v[1],
            data: v[2],
            sdata: v[3],
            sbss: v[4],
            bss: v[5],
            relocation_count: v[6],
            reference_count: v[7],
            symbol_count: v[8],
            string_pool_len: v[9],
        }
    }

    /// Descriptor value for `id`.
    #[must_use]
    pub const fn get(&self, id: SectionId) -> u32 {
        match id {
            SectionId::Text => self.text,
            SectionId::Rdata => self.rdata,
            SectionId::Data => self.data,
            SectionId::Sdata => self.sdata,
            SectionId::Sbss => self.sbss,
            SectionId::Bss => self.bss,
            SectionId::Reloc => self.relocation_count,
            SectionId::Ref => self.reference_count,
            SectionId::Symtab => self.symbol_count,
            SectionId::Strings => self.string_pool_len,
        }
    }

    /// All ten descriptors in on-disk order.
    #[must_use]
    pub fn descriptors(&self) -> [SectionDescriptor; SECTION_COUNT] {
        SectionId::ALL.map(|id| SectionDescriptor {
            id,
            value: self.get(id),
        })
    }

    /// Total size of the byte-length regions that precede the tables.
    #[must_use]
    pub fn byte_regions_size(&self) -> u64 {
        [self.text, self.rdata, self.data, self.sdata, self.sbss, self.bss]
            .into_iter()
            .map(u64::from)
            .sum()
    }
}

/// Parsed R2K module header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleHeader {
    /// Magic number, always [`R2K_MAGIC`] once parsed.
    pub magic: u16,
    /// Raw packed version field; see [`ModuleHeader::version_date`].
    pub version: u16,
    /// Entry point address, zero for object modules.
    pub entry_point: u32,
    /// Section descriptors.
    pub sections: SectionSizes,
}

impl ModuleHeader {
    /// Parse the module header from the start of `data`.
    ///
    /// The magic is checked before anything else is read. A file whose
    /// magic does not match is rejected even if it is shorter than a full
    /// header.
    ///
    /// # Errors
    ///
    /// Returns [`ObjError::BadMagic`] on a magic mismatch and
    /// [`ObjError::Truncated`] if `data` is too short.
    pub fn parse(data: &[u8]) -> Result<Self, ObjError> {
        let truncated = ObjError::Truncated {
            region: Region::Header,
            end: HEADER_SIZE as u64,
            len: data.len(),
        };

        if data.len() < 2 {
            return Err(truncated);
        }
        let mut pos = 0;
        let magic = read_u16(data, &mut pos);
        if magic != R2K_MAGIC {
            return Err(ObjError::BadMagic { found: magic });
        }

        if data.len() < HEADER_SIZE {
            return Err(truncated);
        }
        let version = read_u16(data, &mut pos);
        let _reserved = read_u32(data, &mut pos);
        let entry_point = read_u32(data, &mut pos);
        let values = core::array::from_fn(|_| read_u32(data, &mut pos));

        Ok(Self {
            magic,
            version,
            entry_point,
            sections: SectionSizes::from_values(values),
        })
    }

    /// Unpacked build date.
    #[must_use]
    pub const fn version_date(&self) -> ModuleVersion {
        ModuleVersion::from_raw(self.version)
    }

    /// Object or load module, by entry point.
    #[must_use]
    pub const fn kind(&self) -> ModuleKind {
        if self.entry_point == 0 {
            ModuleKind::ObjectModule
        } else {
            ModuleKind::LoadModule
        }
    }
}
