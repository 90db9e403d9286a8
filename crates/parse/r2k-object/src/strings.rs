//! The string pool.
//!
//! Symbol and reference records name things by byte offset into a pool of
//! NUL-terminated strings at the end of the module. The pool is stored as a
//! sequence of big-endian words, which puts its bytes in file order, so it is
//! kept as an opaque byte buffer and never re-ordered.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

use crate::header::{ObjError, Region};

/// Largest string pool accepted, in bytes.
pub const MAX_STRING_POOL: usize = 16 << 20;

/// An owned copy of a module's string pool plus an index of string starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringPool {
    data: Vec<u8>,
    offsets: Vec<u32>,
}

impl StringPool {
    /// Read a pool of `declared_len` bytes (rounded up to a multiple of 4)
    /// starting at `offset` in `data`.
    ///
    /// Both the size limit and the file bounds are checked before anything
    /// is allocated.
    ///
    /// # Errors
    ///
    /// Returns [`ObjError::StringPoolTooLarge`] if the rounded length exceeds
    /// [`MAX_STRING_POOL`], or [`ObjError::Truncated`] if the pool does not
    /// fit in `data`.
    pub fn read(data: &[u8], offset: u64, declared_len: u32) -> Result<Self, ObjError> {
        let size = u64::from(declared_len).next_multiple_of(4);
        if size > MAX_STRING_POOL as u64 {
            return Err(ObjError::StringPoolTooLarge { len: declared_len });
        }

        let end = offset.saturating_add(size);
        if end > data.len() as u64 {
            return Err(ObjError::Truncated {
                region: Region::StringPool,
                end,
                len: data.len(),
            });
        }

        #[expect(
            clippy::cast_possible_truncation,
            reason = "end was checked against data.len() above"
        )]
        let bytes = &data[offset as usize..end as usize];
        Ok(Self::from_bytes(bytes.to_vec()))
    }

    /// Build a pool from raw bytes and index its strings.
    ///
    /// # Panics
    ///
    /// Panics if `data` is longer than [`MAX_STRING_POOL`].
    #[must_use]
    pub fn from_bytes(data: Vec<u8>) -> Self {
        assert!(data.len() <= MAX_STRING_POOL, "string pool over limit");
        let offsets = index_strings(&data);
        Self { data, offsets }
    }

    /// Pool length in bytes, including trailing padding.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the pool holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw pool bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Start offsets of every non-empty string, in pool order.
    #[must_use]
    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    /// Look up the string starting at `offset`.
    ///
    /// The result runs to the next NUL, or to the end of the pool if there
    /// is none. Offsets need not be one of [`offsets`](Self::offsets): a
    /// reference into the middle of a string yields its tail. Invalid UTF-8
    /// is replaced rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ObjError::InvalidOffset`] if `offset` is not inside the pool.
    pub fn get(&self, offset: u32) -> Result<Cow<'_, str>, ObjError> {
        let start = offset as usize;
        if start >= self.data.len() {
            return Err(ObjError::InvalidOffset {
                offset,
                len: self.data.len(),
            });
        }
        let rest = &self.data[start..];
        let end = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
        Ok(String::from_utf8_lossy(&rest[..end]))
    }

    /// Iterate over every indexed string with its offset.
    pub fn strings(&self) -> impl Iterator<Item = (u32, Cow<'_, str>)> + '_ {
        self.offsets.iter().filter_map(|&off| Some((off, self.get(off).ok()?)))
    }
}

/// Scan for NUL terminators and record where each non-empty string begins.
#[expect(
    clippy::cast_possible_truncation,
    reason = "pool length is capped at MAX_STRING_POOL"
)]
fn index_strings(data: &[u8]) -> Vec<u32> {
    let mut offsets = Vec::new();
    let mut start = 0;
    for (i, &b) in data.iter().enumerate() {
        if b == 0 {
            if i > start {
                offsets.push(start as u32);
            }
            start = i + 1;
        }
    }
    if start < data.len() {
        offsets.push(start as u32);
    }
    offsets
}
