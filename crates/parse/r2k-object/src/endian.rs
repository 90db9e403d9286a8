//! Big-endian to host conversion.
//!
//! Every multi-byte field of an R2K module is stored most significant byte
//! first. Raw fields are loaded into a host integer exactly as they sit on
//! disk and then converted with [`word_from_big_endian`] or
//! [`half_from_big_endian`].

/// Convert a 32-bit word loaded verbatim from disk into host order.
#[must_use]
pub const fn word_from_big_endian(raw: u32) -> u32 {
    u32::from_be(raw)
}

/// Convert a 16-bit half word loaded verbatim from disk into host order.
#[must_use]
pub const fn half_from_big_endian(raw: u16) -> u16 {
    u16::from_be(raw)
}

/// Read a big-endian `u16` from `data` at byte offset `off`.
///
/// # Panics
///
/// Panics if `off + 2 > data.len()`. Callers must bounds-check first.
pub(crate) fn be_u16(data: &[u8], off: usize) -> u16 {
    let mut raw = [0u8; 2];
    raw.copy_from_slice(&data[off..off + 2]);
    half_from_big_endian(u16::from_ne_bytes(raw))
}

/// Read a big-endian `u32` from `data` at byte offset `off`.
///
/// # Panics
///
/// Panics if `off + 4 > data.len()`. Callers must bounds-check first.
pub(crate) fn be_u32(data: &[u8], off: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&data[off..off + 4]);
    word_from_big_endian(u32::from_ne_bytes(raw))
}

/// Read a big-endian `u16` at `*pos` and advance past it.
pub(crate) fn read_u16(data: &[u8], pos: &mut usize) -> u16 {
    let v = be_u16(data, *pos);
    *pos += 2;
    v
}

/// Read a big-endian `u32` at `*pos` and advance past it.
pub(crate) fn read_u32(data: &[u8], pos: &mut usize) -> u32 {
    let v = be_u32(data, *pos);
    *pos += 4;
    v
}
