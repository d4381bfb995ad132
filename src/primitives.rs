//! Big-endian integer codecs, fixed-width name padding, and CRC-32.
//!
//! These are deliberately hand-rolled rather than pulled from a byteorder
//! crate: the format's 48-bit width has no standard type to decode into, and
//! every multi-byte field in TEVD is big-endian regardless of host
//! endianness.

use crc32fast::Hasher as Crc32;

use crate::error::Error;

/// Name fields are a fixed 256-byte window; the first zero byte terminates
/// the logical name.
pub const NAME_WIDTH: usize = 256;

/// Largest value a 48-bit field can hold.
pub const MAX_48BIT: u64 = (1u64 << 48) - 1;

pub fn encode_u16(value: u16) -> [u8; 2] {
    value.to_be_bytes()
}

pub fn decode_u16(buf: &[u8]) -> Result<u16, Error> {
    let arr: [u8; 2] = buf
        .get(..2)
        .ok_or(Error::MalformedInput)?
        .try_into()
        .map_err(|_| Error::MalformedInput)?;
    Ok(u16::from_be_bytes(arr))
}

pub fn encode_u32(value: u32) -> [u8; 4] {
    value.to_be_bytes()
}

pub fn decode_u32(buf: &[u8]) -> Result<u32, Error> {
    let arr: [u8; 4] = buf
        .get(..4)
        .ok_or(Error::MalformedInput)?
        .try_into()
        .map_err(|_| Error::MalformedInput)?;
    Ok(u32::from_be_bytes(arr))
}

pub fn encode_i32(value: i32) -> [u8; 4] {
    value.to_be_bytes()
}

pub fn decode_i32(buf: &[u8]) -> Result<i32, Error> {
    let arr: [u8; 4] = buf
        .get(..4)
        .ok_or(Error::MalformedInput)?
        .try_into()
        .map_err(|_| Error::MalformedInput)?;
    Ok(i32::from_be_bytes(arr))
}

/// Truncates (or zero-extends) `value` into a 6-byte big-endian field.
pub fn encode_u48(value: u64) -> [u8; 6] {
    let full = value.to_be_bytes();
    let mut out = [0u8; 6];
    out.copy_from_slice(&full[2..8]);
    out
}

pub fn decode_u48(buf: &[u8]) -> Result<u64, Error> {
    let six = buf.get(..6).ok_or(Error::MalformedInput)?;
    let mut full = [0u8; 8];
    full[2..8].copy_from_slice(six);
    Ok(u64::from_be_bytes(full))
}

pub fn encode_u64(value: u64) -> [u8; 8] {
    value.to_be_bytes()
}

pub fn decode_u64(buf: &[u8]) -> Result<u64, Error> {
    let arr: [u8; 8] = buf
        .get(..8)
        .ok_or(Error::MalformedInput)?
        .try_into()
        .map_err(|_| Error::MalformedInput)?;
    Ok(u64::from_be_bytes(arr))
}

/// Copies up to `width` bytes of `name` into a zero-padded fixed-size field.
pub fn pad_name(name: &[u8], width: usize) -> Vec<u8> {
    let mut out = vec![0u8; width];
    let n = name.len().min(width);
    out[..n].copy_from_slice(&name[..n]);
    out
}

/// Returns the bytes preceding the first zero byte (or the whole slice, if
/// none is found).
pub fn unpad_name(field: &[u8]) -> Vec<u8> {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    field[..end].to_vec()
}

/// CRC-32 (IEEE 802.3 / zlib polynomial) of an arbitrary byte buffer.
pub fn crc_of(buffer: &[u8]) -> u32 {
    let mut hasher = Crc32::new();
    hasher.update(buffer);
    hasher.finalize()
}

/// Incremental CRC-32 accumulator, used by the archive-level CRC to feed a
/// sequence of big-endian 32-bit words rather than one contiguous buffer.
pub struct CrcAccumulator {
    hasher: Crc32,
}

impl CrcAccumulator {
    pub fn new() -> Self {
        Self {
            hasher: Crc32::new(),
        }
    }

    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    pub fn update_u32_be(&mut self, word: u32) {
        self.hasher.update(&encode_u32(word));
    }

    pub fn finalize(self) -> u32 {
        self.hasher.finalize()
    }
}

impl Default for CrcAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
