//! Archive model and the in-memory engine.
//!
//! `Archive` owns every entry of a TEVD archive in a single handle-keyed map
//! (an arena — there is no language-level pointer graph, just handle-valued
//! child lists). `load` and `save` are the in-memory engine's whole-archive
//! deserialize/serialize pair; `insert`/`remove`/`get`/`children_of` are its
//! direct mutators.

use std::collections::BTreeMap;

use rand::Rng;

use crate::buffer::ByteBuffer;
use crate::entry::{Entry, EntryPayload};
use crate::error::Error;
use crate::primitives::{
    decode_u32, decode_u48, encode_u32, encode_u48, pad_name, unpad_name, CrcAccumulator,
};

pub const MAGIC: &[u8; 4] = b"TEVd";
pub const SPEC_VERSION: u8 = 0x03;
pub const DISK_NAME_WIDTH: usize = 32;

/// Archive header: magic(4) + capacity(6) + disk_name(32) + crc(4) + version(1).
pub const ARCHIVE_HEADER_SIZE: u64 = 47;

/// Handle value reserved as the footer sentinel; never assignable to an entry.
pub const FOOTER_SENTINEL: u32 = 0xFEFE_FEFE;
pub const EOF_MARK: [u8; 2] = [0xFF, 0x19];

/// The root directory's handle.
pub const ROOT_HANDLE: i32 = 0;

fn reserved_handle_as_i32() -> i32 {
    FOOTER_SENTINEL as i32
}

pub struct Archive {
    pub capacity: u64,
    pub disk_name: Vec<u8>,
    entries: BTreeMap<i32, Entry>,
    pub footer_bytes: Vec<u8>,
}

impl Archive {
    /// A fresh archive containing only the root directory.
    pub fn new(capacity: u64, disk_name: impl Into<Vec<u8>>) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(ROOT_HANDLE, Entry::new_directory(ROOT_HANDLE, ROOT_HANDLE, Vec::new()));
        Self {
            capacity,
            disk_name: disk_name.into(),
            entries,
            footer_bytes: vec![0u8],
        }
    }

    pub fn insert(&mut self, entry: Entry) {
        self.entries.insert(entry.handle, entry);
    }

    pub fn remove(&mut self, handle: i32) -> Option<Entry> {
        self.entries.remove(&handle)
    }

    pub fn get(&self, handle: i32) -> Option<&Entry> {
        self.entries.get(&handle)
    }

    pub fn get_mut(&mut self, handle: i32) -> Option<&mut Entry> {
        self.entries.get_mut(&handle)
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn children_of(&self, handle: i32) -> Option<&[i32]> {
        match &self.entries.get(&handle)?.payload {
            EntryPayload::Directory(children) => Some(children.as_slice()),
            _ => None,
        }
    }

    /// Draws a uniformly random signed 32-bit handle, rejecting collisions
    /// with existing handles and the reserved footer sentinel.
    pub fn generate_unique_handle<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        let reserved = reserved_handle_as_i32();
        loop {
            let candidate: i32 = rng.gen();
            if candidate != reserved && !self.entries.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// `footer_bytes[0] & 1`, or always-read-only when `capacity == 0`.
    pub fn is_read_only(&self) -> bool {
        if self.capacity == 0 {
            return true;
        }
        self.footer_bytes.first().map(|b| b & 1 != 0).unwrap_or(false)
    }

    /// Sets or clears the read-only bit, leaving the rest of `footer_bytes`
    /// untouched.
    pub fn set_read_only(&mut self, flag: bool) {
        if self.footer_bytes.is_empty() {
            self.footer_bytes.push(0);
        }
        let byte = &mut self.footer_bytes[0];
        if flag {
            *byte |= 1;
        } else {
            *byte &= !1;
        }
    }

    /// CRC-32 over the sorted sequence of per-entry CRCs: order-independent
    /// across however the entry map happens to iterate. The sorted CRCs are
    /// laid out as big-endian words in a `ByteBuffer` and fed to the
    /// accumulator through `iterate_32bit_words`, the routine the format
    /// depends on for this computation.
    pub fn archive_crc(&self) -> Result<u32, Error> {
        let mut crcs: Vec<u32> = self
            .entries
            .values()
            .map(Entry::entry_crc)
            .collect::<Result<_, _>>()?;
        crcs.sort_unstable();

        let mut buffer = ByteBuffer::with_capacity(crcs.len() as u64 * 4);
        for crc in &crcs {
            buffer.append(&encode_u32(*crc));
        }

        let mut acc = CrcAccumulator::new();
        buffer.iterate_32bit_words(|word| acc.update_u32_be(word));
        Ok(acc.finalize())
    }

    /// `HEADER_SIZE + sum(serialized entry sizes) + FOOTER_SIZE + len(footer_bytes)`.
    pub fn used_bytes(&self) -> Result<u64, Error> {
        let mut total = ARCHIVE_HEADER_SIZE;
        for entry in self.entries.values() {
            total += entry.serialized_size()?;
        }
        total += 4 + self.footer_bytes.len() as u64 + EOF_MARK.len() as u64;
        Ok(total)
    }

    /// Serializes the whole archive: header, then all entries (any order —
    /// here, ascending handle order, for determinism), then footer framing.
    pub fn save(&self) -> Result<Vec<u8>, Error> {
        let crc = self.archive_crc()?;

        let mut out = Vec::new();
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&encode_u48(self.capacity));
        out.extend_from_slice(&pad_name(&self.disk_name, DISK_NAME_WIDTH));
        out.extend_from_slice(&encode_u32(crc));
        out.push(SPEC_VERSION);

        for entry in self.entries.values() {
            out.extend_from_slice(&entry.serialize()?);
        }

        out.extend_from_slice(&encode_u32(FOOTER_SENTINEL));
        out.extend_from_slice(&self.footer_bytes);
        out.extend_from_slice(&EOF_MARK);
        Ok(out)
    }

    /// Streaming parse: verify magic, read header, repeatedly parse entries
    /// until the footer sentinel, then read `footer_bytes` up to the EOF
    /// mark. Per-entry and archive-level CRC mismatches are reported, not
    /// tolerated.
    pub fn load(bytes: &[u8]) -> Result<Archive, Error> {
        if (bytes.len() as u64) < ARCHIVE_HEADER_SIZE {
            return Err(Error::MalformedInput);
        }
        if &bytes[0..4] != MAGIC {
            return Err(Error::BadMagic);
        }

        let capacity = decode_u48(&bytes[4..10])?;
        let disk_name = unpad_name(&bytes[10..10 + DISK_NAME_WIDTH]);
        let stored_crc = decode_u32(&bytes[42..46])?;
        // byte 46 is the spec version; round-tripped verbatim, not enforced.

        let mut entries = BTreeMap::new();
        let mut cursor = ARCHIVE_HEADER_SIZE as usize;
        loop {
            let remaining = bytes.get(cursor..).ok_or(Error::MalformedInput)?;
            if remaining.len() < 4 {
                return Err(Error::MalformedInput);
            }
            let peek = decode_u32(&remaining[0..4])?;
            if peek == FOOTER_SENTINEL {
                cursor += 4;
                break;
            }
            let (entry, consumed) = Entry::parse(remaining)?;
            entries.insert(entry.handle, entry);
            cursor += consumed as usize;
        }

        if bytes.len() < cursor + EOF_MARK.len() {
            return Err(Error::MalformedInput);
        }
        let footer_end = bytes.len() - EOF_MARK.len();
        if &bytes[footer_end..] != EOF_MARK {
            return Err(Error::MalformedInput);
        }
        let footer_bytes = bytes[cursor..footer_end].to_vec();

        let archive = Archive {
            capacity,
            disk_name,
            entries,
            footer_bytes,
        };

        if archive.archive_crc()? != stored_crc {
            return Err(Error::ArchiveCorrupt);
        }

        Ok(archive)
    }
}
