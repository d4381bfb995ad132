//! A contiguous byte container addressable by 64-bit indices.
//!
//! Internally backed by a `Vec<u8>` addressed via `usize`; true platform-
//! independent 64-bit addressing is left to the host `usize` width (see
//! `DESIGN.md` for the reasoning).

pub struct ByteBuffer {
    data: Vec<u8>,
}

impl ByteBuffer {
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            data: Vec::with_capacity(capacity as usize),
        }
    }

    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn append_byte(&mut self, byte: u8) {
        self.data.push(byte);
    }

    pub fn append(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    pub fn append_buffer(&mut self, other: &ByteBuffer) {
        self.data.extend_from_slice(&other.data);
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn read_u8(&self, index: u64) -> Option<u8> {
        self.data.get(index as usize).copied()
    }

    pub fn write_u8(&mut self, index: u64, value: u8) {
        if let Some(slot) = self.data.get_mut(index as usize) {
            *slot = value;
        }
    }

    pub fn iterate_bytes<F: FnMut(u8)>(&self, mut f: F) {
        for &b in &self.data {
            f(b);
        }
    }

    /// Visits consecutive 4-byte big-endian words. A trailing remainder of
    /// 1-3 bytes (length not a multiple of 4) is silently ignored — the
    /// archive-level CRC computation depends on this behavior.
    pub fn iterate_32bit_words<F: FnMut(u32)>(&self, mut f: F) {
        let whole = self.data.len() - (self.data.len() % 4);
        for chunk in self.data[..whole].chunks_exact(4) {
            let word = u32::from_be_bytes(chunk.try_into().expect("chunk is exactly 4 bytes"));
            f(word);
        }
    }
}

impl Default for ByteBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_read_round_trip() {
        let mut buf = ByteBuffer::with_capacity(16);
        buf.append(b"hello");
        buf.append_byte(b'!');
        assert_eq!(buf.len(), 6);
        assert_eq!(buf.read_u8(0), Some(b'h'));
        assert_eq!(buf.read_u8(5), Some(b'!'));
        assert_eq!(buf.read_u8(6), None);
    }

    #[test]
    fn write_u8_overwrites_in_place() {
        let mut buf = ByteBuffer::new();
        buf.append(&[0, 0, 0]);
        buf.write_u8(1, 0xFF);
        assert_eq!(buf.as_slice(), &[0, 0xFF, 0]);
    }

    #[test]
    fn iterate_32bit_words_ignores_trailing_remainder() {
        let mut buf = ByteBuffer::new();
        buf.append(&[0, 0, 0, 1, 0, 0, 0, 2, 0xAA, 0xBB]); // 2 trailing bytes
        let mut words = Vec::new();
        buf.iterate_32bit_words(|w| words.push(w));
        assert_eq!(words, vec![1, 2]);
    }

    #[test]
    fn iterate_bytes_visits_in_order() {
        let mut buf = ByteBuffer::new();
        buf.append(b"abc");
        let mut seen = Vec::new();
        buf.iterate_bytes(|b| seen.push(b));
        assert_eq!(seen, b"abc".to_vec());
    }
}
