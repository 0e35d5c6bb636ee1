//! Binary buffer writer with geometrically growing capacity.

use crate::Endian;

const DEFAULT_CAPACITY: usize = 1024;

/// A binary buffer writer that doubles its capacity whenever a write would
/// overflow it.
///
/// # Example
///
/// ```
/// use binform_buffers::{Endian, Writer};
///
/// let mut writer = Writer::with_capacity(1);
/// writer.u8(0x01);
/// writer.uint(0x0203, 2, Endian::Big);
/// assert_eq!(writer.to_bytes(), [0x01, 0x02, 0x03]);
/// ```
#[derive(Debug, Clone)]
pub struct Writer {
    /// The underlying byte buffer. Its length is the current capacity.
    pub uint8: Vec<u8>,
    /// Current cursor position.
    pub x: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a writer whose first allocation holds exactly `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            uint8: vec![0u8; capacity],
            x: 0,
        }
    }

    /// Number of bytes written since the last flush.
    pub fn len(&self) -> usize {
        self.x
    }

    pub fn is_empty(&self) -> bool {
        self.x == 0
    }

    /// Current allocation size.
    pub fn capacity(&self) -> usize {
        self.uint8.len()
    }

    /// Ensures at least `size` more bytes fit after the cursor, doubling the
    /// allocation until they do. Already written bytes are preserved.
    pub fn ensure_capacity(&mut self, size: usize) {
        let required = self.x + size;
        if required <= self.uint8.len() {
            return;
        }
        let mut capacity = self.uint8.len().max(1);
        while capacity < required {
            capacity *= 2;
        }
        self.uint8.resize(capacity, 0);
    }

    /// Bytes written since the last flush, without consuming them.
    pub fn to_bytes(&self) -> &[u8] {
        &self.uint8[..self.x]
    }

    /// Consumes the writer and returns the bytes written since the last flush.
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.uint8.truncate(self.x);
        self.uint8
    }

    /// Returns the bytes written since the last flush and rewinds the cursor
    /// so the allocation is reused by the next write.
    pub fn flush(&mut self) -> Vec<u8> {
        let result = self.uint8[..self.x].to_vec();
        self.x = 0;
        result
    }

    /// Writes an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.ensure_capacity(1);
        self.uint8[self.x] = val;
        self.x += 1;
    }

    /// Writes the low `size` bytes (1..=8) of `val` in the given byte order.
    #[inline]
    pub fn uint(&mut self, val: u64, size: usize, endian: Endian) {
        debug_assert!((1..=8).contains(&size));
        self.ensure_capacity(size);
        let x = self.x;
        match endian {
            Endian::Big => {
                let bytes = val.to_be_bytes();
                self.uint8[x..x + size].copy_from_slice(&bytes[8 - size..]);
            }
            Endian::Little => {
                let bytes = val.to_le_bytes();
                self.uint8[x..x + size].copy_from_slice(&bytes[..size]);
            }
        }
        self.x += size;
    }

    /// Writes a 32-bit float.
    #[inline]
    pub fn f32(&mut self, val: f32, endian: Endian) {
        self.uint(u64::from(val.to_bits()), 4, endian);
    }

    /// Writes a 64-bit float.
    #[inline]
    pub fn f64(&mut self, val: f64, endian: Endian) {
        self.uint(val.to_bits(), 8, endian);
    }

    /// Writes a byte slice.
    pub fn buf(&mut self, buf: &[u8]) {
        let length = buf.len();
        self.ensure_capacity(length);
        self.uint8[self.x..self.x + length].copy_from_slice(buf);
        self.x += length;
    }

    /// Writes a UTF-8 string. Returns the number of bytes written.
    pub fn utf8(&mut self, s: &str) -> usize {
        self.buf(s.as_bytes());
        s.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8() {
        let mut writer = Writer::new();
        writer.u8(0x01);
        writer.u8(0x02);
        assert_eq!(writer.flush(), [0x01, 0x02]);
    }

    #[test]
    fn test_uint_big_endian_widths() {
        let mut writer = Writer::new();
        writer.uint(0x0102, 2, Endian::Big);
        writer.uint(0x010203, 3, Endian::Big);
        writer.uint(0x0102030405, 5, Endian::Big);
        assert_eq!(
            writer.flush(),
            [0x01, 0x02, 0x01, 0x02, 0x03, 0x01, 0x02, 0x03, 0x04, 0x05]
        );
    }

    #[test]
    fn test_uint_little_endian_widths() {
        let mut writer = Writer::new();
        writer.uint(0x010203, 3, Endian::Little);
        writer.uint(0x010203040506, 6, Endian::Little);
        assert_eq!(
            writer.flush(),
            [0x03, 0x02, 0x01, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]
        );
    }

    #[test]
    fn test_grows_by_doubling_and_keeps_bytes() {
        let mut writer = Writer::with_capacity(2);
        writer.u8(1);
        writer.u8(2);
        assert_eq!(writer.capacity(), 2);
        writer.u8(3);
        assert_eq!(writer.capacity(), 4);
        writer.buf(&[4, 5, 6, 7, 8, 9]);
        assert_eq!(writer.capacity(), 16);
        assert_eq!(writer.to_bytes(), [1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_zero_capacity_grows() {
        let mut writer = Writer::with_capacity(0);
        writer.utf8("hey");
        assert_eq!(writer.to_bytes(), b"hey");
    }

    #[test]
    fn test_flush_multiple() {
        let mut writer = Writer::new();
        writer.u8(0x01);
        assert_eq!(writer.flush(), [0x01]);
        writer.u8(0x02);
        assert_eq!(writer.flush(), [0x02]);
        assert!(writer.is_empty());
    }

    #[test]
    fn test_into_bytes_is_exact() {
        let mut writer = Writer::with_capacity(64);
        writer.utf8("café");
        let data = writer.into_bytes();
        assert_eq!(data.len(), 5);
        assert_eq!(std::str::from_utf8(&data).unwrap(), "café");
    }

    #[test]
    fn test_floats() {
        let mut writer = Writer::new();
        writer.f32(1.5, Endian::Big);
        writer.f64(-2.25, Endian::Little);
        let data = writer.flush();
        assert_eq!(data[..4], 1.5f32.to_be_bytes());
        assert_eq!(data[4..], (-2.25f64).to_le_bytes());
    }
}
