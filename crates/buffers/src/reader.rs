//! Binary buffer reader with cursor tracking.

use std::str;

use crate::{BufferError, Endian};

/// A bounds-checked reader over a borrowed byte slice.
///
/// Every read either consumes exactly the bytes it decodes or fails with
/// [`BufferError::InsufficientBytes`] and leaves the cursor where it was.
///
/// # Example
///
/// ```
/// use binform_buffers::{BufferError, Endian, Reader};
///
/// let data = [0x01, 0x02, 0x03];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.u8(), Ok(0x01));
/// assert_eq!(reader.uint(2, Endian::Little), Ok(0x0302));
/// assert_eq!(
///     reader.u8(),
///     Err(BufferError::InsufficientBytes { needed: 1, available: 0 })
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
    /// End position (exclusive).
    pub end: usize,
}

impl<'a> Reader<'a> {
    pub fn new(uint8: &'a [u8]) -> Self {
        let end = uint8.len();
        Self { uint8, x: 0, end }
    }

    /// Creates a reader whose cursor starts at `x`. Offsets past the end are
    /// clamped so the first read reports the shortage.
    pub fn at(uint8: &'a [u8], x: usize) -> Self {
        let end = uint8.len();
        Self {
            uint8,
            x: x.min(end),
            end,
        }
    }

    /// Returns the number of remaining bytes.
    pub fn size(&self) -> usize {
        self.end - self.x
    }

    /// Checks that `n` more bytes are available from the current cursor.
    #[inline]
    fn check(&self, n: usize) -> Result<(), BufferError> {
        let available = self.size();
        if n > available {
            Err(BufferError::InsufficientBytes {
                needed: n,
                available,
            })
        } else {
            Ok(())
        }
    }

    /// Peeks at the current byte without advancing.
    pub fn peek(&self) -> Result<u8, BufferError> {
        self.check(1)?;
        Ok(self.uint8[self.x])
    }

    /// Advances the cursor by `length` bytes.
    pub fn skip(&mut self, length: usize) -> Result<(), BufferError> {
        self.check(length)?;
        self.x += length;
        Ok(())
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        self.check(1)?;
        let val = self.uint8[self.x];
        self.x += 1;
        Ok(val)
    }

    /// Reads a `size`-byte (1..=8) unsigned integer in the given byte order.
    #[inline]
    pub fn uint(&mut self, size: usize, endian: Endian) -> Result<u64, BufferError> {
        debug_assert!((1..=8).contains(&size));
        self.check(size)?;
        let bytes = &self.uint8[self.x..self.x + size];
        let val = match endian {
            Endian::Big => bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)),
            Endian::Little => bytes
                .iter()
                .rev()
                .fold(0u64, |acc, &b| (acc << 8) | u64::from(b)),
        };
        self.x += size;
        Ok(val)
    }

    /// Reads a 32-bit float.
    #[inline]
    pub fn f32(&mut self, endian: Endian) -> Result<f32, BufferError> {
        let bits = self.uint(4, endian)?;
        Ok(f32::from_bits(bits as u32))
    }

    /// Reads a 64-bit float.
    #[inline]
    pub fn f64(&mut self, endian: Endian) -> Result<f64, BufferError> {
        let bits = self.uint(8, endian)?;
        Ok(f64::from_bits(bits))
    }

    /// Reads `size` raw bytes. The result is a view into the input.
    pub fn buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.check(size)?;
        let x = self.x;
        let end = x + size;
        self.x = end;
        Ok(&self.uint8[x..end])
    }

    /// Reads a UTF-8 string of `size` bytes. The cursor does not move when the
    /// bytes are not valid UTF-8.
    pub fn utf8(&mut self, size: usize) -> Result<&'a str, BufferError> {
        self.check(size)?;
        let start = self.x;
        let text = str::from_utf8(&self.uint8[start..start + size])
            .map_err(|_| BufferError::InvalidUtf8)?;
        self.x += size;
        Ok(text)
    }

    /// View of the bytes consumed between `start` and the cursor.
    pub fn slice_from(&self, start: usize) -> &'a [u8] {
        &self.uint8[start.min(self.x)..self.x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Writer;
    use proptest::prelude::*;

    #[test]
    fn test_u8() {
        let data = [0x01, 0x02, 0x03];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.u8(), Ok(0x01));
        assert_eq!(reader.u8(), Ok(0x02));
        assert_eq!(reader.u8(), Ok(0x03));
    }

    #[test]
    fn test_u8_end_of_buffer() {
        let data: [u8; 0] = [];
        let mut reader = Reader::new(&data);
        assert_eq!(
            reader.u8(),
            Err(BufferError::InsufficientBytes {
                needed: 1,
                available: 0
            })
        );
        // Cursor must not advance on error
        assert_eq!(reader.x, 0);
    }

    #[test]
    fn test_uint_partial_does_not_advance() {
        let data = [0x01u8, 0x02, 0x03];
        let mut reader = Reader::new(&data);
        assert_eq!(
            reader.uint(4, Endian::Big),
            Err(BufferError::InsufficientBytes {
                needed: 4,
                available: 3
            })
        );
        assert_eq!(reader.x, 0);
        assert_eq!(reader.uint(3, Endian::Big), Ok(0x010203));
    }

    proptest! {
        #[test]
        fn prop_uint_round_trips_writer(value in any::<u64>(), size in 1usize..=8, big in any::<bool>()) {
            let endian = if big { Endian::Big } else { Endian::Little };
            let value = if size == 8 { value } else { value & ((1u64 << (8 * size)) - 1) };
            let mut writer = Writer::new();
            writer.uint(value, size, endian);
            let data = writer.flush();
            prop_assert_eq!(data.len(), size);
            let mut reader = Reader::new(&data);
            prop_assert_eq!(reader.uint(size, endian), Ok(value));
            prop_assert_eq!(reader.size(), 0);
        }
    }

    #[test]
    fn test_floats() {
        let mut writer = Writer::new();
        writer.f32(1.5, Endian::Little);
        writer.f64(std::f64::consts::PI, Endian::Big);
        let data = writer.flush();
        let mut reader = Reader::new(&data);
        assert_eq!(reader.f32(Endian::Little), Ok(1.5));
        assert_eq!(reader.f64(Endian::Big), Ok(std::f64::consts::PI));
    }

    #[test]
    fn test_skip() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut reader = Reader::new(&data);
        reader.skip(2).unwrap();
        assert_eq!(reader.u8(), Ok(0x03));
        assert!(reader.skip(2).is_err());
        assert_eq!(reader.x, 3);
    }

    #[test]
    fn test_buf_is_a_view() {
        let data = [1u8, 2, 3, 4, 5];
        let mut reader = Reader::new(&data);
        let view = reader.buf(3).unwrap();
        assert_eq!(view, [1, 2, 3]);
        assert!(std::ptr::eq(view.as_ptr(), data.as_ptr()));
        assert_eq!(reader.x, 3);
    }

    #[test]
    fn test_utf8() {
        let data = b"hello world";
        let mut reader = Reader::new(data);
        assert_eq!(reader.utf8(5), Ok("hello"));
        assert_eq!(reader.utf8(6), Ok(" world"));
    }

    #[test]
    fn test_utf8_invalid() {
        let data = [0xffu8, 0xfe];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.utf8(2), Err(BufferError::InvalidUtf8));
        assert_eq!(reader.x, 0);
    }

    #[test]
    fn test_at_and_slice_from() {
        let data = [9u8, 8, 7, 6];
        let mut reader = Reader::at(&data, 1);
        let start = reader.x;
        reader.skip(2).unwrap();
        assert_eq!(reader.slice_from(start), [8, 7]);
        assert_eq!(Reader::at(&data, 10).size(), 0);
    }

    #[test]
    fn test_peek() {
        let data = [0x55u8];
        let reader = Reader::new(&data);
        assert_eq!(reader.peek(), Ok(0x55));
        assert_eq!(reader.x, 0);
    }
}
