//! Prefix-length variable-size unsigned integers.
//!
//! The first byte reserves its `p` high bits for the number `k` of bytes that
//! follow; the remaining `8 - p` bits hold the high-order part of the value and
//! the `k` following bytes hold the rest, big-endian. Small values stay one
//! byte, and a decoder learns the full size from the first byte alone.
//!
//! | variant | prefix bits | extra bytes | limit (exclusive) |
//! |---|---|---|---|
//! | [`VarIntCodec::v15`] | 1 | ≤ 1 | `2^15` |
//! | [`VarIntCodec::v30`] | 2 | ≤ 3 | `2^30` |
//! | [`VarIntCodec::v60`] | 3 | ≤ 6 | `2^48` |

use binform_buffers::{Endian, Reader, Writer};

use crate::codec::Codec;
use crate::context::Context;
use crate::error::{CodecError, Result};
use crate::value::Value;

/// Variable-length unsigned integer over [`Value::Int`].
///
/// ```
/// use binform::{Codec, Value, VarIntCodec};
///
/// let codec = VarIntCodec::v60();
/// assert_eq!(codec.encode(&Value::Int(31)).unwrap(), [0x1f]);
/// assert_eq!(codec.encode(&Value::Int(32)).unwrap(), [0x20, 0x20]);
/// assert!(!codec.is_valid(&Value::Int(1 << 48)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarIntCodec {
    prefix_bits: u32,
    limit: u64,
}

impl VarIntCodec {
    /// One prefix bit: values below `2^15` in one or two bytes.
    pub const fn v15() -> Self {
        Self {
            prefix_bits: 1,
            limit: 1 << 15,
        }
    }

    /// Two prefix bits: values below `2^30` in one to four bytes.
    pub const fn v30() -> Self {
        Self {
            prefix_bits: 2,
            limit: 1 << 30,
        }
    }

    /// Three prefix bits: values below `2^48` in one to seven bytes. The
    /// default length and index codec of every variable-sized composite.
    pub const fn v60() -> Self {
        Self {
            prefix_bits: 3,
            limit: 1 << 48,
        }
    }

    fn value_bits(&self) -> u32 {
        8 - self.prefix_bits
    }

    /// Number of bytes after the first one needed for `value`.
    fn extra_bytes(&self, value: u64) -> usize {
        let mut k = 0u32;
        while value >> (self.value_bits() + 8 * k) != 0 {
            k += 1;
        }
        k as usize
    }

    fn check(&self, value: &Value) -> Result<u64> {
        let n = value.as_i64().ok_or(CodecError::invalid("integer"))?;
        match u64::try_from(n) {
            Ok(n) if n < self.limit => Ok(n),
            _ => Err(CodecError::out_of_range(n, 0, self.limit - 1)),
        }
    }

    pub(crate) fn write_u64(&self, value: u64, writer: &mut Writer) {
        let k = self.extra_bytes(value);
        let shift = self.value_bits() as usize + 8 * k;
        let combined = ((k as u64) << shift) | value;
        writer.uint(combined, k + 1, Endian::Big);
    }

    pub(crate) fn read_u64(&self, reader: &mut Reader<'_>) -> Result<u64> {
        let first = reader.peek()?;
        let k = usize::from(first >> self.value_bits());
        let combined = reader.uint(k + 1, Endian::Big)?;
        let bits = self.value_bits() as usize + 8 * k;
        let value = combined & ((1u64 << bits) - 1);
        if value >= self.limit {
            return Err(CodecError::out_of_range(value, 0, self.limit - 1));
        }
        Ok(value)
    }
}

impl Default for VarIntCodec {
    fn default() -> Self {
        Self::v60()
    }
}

impl Codec for VarIntCodec {
    fn validate(&self, value: &Value, _ctx: &mut Context) -> bool {
        self.check(value).is_ok()
    }

    fn measure(&self, value: &Value, _ctx: &mut Context) -> Result<usize> {
        let n = self.check(value)?;
        Ok(self.extra_bytes(n) + 1)
    }

    fn write(&self, value: &Value, writer: &mut Writer, _ctx: &mut Context) -> Result<()> {
        let n = self.check(value)?;
        self.write_u64(n, writer);
        Ok(())
    }

    fn read(&self, reader: &mut Reader<'_>, _ctx: &mut Context) -> Result<Value> {
        let n = self.read_u64(reader)?;
        Ok(Value::Int(n as i64))
    }
}
