//! Raw byte-sequence codecs.

use binform_buffers::{Reader, Writer};

use crate::codec::{Codec, IntoCodec};
use crate::context::Context;
use crate::error::{CodecError, Result};
use crate::length::Length;
use crate::value::Value;

/// Byte sequence over [`Value::Bytes`], fixed-length or length-prefixed.
///
/// ```
/// use binform::{BytesCodec, Codec, Value};
///
/// let codec = BytesCodec::variable();
/// let bytes = codec.encode(&Value::Bytes(vec![7, 8])).unwrap();
/// assert_eq!(bytes, [2, 7, 8]);
/// ```
#[derive(Debug, Clone)]
pub struct BytesCodec {
    length: Length,
}

impl BytesCodec {
    pub fn fixed(length: usize) -> Self {
        Self {
            length: Length::Fixed(length),
        }
    }

    pub fn variable() -> Self {
        Self {
            length: Length::prefixed(),
        }
    }

    /// Replaces the length prefix codec. No effect on fixed-length codecs.
    pub fn length_codec(self, codec: impl IntoCodec) -> Self {
        Self {
            length: self.length.with_codec(codec),
        }
    }

    fn bytes<'v>(&self, value: &'v Value) -> Result<&'v [u8]> {
        value.as_bytes().ok_or(CodecError::invalid("bytes"))
    }
}

impl Codec for BytesCodec {
    fn validate(&self, value: &Value, ctx: &mut Context) -> bool {
        value
            .as_bytes()
            .is_some_and(|bytes| self.length.accepts(bytes.len(), ctx))
    }

    fn measure(&self, value: &Value, ctx: &mut Context) -> Result<usize> {
        let bytes = self.bytes(value)?;
        Ok(self.length.measure(bytes.len(), ctx)? + bytes.len())
    }

    fn write(&self, value: &Value, writer: &mut Writer, ctx: &mut Context) -> Result<()> {
        let bytes = self.bytes(value)?;
        self.length.write(bytes.len(), writer, ctx)?;
        writer.buf(bytes);
        Ok(())
    }

    fn read(&self, reader: &mut Reader<'_>, ctx: &mut Context) -> Result<Value> {
        let start = reader.x;
        let length = self.length.read(reader, ctx)?;
        match reader.buf(length) {
            Ok(bytes) => Ok(Value::Bytes(bytes.to_vec())),
            Err(err) => {
                reader.x = start;
                Err(err.into())
            }
        }
    }
}

/// A fixed reference byte string.
///
/// Decoding skips the reference length and returns the reference itself; the
/// input bytes are not compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantBytesCodec {
    bytes: Vec<u8>,
    constant_time: bool,
}

impl ConstantBytesCodec {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            constant_time: false,
        }
    }

    /// Compares candidates without early exit, for secret-bearing fields.
    pub fn constant_time(mut self) -> Self {
        self.constant_time = true;
        self
    }

    fn matches(&self, candidate: &[u8]) -> bool {
        if !self.constant_time {
            return candidate == self.bytes.as_slice();
        }
        if candidate.len() != self.bytes.len() {
            return false;
        }
        let diff = candidate
            .iter()
            .zip(&self.bytes)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b));
        std::hint::black_box(diff) == 0
    }

    fn check(&self, value: &Value) -> Result<()> {
        match value.as_bytes() {
            Some(bytes) if self.matches(bytes) => Ok(()),
            _ => Err(CodecError::invalid("constant bytes")),
        }
    }
}

impl Codec for ConstantBytesCodec {
    fn validate(&self, value: &Value, _ctx: &mut Context) -> bool {
        self.check(value).is_ok()
    }

    fn measure(&self, value: &Value, _ctx: &mut Context) -> Result<usize> {
        self.check(value)?;
        Ok(self.bytes.len())
    }

    fn write(&self, value: &Value, writer: &mut Writer, _ctx: &mut Context) -> Result<()> {
        self.check(value)?;
        writer.buf(&self.bytes);
        Ok(())
    }

    fn read(&self, reader: &mut Reader<'_>, _ctx: &mut Context) -> Result<Value> {
        reader.skip(self.bytes.len())?;
        Ok(Value::Bytes(self.bytes.clone()))
    }
}
