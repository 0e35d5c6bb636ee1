//! The codec contract and the whole-value entry points built on it.

use std::fmt;
use std::sync::Arc;

use binform_buffers::{Reader, Writer};

use crate::context::Context;
use crate::error::{CodecError, Result};
use crate::union::UnionCodec;
use crate::value::Value;

/// Shared handle to a codec. Codec trees are built once and shared freely.
pub type CodecRef = Arc<dyn Codec>;

/// A paired validate / measure / encode / decode unit for one value shape.
///
/// Implementors provide the four context-taking methods; composites call them
/// on their children in a fixed order. External callers use the provided
/// whole-value methods ([`Codec::is_valid`], [`Codec::byte_length`],
/// [`Codec::encode`], [`Codec::decode`]) which set up the per-call [`Context`].
///
/// ```
/// use binform::{BooleanCodec, Codec, ObjectCodec, Value, VarIntCodec};
///
/// let codec = ObjectCodec::new()
///     .field("count", VarIntCodec::v60())
///     .field("flag", BooleanCodec);
/// let value = Value::object([("count", Value::Int(300)), ("flag", Value::Bool(true))]);
///
/// let bytes = codec.encode(&value).unwrap();
/// assert_eq!(bytes, [0x21, 0x2c, 0x01]);
/// assert_eq!(codec.decode(&bytes).unwrap(), value);
/// ```
pub trait Codec: Send + Sync + fmt::Debug {
    /// Whether `value` has a shape this codec can encode.
    fn validate(&self, value: &Value, ctx: &mut Context) -> bool;

    /// Exact number of bytes [`Codec::write`] produces for `value`.
    fn measure(&self, value: &Value, ctx: &mut Context) -> Result<usize>;

    /// Appends the encoding of `value`.
    fn write(&self, value: &Value, writer: &mut Writer, ctx: &mut Context) -> Result<()>;

    /// Reads one value, advancing the reader past exactly its encoding.
    fn read(&self, reader: &mut Reader<'_>, ctx: &mut Context) -> Result<Value>;

    /// Downcast used by union flattening.
    fn as_union(&self) -> Option<&UnionCodec> {
        None
    }

    fn is_valid(&self, value: &Value) -> bool {
        self.validate(value, &mut Context::new())
    }

    fn byte_length(&self, value: &Value) -> Result<usize> {
        self.measure(value, &mut Context::new())
    }

    /// Encodes `value` into a buffer sized by [`Codec::byte_length`].
    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        let mut writer = Writer::with_capacity(0);
        self.encode_with(value, &mut writer, &mut Context::new())?;
        Ok(writer.into_bytes())
    }

    /// Appends the encoding of `value` to `writer` using the caller's
    /// context, e.g. one built with [`Context::with_max_depth`]. Returns the
    /// number of bytes appended.
    ///
    /// The context is cleared between the sizing and the writing pass.
    fn encode_with(
        &self,
        value: &Value,
        writer: &mut Writer,
        ctx: &mut Context,
    ) -> Result<usize> {
        let size = self.measure(value, ctx)?;
        ctx.clear();
        writer.ensure_capacity(size);
        let start = writer.len();
        self.write(value, writer, ctx)?;
        debug_assert_eq!(writer.len() - start, size, "measure and write disagree");
        Ok(size)
    }

    /// Encodes `value` into `dest` starting at `offset`; returns the number of
    /// bytes written.
    fn encode_into(&self, value: &Value, dest: &mut [u8], offset: usize) -> Result<usize> {
        let bytes = self.encode(value)?;
        let available = dest.len().saturating_sub(offset);
        if bytes.len() > available {
            return Err(CodecError::InsufficientSpace {
                needed: bytes.len(),
                available,
            });
        }
        dest[offset..offset + bytes.len()].copy_from_slice(&bytes);
        Ok(bytes.len())
    }

    /// Decodes one value from the start of `bytes`. Trailing bytes are ignored.
    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        self.decode_at(bytes, 0).map(|(value, _)| value)
    }

    /// Decodes one value starting at `offset`; returns it with the offset just
    /// past its encoding.
    fn decode_at(&self, bytes: &[u8], offset: usize) -> Result<(Value, usize)> {
        self.decode_with(bytes, offset, &mut Context::new())
    }

    /// [`Codec::decode_at`] with the caller's context.
    fn decode_with(
        &self,
        bytes: &[u8],
        offset: usize,
        ctx: &mut Context,
    ) -> Result<(Value, usize)> {
        if offset > bytes.len() {
            return Err(CodecError::InsufficientBytes {
                needed: offset - bytes.len(),
                available: 0,
            });
        }
        let mut reader = Reader::at(bytes, offset);
        let value = self.read(&mut reader, ctx)?;
        Ok((value, reader.x))
    }
}

/// Conversion into a [`CodecRef`], accepted by every composite constructor.
pub trait IntoCodec {
    fn into_codec(self) -> CodecRef;
}

impl<C: Codec + 'static> IntoCodec for C {
    fn into_codec(self) -> CodecRef {
        Arc::new(self)
    }
}

impl IntoCodec for CodecRef {
    fn into_codec(self) -> CodecRef {
        self
    }
}

/// Reads a length or index through `codec`, rejecting anything that is not a
/// non-negative integer.
pub(crate) fn read_count(
    codec: &dyn Codec,
    reader: &mut Reader<'_>,
    ctx: &mut Context,
) -> Result<usize> {
    codec
        .read(reader, ctx)?
        .as_usize()
        .ok_or(CodecError::invalid("non-negative length"))
}

pub(crate) fn count_value(count: usize) -> Value {
    Value::Int(count as i64)
}
