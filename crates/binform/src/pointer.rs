//! Forward references resolved through the per-call [`Context`].
//!
//! An [`IdCodec`] registers the codec and value it processes under an id; a
//! later [`PointerCodec`] in the same call looks them up. Both sides process
//! fields in declaration order, so the id must be registered by an earlier
//! field.

use std::fmt;
use std::sync::Arc;

use binform_buffers::{Reader, Writer};

use crate::codec::{Codec, CodecRef, IntoCodec};
use crate::context::{Context, ContextEntry};
use crate::error::Result;
use crate::value::Value;

/// Delegates to `inner` and records `(inner, value)` under `id`.
#[derive(Debug, Clone)]
pub struct IdCodec {
    id: String,
    inner: CodecRef,
}

impl IdCodec {
    pub fn new(id: impl Into<String>, inner: impl IntoCodec) -> Self {
        Self {
            id: id.into(),
            inner: inner.into_codec(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    fn register(&self, value: &Value, ctx: &mut Context) {
        ctx.register(&self.id, self.inner.clone(), value.clone());
    }
}

impl Codec for IdCodec {
    fn validate(&self, value: &Value, ctx: &mut Context) -> bool {
        let valid = self.inner.validate(value, ctx);
        if valid {
            self.register(value, ctx);
        }
        valid
    }

    fn measure(&self, value: &Value, ctx: &mut Context) -> Result<usize> {
        let size = self.inner.measure(value, ctx)?;
        self.register(value, ctx);
        Ok(size)
    }

    fn write(&self, value: &Value, writer: &mut Writer, ctx: &mut Context) -> Result<()> {
        self.inner.write(value, writer, ctx)?;
        self.register(value, ctx);
        Ok(())
    }

    fn read(&self, reader: &mut Reader<'_>, ctx: &mut Context) -> Result<Value> {
        let value = self.inner.read(reader, ctx)?;
        self.register(&value, ctx);
        Ok(value)
    }
}

type Derive = Arc<dyn Fn(&ContextEntry) -> Result<CodecRef> + Send + Sync>;

/// Uses the codec registered under an id, or one derived from the
/// registered entry.
///
/// ```
/// use binform::{BytesCodec, Codec, CodecError, IdCodec, IntCodec, IntWidth, IntoCodec,
///     ObjectCodec, PointerCodec, Value};
///
/// // A one-byte length field followed by exactly that many bytes.
/// let codec = ObjectCodec::new()
///     .field("len", IdCodec::new("len", IntCodec::unsigned(IntWidth::W8)))
///     .field("data", PointerCodec::derive("len", |entry| {
///         let len = entry.value.as_usize().ok_or(CodecError::InvalidValue { expected: "length" })?;
///         Ok(BytesCodec::fixed(len).into_codec())
///     }));
/// let value = Value::object([("len", Value::Int(2)), ("data", Value::Bytes(vec![7, 9]))]);
/// assert_eq!(codec.encode(&value).unwrap(), [2, 7, 9]);
/// assert!(!codec.is_valid(&Value::object([
///     ("len", Value::Int(3)),
///     ("data", Value::Bytes(vec![7, 9])),
/// ])));
/// ```
#[derive(Clone)]
pub struct PointerCodec {
    id: String,
    derive: Option<Derive>,
}

impl fmt::Debug for PointerCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerCodec")
            .field("id", &self.id)
            .field("derived", &self.derive.is_some())
            .finish()
    }
}

impl PointerCodec {
    /// Reuses the codec registered under `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            derive: None,
        }
    }

    /// Builds the codec from the entry registered under `id`.
    pub fn derive<F>(id: impl Into<String>, f: F) -> Self
    where
        F: Fn(&ContextEntry) -> Result<CodecRef> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            derive: Some(Arc::new(f)),
        }
    }

    fn target(&self, ctx: &Context) -> Result<CodecRef> {
        let entry = ctx.resolve(&self.id)?;
        match &self.derive {
            Some(derive) => derive(entry),
            None => Ok(entry.codec.clone()),
        }
    }
}

impl Codec for PointerCodec {
    fn validate(&self, value: &Value, ctx: &mut Context) -> bool {
        match self.target(ctx) {
            Ok(codec) => codec.validate(value, ctx),
            Err(_) => false,
        }
    }

    fn measure(&self, value: &Value, ctx: &mut Context) -> Result<usize> {
        self.target(ctx)?.measure(value, ctx)
    }

    fn write(&self, value: &Value, writer: &mut Writer, ctx: &mut Context) -> Result<()> {
        self.target(ctx)?.write(value, writer, ctx)
    }

    fn read(&self, reader: &mut Reader<'_>, ctx: &mut Context) -> Result<Value> {
        self.target(ctx)?.read(reader, ctx)
    }
}
