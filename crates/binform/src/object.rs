//! Named-field objects and positional tuples.

use binform_buffers::{Reader, Writer};
use indexmap::IndexMap;

use crate::codec::{Codec, CodecRef, IntoCodec};
use crate::context::Context;
use crate::error::{CodecError, Result};
use crate::value::{Value, UNDEFINED};

/// Fields in declaration order over [`Value::Object`]. Neither names nor a
/// field count reach the wire.
///
/// A missing field is read as [`Value::Undefined`], which only optional
/// codecs accept. Fields that decode to `Undefined` are left out of the
/// decoded object. Keys that are not declared make the value invalid.
#[derive(Debug, Clone, Default)]
pub struct ObjectCodec {
    fields: Vec<(String, CodecRef)>,
}

impl ObjectCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field. Declaring a name twice replaces its codec in place.
    pub fn field(mut self, name: impl Into<String>, codec: impl IntoCodec) -> Self {
        let name = name.into();
        let codec = codec.into_codec();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = codec,
            None => self.fields.push((name, codec)),
        }
        self
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    fn declares(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    fn object<'v>(&self, value: &'v Value) -> Result<&'v IndexMap<String, Value>> {
        let fields = value.as_object().ok_or(CodecError::invalid("object"))?;
        if fields.keys().all(|key| self.declares(key)) {
            Ok(fields)
        } else {
            Err(CodecError::invalid("object with declared fields only"))
        }
    }
}

impl Codec for ObjectCodec {
    fn validate(&self, value: &Value, ctx: &mut Context) -> bool {
        let Ok(fields) = self.object(value) else {
            return false;
        };
        self.fields.iter().all(|(name, codec)| {
            codec.validate(fields.get(name).unwrap_or(&UNDEFINED), ctx)
        })
    }

    fn measure(&self, value: &Value, ctx: &mut Context) -> Result<usize> {
        let fields = self.object(value)?;
        let mut size = 0;
        for (name, codec) in &self.fields {
            size += codec.measure(fields.get(name).unwrap_or(&UNDEFINED), ctx)?;
        }
        Ok(size)
    }

    fn write(&self, value: &Value, writer: &mut Writer, ctx: &mut Context) -> Result<()> {
        let fields = self.object(value)?;
        for (name, codec) in &self.fields {
            codec.write(fields.get(name).unwrap_or(&UNDEFINED), writer, ctx)?;
        }
        Ok(())
    }

    fn read(&self, reader: &mut Reader<'_>, ctx: &mut Context) -> Result<Value> {
        let mut out = IndexMap::with_capacity(self.fields.len());
        for (name, codec) in &self.fields {
            let value = codec.read(reader, ctx)?;
            if !value.is_undefined() {
                out.insert(name.clone(), value);
            }
        }
        Ok(Value::Object(out))
    }
}

/// Positional heterogeneous codecs over [`Value::Array`] of exact arity.
#[derive(Debug, Clone)]
pub struct TupleCodec {
    items: Vec<CodecRef>,
}

impl TupleCodec {
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoCodec,
    {
        Self {
            items: items.into_iter().map(IntoCodec::into_codec).collect(),
        }
    }

    fn values<'v>(&self, value: &'v Value) -> Result<&'v [Value]> {
        match value.as_array() {
            Some(values) if values.len() == self.items.len() => Ok(values),
            _ => Err(CodecError::invalid("tuple of matching arity")),
        }
    }
}

impl Codec for TupleCodec {
    fn validate(&self, value: &Value, ctx: &mut Context) -> bool {
        let Ok(values) = self.values(value) else {
            return false;
        };
        self.items
            .iter()
            .zip(values)
            .all(|(codec, value)| codec.validate(value, ctx))
    }

    fn measure(&self, value: &Value, ctx: &mut Context) -> Result<usize> {
        let values = self.values(value)?;
        let mut size = 0;
        for (codec, value) in self.items.iter().zip(values) {
            size += codec.measure(value, ctx)?;
        }
        Ok(size)
    }

    fn write(&self, value: &Value, writer: &mut Writer, ctx: &mut Context) -> Result<()> {
        let values = self.values(value)?;
        for (codec, value) in self.items.iter().zip(values) {
            codec.write(value, writer, ctx)?;
        }
        Ok(())
    }

    fn read(&self, reader: &mut Reader<'_>, ctx: &mut Context) -> Result<Value> {
        let mut values = Vec::with_capacity(self.items.len());
        for codec in &self.items {
            values.push(codec.read(reader, ctx)?);
        }
        Ok(Value::Array(values))
    }
}
