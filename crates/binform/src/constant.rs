//! Zero-width constants and enumerations.

use binform_buffers::{Reader, Writer};

use crate::codec::{count_value, read_count, Codec, CodecRef, IntoCodec};
use crate::context::Context;
use crate::error::{CodecError, Result};
use crate::value::Value;
use crate::varint::VarIntCodec;

/// Accepts exactly one value, writes nothing and decodes to that value.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantCodec {
    value: Value,
}

impl ConstantCodec {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The absent marker used by optional codecs.
    pub fn undefined() -> Self {
        Self::new(Value::Undefined)
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    fn check(&self, value: &Value) -> Result<()> {
        if *value == self.value {
            Ok(())
        } else {
            Err(CodecError::invalid("constant"))
        }
    }
}

impl Codec for ConstantCodec {
    fn validate(&self, value: &Value, _ctx: &mut Context) -> bool {
        *value == self.value
    }

    fn measure(&self, value: &Value, _ctx: &mut Context) -> Result<usize> {
        self.check(value)?;
        Ok(0)
    }

    fn write(&self, value: &Value, _writer: &mut Writer, _ctx: &mut Context) -> Result<()> {
        self.check(value)
    }

    fn read(&self, _reader: &mut Reader<'_>, _ctx: &mut Context) -> Result<Value> {
        Ok(self.value.clone())
    }
}

/// Encodes the position of a value in a fixed list.
///
/// ```
/// use binform::{Codec, EnumCodec, Value};
///
/// let codec = EnumCodec::new(["red", "green", "blue"]);
/// assert_eq!(codec.encode(&Value::from("blue")).unwrap(), [2]);
/// assert_eq!(codec.decode(&[1]).unwrap(), Value::from("green"));
/// ```
#[derive(Debug, Clone)]
pub struct EnumCodec {
    values: Vec<Value>,
    index: CodecRef,
}

impl EnumCodec {
    pub fn new<V, I>(values: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            index: VarIntCodec::v60().into_codec(),
        }
    }

    pub fn index_codec(mut self, codec: impl IntoCodec) -> Self {
        self.index = codec.into_codec();
        self
    }

    fn position(&self, value: &Value) -> Result<usize> {
        self.values
            .iter()
            .position(|candidate| candidate == value)
            .ok_or(CodecError::NotInEnumeration)
    }
}

impl Codec for EnumCodec {
    fn validate(&self, value: &Value, ctx: &mut Context) -> bool {
        match self.position(value) {
            Ok(i) => self.index.validate(&count_value(i), ctx),
            Err(_) => false,
        }
    }

    fn measure(&self, value: &Value, ctx: &mut Context) -> Result<usize> {
        let i = self.position(value)?;
        self.index.measure(&count_value(i), ctx)
    }

    fn write(&self, value: &Value, writer: &mut Writer, ctx: &mut Context) -> Result<()> {
        let i = self.position(value)?;
        self.index.write(&count_value(i), writer, ctx)
    }

    fn read(&self, reader: &mut Reader<'_>, ctx: &mut Context) -> Result<Value> {
        let i = read_count(self.index.as_ref(), reader, ctx)?;
        self.values
            .get(i)
            .cloned()
            .ok_or(CodecError::InvalidIndex {
                index: i as i64,
                count: self.values.len(),
            })
    }
}
