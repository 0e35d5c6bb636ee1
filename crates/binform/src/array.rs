//! Homogeneous sequences: arrays and key-value records.

use binform_buffers::{Reader, Writer};

use crate::codec::{Codec, CodecRef, IntoCodec};
use crate::context::Context;
use crate::error::{CodecError, Result};
use crate::length::Length;
use crate::value::Value;

/// Items of one codec over [`Value::Array`], fixed count or count-prefixed.
#[derive(Debug, Clone)]
pub struct ArrayCodec {
    item: CodecRef,
    length: Length,
}

impl ArrayCodec {
    pub fn fixed(item: impl IntoCodec, length: usize) -> Self {
        Self {
            item: item.into_codec(),
            length: Length::Fixed(length),
        }
    }

    pub fn variable(item: impl IntoCodec) -> Self {
        Self {
            item: item.into_codec(),
            length: Length::prefixed(),
        }
    }

    pub fn length_codec(self, codec: impl IntoCodec) -> Self {
        Self {
            length: self.length.with_codec(codec),
            ..self
        }
    }

    fn items<'v>(&self, value: &'v Value) -> Result<&'v [Value]> {
        value.as_array().ok_or(CodecError::invalid("array"))
    }
}

impl Codec for ArrayCodec {
    fn validate(&self, value: &Value, ctx: &mut Context) -> bool {
        let Some(items) = value.as_array() else {
            return false;
        };
        self.length.accepts(items.len(), ctx) && items.iter().all(|item| self.item.validate(item, ctx))
    }

    fn measure(&self, value: &Value, ctx: &mut Context) -> Result<usize> {
        let items = self.items(value)?;
        let mut size = self.length.measure(items.len(), ctx)?;
        for item in items {
            size += self.item.measure(item, ctx)?;
        }
        Ok(size)
    }

    fn write(&self, value: &Value, writer: &mut Writer, ctx: &mut Context) -> Result<()> {
        let items = self.items(value)?;
        self.length.write(items.len(), writer, ctx)?;
        for item in items {
            self.item.write(item, writer, ctx)?;
        }
        Ok(())
    }

    fn read(&self, reader: &mut Reader<'_>, ctx: &mut Context) -> Result<Value> {
        let count = self.length.read(reader, ctx)?;
        // Capacity is bounded by the remaining input.
        let mut items = Vec::with_capacity(count.min(reader.size()));
        for _ in 0..count {
            items.push(self.item.read(reader, ctx)?);
        }
        Ok(Value::Array(items))
    }
}

/// `(key, value)` entries over [`Value::Map`], fixed count or count-prefixed.
///
/// Entries are written in the order they appear in the map.
#[derive(Debug, Clone)]
pub struct RecordCodec {
    key: CodecRef,
    value: CodecRef,
    length: Length,
}

impl RecordCodec {
    pub fn fixed(key: impl IntoCodec, value: impl IntoCodec, length: usize) -> Self {
        Self {
            key: key.into_codec(),
            value: value.into_codec(),
            length: Length::Fixed(length),
        }
    }

    pub fn variable(key: impl IntoCodec, value: impl IntoCodec) -> Self {
        Self {
            key: key.into_codec(),
            value: value.into_codec(),
            length: Length::prefixed(),
        }
    }

    pub fn length_codec(self, codec: impl IntoCodec) -> Self {
        Self {
            length: self.length.with_codec(codec),
            ..self
        }
    }

    fn entries<'v>(&self, value: &'v Value) -> Result<&'v [(Value, Value)]> {
        value.as_map().ok_or(CodecError::invalid("map"))
    }
}

impl Codec for RecordCodec {
    fn validate(&self, value: &Value, ctx: &mut Context) -> bool {
        let Some(entries) = value.as_map() else {
            return false;
        };
        self.length.accepts(entries.len(), ctx)
            && entries
                .iter()
                .all(|(k, v)| self.key.validate(k, ctx) && self.value.validate(v, ctx))
    }

    fn measure(&self, value: &Value, ctx: &mut Context) -> Result<usize> {
        let entries = self.entries(value)?;
        let mut size = self.length.measure(entries.len(), ctx)?;
        for (k, v) in entries {
            size += self.key.measure(k, ctx)?;
            size += self.value.measure(v, ctx)?;
        }
        Ok(size)
    }

    fn write(&self, value: &Value, writer: &mut Writer, ctx: &mut Context) -> Result<()> {
        let entries = self.entries(value)?;
        self.length.write(entries.len(), writer, ctx)?;
        for (k, v) in entries {
            self.key.write(k, writer, ctx)?;
            self.value.write(v, writer, ctx)?;
        }
        Ok(())
    }

    fn read(&self, reader: &mut Reader<'_>, ctx: &mut Context) -> Result<Value> {
        let count = self.length.read(reader, ctx)?;
        let mut entries = Vec::with_capacity(count.min(reader.size()));
        for _ in 0..count {
            let k = self.key.read(reader, ctx)?;
            let v = self.value.read(reader, ctx)?;
            entries.push((k, v));
        }
        Ok(Value::Map(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number::{BooleanCodec, IntCodec, IntWidth};
    use crate::string::StringCodec;

    fn ints(values: &[i64]) -> Value {
        Value::Array(values.iter().copied().map(Value::Int).collect())
    }

    #[test]
    fn fixed_array_requires_exact_length() {
        let codec = ArrayCodec::fixed(IntCodec::unsigned(IntWidth::W8), 3);
        assert!(codec.is_valid(&ints(&[1, 2, 3])));
        assert!(!codec.is_valid(&ints(&[1, 2])));
        assert!(!codec.is_valid(&ints(&[1, 2, 300])));
        assert_eq!(codec.encode(&ints(&[1, 2, 3])).unwrap(), [1, 2, 3]);
        assert_eq!(codec.decode(&[4, 5, 6]).unwrap(), ints(&[4, 5, 6]));
        assert!(codec.encode(&ints(&[1])).is_err());
    }

    #[test]
    fn variable_array_prefixes_count() {
        let codec = ArrayCodec::variable(IntCodec::unsigned(IntWidth::W8));
        assert_eq!(codec.encode(&ints(&[])).unwrap(), [0]);
        assert_eq!(codec.encode(&ints(&[7, 8])).unwrap(), [2, 7, 8]);
        assert!(codec.decode(&[3, 1, 2]).unwrap_err().is_insufficient_input());
    }

    #[test]
    fn hostile_count_fails_without_allocating() {
        let codec = ArrayCodec::variable(BooleanCodec);
        // VarInt-60 count of 2^40.
        let bytes = [0xa1, 0, 0, 0, 0, 0];
        assert!(codec.decode(&bytes).unwrap_err().is_insufficient_input());
    }

    #[test]
    fn records() {
        let codec = RecordCodec::variable(StringCodec::utf8(), IntCodec::unsigned(IntWidth::W8));
        let value = Value::Map(vec![
            (Value::from("a"), Value::Int(1)),
            (Value::from("bc"), Value::Int(2)),
        ]);
        let bytes = codec.encode(&value).unwrap();
        assert_eq!(bytes, [2, 1, b'a', 1, 2, b'b', b'c', 2]);
        assert_eq!(codec.byte_length(&value).unwrap(), bytes.len());
        assert_eq!(codec.decode(&bytes).unwrap(), value);

        let fixed = RecordCodec::fixed(StringCodec::utf8(), BooleanCodec, 1);
        assert!(!fixed.is_valid(&Value::Map(vec![])));
        assert!(!fixed.is_valid(&value));
    }
}
