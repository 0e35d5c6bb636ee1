//! Named boolean flags packed eight per byte.

use binform_buffers::{Reader, Writer};
use indexmap::{IndexMap, IndexSet};

use crate::codec::Codec;
use crate::context::Context;
use crate::error::{CodecError, Result};
use crate::value::Value;

/// Mask of bit position `i` within a byte, most significant bit first.
pub const BIT_WEIGHTS: [u8; 8] = [0x80, 0x40, 0x20, 0x10, 0x08, 0x04, 0x02, 0x01];

/// Boolean keys over [`Value::Object`]. Key `i` lives in byte `i / 8` under
/// mask `BIT_WEIGHTS[i % 8]`; every key must be present.
///
/// ```
/// use binform::{BitFieldCodec, Codec, Value};
///
/// let codec = BitFieldCodec::new(["read", "write", "exec"]);
/// let value = Value::object([
///     ("read", Value::Bool(true)),
///     ("write", Value::Bool(false)),
///     ("exec", Value::Bool(true)),
/// ]);
/// assert_eq!(codec.encode(&value).unwrap(), [0b1010_0000]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitFieldCodec {
    keys: Vec<String>,
}

impl BitFieldCodec {
    /// A repeated key keeps the bit of its first occurrence.
    pub fn new<K, I>(keys: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = K>,
    {
        let unique: IndexSet<String> = keys.into_iter().map(Into::into).collect();
        Self {
            keys: unique.into_iter().collect(),
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    fn size(&self) -> usize {
        self.keys.len().div_ceil(8)
    }

    fn flags(&self, value: &Value) -> Result<Vec<bool>> {
        let invalid = || CodecError::invalid("boolean for every flag key");
        let fields = value.as_object().ok_or_else(invalid)?;
        if fields.len() != self.keys.len() {
            return Err(invalid());
        }
        self.keys
            .iter()
            .map(|key| fields.get(key).and_then(Value::as_bool).ok_or_else(invalid))
            .collect()
    }
}

impl Codec for BitFieldCodec {
    fn validate(&self, value: &Value, _ctx: &mut Context) -> bool {
        self.flags(value).is_ok()
    }

    fn measure(&self, value: &Value, _ctx: &mut Context) -> Result<usize> {
        self.flags(value)?;
        Ok(self.size())
    }

    fn write(&self, value: &Value, writer: &mut Writer, _ctx: &mut Context) -> Result<()> {
        let flags = self.flags(value)?;
        let mut packed = vec![0u8; self.size()];
        for (i, &set) in flags.iter().enumerate() {
            if set {
                packed[i / 8] |= BIT_WEIGHTS[i % 8];
            }
        }
        writer.buf(&packed);
        Ok(())
    }

    fn read(&self, reader: &mut Reader<'_>, _ctx: &mut Context) -> Result<Value> {
        let packed = reader.buf(self.size())?;
        let fields: IndexMap<String, Value> = self
            .keys
            .iter()
            .enumerate()
            .map(|(i, key)| {
                let set = packed[i / 8] & BIT_WEIGHTS[i % 8] != 0;
                (key.clone(), Value::Bool(set))
            })
            .collect();
        Ok(Value::Object(fields))
    }
}
