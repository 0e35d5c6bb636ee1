//! Length-prefixed opaque payloads for values without a fixed shape.

use std::fmt;
use std::sync::Arc;

use binform_buffers::{Reader, Writer};

use crate::codec::{read_count, count_value, Codec, CodecRef, IntoCodec};
use crate::context::Context;
use crate::error::{CodecError, Result};
use crate::value::Value;
use crate::varint::VarIntCodec;

type SerializeFn = Arc<dyn Fn(&Value) -> Result<Vec<u8>> + Send + Sync>;
type DeserializeFn = Arc<dyn Fn(&[u8]) -> Result<Value> + Send + Sync>;

fn to_json(value: &Value) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| CodecError::Serialization(e.to_string()))
}

fn from_json(bytes: &[u8]) -> Result<Value> {
    serde_json::from_slice(bytes).map_err(|e| CodecError::Serialization(e.to_string()))
}

/// Accepts every value and stores it as a length-prefixed payload produced
/// by a serializer pair, `serde_json` over [`Value`] unless replaced.
#[derive(Clone)]
pub struct AnyCodec {
    length: CodecRef,
    serialize: SerializeFn,
    deserialize: DeserializeFn,
}

impl fmt::Debug for AnyCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyCodec")
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

impl Default for AnyCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl AnyCodec {
    pub fn new() -> Self {
        Self {
            length: VarIntCodec::v60().into_codec(),
            serialize: Arc::new(to_json),
            deserialize: Arc::new(from_json),
        }
    }

    pub fn with_serializer<S, D>(mut self, serialize: S, deserialize: D) -> Self
    where
        S: Fn(&Value) -> Result<Vec<u8>> + Send + Sync + 'static,
        D: Fn(&[u8]) -> Result<Value> + Send + Sync + 'static,
    {
        self.serialize = Arc::new(serialize);
        self.deserialize = Arc::new(deserialize);
        self
    }

    pub fn length_codec(mut self, codec: impl IntoCodec) -> Self {
        self.length = codec.into_codec();
        self
    }
}

impl Codec for AnyCodec {
    fn validate(&self, _value: &Value, _ctx: &mut Context) -> bool {
        true
    }

    fn measure(&self, value: &Value, ctx: &mut Context) -> Result<usize> {
        let payload = (self.serialize)(value)?;
        Ok(self.length.measure(&count_value(payload.len()), ctx)? + payload.len())
    }

    fn write(&self, value: &Value, writer: &mut Writer, ctx: &mut Context) -> Result<()> {
        let payload = (self.serialize)(value)?;
        self.length.write(&count_value(payload.len()), writer, ctx)?;
        writer.buf(&payload);
        Ok(())
    }

    fn read(&self, reader: &mut Reader<'_>, ctx: &mut Context) -> Result<Value> {
        let start = reader.x;
        let length = read_count(self.length.as_ref(), reader, ctx)?;
        let payload = reader.buf(length).inspect_err(|_| reader.x = start)?;
        (self.deserialize)(payload)
    }
}
