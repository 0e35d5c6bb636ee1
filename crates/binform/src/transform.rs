//! Value-mapping wrapper around another codec.

use std::fmt;
use std::sync::Arc;

use binform_buffers::{Reader, Writer};

use crate::codec::{Codec, CodecRef, IntoCodec};
use crate::context::Context;
use crate::error::Result;
use crate::value::Value;

type EncodeFn = Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync>;
type DecodeFn = Arc<dyn Fn(Value, &[u8]) -> Result<Value> + Send + Sync>;
type ValidateFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Maps source values to the target codec's values and back.
///
/// The decode function also receives the raw bytes the target consumed,
/// which allows checksums over the encoded form.
///
/// ```
/// use binform::{Codec, IntCodec, IntWidth, TransformCodec, Value};
///
/// // Celsius tenths stored as an offset byte.
/// let codec = TransformCodec::new(
///     IntCodec::unsigned(IntWidth::W8),
///     |v| Ok(Value::Int(v.as_i64().unwrap_or(-1) + 40)),
///     |v, _raw| Ok(Value::Int(v.as_i64().unwrap_or(0) - 40)),
/// );
/// assert_eq!(codec.encode(&Value::Int(-40)).unwrap(), [0]);
/// assert_eq!(codec.decode(&[60]).unwrap(), Value::Int(20));
/// ```
#[derive(Clone)]
pub struct TransformCodec {
    target: CodecRef,
    encode: EncodeFn,
    decode: DecodeFn,
    validator: Option<ValidateFn>,
}

impl fmt::Debug for TransformCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformCodec")
            .field("target", &self.target)
            .field("validator", &self.validator.is_some())
            .finish_non_exhaustive()
    }
}

impl TransformCodec {
    pub fn new<E, D>(target: impl IntoCodec, encode: E, decode: D) -> Self
    where
        E: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
        D: Fn(Value, &[u8]) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            target: target.into_codec(),
            encode: Arc::new(encode),
            decode: Arc::new(decode),
            validator: None,
        }
    }

    /// Replaces the default "encodes and the target accepts" validation.
    pub fn with_validator<V>(mut self, validator: V) -> Self
    where
        V: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }
}

impl Codec for TransformCodec {
    fn validate(&self, value: &Value, ctx: &mut Context) -> bool {
        if let Some(validator) = &self.validator {
            return validator(value);
        }
        match (self.encode)(value) {
            Ok(target) => self.target.validate(&target, ctx),
            Err(_) => false,
        }
    }

    fn measure(&self, value: &Value, ctx: &mut Context) -> Result<usize> {
        let target = (self.encode)(value)?;
        self.target.measure(&target, ctx)
    }

    fn write(&self, value: &Value, writer: &mut Writer, ctx: &mut Context) -> Result<()> {
        let target = (self.encode)(value)?;
        self.target.write(&target, writer, ctx)
    }

    fn read(&self, reader: &mut Reader<'_>, ctx: &mut Context) -> Result<Value> {
        let start = reader.x;
        let target = self.target.read(reader, ctx)?;
        (self.decode)(target, reader.slice_from(start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::BytesCodec;
    use crate::error::CodecError;
    use crate::number::{IntCodec, IntWidth};
    use crate::string::StringCodec;

    fn checksum(bytes: &[u8]) -> u8 {
        bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
    }

    #[test]
    fn decode_sees_raw_target_bytes() {
        let codec = TransformCodec::new(
            StringCodec::utf8(),
            |v| Ok(v.clone()),
            |v, raw| {
                assert_eq!(raw, [2, b'h', b'i']);
                Ok(Value::object([("text", v), ("sum", Value::from(checksum(raw)))]))
            },
        );
        let bytes = codec.encode(&Value::from("hi")).unwrap();
        let decoded = codec.decode(&bytes).unwrap();
        assert_eq!(decoded.get("sum"), Some(&Value::from(checksum(&bytes))));
    }

    #[test]
    fn default_validation_runs_encode_and_target() {
        let codec = TransformCodec::new(
            IntCodec::unsigned(IntWidth::W8),
            |v| match v.as_bool() {
                Some(b) => Ok(Value::Int(if b { 255 } else { 0 })),
                None => Err(CodecError::Custom("not a flag".into())),
            },
            |v, _| Ok(Value::Bool(v.as_i64() == Some(255))),
        );
        assert!(codec.is_valid(&Value::Bool(true)));
        assert!(!codec.is_valid(&Value::Int(1)));
        assert_eq!(
            codec.encode(&Value::Int(1)),
            Err(CodecError::Custom("not a flag".into()))
        );
        assert_eq!(codec.decode(&[255]).unwrap(), Value::Bool(true));
    }

    #[test]
    fn custom_validator_overrides() {
        let codec = TransformCodec::new(BytesCodec::fixed(1), |v| Ok(v.clone()), |v, _| Ok(v))
            .with_validator(|v| v.as_bytes() == Some(&[0x2a][..]));
        assert!(codec.is_valid(&Value::Bytes(vec![0x2a])));
        assert!(!codec.is_valid(&Value::Bytes(vec![0x2b])));
    }
}
