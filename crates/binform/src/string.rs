//! Text codecs over [`Value::Str`].

use binform_buffers::{Reader, Writer};

use crate::codec::{Codec, IntoCodec};
use crate::context::Context;
use crate::error::{CodecError, Result};
use crate::length::Length;
use crate::text::TextEncoding;
use crate::value::Value;

/// Text, fixed-length or length-prefixed, in a [`TextEncoding`].
///
/// Lengths count wire bytes: UTF-8 bytes for [`TextEncoding::Utf8`] and
/// decoded bytes for the binary-to-text encodings.
///
/// ```
/// use binform::{Codec, StringCodec, TextEncoding, Value};
///
/// let codec = StringCodec::fixed(2, TextEncoding::Hex);
/// assert_eq!(codec.encode(&Value::from("beef")).unwrap(), [0xbe, 0xef]);
/// assert!(!codec.is_valid(&Value::from("BEEF")));
/// ```
#[derive(Debug, Clone)]
pub struct StringCodec {
    length: Length,
    encoding: TextEncoding,
}

impl StringCodec {
    pub fn fixed(length: usize, encoding: TextEncoding) -> Self {
        Self {
            length: Length::Fixed(length),
            encoding,
        }
    }

    pub fn variable(encoding: TextEncoding) -> Self {
        Self {
            length: Length::prefixed(),
            encoding,
        }
    }

    pub fn utf8() -> Self {
        Self::variable(TextEncoding::Utf8)
    }

    pub fn length_codec(self, codec: impl IntoCodec) -> Self {
        Self {
            length: self.length.with_codec(codec),
            ..self
        }
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    fn text<'v>(&self, value: &'v Value) -> Result<&'v str> {
        value.as_str().ok_or(CodecError::invalid("string"))
    }
}

impl Codec for StringCodec {
    fn validate(&self, value: &Value, ctx: &mut Context) -> bool {
        let Some(text) = value.as_str() else {
            return false;
        };
        match self.encoding.byte_len(text) {
            Ok(len) => self.length.accepts(len, ctx),
            Err(_) => false,
        }
    }

    fn measure(&self, value: &Value, ctx: &mut Context) -> Result<usize> {
        let len = self.encoding.byte_len(self.text(value)?)?;
        Ok(self.length.measure(len, ctx)? + len)
    }

    fn write(&self, value: &Value, writer: &mut Writer, ctx: &mut Context) -> Result<()> {
        let text = self.text(value)?;
        if self.encoding == TextEncoding::Utf8 {
            self.length.write(text.len(), writer, ctx)?;
            writer.utf8(text);
        } else {
            let bytes = self.encoding.to_bytes(text)?;
            self.length.write(bytes.len(), writer, ctx)?;
            writer.buf(&bytes);
        }
        Ok(())
    }

    fn read(&self, reader: &mut Reader<'_>, ctx: &mut Context) -> Result<Value> {
        let start = reader.x;
        let length = self.length.read(reader, ctx)?;
        let bytes = match reader.buf(length) {
            Ok(bytes) => bytes,
            Err(err) => {
                reader.x = start;
                return Err(err.into());
            }
        };
        Ok(Value::Str(self.encoding.to_text(bytes)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_variable() {
        let codec = StringCodec::utf8();
        let value = Value::from("héllo");
        assert_eq!(codec.byte_length(&value).unwrap(), 7);
        let bytes = codec.encode(&value).unwrap();
        assert_eq!(bytes[0], 6);
        assert_eq!(codec.decode(&bytes).unwrap(), value);
    }

    #[test]
    fn utf8_fixed_counts_bytes() {
        let codec = StringCodec::fixed(2, TextEncoding::Utf8);
        assert!(codec.is_valid(&Value::from("é")));
        assert!(!codec.is_valid(&Value::from("e")));
        assert_eq!(codec.decode(&[0xc3, 0xa9]).unwrap(), Value::from("é"));
        assert_eq!(codec.decode(&[0xff, 0xfe]), Err(CodecError::InvalidUtf8));
    }

    #[test]
    fn binary_to_text_encodings_carry_decoded_bytes() {
        let cases = [
            (TextEncoding::Base64, "AAEC"),
            (TextEncoding::Base64Url, "AAEC"),
            (TextEncoding::Base32, "AAAQE==="),
            (TextEncoding::Base58, "15T"),
            (TextEncoding::Hex, "000102"),
        ];
        for (encoding, text) in cases {
            let fixed = StringCodec::fixed(3, encoding);
            let value = Value::from(text);
            assert_eq!(fixed.encode(&value).unwrap(), [0, 1, 2], "{encoding:?}");
            assert_eq!(fixed.decode(&[0, 1, 2]).unwrap(), value);

            let variable = StringCodec::variable(encoding);
            assert_eq!(variable.encode(&value).unwrap(), [3, 0, 1, 2]);
            assert_eq!(variable.byte_length(&value).unwrap(), 4);
        }
    }

    #[test]
    fn non_canonical_text_is_rejected() {
        let codec = StringCodec::variable(TextEncoding::Base64);
        assert!(!codec.is_valid(&Value::from("AAEC=")));
        assert!(matches!(
            codec.encode(&Value::from("A")),
            Err(CodecError::InvalidText { encoding: "base64" })
        ));
        assert!(!codec.is_valid(&Value::Bytes(vec![1])));
    }
}
