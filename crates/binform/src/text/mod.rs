//! Text encodings for [`StringCodec`](crate::StringCodec).
//!
//! Binary-to-text encodings put the decoded bytes on the wire. Only the exact
//! text an encoding produces for those bytes is accepted, so decoding a
//! string always gives back the text that was encoded.

mod base32;
mod base58;

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{CodecError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    #[default]
    Utf8,
    /// Lowercase hexadecimal.
    Hex,
    /// RFC 4648 base32, padded.
    Base32,
    /// Bitcoin alphabet.
    Base58,
    /// Standard alphabet, padded.
    Base64,
    /// URL-safe alphabet, unpadded.
    Base64Url,
}

impl TextEncoding {
    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Hex => "hex",
            TextEncoding::Base32 => "base32",
            TextEncoding::Base58 => "base58",
            TextEncoding::Base64 => "base64",
            TextEncoding::Base64Url => "base64url",
        }
    }

    /// Wire bytes of `text`.
    pub fn to_bytes(self, text: &str) -> Result<Vec<u8>> {
        let decoded = match self {
            TextEncoding::Utf8 => return Ok(text.as_bytes().to_vec()),
            TextEncoding::Hex => hex::decode(text).ok(),
            TextEncoding::Base32 => base32::decode(text),
            TextEncoding::Base58 => base58::decode(text),
            TextEncoding::Base64 => STANDARD.decode(text).ok(),
            TextEncoding::Base64Url => URL_SAFE_NO_PAD.decode(text).ok(),
        };
        let invalid = CodecError::InvalidText {
            encoding: self.name(),
        };
        let bytes = decoded.ok_or(invalid.clone())?;
        // Rejects uppercase hex, non-zero trailing bits and similar aliases.
        if self.to_text(&bytes)? != text {
            return Err(invalid);
        }
        Ok(bytes)
    }

    /// Text of wire bytes.
    pub fn to_text(self, bytes: &[u8]) -> Result<String> {
        Ok(match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes)
                .map_err(|_| CodecError::InvalidUtf8)?
                .to_string(),
            TextEncoding::Hex => hex::encode(bytes),
            TextEncoding::Base32 => base32::encode(bytes),
            TextEncoding::Base58 => base58::encode(bytes),
            TextEncoding::Base64 => STANDARD.encode(bytes),
            TextEncoding::Base64Url => URL_SAFE_NO_PAD.encode(bytes),
        })
    }

    /// Number of wire bytes for `text`.
    pub fn byte_len(self, text: &str) -> Result<usize> {
        match self {
            TextEncoding::Utf8 => Ok(text.len()),
            _ => self.to_bytes(text).map(|bytes| bytes.len()),
        }
    }
}
