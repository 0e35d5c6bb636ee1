//! Chunked encoding and incremental decoding of value sequences.
//!
//! Both directions are built only on the [`Codec`](crate::Codec) contract of
//! a root codec and produce the same bytes as the whole-buffer API. Values
//! are handled strictly one at a time and in order.
//!
//! ```
//! use binform::stream::{decode_stream, encode_stream};
//! use binform::{BooleanCodec, IntoCodec, Value};
//! use futures::executor::block_on;
//! use futures::{stream, TryStreamExt};
//!
//! let codec = BooleanCodec.into_codec();
//! let values = vec![Value::Bool(true), Value::Bool(false)];
//! let chunks = encode_stream(codec.clone(), stream::iter(values.clone()));
//! let decoded: Vec<Value> = block_on(decode_stream(codec, chunks).try_collect()).unwrap();
//! assert_eq!(decoded, values);
//! ```

mod decoder;
mod encoder;

use serde::Deserialize;

use crate::context::DEFAULT_MAX_DEPTH;

pub use decoder::{decode_stream, DecodeStream, StreamDecoder};
pub use encoder::{encode_stream, EncodeSink};

/// Default for [`DecoderOptions::warn_buffer_size`].
pub const DEFAULT_WARN_BUFFER_SIZE: usize = 8 * 1024 * 1024;

/// Result of one decode attempt on buffered input.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome<T> {
    /// A value was decoded and its bytes dropped from the buffer.
    Complete(T),
    /// The buffer holds only part of the next value.
    Incomplete,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EncoderOptions {
    /// Split each encoded value into chunks of at most this many bytes.
    /// `None` or `0` emits every value as one chunk.
    pub max_chunk_size: Option<usize>,
    /// Recursion depth allowed per value.
    pub max_depth: usize,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            max_chunk_size: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DecoderOptions {
    /// Buffered byte count above which a warning is logged, once per
    /// decoder. Decoding continues.
    pub warn_buffer_size: usize,
    /// Recursion depth allowed per value.
    pub max_depth: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            warn_buffer_size: DEFAULT_WARN_BUFFER_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
