//! Composable binary codecs.
//!
//! A codec tree is built once from small units (integers, strings, arrays,
//! objects, unions and so on) and then validates, sizes, encodes and decodes
//! [`Value`]s. The wire format is the plain concatenation of each unit's
//! encoding: no envelope, no field names, no version byte. Encoder and
//! decoder must use the same tree.
//!
//! # Example
//!
//! ```
//! use binform::{
//!     ArrayCodec, Codec, IntCodec, IntWidth, ObjectCodec, StringCodec, UnionCodec, Value,
//! };
//!
//! let user = ObjectCodec::new()
//!     .field("id", IntCodec::unsigned(IntWidth::W32).big_endian())
//!     .field("name", StringCodec::utf8())
//!     .field("tags", UnionCodec::optional(ArrayCodec::variable(StringCodec::utf8())));
//!
//! let value = Value::object([("id", Value::Int(7)), ("name", Value::from("ada"))]);
//! assert!(user.is_valid(&value));
//!
//! let bytes = user.encode(&value).unwrap();
//! assert_eq!(bytes, [0, 0, 0, 7, 3, b'a', b'd', b'a', 1]);
//! assert_eq!(user.decode(&bytes).unwrap(), value);
//! ```
//!
//! [`stream`] carries the same encodings over chunked byte streams.

mod any;
mod array;
mod binary;
mod bitfield;
mod codec;
mod constant;
mod context;
mod error;
mod length;
mod number;
mod object;
mod pointer;
mod recursive;
mod string;
pub mod stream;
mod text;
mod transform;
mod union;
mod value;
mod varint;

pub use binform_buffers::{Endian, Reader, Writer};

pub use any::AnyCodec;
pub use array::{ArrayCodec, RecordCodec};
pub use binary::{BytesCodec, ConstantBytesCodec};
pub use bitfield::{BitFieldCodec, BIT_WEIGHTS};
pub use codec::{Codec, CodecRef, IntoCodec};
pub use constant::{ConstantCodec, EnumCodec};
pub use context::{Checkpoint, Context, ContextEntry, DEFAULT_MAX_DEPTH};
pub use error::{CodecError, ErrorKind, Result};
pub use number::{
    BigIntCodec, BooleanCodec, FloatCodec, FloatPrecision, IntCodec, IntWidth, ValidationMode,
};
pub use object::{ObjectCodec, TupleCodec};
pub use pointer::{IdCodec, PointerCodec};
pub use recursive::RecursiveCodec;
pub use string::StringCodec;
pub use text::TextEncoding;
pub use transform::TransformCodec;
pub use union::UnionCodec;
pub use value::Value;
pub use varint::VarIntCodec;
