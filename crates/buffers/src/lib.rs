//! Cursor pair used by every binform codec.
//!
//! [`Writer`] owns a growable output buffer, [`Reader`] borrows an input slice
//! and refuses to read past its end.
//!
//! # Example
//!
//! ```
//! use binform_buffers::{Endian, Reader, Writer};
//!
//! let mut writer = Writer::new();
//! writer.u8(0x01);
//! writer.uint(0x0203, 2, Endian::Big);
//! let data = writer.flush();
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.u8(), Ok(0x01));
//! assert_eq!(reader.uint(2, Endian::Big), Ok(0x0203));
//! ```

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

/// Byte order of multi-byte numeric fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    Big,
    Little,
}

impl Endian {
    /// Byte order of the host platform.
    #[cfg(target_endian = "big")]
    pub const NATIVE: Endian = Endian::Big;
    /// Byte order of the host platform.
    #[cfg(target_endian = "little")]
    pub const NATIVE: Endian = Endian::Little;
}

impl Default for Endian {
    fn default() -> Self {
        Endian::NATIVE
    }
}

/// Errors raised by [`Reader`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    /// The read needs more bytes than remain before the end of the input.
    #[error("insufficient bytes: needed {needed}, {available} available")]
    InsufficientBytes { needed: usize, available: usize },
    /// The bytes requested as text are not valid UTF-8.
    #[error("invalid UTF-8")]
    InvalidUtf8,
}
