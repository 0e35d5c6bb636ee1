//! Fixed or prefixed element counts shared by the sized composites.

use binform_buffers::{Reader, Writer};

use crate::codec::{count_value, read_count, CodecRef, IntoCodec};
use crate::context::Context;
use crate::error::{CodecError, Result};
use crate::varint::VarIntCodec;

#[derive(Debug, Clone)]
pub(crate) enum Length {
    /// Count known from the codec tree; nothing on the wire.
    Fixed(usize),
    /// Count written before the elements.
    Prefixed(CodecRef),
}

impl Length {
    pub(crate) fn prefixed() -> Self {
        Length::Prefixed(VarIntCodec::v60().into_codec())
    }

    pub(crate) fn with_codec(self, codec: impl IntoCodec) -> Self {
        match self {
            Length::Fixed(n) => Length::Fixed(n),
            Length::Prefixed(_) => Length::Prefixed(codec.into_codec()),
        }
    }

    pub(crate) fn accepts(&self, count: usize, ctx: &mut Context) -> bool {
        match self {
            Length::Fixed(n) => *n == count,
            Length::Prefixed(codec) => codec.validate(&count_value(count), ctx),
        }
    }

    fn check_fixed(&self, count: usize) -> Result<()> {
        match self {
            Length::Fixed(n) if *n != count => {
                Err(CodecError::out_of_range(count, *n, *n))
            }
            _ => Ok(()),
        }
    }

    /// Bytes taken by the count itself.
    pub(crate) fn measure(&self, count: usize, ctx: &mut Context) -> Result<usize> {
        self.check_fixed(count)?;
        match self {
            Length::Fixed(_) => Ok(0),
            Length::Prefixed(codec) => codec.measure(&count_value(count), ctx),
        }
    }

    pub(crate) fn write(&self, count: usize, writer: &mut Writer, ctx: &mut Context) -> Result<()> {
        self.check_fixed(count)?;
        match self {
            Length::Fixed(_) => Ok(()),
            Length::Prefixed(codec) => codec.write(&count_value(count), writer, ctx),
        }
    }

    pub(crate) fn read(&self, reader: &mut Reader<'_>, ctx: &mut Context) -> Result<usize> {
        match self {
            Length::Fixed(n) => Ok(*n),
            Length::Prefixed(codec) => read_count(codec.as_ref(), reader, ctx),
        }
    }
}
