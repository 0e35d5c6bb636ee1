use std::pin::Pin;
use std::task::{ready, Context, Poll};

use bytes::{Buf, BytesMut};
use futures::{Stream, TryStream, TryStreamExt};
use tracing::{debug, trace, warn};

use super::{DecodeOutcome, DecoderOptions};
use crate::codec::{CodecRef, IntoCodec};
use crate::context::Context as CodecContext;
use crate::error::{CodecError, Result};
use crate::value::Value;

/// Accumulates input chunks and decodes values from the front.
///
/// The buffer only changes when a value is complete, so an attempt that
/// runs out of input leaves it exactly as it was.
#[derive(Debug)]
pub struct StreamDecoder {
    codec: CodecRef,
    buffer: BytesMut,
    options: DecoderOptions,
    warned: bool,
}

impl StreamDecoder {
    pub fn new(codec: impl IntoCodec) -> Self {
        Self::with_options(codec, DecoderOptions::default())
    }

    pub fn with_options(codec: impl IntoCodec, options: DecoderOptions) -> Self {
        Self {
            codec: codec.into_codec(),
            buffer: BytesMut::new(),
            options,
            warned: false,
        }
    }

    /// Bytes received but not yet decoded.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
        trace!(len = chunk.len(), buffered = self.buffer.len(), "received chunk");
        if !self.warned && self.buffer.len() > self.options.warn_buffer_size {
            self.warned = true;
            warn!(
                buffered = self.buffer.len(),
                threshold = self.options.warn_buffer_size,
                "stream decoder buffer exceeds threshold"
            );
        }
    }

    /// Decodes the next value if the buffer holds all of it.
    pub fn decode_next(&mut self) -> Result<DecodeOutcome<Value>> {
        if self.buffer.is_empty() {
            return Ok(DecodeOutcome::Incomplete);
        }
        let mut ctx = CodecContext::with_max_depth(self.options.max_depth);
        match self.codec.decode_with(&self.buffer, 0, &mut ctx) {
            Ok((_, 0)) => {
                debug!("decoded value consumed no input");
                Err(CodecError::ZeroLengthFrame)
            }
            Ok((value, consumed)) => {
                self.buffer.advance(consumed);
                trace!(consumed, remaining = self.buffer.len(), "decoded value");
                Ok(DecodeOutcome::Complete(value))
            }
            Err(err) if err.is_insufficient_input() => Ok(DecodeOutcome::Incomplete),
            Err(err) => {
                debug!(error = %err, "stream decode failed");
                Err(err)
            }
        }
    }

    /// Checks that no partial value is left once input has ended.
    pub fn finish(&self) -> Result<()> {
        if self.buffer.is_empty() {
            Ok(())
        } else {
            debug!(remaining = self.buffer.len(), "input ended mid-value");
            Err(CodecError::TruncatedStream(self.buffer.len()))
        }
    }
}

/// Stream of values decoded from a stream of byte chunks.
///
/// The first error, from upstream or from decoding, is yielded and ends the
/// stream.
#[derive(Debug)]
pub struct DecodeStream<S> {
    upstream: S,
    decoder: StreamDecoder,
    done: bool,
}

impl<S> DecodeStream<S> {
    pub fn new(codec: impl IntoCodec, upstream: S) -> Self {
        Self::with_options(codec, upstream, DecoderOptions::default())
    }

    pub fn with_options(codec: impl IntoCodec, upstream: S, options: DecoderOptions) -> Self {
        Self {
            upstream,
            decoder: StreamDecoder::with_options(codec, options),
            done: false,
        }
    }

    pub fn decoder(&self) -> &StreamDecoder {
        &self.decoder
    }
}

impl<S> Stream for DecodeStream<S>
where
    S: TryStream + Unpin,
    S::Ok: AsRef<[u8]>,
    S::Error: From<CodecError>,
{
    type Item = Result<Value, S::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if this.done {
                return Poll::Ready(None);
            }
            match this.decoder.decode_next() {
                Ok(DecodeOutcome::Complete(value)) => return Poll::Ready(Some(Ok(value))),
                Ok(DecodeOutcome::Incomplete) => {}
                Err(err) => {
                    this.done = true;
                    return Poll::Ready(Some(Err(err.into())));
                }
            }
            match ready!(this.upstream.try_poll_next_unpin(cx)) {
                Some(Ok(chunk)) => this.decoder.push(chunk.as_ref()),
                Some(Err(err)) => {
                    this.done = true;
                    return Poll::Ready(Some(Err(err)));
                }
                None => {
                    this.done = true;
                    debug!("upstream ended");
                    return Poll::Ready(this.decoder.finish().err().map(|err| Err(err.into())));
                }
            }
        }
    }
}

/// Decodes `chunks` with `codec`.
pub fn decode_stream<S>(codec: impl IntoCodec, chunks: S) -> DecodeStream<S> {
    DecodeStream::new(codec, chunks)
}
