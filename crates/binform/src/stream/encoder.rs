use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use binform_buffers::Writer;
use bytes::Bytes;
use futures::{Sink, Stream, StreamExt};
use tracing::{debug, trace};

use super::EncoderOptions;
use crate::codec::{Codec, CodecRef, IntoCodec};
use crate::context::Context as CodecContext;
use crate::error::{CodecError, Result};
use crate::value::Value;

/// Encodes each value into byte chunks for a downstream sink.
///
/// A value is encoded whole when it is sent; its chunks are then handed to
/// the downstream as it becomes ready, and the next value is not accepted
/// until they all have been.
#[derive(Debug)]
pub struct EncodeSink<S> {
    codec: CodecRef,
    sink: S,
    options: EncoderOptions,
    writer: Writer,
    pending: VecDeque<Bytes>,
}

/// Encodes one value through `writer`, which is rewound afterwards even when
/// encoding fails.
fn encode_value(
    codec: &dyn Codec,
    value: &Value,
    writer: &mut Writer,
    max_depth: usize,
) -> Result<Bytes> {
    let mut ctx = CodecContext::with_max_depth(max_depth);
    let encoded = codec.encode_with(value, writer, &mut ctx);
    let bytes = writer.flush();
    encoded.map(|_| Bytes::from(bytes))
}

impl<S> EncodeSink<S> {
    pub fn new(codec: impl IntoCodec, sink: S) -> Self {
        Self::with_options(codec, sink, EncoderOptions::default())
    }

    pub fn with_options(codec: impl IntoCodec, sink: S, options: EncoderOptions) -> Self {
        Self {
            codec: codec.into_codec(),
            sink,
            options,
            writer: Writer::new(),
            pending: VecDeque::new(),
        }
    }

    pub fn get_ref(&self) -> &S {
        &self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    fn chunk_limit(&self) -> Option<usize> {
        self.options.max_chunk_size.filter(|&n| n > 0)
    }
}

impl<S> EncodeSink<S>
where
    S: Sink<Bytes> + Unpin,
{
    fn poll_drain(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), S::Error>> {
        while !self.pending.is_empty() {
            ready!(Pin::new(&mut self.sink).poll_ready(cx))?;
            if let Some(chunk) = self.pending.pop_front() {
                trace!(len = chunk.len(), "emitting chunk");
                Pin::new(&mut self.sink).start_send(chunk)?;
            }
        }
        Poll::Ready(Ok(()))
    }
}

impl<S> Sink<Value> for EncodeSink<S>
where
    S: Sink<Bytes> + Unpin,
    S::Error: From<CodecError>,
{
    type Error = S::Error;

    fn poll_ready(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        let this = self.get_mut();
        if !this.pending.is_empty() {
            debug!(pending = this.pending.len(), "waiting for downstream");
        }
        ready!(this.poll_drain(cx))?;
        Pin::new(&mut this.sink).poll_ready(cx)
    }

    fn start_send(self: Pin<&mut Self>, item: Value) -> Result<(), Self::Error> {
        let this = self.get_mut();
        let mut bytes = encode_value(
            this.codec.as_ref(),
            &item,
            &mut this.writer,
            this.options.max_depth,
        )?;
        trace!(len = bytes.len(), "encoded value");
        if let Some(limit) = this.chunk_limit() {
            while bytes.len() > limit {
                this.pending.push_back(bytes.split_to(limit));
            }
        }
        if !bytes.is_empty() {
            this.pending.push_back(bytes);
        }
        Ok(())
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        let this = self.get_mut();
        ready!(this.poll_drain(cx))?;
        Pin::new(&mut this.sink).poll_flush(cx)
    }

    fn poll_close(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        let this = self.get_mut();
        ready!(this.poll_drain(cx))?;
        debug!("closing encode sink");
        Pin::new(&mut this.sink).poll_close(cx)
    }
}

/// Encodes a stream of values into one chunk per value.
pub fn encode_stream<St>(codec: impl IntoCodec, values: St) -> impl Stream<Item = Result<Bytes>>
where
    St: Stream<Item = Value>,
{
    let codec = codec.into_codec();
    let max_depth = EncoderOptions::default().max_depth;
    let mut writer = Writer::new();
    values.map(move |value| encode_value(codec.as_ref(), &value, &mut writer, max_depth))
}
