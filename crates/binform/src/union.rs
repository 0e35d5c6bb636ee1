//! Tagged unions and optionals.
//!
//! A union tries its candidates in order and encodes the first one whose
//! validation accepts the value, prefixed by that candidate's index. Put
//! narrow candidates before general ones.

use binform_buffers::{Reader, Writer};

use crate::codec::{count_value, read_count, Codec, CodecRef, IntoCodec};
use crate::constant::ConstantCodec;
use crate::context::Context;
use crate::error::{CodecError, Result};
use crate::number::{IntCodec, IntWidth};
use crate::value::Value;
use crate::varint::VarIntCodec;

/// Ordered candidate list with an index prefix.
///
/// ```
/// use binform::{Codec, ConstantCodec, IntoCodec, UnionCodec, Value};
///
/// let ab = UnionCodec::new([ConstantCodec::new("a"), ConstantCodec::new("b")]);
/// let abc = UnionCodec::new([ab.into_codec(), ConstantCodec::new("c").into_codec()]);
/// assert_eq!(abc.candidates().len(), 3);
/// assert_eq!(abc.encode(&Value::from("c")).unwrap(), [2]);
/// ```
#[derive(Debug, Clone)]
pub struct UnionCodec {
    candidates: Vec<CodecRef>,
    index: CodecRef,
}

fn flatten_into(candidate: CodecRef, out: &mut Vec<CodecRef>) {
    match candidate.as_union() {
        Some(union) => {
            for inner in &union.candidates {
                flatten_into(inner.clone(), out);
            }
        }
        None => out.push(candidate),
    }
}

impl UnionCodec {
    /// Builds a union, merging the candidates of nested unions into this one.
    pub fn new<I>(candidates: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoCodec,
    {
        let mut flat = Vec::new();
        for candidate in candidates {
            flatten_into(candidate.into_codec(), &mut flat);
        }
        Self::with_candidates(flat)
    }

    /// Builds a union that keeps nested unions as single candidates.
    pub fn nested<I>(candidates: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoCodec,
    {
        Self::with_candidates(candidates.into_iter().map(IntoCodec::into_codec).collect())
    }

    fn with_candidates(candidates: Vec<CodecRef>) -> Self {
        Self {
            candidates,
            index: VarIntCodec::v60().into_codec(),
        }
    }

    /// `inner` or absent. The index is a single unsigned byte and the absent
    /// marker is always the last candidate.
    pub fn optional(inner: impl IntoCodec) -> Self {
        let mut candidates = Vec::new();
        flatten_into(inner.into_codec(), &mut candidates);
        candidates.push(ConstantCodec::undefined().into_codec());
        Self {
            candidates,
            index: IntCodec::unsigned(IntWidth::W8).into_codec(),
        }
    }

    pub fn index_codec(mut self, codec: impl IntoCodec) -> Self {
        self.index = codec.into_codec();
        self
    }

    /// Copy of this union with every nested union merged in, recursively.
    pub fn flatten(&self) -> Self {
        let mut flat = Vec::new();
        for candidate in &self.candidates {
            flatten_into(candidate.clone(), &mut flat);
        }
        Self {
            candidates: flat,
            index: self.index.clone(),
        }
    }

    pub fn candidates(&self) -> &[CodecRef] {
        &self.candidates
    }

    /// First candidate accepting `value`. Registrations made by rejected
    /// candidates are rolled back.
    fn select(&self, value: &Value, ctx: &mut Context) -> Result<(usize, &CodecRef)> {
        let mut too_deep = false;
        for (i, candidate) in self.candidates.iter().enumerate() {
            let checkpoint = ctx.checkpoint();
            if candidate.validate(value, ctx) {
                return Ok((i, candidate));
            }
            too_deep |= ctx.depth_exceeded();
            ctx.rollback(checkpoint);
        }
        if too_deep {
            ctx.mark_depth_exceeded();
            return Err(CodecError::DepthLimitExceeded(ctx.max_depth()));
        }
        Err(CodecError::NoMatchingCandidate)
    }
}

impl Codec for UnionCodec {
    fn validate(&self, value: &Value, ctx: &mut Context) -> bool {
        match self.select(value, ctx) {
            Ok((i, _)) => self.index.validate(&count_value(i), ctx),
            Err(_) => false,
        }
    }

    fn measure(&self, value: &Value, ctx: &mut Context) -> Result<usize> {
        let (i, candidate) = self.select(value, ctx)?;
        Ok(self.index.measure(&count_value(i), ctx)? + candidate.measure(value, ctx)?)
    }

    fn write(&self, value: &Value, writer: &mut Writer, ctx: &mut Context) -> Result<()> {
        let (i, candidate) = self.select(value, ctx)?;
        self.index.write(&count_value(i), writer, ctx)?;
        candidate.write(value, writer, ctx)
    }

    fn read(&self, reader: &mut Reader<'_>, ctx: &mut Context) -> Result<Value> {
        let i = read_count(self.index.as_ref(), reader, ctx)?;
        let candidate = self.candidates.get(i).ok_or(CodecError::InvalidIndex {
            index: i as i64,
            count: self.candidates.len(),
        })?;
        candidate.read(reader, ctx)
    }

    fn as_union(&self) -> Option<&UnionCodec> {
        Some(self)
    }
}
