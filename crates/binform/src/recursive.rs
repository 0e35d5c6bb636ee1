//! Self-referential codecs.

use std::sync::{Arc, OnceLock, Weak};

use binform_buffers::{Reader, Writer};

use crate::codec::{Codec, CodecRef, IntoCodec};
use crate::context::Context;
use crate::error::{CodecError, Result};
use crate::value::Value;

/// Placeholder handed to a recursive definition. Forwards to the definition
/// once it is built.
///
/// The placeholder only holds a weak reference, so the definition (which
/// embeds the placeholder) is freed when the caller drops it. Each hop
/// through the placeholder counts against the context depth limit.
///
/// ```
/// use binform::{ArrayCodec, Codec, RecursiveCodec, Value};
///
/// // A tree where every node is a list of child nodes.
/// let tree = RecursiveCodec::new(|node| ArrayCodec::variable(node));
/// let value = Value::Array(vec![Value::Array(vec![]), Value::Array(vec![Value::Array(vec![])])]);
/// let bytes = tree.encode(&value).unwrap();
/// assert_eq!(bytes, [2, 0, 1, 0]);
/// assert_eq!(tree.decode(&bytes).unwrap(), value);
/// ```
#[derive(Debug, Default)]
pub struct RecursiveCodec {
    target: OnceLock<Weak<dyn Codec>>,
}

impl RecursiveCodec {
    /// Builds a codec from a definition that may refer to itself through the
    /// placeholder it receives. Returns the definition.
    pub fn new<F, C>(define: F) -> CodecRef
    where
        F: FnOnce(CodecRef) -> C,
        C: IntoCodec,
    {
        let placeholder = Arc::new(RecursiveCodec::default());
        let definition = define(placeholder.clone()).into_codec();
        let weak = Arc::downgrade(&definition);
        // A fresh cell cannot already be set.
        let _ = placeholder.target.set(weak);
        definition
    }

    fn resolve(&self) -> Result<CodecRef> {
        self.target
            .get()
            .and_then(Weak::upgrade)
            .ok_or(CodecError::UnresolvedRecursion)
    }

    fn hop<T>(
        &self,
        ctx: &mut Context,
        f: impl FnOnce(&dyn Codec, &mut Context) -> Result<T>,
    ) -> Result<T> {
        let target = self.resolve()?;
        ctx.enter()?;
        let result = f(target.as_ref(), ctx);
        ctx.exit();
        result
    }
}

impl Codec for RecursiveCodec {
    fn validate(&self, value: &Value, ctx: &mut Context) -> bool {
        match self.hop(ctx, |codec, ctx| Ok(codec.validate(value, ctx))) {
            Ok(valid) => valid,
            Err(CodecError::DepthLimitExceeded(_)) => {
                ctx.mark_depth_exceeded();
                false
            }
            Err(_) => false,
        }
    }

    fn measure(&self, value: &Value, ctx: &mut Context) -> Result<usize> {
        self.hop(ctx, |codec, ctx| codec.measure(value, ctx))
    }

    fn write(&self, value: &Value, writer: &mut Writer, ctx: &mut Context) -> Result<()> {
        self.hop(ctx, |codec, ctx| codec.write(value, writer, ctx))
    }

    fn read(&self, reader: &mut Reader<'_>, ctx: &mut Context) -> Result<Value> {
        self.hop(ctx, |codec, ctx| codec.read(reader, ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constant::ConstantCodec;
    use crate::number::{IntCodec, IntWidth};
    use crate::object::ObjectCodec;
    use crate::union::UnionCodec;

    /// `{ value: u8, next: list | null }`
    fn linked_list() -> CodecRef {
        RecursiveCodec::new(|list| {
            ObjectCodec::new()
                .field("value", IntCodec::unsigned(IntWidth::W8))
                .field(
                    "next",
                    UnionCodec::new([list, ConstantCodec::new(Value::Null).into_codec()]),
                )
        })
    }

    fn node(value: i64, next: Value) -> Value {
        Value::object([("value", Value::Int(value)), ("next", next)])
    }

    #[test]
    fn linked_list_round_trip() {
        let codec = linked_list();
        let value = node(1, node(2, node(3, Value::Null)));
        let bytes = codec.encode(&value).unwrap();
        assert_eq!(bytes, [1, 0, 2, 0, 3, 1]);
        assert_eq!(codec.byte_length(&value).unwrap(), 6);
        assert_eq!(codec.decode(&bytes).unwrap(), value);
        assert!(!codec.is_valid(&node(1, Value::Int(2))));
    }

    #[test]
    fn hostile_nesting_hits_depth_limit() {
        let codec = linked_list();
        let bytes = [0u8; 2 * 1000];
        assert_eq!(
            codec.decode(&bytes),
            Err(CodecError::DepthLimitExceeded(crate::context::DEFAULT_MAX_DEPTH))
        );
    }

    #[test]
    fn placeholder_without_definition() {
        let mut leaked: Option<CodecRef> = None;
        let codec = RecursiveCodec::new(|this| {
            leaked = Some(this);
            ConstantCodec::new(Value::Null)
        });
        let placeholder = leaked.unwrap();
        assert!(placeholder.is_valid(&Value::Null));
        drop(codec);
        assert_eq!(
            placeholder.decode(&[]),
            Err(CodecError::UnresolvedRecursion)
        );
        assert!(!placeholder.is_valid(&Value::Null));
    }
}
