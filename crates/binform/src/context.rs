//! Per-call scratch registry for pointers and recursion.

use std::collections::HashMap;

use crate::codec::CodecRef;
use crate::error::{CodecError, Result};
use crate::value::Value;

/// Default bound on nested recursive-codec hops.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// The codec and value most recently processed under an id.
#[derive(Debug, Clone)]
pub struct ContextEntry {
    pub codec: CodecRef,
    pub value: Value,
}

/// State threaded through a single top-level validate, size, encode or decode
/// call. Never shared between calls.
#[derive(Debug)]
pub struct Context {
    entries: HashMap<String, ContextEntry>,
    depth: usize,
    max_depth: usize,
    too_deep: bool,
}

/// Registry state saved by [`Context::checkpoint`].
#[derive(Debug, Clone)]
pub struct Checkpoint {
    entries: HashMap<String, ContextEntry>,
    too_deep: bool,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            entries: HashMap::new(),
            depth: 0,
            max_depth,
            too_deep: false,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Records `(codec, value)` under `id`, replacing any earlier entry.
    pub fn register(&mut self, id: &str, codec: CodecRef, value: Value) {
        self.entries
            .insert(id.to_string(), ContextEntry { codec, value });
    }

    pub fn get(&self, id: &str) -> Option<&ContextEntry> {
        self.entries.get(id)
    }

    /// Like [`Context::get`], but a missing id is an error.
    pub fn resolve(&self, id: &str) -> Result<&ContextEntry> {
        self.entries
            .get(id)
            .ok_or_else(|| CodecError::UnresolvedPointer(id.to_string()))
    }

    /// Drops every registered entry and resets the depth counter.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.depth = 0;
        self.too_deep = false;
    }

    /// Saves the registered entries so a rejected trial can be undone.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            entries: self.entries.clone(),
            too_deep: self.too_deep,
        }
    }

    /// Restores the entries saved by `checkpoint`, dropping every
    /// registration made since.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.entries = checkpoint.entries;
        self.too_deep = checkpoint.too_deep;
    }

    /// Whether a validation failed because the depth limit was hit.
    pub fn depth_exceeded(&self) -> bool {
        self.too_deep
    }

    pub(crate) fn mark_depth_exceeded(&mut self) {
        self.too_deep = true;
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Enters one level of recursion.
    pub fn enter(&mut self) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(CodecError::DepthLimitExceeded(self.max_depth));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
