//! Codec error type.

use binform_buffers::BufferError;

/// Errors raised while validating, sizing, encoding or decoding.
///
/// Composite codecs never wrap the errors of their children: the error that
/// reaches the caller is the one the failing leaf produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    #[error("insufficient bytes: needed {needed}, {available} available")]
    InsufficientBytes { needed: usize, available: usize },
    #[error("destination too small: needed {needed}, {available} available")]
    InsufficientSpace { needed: usize, available: usize },
    #[error("value {value} out of range [{minimum}, {maximum}]")]
    OutOfRange {
        value: String,
        minimum: String,
        maximum: String,
    },
    #[error("invalid value: expected {expected}")]
    InvalidValue { expected: &'static str },
    #[error("invalid {encoding} text")]
    InvalidText { encoding: &'static str },
    #[error("invalid UTF-8")]
    InvalidUtf8,
    #[error("no union candidate accepts the value")]
    NoMatchingCandidate,
    #[error("value is not a member of the enumeration")]
    NotInEnumeration,
    #[error("index {index} out of range for {count} entries")]
    InvalidIndex { index: i64, count: usize },
    #[error("pointer target `{0}` was not registered")]
    UnresolvedPointer(String),
    #[error("recursive codec used before its definition was resolved")]
    UnresolvedRecursion,
    #[error("nesting depth exceeds {0}")]
    DepthLimitExceeded(usize),
    #[error("framing error: decoded value consumed zero bytes")]
    ZeroLengthFrame,
    #[error("stream ended with {0} undecoded bytes")]
    TruncatedStream(usize),
    #[error("serialization failed: {0}")]
    Serialization(String),
    #[error("{0}")]
    Custom(String),
}

/// Coarse classification of [`CodecError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// More input is needed. Recoverable while streaming.
    InsufficientInput,
    /// A number outside the configured or natural range.
    RangeViolation,
    /// The codec tree cannot place the value (no union candidate, unknown enum
    /// member, unregistered pointer). A schema or programming error.
    ShapeMismatch,
    /// A stream cannot make progress.
    Framing,
    /// Malformed data or a failing user callback.
    Data,
}

impl CodecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::InsufficientBytes { .. } => ErrorKind::InsufficientInput,
            CodecError::OutOfRange { .. } => ErrorKind::RangeViolation,
            CodecError::NoMatchingCandidate
            | CodecError::NotInEnumeration
            | CodecError::UnresolvedPointer(_)
            | CodecError::UnresolvedRecursion => ErrorKind::ShapeMismatch,
            CodecError::ZeroLengthFrame | CodecError::TruncatedStream(_) => ErrorKind::Framing,
            CodecError::InsufficientSpace { .. }
            | CodecError::InvalidValue { .. }
            | CodecError::InvalidText { .. }
            | CodecError::InvalidUtf8
            | CodecError::InvalidIndex { .. }
            | CodecError::DepthLimitExceeded(_)
            | CodecError::Serialization(_)
            | CodecError::Custom(_) => ErrorKind::Data,
        }
    }

    /// `true` when decoding stopped only because the input ran out.
    pub fn is_insufficient_input(&self) -> bool {
        self.kind() == ErrorKind::InsufficientInput
    }

    pub(crate) fn out_of_range(
        value: impl ToString,
        minimum: impl ToString,
        maximum: impl ToString,
    ) -> Self {
        CodecError::OutOfRange {
            value: value.to_string(),
            minimum: minimum.to_string(),
            maximum: maximum.to_string(),
        }
    }

    pub(crate) fn invalid(expected: &'static str) -> Self {
        CodecError::InvalidValue { expected }
    }
}

impl From<BufferError> for CodecError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::InsufficientBytes { needed, available } => {
                CodecError::InsufficientBytes { needed, available }
            }
            BufferError::InvalidUtf8 => CodecError::InvalidUtf8,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = CodecError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_errors_map_to_insufficient_input() {
        let err = CodecError::from(BufferError::InsufficientBytes {
            needed: 4,
            available: 1,
        });
        assert!(err.is_insufficient_input());
        assert_eq!(err.to_string(), "insufficient bytes: needed 4, 1 available");
        assert_eq!(CodecError::from(BufferError::InvalidUtf8).kind(), ErrorKind::Data);
    }

    #[test]
    fn taxonomy() {
        assert_eq!(
            CodecError::out_of_range(5, 10, 100).kind(),
            ErrorKind::RangeViolation
        );
        assert_eq!(
            CodecError::UnresolvedPointer("len".into()).kind(),
            ErrorKind::ShapeMismatch
        );
        assert_eq!(CodecError::ZeroLengthFrame.kind(), ErrorKind::Framing);
        assert_eq!(
            CodecError::out_of_range(5, 10, 100).to_string(),
            "value 5 out of range [10, 100]"
        );
    }
}
