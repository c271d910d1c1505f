//! Error types for assertions

use thiserror::Error;

/// Result type for assertion operations
pub type ExpectResult<T> = Result<T, ExpectError>;

/// Boxed error returned by a decode capability
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which side of a comparison a value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Got,
    Expected,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Got => write!(f, "got"),
            Side::Expected => write!(f, "expected"),
        }
    }
}

/// Conditions that abort the current test unit
///
/// A mismatch between two values is never an `ExpectError`; it is reported
/// through [`Reporter::fail`](crate::Reporter::fail) and execution continues.
#[derive(Debug, Error)]
pub enum ExpectError {
    /// The expected value was not supplied
    #[error("expected pointer is nil")]
    NullExpected,

    /// The decoder was not supplied
    #[error("decoder is nil")]
    NullDecoder,

    /// The decoder could not produce a value from the stream
    #[error("failed to decode stream: {source}")]
    Decode {
        #[source]
        source: BoxError,
    },

    /// A value could not be rendered into its structural form
    #[error("failed to serialize {side} value: {source}")]
    Serialize {
        side: Side,
        #[source]
        source: serde_json::Error,
    },
}

impl ExpectError {
    /// Wrap an error returned by a decode capability
    pub fn decode(source: impl Into<BoxError>) -> Self {
        ExpectError::Decode {
            source: source.into(),
        }
    }

    /// Whether the error comes from invoking the assertion incorrectly
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            ExpectError::NullExpected | ExpectError::NullDecoder | ExpectError::Serialize { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_wraps_source_message() {
        let err = ExpectError::decode("bad thing happened");
        assert_eq!(err.to_string(), "failed to decode stream: bad thing happened");
        assert!(!err.is_usage());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_null_errors_are_usage_errors() {
        assert!(ExpectError::NullExpected.is_usage());
        assert!(ExpectError::NullDecoder.is_usage());
        assert_eq!(ExpectError::NullExpected.to_string(), "expected pointer is nil");
        assert_eq!(ExpectError::NullDecoder.to_string(), "decoder is nil");
    }
}
