//! Error types for value parsing.

use thiserror::Error;

/// Errors produced by the value parsers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input is of a kind the parser does not accept at all.
    #[error("expected {expected}, got {found}")]
    Type {
        /// What the parser accepts
        expected: String,
        /// What it received
        found: String,
    },

    /// The input has the right kind but its content is not acceptable.
    #[error("{message}")]
    Value {
        /// Human-readable explanation
        message: String,
    },
}

impl ParseError {
    /// Create a type error.
    pub fn type_error(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::Type {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a value error.
    pub fn value(message: impl Into<String>) -> Self {
        Self::Value {
            message: message.into(),
        }
    }

    /// Returns true for [`ParseError::Type`].
    pub fn is_type_error(&self) -> bool {
        matches!(self, Self::Type { .. })
    }

    /// Returns true for [`ParseError::Value`].
    pub fn is_value_error(&self) -> bool {
        matches!(self, Self::Value { .. })
    }
}
