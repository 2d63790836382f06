//! Error types for the IR crate.

use thiserror::Error;

/// Errors that can occur while building or reading IR values.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Lexer error (invalid token).
    #[error("Lexer error at position {position}: {message}")]
    LexerError { position: usize, message: String },

    /// Unexpected token.
    #[error("Unexpected token at position {position}: expected {expected}, found {found}")]
    UnexpectedToken {
        position: usize,
        expected: String,
        found: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: expected {0}")]
    UnexpectedEof(String),

    /// Function name outside the known set.
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Malformed memory reference such as `theta[x]`.
    #[error("Invalid memory reference: '{0}'")]
    InvalidMemoryReference(String),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
