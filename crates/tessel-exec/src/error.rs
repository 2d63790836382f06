//! Error types for the execution crate.

use thiserror::Error;

/// Errors that can occur while evaluating recalculation rules.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExecError {
    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] tessel_ir::IrError),

    /// Expression reads a memory location with no write.
    #[error("No value written to {region}[{offset}]")]
    MissingMemoryValue { region: String, offset: u32 },

    /// Operator the host evaluator does not support.
    #[error("Unsupported operator in recalculation expression: {0}")]
    UnsupportedExpressionOperator(String),

    /// Slot offset past the end of its region's rules.
    #[error("Recalculation slot {slot} lies outside its region of {length} slots")]
    SlotOutOfRange { slot: String, length: usize },

    /// Declared region too long to lay out in a patch table.
    #[error("Region '{region}' of length {length} exceeds the patch limit of {limit}")]
    RegionTooLarge {
        region: String,
        length: u32,
        limit: u32,
    },

    /// Formal parameter with no binding.
    #[error("Unbound variable: %{0}")]
    UnboundVariable(String),
}

/// Result type for execution operations.
pub type ExecResult<T> = Result<T, ExecError>;
