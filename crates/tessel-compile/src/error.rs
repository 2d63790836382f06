//! Error types for the compilation crate.

use tessel_ir::{MemoryReference, QubitId};
use thiserror::Error;

/// Errors that can occur while rewriting or assembling an executable.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] tessel_ir::IrError),

    /// Gate parameter reads a region the program never declares.
    #[error("Reference to undeclared memory region: {0}")]
    UndeclaredMemoryRegion(MemoryReference),

    /// Readout region declared more than once.
    #[error("Readout region '{0}' is declared more than once")]
    DuplicateReadoutRegion(String),

    /// Two measurements write the same readout slot.
    #[error("Measurement of qubit {current} into {target} overwrites the result of qubit {previous}")]
    AmbiguousMeasurementTarget {
        target: MemoryReference,
        previous: QubitId,
        current: QubitId,
    },

    /// Measurement into a region other than the readout region.
    #[error("Measurement into '{region}', expected readout region '{expected}'")]
    UnexpectedReadoutRegion { region: String, expected: String },

    /// Measurements present but the readout region is not declared.
    #[error("Found measurements, but no '{0}' region was declared")]
    MissingReadoutRegion(String),

    /// Two recalculation rules target the same slot.
    #[error("Recalculation slot {0} is assigned more than once")]
    DuplicateRecalculationSlot(MemoryReference),

    /// Infinite or NaN literal, which has no text form.
    #[error("Non-finite literal in {0}")]
    NonFiniteLiteral(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
