//! Error types for the ISA crate.

use thiserror::Error;

/// Errors that can occur while building, reading or synthesizing an ISA.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IsaError {
    /// Operator name outside the synthesis table.
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// Vendor operation scoped to the wrong number of nodes, or to an
    /// undeclared node or edge.
    #[error("Malformed site: {0}")]
    MalformedSite(String),

    /// Edge member missing from the qubit map.
    #[error("Edge references unknown qubit {0}")]
    UnknownQubit(u32),

    /// Edge key that is not of the form `low-high`, or disagrees with its record.
    #[error("Invalid edge key: '{0}'")]
    InvalidEdgeKey(String),

    /// Qubit key that is not an integer, or disagrees with its record.
    #[error("Invalid qubit key: '{0}'")]
    InvalidQubitKey(String),

    /// Synthesis configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml_ng::Error),

    /// JSON wire form could not be read or written.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ISA operations.
pub type IsaResult<T> = Result<T, IsaError>;
