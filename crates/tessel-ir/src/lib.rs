//! Tessel Native-Form Program Model
//!
//! This crate provides the program representation consumed by the Tessel
//! compiler back half: classical memory declarations, gate-parameter
//! arithmetic, and native-form instructions.
//!
//! # Core Components
//!
//! - **Memory**: [`MemoryReference`], [`Declaration`], [`MemoryType`] for
//!   classical memory regions and locations within them
//! - **Expressions**: [`Expression`] trees over numbers, `pi`, memory
//!   references and the functions in [`Function`]
//! - **Reading expressions**: [`parse_expression`] (also `str::parse`) reads the
//!   textual form written by `Display`
//! - **Instructions**: [`Instruction`], [`Gate`], [`Measurement`]
//! - **Programs**: [`Program`], printed as Quil text
//!
//! # Example: Gate Parameters Over Memory
//!
//! ```rust
//! use tessel_ir::{Declaration, Expression, Instruction, MemoryType, Program};
//!
//! let theta = Expression::address("theta", 0);
//!
//! let mut program = Program::new();
//! program
//!     .push(Declaration::new("theta", MemoryType::Real, 1))
//!     .push(Instruction::gate("RZ", [Expression::from(3) * theta], [0]));
//!
//! assert_eq!(program.to_string(), "DECLARE theta REAL[1]\nRZ(3 * theta[0]) 0\n");
//!
//! let parsed: Expression = "3 * theta[0]".parse().unwrap();
//! assert!(parsed.is_compound());
//! assert!(parsed.references_memory());
//! ```

pub mod error;
pub mod expression;
pub mod instruction;
pub mod lexer;
pub mod memory;
pub mod parser;
pub mod program;
pub mod qubit;

pub use error::{IrError, IrResult};
pub use expression::{Expression, Function};
pub use instruction::{Gate, Instruction, Measurement};
pub use memory::{Declaration, MemoryReference, MemoryType, ParameterSpec};
pub use parser::{ExpressionParser, parse_expression};
pub use program::Program;
pub use qubit::QubitId;
