//! Tessel Execution
//!
//! Host-side work done before each dispatch of a compiled executable:
//! evaluating the recalculation rules against the caller's memory writes and
//! assembling the values to patch into the control system's memory.
//!
//! # Overview
//!
//! - **Memory**: [`MemoryWrites`] is the snapshot of values for one dispatch
//! - **Evaluation**: [`evaluate`] computes one expression over that snapshot
//! - **Patching**: [`resolve`] evaluates a whole [`RecalculationTable`];
//!   [`build_patch_values`] adds the user's own parameter regions
//!
//! # Example: Resolving Slots
//!
//! ```rust
//! use tessel_compile::{Executable, ExecutableOptions};
//! use tessel_exec::{MemoryWrites, build_patch_values};
//! use tessel_ir::{Declaration, Instruction, MemoryType, Program, parse_expression};
//!
//! let program = Program::from_instructions([
//!     Instruction::declare(Declaration::new("theta", MemoryType::Real, 1)),
//!     Instruction::gate("RZ", [parse_expression("2*theta").unwrap()], [0]),
//! ]);
//! let exe = Executable::from_native(&program, &ExecutableOptions::default()).unwrap();
//!
//! let memory = MemoryWrites::new().with("theta", 0, 0.25);
//! let patch = build_patch_values(&exe, &memory).unwrap();
//! assert_eq!(patch["theta"], vec![0.25]);
//! assert_eq!(patch["__P0"], vec![0.5]);
//! ```
//!
//! [`RecalculationTable`]: tessel_compile::RecalculationTable

pub mod error;
pub mod eval;
pub mod memory;
pub mod patch;

pub use error::{ExecError, ExecResult};
pub use eval::evaluate;
pub use memory::MemoryWrites;
pub use patch::{MAX_PATCH_REGION_LENGTH, PatchTable, build_patch_values, resolve};
