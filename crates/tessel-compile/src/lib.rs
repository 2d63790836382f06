//! Tessel Compilation
//!
//! This crate prepares native-form programs for control hardware that can
//! patch classical memory but cannot evaluate arithmetic.
//!
//! # Overview
//!
//! - **Rewriting**: [`rewrite_arithmetic`] moves memory-dependent gate
//!   parameters into slots of a generated `__P<n>` region
//! - **Recalculation**: [`RecalculationTable`] records the expression behind
//!   each slot
//! - **Readout**: [`collect_readout_sources`] maps readout slots to measured
//!   qubits under a [`ReadoutPolicy`]
//! - **Executables**: [`Executable`] bundles the rewritten program with its
//!   tables for dispatch
//!
//! # Example: Rewriting a Parametric Program
//!
//! ```rust
//! use tessel_compile::{Executable, ExecutableOptions};
//! use tessel_ir::{Declaration, Instruction, MemoryReference, MemoryType, Program, parse_expression};
//!
//! let program = Program::from_instructions([
//!     Instruction::declare(Declaration::new("theta", MemoryType::Real, 1)),
//!     Instruction::declare(Declaration::new("ro", MemoryType::Bit, 1)),
//!     Instruction::gate("RZ", [parse_expression("3*theta").unwrap()], [0]),
//!     Instruction::measure(0, MemoryReference::new("ro", 0)),
//! ]);
//!
//! let exe = Executable::from_native(&program, &ExecutableOptions::default()).unwrap();
//! assert!(exe.program.contains("RZ(__P0[0]) 0"));
//! assert_eq!(exe.recalculation_table.len(), 1);
//! assert_eq!(exe.ro_sources.len(), 1);
//! ```

pub mod error;
pub mod executable;
pub mod readout;
pub mod recalculation;
pub mod rewrite;

pub use error::{CompileError, CompileResult};
pub use executable::{Executable, ExecutableOptions};
pub use readout::{
    DEFAULT_READOUT_REGION, ReadoutOptions, ReadoutPolicy, ReadoutSource,
    collect_memory_descriptors, collect_readout_sources,
};
pub use recalculation::{RecalculationRule, RecalculationTable};
pub use rewrite::{RewriteResult, SLOT_REGION_PREFIX, rewrite_arithmetic};
