//! Tessel Instruction-Set Architecture
//!
//! This crate models a quantum processor as an addressable topology with
//! per-site gate capabilities, and turns that model into the gate set a
//! compiler may target.
//!
//! # Overview
//!
//! - **ISA model**: [`InstructionSetArchitecture`] with [`Qubit`]s and
//!   [`Edge`]s keyed by id; [`EdgeId`] is the sorted member pair
//! - **Graph transforms**: [`graph_to_isa`] and [`isa_to_graph`] convert
//!   between a [`Topology`] and an ISA
//! - **Vendor documents**: [`vendor_isa_to_isa`] reads fidelities from
//!   per-site characteristics
//! - **Synthesis**: [`gates_in_isa`] expands an ISA into [`NativeGate`]s
//! - **Configuration**: [`SynthesisConfig`] holds default operator lists and
//!   fidelity/duration tables, loadable from YAML
//! - **Processors**: the [`QuantumProcessor`] trait over all three sources
//!
//! # Example: Graph to Gateset
//!
//! ```rust
//! use tessel_isa::{gates_in_isa, graph_to_isa, isa_to_graph, topology_from_edges};
//!
//! let graph = topology_from_edges([(0, 1), (1, 2)]);
//! let isa = graph_to_isa(&graph, &["RZ", "MEASURE"], &["CZ"]).unwrap();
//!
//! assert_eq!(isa.qubits.len(), 3);
//! assert!(isa.edge(2, 1).is_some());
//!
//! // 3 qubits x (RZ + 2 MEASURE) + 2 edges x CZ in both directions
//! let gates = gates_in_isa(&isa).unwrap();
//! assert_eq!(gates.len(), 13);
//!
//! assert_eq!(isa_to_graph(&isa).edge_count(), 2);
//! ```

pub mod config;
pub mod error;
pub mod gateset;
pub mod graph;
pub mod isa;
pub mod processor;
pub mod vendor;

pub use config::{CalibratedOperator, OperatorTable, SynthesisConfig};
pub use error::{IsaError, IsaResult};
pub use gateset::{
    Calibration, EdgeOperator, NativeGate, QubitOperator, edge_capabilities, gates_in_isa,
    qubit_capabilities,
};
pub use graph::{Topology, graph_to_isa, graph_to_isa_with_config, isa_to_graph, topology_from_edges};
pub use isa::{
    Argument, Edge, EdgeId, GateCapability, GateInfo, GateOperator, InstructionSetArchitecture,
    MeasureInfo, MeasureOperator, Parameter, Qubit, WILDCARD,
};
pub use processor::{GraphProcessor, IsaProcessor, QuantumProcessor, VendorProcessor};
pub use vendor::{
    Architecture, ArchitectureEdge, Characteristic, Node, Operation, OperationSite, VendorIsa,
    vendor_isa_to_isa,
};
