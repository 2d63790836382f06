//! Quantum processor descriptions.
//!
//! A processor is anything that can report its qubits and connectivity and
//! produce an ISA for compilation: a raw graph with operator lists, a vendor
//! architecture document, or an ISA received as-is.

use crate::config::SynthesisConfig;
use crate::error::IsaResult;
use crate::graph::{Topology, graph_to_isa, isa_to_graph};
use crate::isa::InstructionSetArchitecture;
use crate::vendor::{VendorIsa, vendor_isa_to_isa};

/// Source of an ISA.
pub trait QuantumProcessor: Send + Sync {
    /// Qubit ids, ascending.
    fn qubits(&self) -> Vec<u32>;

    /// Qubit connectivity.
    fn qubit_topology(&self) -> Topology;

    /// ISA suitable for targeting by compilation.
    ///
    /// Fails if the processor requests an operator synthesis does not support.
    fn to_isa(&self) -> IsaResult<InstructionSetArchitecture>;
}

/// A processor described by a connectivity graph.
#[derive(Debug, Clone)]
pub struct GraphProcessor {
    topology: Topology,
    gates_1q: Vec<String>,
    gates_2q: Vec<String>,
}

impl GraphProcessor {
    /// Use the default operator lists.
    pub fn new(topology: Topology) -> Self {
        Self::with_config(topology, &SynthesisConfig::default())
    }

    /// Use the operator lists of `config`.
    pub fn with_config(topology: Topology, config: &SynthesisConfig) -> Self {
        Self {
            topology,
            gates_1q: config.gates_1q.clone(),
            gates_2q: config.gates_2q.clone(),
        }
    }

    /// Replace the operator lists.
    #[must_use]
    pub fn with_gates<S: Into<String>>(
        mut self,
        gates_1q: impl IntoIterator<Item = S>,
        gates_2q: impl IntoIterator<Item = S>,
    ) -> Self {
        self.gates_1q = gates_1q.into_iter().map(Into::into).collect();
        self.gates_2q = gates_2q.into_iter().map(Into::into).collect();
        self
    }

    /// Sorted, deduplicated edges with the smaller id first.
    pub fn edges(&self) -> Vec<(u32, u32)> {
        let mut edges: Vec<(u32, u32)> = self
            .topology
            .all_edges()
            .map(|(a, b, _)| if a <= b { (a, b) } else { (b, a) })
            .collect();
        edges.sort_unstable();
        edges.dedup();
        edges
    }
}

impl QuantumProcessor for GraphProcessor {
    fn qubits(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.topology.nodes().collect();
        ids.sort_unstable();
        ids
    }

    fn qubit_topology(&self) -> Topology {
        self.topology.clone()
    }

    fn to_isa(&self) -> IsaResult<InstructionSetArchitecture> {
        graph_to_isa(&self.topology, &self.gates_1q, &self.gates_2q)
    }
}

/// A processor described by a vendor architecture document.
#[derive(Debug, Clone)]
pub struct VendorProcessor {
    id: String,
    isa: VendorIsa,
    config: SynthesisConfig,
}

impl VendorProcessor {
    /// Wrap a vendor document.
    pub fn new(id: impl Into<String>, isa: VendorIsa) -> Self {
        Self {
            id: id.into(),
            isa,
            config: SynthesisConfig::default(),
        }
    }

    /// Use `config` for fallback figures.
    #[must_use]
    pub fn with_config(mut self, config: SynthesisConfig) -> Self {
        self.config = config;
        self
    }

    /// Processor id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The vendor document.
    pub fn vendor_isa(&self) -> &VendorIsa {
        &self.isa
    }
}

impl QuantumProcessor for VendorProcessor {
    fn qubits(&self) -> Vec<u32> {
        self.isa.qubits()
    }

    fn qubit_topology(&self) -> Topology {
        self.isa.topology()
    }

    fn to_isa(&self) -> IsaResult<InstructionSetArchitecture> {
        vendor_isa_to_isa(&self.isa, &self.config)
    }
}

/// A processor whose ISA is already known.
#[derive(Debug, Clone)]
pub struct IsaProcessor {
    isa: InstructionSetArchitecture,
}

impl IsaProcessor {
    /// Wrap an ISA.
    pub fn new(isa: InstructionSetArchitecture) -> Self {
        Self { isa }
    }

    /// Read an ISA from its JSON wire form.
    pub fn from_json(json: &str) -> IsaResult<Self> {
        Ok(Self::new(InstructionSetArchitecture::from_json(json)?))
    }
}

impl QuantumProcessor for IsaProcessor {
    fn qubits(&self) -> Vec<u32> {
        self.isa.qubits.keys().copied().collect()
    }

    fn qubit_topology(&self) -> Topology {
        isa_to_graph(&self.isa)
    }

    fn to_isa(&self) -> IsaResult<InstructionSetArchitecture> {
        Ok(self.isa.clone())
    }
}
