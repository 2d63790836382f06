//! Conversion between connectivity graphs and ISAs.

use petgraph::graphmap::UnGraphMap;
use tracing::{debug, instrument};

use crate::config::SynthesisConfig;
use crate::error::IsaResult;
use crate::gateset::{
    Calibration, EdgeOperator, QubitOperator, edge_capabilities, parse_operators,
    qubit_capabilities,
};
use crate::isa::{Argument, Edge, EdgeId, InstructionSetArchitecture, Qubit};

/// Undirected qubit connectivity.
pub type Topology = UnGraphMap<u32, ()>;

/// Build a topology from an edge list.
pub fn topology_from_edges(edges: impl IntoIterator<Item = (u32, u32)>) -> Topology {
    Topology::from_edges(edges)
}

/// Build an ISA from a connectivity graph.
///
/// Every id in `0..=max` gets a qubit; ids absent from the graph are dead and
/// carry no capabilities. Every graph edge becomes a live edge. Live sites get
/// the full expansion of the requested operators. An empty graph gives an
/// empty ISA.
#[instrument(skip_all, fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn graph_to_isa<A, B>(
    graph: &Topology,
    gates_1q: &[A],
    gates_2q: &[B],
) -> IsaResult<InstructionSetArchitecture>
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let qubit_ops: Vec<QubitOperator> = parse_operators(gates_1q)?;
    let edge_ops: Vec<EdgeOperator> = parse_operators(gates_2q)?;

    let mut isa = InstructionSetArchitecture::new();
    let Some(max_id) = graph.nodes().max() else {
        return Ok(isa);
    };

    let calibration = Calibration::Uncalibrated;
    let qubit_gates: Vec<_> = qubit_ops
        .iter()
        .flat_map(|&op| qubit_capabilities(op, &Argument::wildcard(), &calibration))
        .collect();
    let edge_gates: Vec<_> = edge_ops
        .iter()
        .flat_map(|&op| edge_capabilities(op, &calibration))
        .collect();

    for id in 0..=max_id {
        let dead = !graph.contains_node(id);
        if dead {
            debug!(qubit = id, "marking absent qubit dead");
        }
        isa.qubits.insert(
            id,
            Qubit {
                id,
                dead,
                gates: if dead { Vec::new() } else { qubit_gates.clone() },
            },
        );
    }

    for (a, b, _) in graph.all_edges() {
        let ids = EdgeId::new(a, b);
        isa.edges.insert(
            ids,
            Edge {
                ids,
                dead: false,
                gates: edge_gates.clone(),
            },
        );
    }

    Ok(isa)
}

/// Build an ISA using the configured default operator lists.
pub fn graph_to_isa_with_config(
    graph: &Topology,
    config: &SynthesisConfig,
) -> IsaResult<InstructionSetArchitecture> {
    graph_to_isa(graph, &config.gates_1q, &config.gates_2q)
}

/// Connectivity of an ISA.
///
/// Edges are the member pairs of every ISA edge, dead or not. Live qubits are
/// kept as nodes even when isolated.
pub fn isa_to_graph(isa: &InstructionSetArchitecture) -> Topology {
    let mut graph = Topology::new();
    for qubit in isa.live_qubits() {
        graph.add_node(qubit.id);
    }
    for ids in isa.edges.keys() {
        let (a, b) = ids.pair();
        graph.add_edge(a, b, ());
    }
    graph
}
