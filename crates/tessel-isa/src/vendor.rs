//! Vendor architecture descriptions.
//!
//! A vendor document lists nodes, node-pair edges and named operations. Each
//! operation is scoped to one or two nodes and lists its sites, and each site
//! carries measured characteristics such as readout fidelity.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::SynthesisConfig;
use crate::error::{IsaError, IsaResult};
use crate::gateset::{Calibration, EdgeOperator, QubitOperator, edge_capabilities, qubit_capabilities};
use crate::graph::Topology;
use crate::isa::{Argument, EdgeId, InstructionSetArchitecture};

/// Operation that is accepted on the vendor path but adds no capability.
const RESET: &str = "RESET";

/// A vendor architecture document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorIsa {
    /// Processor name.
    #[serde(default)]
    pub name: String,
    /// Nodes and edges.
    pub architecture: Architecture,
    /// Operations and their sites.
    #[serde(default)]
    pub instructions: Vec<Operation>,
}

/// Nodes and edges of a vendor architecture.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Architecture {
    /// Declared nodes.
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Declared edges; each should list exactly two nodes.
    #[serde(default)]
    pub edges: Vec<ArchitectureEdge>,
}

/// A declared node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub node_id: u32,
}

/// A declared edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureEdge {
    pub node_ids: Vec<u32>,
}

/// A named operation and where it is available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Operator name (`RX`, `CZ`, ...).
    pub name: String,
    /// Number of nodes each site spans.
    #[serde(default)]
    pub node_count: Option<u32>,
    /// Sites the operation is available on.
    #[serde(default)]
    pub sites: Vec<OperationSite>,
}

/// One place an operation is available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationSite {
    pub node_ids: Vec<u32>,
    #[serde(default)]
    pub characteristics: Vec<Characteristic>,
}

/// A named measurement of a site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Characteristic {
    pub name: String,
    pub value: f64,
}

impl Characteristic {
    /// Create a characteristic.
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl VendorIsa {
    /// Read a vendor document from JSON.
    pub fn from_json(json: &str) -> IsaResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Declared node ids, ascending.
    pub fn qubits(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.architecture.nodes.iter().map(|n| n.node_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Connectivity of the declared edges; malformed edges are left out.
    pub fn topology(&self) -> Topology {
        Topology::from_edges(self.architecture.edges.iter().filter_map(|e| match *e.node_ids.as_slice() {
            [a, b] => Some((a, b)),
            _ => None,
        }))
    }
}

/// Build an ISA from a vendor architecture document.
///
/// Capabilities take their fidelity from the site's characteristics, falling
/// back to `config`. A repeated operation on a site is ignored after the
/// first. `RESET` is accepted and adds nothing.
#[instrument(skip_all, fields(name = %vendor.name))]
pub fn vendor_isa_to_isa(
    vendor: &VendorIsa,
    config: &SynthesisConfig,
) -> IsaResult<InstructionSetArchitecture> {
    let mut isa = InstructionSetArchitecture::new();

    for node in &vendor.architecture.nodes {
        isa.add_qubit(node.node_id);
    }

    for edge in &vendor.architecture.edges {
        match *edge.node_ids.as_slice() {
            [a, b] => {
                isa.add_edge(a, b);
            }
            _ => {
                return Err(IsaError::MalformedSite(format!(
                    "architecture edge has {} node ids, expected 2",
                    edge.node_ids.len()
                )));
            }
        }
    }

    let mut qubit_seen: FxHashSet<(u32, &str)> = FxHashSet::default();
    let mut edge_seen: FxHashSet<(EdgeId, &str)> = FxHashSet::default();

    for operation in &vendor.instructions {
        let name = operation.name.as_str();
        for site in &operation.sites {
            let calibration = Calibration::Characterized {
                config,
                characteristics: &site.characteristics,
            };

            match operation.node_count {
                Some(1) => {
                    let [id] = *site.node_ids.as_slice() else {
                        return Err(site_arity_error(operation, site));
                    };
                    let qubit = isa.qubits.get_mut(&id).ok_or_else(|| {
                        IsaError::MalformedSite(format!(
                            "operation {name} has node {id} but node not declared in architecture"
                        ))
                    })?;

                    if !qubit_seen.insert((id, name)) {
                        debug!(operation = name, qubit = id, "ignoring repeated operation");
                        continue;
                    }
                    if name == RESET {
                        continue;
                    }

                    let op: QubitOperator = name.parse()?;
                    qubit
                        .gates
                        .extend(qubit_capabilities(op, &Argument::Qubit(id), &calibration));
                }
                Some(2) => {
                    let [a, b] = *site.node_ids.as_slice() else {
                        return Err(site_arity_error(operation, site));
                    };
                    let ids = EdgeId::new(a, b);
                    let edge = isa.edges.get_mut(&ids).ok_or_else(|| {
                        IsaError::MalformedSite(format!(
                            "operation {name} has site [{a}, {b}] but edge {ids} not declared in architecture"
                        ))
                    })?;

                    if !edge_seen.insert((ids, name)) {
                        debug!(operation = name, edge = %ids, "ignoring repeated operation");
                        continue;
                    }

                    let op: EdgeOperator = name.parse()?;
                    edge.gates.extend(edge_capabilities(op, &calibration));
                }
                other => {
                    return Err(IsaError::MalformedSite(format!(
                        "operation {name} has unexpected node count {other:?}"
                    )));
                }
            }
        }
    }

    info!(
        qubits = isa.qubits.len(),
        edges = isa.edges.len(),
        "converted vendor architecture"
    );
    Ok(isa)
}

fn site_arity_error(operation: &Operation, site: &OperationSite) -> IsaError {
    IsaError::MalformedSite(format!(
        "operation {} has node count {}, but site has {} node ids",
        operation.name,
        operation.node_count.unwrap_or_default(),
        site.node_ids.len()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::{GateCapability, GateOperator, Parameter};

    fn vendor(json: &str) -> VendorIsa {
        VendorIsa::from_json(json).unwrap()
    }

    const SMALL: &str = r#"{
        "name": "small",
        "architecture": {
            "nodes": [{"node_id": 0}, {"node_id": 1}, {"node_id": 2}],
            "edges": [{"node_ids": [1, 0]}, {"node_ids": [1, 2]}]
        },
        "instructions": [
            {"name": "RX", "node_count": 1, "sites": [
                {"node_ids": [0], "characteristics": [{"name": "f1QRB", "value": 0.99}]},
                {"node_ids": [1], "characteristics": []}
            ]},
            {"name": "RX", "node_count": 1, "sites": [
                {"node_ids": [0], "characteristics": [{"name": "f1QRB", "value": 0.5}]}
            ]},
            {"name": "MEASURE", "node_count": 1, "sites": [
                {"node_ids": [0], "characteristics": [{"name": "fRO", "value": 0.93}]}
            ]},
            {"name": "RESET", "node_count": 1, "sites": [{"node_ids": [2]}]},
            {"name": "CPHASE", "node_count": 2, "sites": [
                {"node_ids": [0, 1], "characteristics": [{"name": "fCPHASE", "value": 0.91}]}
            ]},
            {"name": "CZ", "node_count": 2, "sites": [{"node_ids": [2, 1]}]}
        ]
    }"#;

    #[test]
    fn test_vendor_conversion() {
        let isa = vendor_isa_to_isa(&vendor(SMALL), &SynthesisConfig::default()).unwrap();

        assert_eq!(isa.qubits.len(), 3);
        assert_eq!(isa.edges.len(), 2);

        // RX(0) + 4 calibrated RX + 2 MEASURE; the second RX block is ignored.
        let q0 = isa.qubit(0).unwrap();
        assert_eq!(q0.gates.len(), 7);
        let GateCapability::Gate(rx0) = &q0.gates[0] else {
            panic!("expected RX");
        };
        assert_eq!(rx0.parameters, vec![Parameter::Number(0.0)]);
        assert_eq!(rx0.fidelity, Some(1.0));
        assert_eq!(rx0.arguments, vec![Argument::Qubit(0)]);
        let GateCapability::Gate(rx_pi) = &q0.gates[1] else {
            panic!("expected RX");
        };
        assert_eq!(rx_pi.fidelity, Some(0.99));
        assert_eq!(rx_pi.duration, Some(50.0));
        let GateCapability::Measure(readout) = &q0.gates[5] else {
            panic!("expected MEASURE");
        };
        assert_eq!(readout.fidelity, Some(0.93));

        let GateCapability::Gate(rx_default) = &isa.qubit(1).unwrap().gates[1] else {
            panic!("expected RX");
        };
        assert_eq!(rx_default.fidelity, Some(0.95));

        assert!(isa.qubit(2).unwrap().gates.is_empty());

        let cphase = &isa.edge(0, 1).unwrap().gates;
        assert_eq!(cphase.len(), 1);
        assert_eq!(cphase[0].operator, GateOperator::Cphase);
        assert_eq!(cphase[0].fidelity, Some(0.91));
        assert_eq!(isa.edge(1, 2).unwrap().gates[0].fidelity, Some(0.89));
    }

    #[test]
    fn test_vendor_topology() {
        let doc = vendor(SMALL);
        assert_eq!(doc.qubits(), vec![0, 1, 2]);
        let topology = doc.topology();
        assert_eq!(topology.edge_count(), 2);
        assert!(topology.contains_edge(0, 1));
    }

    #[test]
    fn test_site_arity_mismatch() {
        let doc = vendor(
            r#"{"architecture": {"nodes": [{"node_id": 0}, {"node_id": 1}], "edges": [{"node_ids": [0, 1]}]},
                "instructions": [{"name": "CZ", "node_count": 2, "sites": [{"node_ids": [0]}]}]}"#,
        );
        assert!(matches!(
            vendor_isa_to_isa(&doc, &SynthesisConfig::default()),
            Err(IsaError::MalformedSite(_))
        ));

        let doc = vendor(
            r#"{"architecture": {"nodes": [{"node_id": 0}, {"node_id": 1}]},
                "instructions": [{"name": "RX", "node_count": 1, "sites": [{"node_ids": [0, 1]}]}]}"#,
        );
        assert!(matches!(
            vendor_isa_to_isa(&doc, &SynthesisConfig::default()),
            Err(IsaError::MalformedSite(_))
        ));
    }

    #[test]
    fn test_undeclared_site() {
        let doc = vendor(
            r#"{"architecture": {"nodes": [{"node_id": 0}, {"node_id": 1}]},
                "instructions": [{"name": "CZ", "node_count": 2, "sites": [{"node_ids": [0, 1]}]}]}"#,
        );
        assert!(matches!(
            vendor_isa_to_isa(&doc, &SynthesisConfig::default()),
            Err(IsaError::MalformedSite(_))
        ));

        let doc = vendor(
            r#"{"architecture": {"nodes": [{"node_id": 0}]},
                "instructions": [{"name": "RZ", "node_count": 1, "sites": [{"node_ids": [4]}]}]}"#,
        );
        assert!(matches!(
            vendor_isa_to_isa(&doc, &SynthesisConfig::default()),
            Err(IsaError::MalformedSite(_))
        ));
    }

    #[test]
    fn test_malformed_architecture() {
        let doc = vendor(r#"{"architecture": {"nodes": [{"node_id": 0}], "edges": [{"node_ids": [0]}]}}"#);
        assert!(matches!(
            vendor_isa_to_isa(&doc, &SynthesisConfig::default()),
            Err(IsaError::MalformedSite(_))
        ));

        let doc = vendor(
            r#"{"architecture": {"nodes": [{"node_id": 0}]},
                "instructions": [{"name": "CCZ", "node_count": 3, "sites": []}, {"name": "X", "sites": [{"node_ids": [0]}]}]}"#,
        );
        assert!(matches!(
            vendor_isa_to_isa(&doc, &SynthesisConfig::default()),
            Err(IsaError::MalformedSite(_))
        ));
    }

    #[test]
    fn test_unsupported_vendor_operation() {
        let doc = vendor(
            r#"{"architecture": {"nodes": [{"node_id": 0}]},
                "instructions": [{"name": "H", "node_count": 1, "sites": [{"node_ids": [0]}]}]}"#,
        );
        assert!(matches!(
            vendor_isa_to_isa(&doc, &SynthesisConfig::default()),
            Err(IsaError::UnsupportedOperator(name)) if name == "H"
        ));
    }
}
