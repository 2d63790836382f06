//! Integration tests for gateset synthesis on concrete topologies.

use std::f64::consts::PI;

use tessel_isa::{
    GateOperator, GraphProcessor, IsaError, IsaProcessor, NativeGate, Parameter,
    QuantumProcessor, SynthesisConfig, VendorIsa, VendorProcessor, gates_in_isa, graph_to_isa,
    topology_from_edges,
};

/// Helper: two-qubit instances as (operator, first, second).
fn two_qubit_gates(gates: &[NativeGate]) -> Vec<(GateOperator, u32, u32)> {
    gates
        .iter()
        .filter_map(|gate| match gate {
            NativeGate::Gate {
                operator, qubits, ..
            } if qubits.len() == 2 => Some((*operator, qubits[0], qubits[1])),
            _ => None,
        })
        .collect()
}

#[test]
fn test_edge_keys_are_ascending() {
    let graph = topology_from_edges([(16, 17), (15, 16)]);
    let isa = graph_to_isa(&graph, &["I"], &["CZ"]).unwrap();

    let value = serde_json::to_value(&isa).unwrap();
    let keys: Vec<&String> = value["2Q"].as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), 2);
    for key in keys {
        let (a, b) = key.split_once('-').unwrap();
        assert!(a.parse::<u32>().unwrap() < b.parse::<u32>().unwrap(), "key {key}");
    }

    // 0..=14 are absent from the graph.
    assert_eq!(isa.qubits.len(), 18);
    assert_eq!(isa.live_qubits().count(), 3);
}

#[test]
fn test_dead_qubit_and_edge_are_excluded() {
    let graph = topology_from_edges([(0, 1), (1, 2), (2, 3), (0, 3)]);
    let mut isa = graph_to_isa(&graph, &["I", "RX", "RZ", "MEASURE"], &["CZ", "XY"]).unwrap();
    isa.qubits.get_mut(&3).unwrap().dead = true;
    isa.edges.values_mut().filter(|e| e.ids.pair() == (0, 3)).for_each(|e| e.dead = true);

    let gates = gates_in_isa(&isa).unwrap();
    assert!(!gates.is_empty());
    assert!(gates.iter().all(|gate| !gate.touches(3)));
}

#[test]
fn test_edges_emit_both_directions() {
    let graph = topology_from_edges([(0, 1)]);
    let isa = graph_to_isa(&graph, &["RZ"], &["CZ", "CPHASE"]).unwrap();
    let gates = gates_in_isa(&isa).unwrap();

    let pairs = two_qubit_gates(&gates);
    assert_eq!(
        pairs,
        vec![
            (GateOperator::Cz, 0, 1),
            (GateOperator::Cz, 1, 0),
            (GateOperator::Cphase, 0, 1),
            (GateOperator::Cphase, 1, 0),
        ]
    );
}

#[test]
fn test_default_gateset_counts() {
    let processor = GraphProcessor::new(topology_from_edges([(0, 1)]));
    let gates = gates_in_isa(&processor.to_isa().unwrap()).unwrap();

    // Per qubit: I, 5 RX, RZ, 2 MEASURE. Per edge: CZ and XY, both directions.
    assert_eq!(gates.len(), 2 * 9 + 2 * 2);

    let rx_on_zero: Vec<f64> = gates
        .iter()
        .filter_map(|gate| match gate {
            NativeGate::Gate {
                operator: GateOperator::Rx,
                parameters,
                qubits,
            } if qubits == &[0] => match parameters.first() {
                Some(Parameter::Number(angle)) => Some(*angle),
                _ => None,
            },
            _ => None,
        })
        .collect();
    assert_eq!(rx_on_zero, vec![0.0, PI, -PI, PI / 2.0, -PI / 2.0]);

    let measurements = gates
        .iter()
        .filter(|gate| matches!(gate, NativeGate::Measure { qubit: 1, .. }))
        .count();
    assert_eq!(measurements, 2);
}

#[test]
fn test_unsupported_operator_is_loud() {
    let graph = topology_from_edges([(0, 1)]);
    let result = graph_to_isa(&graph, &["I", "SWAP"], &["CZ"]);
    assert!(matches!(result, Err(IsaError::UnsupportedOperator(name)) if name == "SWAP"));
}

#[test]
fn test_wire_isa_through_processor() {
    let json = r#"{
        "1Q": {
            "0": {"id": 0, "gates": [{"operator": "RZ", "parameters": ["theta"], "arguments": ["_"]}]},
            "1": {"id": 1, "gates": [{"operator": "MEASURE", "qubit": "_", "target": null}]}
        },
        "2Q": {"0-1": {"ids": [0, 1], "gates": [{"operator": "_", "parameters": ["_"], "arguments": ["_", "_"]}]}}
    }"#;
    let processor = IsaProcessor::from_json(json).unwrap();
    let gates = gates_in_isa(&processor.to_isa().unwrap()).unwrap();

    assert_eq!(gates.len(), 4);
    assert_eq!(gates[0].to_string(), "RZ(theta) 0");
    assert_eq!(gates[1], NativeGate::Measure { qubit: 1, discard: true });
    assert_eq!(gates[2].to_string(), "_(_) 0 1");
    assert_eq!(gates[3].to_string(), "_(_) 1 0");
}

#[test]
fn test_vendor_processor_gateset() {
    let vendor = VendorIsa::from_json(
        r#"{
            "name": "ring",
            "architecture": {
                "nodes": [{"node_id": 0}, {"node_id": 1}, {"node_id": 2}],
                "edges": [{"node_ids": [0, 1]}, {"node_ids": [1, 2]}, {"node_ids": [2, 0]}]
            },
            "instructions": [
                {"name": "RZ", "node_count": 1, "sites": [{"node_ids": [0]}, {"node_ids": [1]}, {"node_ids": [2]}]},
                {"name": "XY", "node_count": 2, "sites": [{"node_ids": [0, 2], "characteristics": [{"name": "fXY", "value": 0.92}]}]}
            ]
        }"#,
    )
    .unwrap();
    let processor = VendorProcessor::new("ring-3", vendor).with_config(SynthesisConfig::default());
    let isa = processor.to_isa().unwrap();
    assert_eq!(isa.edge(2, 0).unwrap().gates[0].fidelity, Some(0.92));

    let gates = gates_in_isa(&isa).unwrap();
    let pairs = two_qubit_gates(&gates);
    assert_eq!(pairs, vec![(GateOperator::Xy, 0, 2), (GateOperator::Xy, 2, 0)]);
    assert_eq!(gates.len(), 3 + 2);
}
