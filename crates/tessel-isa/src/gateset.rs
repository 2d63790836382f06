//! Gateset synthesis.
//!
//! Two steps: operator names requested for a site expand into the site's
//! gate capabilities, and an ISA expands into the concrete gate instances a
//! compiler may target.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, instrument};

use crate::config::{CalibratedOperator, SynthesisConfig};
use crate::error::{IsaError, IsaResult};
use crate::isa::{
    Argument, GateCapability, GateInfo, GateOperator, InstructionSetArchitecture, MeasureInfo,
    Parameter,
};
use crate::vendor::Characteristic;

/// Operators that can be requested for a qubit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QubitOperator {
    /// Identity.
    I,
    /// X rotations at fixed angles.
    Rx,
    /// Z rotation by any angle.
    Rz,
    /// Readout.
    Measure,
    /// Some unspecified gate.
    Wildcard,
}

impl FromStr for QubitOperator {
    type Err = IsaError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "I" => Ok(QubitOperator::I),
            "RX" => Ok(QubitOperator::Rx),
            "RZ" => Ok(QubitOperator::Rz),
            "MEASURE" => Ok(QubitOperator::Measure),
            "WILDCARD" | "_" => Ok(QubitOperator::Wildcard),
            other => Err(IsaError::UnsupportedOperator(other.to_string())),
        }
    }
}

/// Operators that can be requested for an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeOperator {
    /// Controlled Z.
    Cz,
    /// iSWAP.
    Iswap,
    /// Controlled phase by any angle.
    Cphase,
    /// XY interaction by any angle.
    Xy,
    /// Some unspecified gate.
    Wildcard,
}

impl FromStr for EdgeOperator {
    type Err = IsaError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "CZ" => Ok(EdgeOperator::Cz),
            "ISWAP" => Ok(EdgeOperator::Iswap),
            "CPHASE" => Ok(EdgeOperator::Cphase),
            "XY" => Ok(EdgeOperator::Xy),
            "WILDCARD" | "_" => Ok(EdgeOperator::Wildcard),
            other => Err(IsaError::UnsupportedOperator(other.to_string())),
        }
    }
}

/// Parse a list of operator names, failing on the first unknown one.
pub fn parse_operators<T, S>(names: &[S]) -> IsaResult<Vec<T>>
where
    T: FromStr<Err = IsaError>,
    S: AsRef<str>,
{
    names.iter().map(|name| name.as_ref().parse()).collect()
}

/// Where fidelity and duration figures come from.
#[derive(Debug, Clone, Copy)]
pub enum Calibration<'a> {
    /// No figures; the raw-graph path.
    Uncalibrated,
    /// Figures from a site's vendor characteristics, falling back to the
    /// configured defaults.
    Characterized {
        config: &'a SynthesisConfig,
        characteristics: &'a [Characteristic],
    },
}

impl Calibration<'_> {
    /// Fidelity and duration of a calibrated operation.
    fn measured(&self, op: CalibratedOperator) -> (Option<f64>, Option<f64>) {
        match self {
            Calibration::Uncalibrated => (None, None),
            Calibration::Characterized {
                config,
                characteristics,
            } => {
                let fidelity = characteristics
                    .iter()
                    .find(|c| c.name == op.characteristic())
                    .map_or_else(|| config.fidelity.get(op), |c| c.value);
                (Some(fidelity), Some(config.duration.get(op)))
            }
        }
    }

    /// Fidelity and duration of a virtual operation.
    fn perfect(&self) -> (Option<f64>, Option<f64>) {
        match self {
            Calibration::Uncalibrated => (None, None),
            Calibration::Characterized { config, .. } => {
                (Some(config.perfect_fidelity), Some(config.perfect_duration))
            }
        }
    }
}

fn theta() -> Parameter {
    Parameter::symbol("theta")
}

/// Capabilities a qubit gains from `op`.
///
/// `qubit` fills the argument slots: a concrete id on the vendor path, the
/// wildcard on the raw-graph path.
pub fn qubit_capabilities(
    op: QubitOperator,
    qubit: &Argument,
    calibration: &Calibration<'_>,
) -> Vec<GateCapability> {
    let (perfect_fidelity, perfect_duration) = calibration.perfect();
    let args = || [qubit.clone()];

    match op {
        QubitOperator::I => vec![
            GateInfo::new(GateOperator::I, [], args())
                .with_figures(perfect_fidelity, perfect_duration)
                .into(),
        ],
        QubitOperator::Rx => {
            let (fidelity, duration) = calibration.measured(CalibratedOperator::Rx);
            let mut gates: Vec<GateCapability> = vec![
                GateInfo::new(GateOperator::Rx, [Parameter::Number(0.0)], args())
                    .with_figures(perfect_fidelity, perfect_duration)
                    .into(),
            ];
            for angle in [PI, -PI, PI / 2.0, -PI / 2.0] {
                gates.push(
                    GateInfo::new(GateOperator::Rx, [Parameter::Number(angle)], args())
                        .with_figures(fidelity, duration)
                        .into(),
                );
            }
            gates
        }
        QubitOperator::Rz => vec![
            GateInfo::new(GateOperator::Rz, [theta()], args())
                .with_figures(perfect_fidelity, perfect_duration)
                .into(),
        ],
        QubitOperator::Measure => {
            let (fidelity, duration) = calibration.measured(CalibratedOperator::Measure);
            vec![
                MeasureInfo::new(qubit.clone(), Some(Argument::wildcard()))
                    .with_figures(fidelity, duration)
                    .into(),
                MeasureInfo::new(qubit.clone(), None)
                    .with_figures(fidelity, duration)
                    .into(),
            ]
        }
        QubitOperator::Wildcard => vec![
            GateInfo::new(GateOperator::Wildcard, [Parameter::wildcard()], args())
                .with_figures(perfect_fidelity, perfect_duration)
                .into(),
        ],
    }
}

/// Capabilities an edge gains from `op`.
pub fn edge_capabilities(op: EdgeOperator, calibration: &Calibration<'_>) -> Vec<GateInfo> {
    let args = [Argument::wildcard(), Argument::wildcard()];
    let calibrated = |operator: GateOperator, params: Vec<Parameter>, op: CalibratedOperator| {
        let (fidelity, duration) = calibration.measured(op);
        GateInfo::new(operator, params, args.clone()).with_figures(fidelity, duration)
    };

    match op {
        EdgeOperator::Cz => vec![calibrated(GateOperator::Cz, vec![], CalibratedOperator::Cz)],
        EdgeOperator::Iswap => vec![calibrated(GateOperator::Iswap, vec![], CalibratedOperator::Iswap)],
        EdgeOperator::Cphase => {
            vec![calibrated(GateOperator::Cphase, vec![theta()], CalibratedOperator::Cphase)]
        }
        EdgeOperator::Xy => vec![calibrated(GateOperator::Xy, vec![theta()], CalibratedOperator::Xy)],
        EdgeOperator::Wildcard => {
            let (fidelity, duration) = calibration.perfect();
            vec![
                GateInfo::new(GateOperator::Wildcard, [Parameter::wildcard()], args.clone())
                    .with_figures(fidelity, duration),
            ]
        }
    }
}

/// A concrete gate instance a compiler may emit.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeGate {
    /// Gate application on concrete qubits.
    Gate {
        operator: GateOperator,
        parameters: Vec<Parameter>,
        qubits: Vec<u32>,
    },
    /// Readout, either kept or discarded.
    Measure { qubit: u32, discard: bool },
}

impl NativeGate {
    /// Qubits this instance acts on.
    pub fn qubits(&self) -> Vec<u32> {
        match self {
            NativeGate::Gate { qubits, .. } => qubits.clone(),
            NativeGate::Measure { qubit, .. } => vec![*qubit],
        }
    }

    /// Whether this instance acts on `qubit`.
    pub fn touches(&self, qubit: u32) -> bool {
        match self {
            NativeGate::Gate { qubits, .. } => qubits.contains(&qubit),
            NativeGate::Measure { qubit: q, .. } => *q == qubit,
        }
    }
}

impl fmt::Display for NativeGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeGate::Gate {
                operator,
                parameters,
                qubits,
            } => {
                write!(f, "{operator}")?;
                if !parameters.is_empty() {
                    let params: Vec<String> = parameters.iter().map(ToString::to_string).collect();
                    write!(f, "({})", params.join(", "))?;
                }
                for qubit in qubits {
                    write!(f, " {qubit}")?;
                }
                Ok(())
            }
            NativeGate::Measure { qubit, discard: true } => write!(f, "MEASURE {qubit}"),
            NativeGate::Measure { qubit, discard: false } => write!(f, "MEASURE {qubit} _"),
        }
    }
}

/// Expand an ISA into every gate instance it supports.
///
/// Live qubits contribute one instance per capability. Live edges contribute
/// each capability in both argument orders. Dead sites contribute nothing,
/// and an edge touching a dead qubit is skipped.
#[instrument(skip(isa), fields(qubits = isa.qubits.len(), edges = isa.edges.len()))]
pub fn gates_in_isa(isa: &InstructionSetArchitecture) -> IsaResult<Vec<NativeGate>> {
    let mut gates = Vec::new();

    for qubit in isa.live_qubits() {
        for capability in &qubit.gates {
            gates.push(match capability {
                GateCapability::Gate(info) => NativeGate::Gate {
                    operator: info.operator,
                    parameters: info.parameters.clone(),
                    qubits: vec![qubit.id],
                },
                GateCapability::Measure(info) => NativeGate::Measure {
                    qubit: qubit.id,
                    discard: info.target.is_none(),
                },
            });
        }
    }

    for edge in isa.live_edges() {
        let (a, b) = edge.ids.pair();
        let mut members_live = true;
        for id in [a, b] {
            let qubit = isa.qubit(id).ok_or(IsaError::UnknownQubit(id))?;
            members_live &= !qubit.dead;
        }
        if !members_live {
            debug!(edge = %edge.ids, "skipping edge with a dead member");
            continue;
        }

        for info in &edge.gates {
            for qubits in [vec![a, b], vec![b, a]] {
                gates.push(NativeGate::Gate {
                    operator: info.operator,
                    parameters: info.parameters.clone(),
                    qubits,
                });
            }
        }
    }

    debug!(count = gates.len(), "synthesized gateset");
    Ok(gates)
}
