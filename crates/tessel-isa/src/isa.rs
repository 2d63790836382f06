//! Canonical instruction-set architecture model.
//!
//! An ISA is a set of qubits and undirected edges, each carrying the gate
//! capabilities available at that site. The JSON wire form is the payload a
//! compiler receives as its target description:
//!
//! ```json
//! {"1Q": {"0": {"id": 0, "dead": false, "gates": [...]}},
//!  "2Q": {"0-1": {"ids": [0, 1], "dead": false, "gates": [...]}}}
//! ```

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{IsaError, IsaResult};

/// Wildcard sentinel for operators, parameters and arguments.
pub const WILDCARD: &str = "_";

/// Unordered pair of qubit ids, stored sorted.
///
/// `EdgeId::new(2, 0) == EdgeId::new(0, 2)`. The string key `"0-2"` exists
/// only at the wire boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId {
    low: u32,
    high: u32,
}

impl EdgeId {
    /// Canonical id for the edge between `a` and `b`.
    pub fn new(a: u32, b: u32) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// The smaller member id.
    #[inline]
    pub fn low(self) -> u32 {
        self.low
    }

    /// The larger member id.
    #[inline]
    pub fn high(self) -> u32 {
        self.high
    }

    /// Both member ids, ascending.
    #[inline]
    pub fn pair(self) -> (u32, u32) {
        (self.low, self.high)
    }

    /// Whether `qubit` is a member of this edge.
    pub fn contains(self, qubit: u32) -> bool {
        self.low == qubit || self.high == qubit
    }
}

impl From<(u32, u32)> for EdgeId {
    fn from((a, b): (u32, u32)) -> Self {
        EdgeId::new(a, b)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

impl FromStr for EdgeId {
    type Err = IsaError;

    /// Reads the canonical `low-high` form; unsorted keys are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || IsaError::InvalidEdgeKey(s.to_string());
        let (a, b) = s.split_once('-').ok_or_else(invalid)?;
        let low = a.parse::<u32>().map_err(|_| invalid())?;
        let high = b.parse::<u32>().map_err(|_| invalid())?;
        if low > high {
            return Err(invalid());
        }
        let id = EdgeId { low, high };
        if id.to_string() != s {
            return Err(invalid());
        }
        Ok(id)
    }
}

impl Serialize for EdgeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EdgeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        key.parse().map_err(de::Error::custom)
    }
}

/// Member ids of an edge record, written as `[low, high]`.
mod member_ids {
    use super::EdgeId;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(id: &EdgeId, serializer: S) -> Result<S::Ok, S::Error> {
        [id.low(), id.high()].serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<EdgeId, D::Error> {
        let [a, b] = <[u32; 2]>::deserialize(deserializer)?;
        Ok(EdgeId::new(a, b))
    }
}

/// Operators a gate capability can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateOperator {
    /// Identity.
    #[serde(rename = "I")]
    I,
    /// X rotation.
    #[serde(rename = "RX")]
    Rx,
    /// Z rotation.
    #[serde(rename = "RZ")]
    Rz,
    /// Controlled Z.
    #[serde(rename = "CZ")]
    Cz,
    /// iSWAP.
    #[serde(rename = "ISWAP")]
    Iswap,
    /// Controlled phase.
    #[serde(rename = "CPHASE")]
    Cphase,
    /// XY interaction.
    #[serde(rename = "XY")]
    Xy,
    /// Any gate.
    #[serde(rename = "_")]
    Wildcard,
}

impl GateOperator {
    /// Name as written in programs.
    pub fn name(self) -> &'static str {
        match self {
            GateOperator::I => "I",
            GateOperator::Rx => "RX",
            GateOperator::Rz => "RZ",
            GateOperator::Cz => "CZ",
            GateOperator::Iswap => "ISWAP",
            GateOperator::Cphase => "CPHASE",
            GateOperator::Xy => "XY",
            GateOperator::Wildcard => WILDCARD,
        }
    }
}

impl fmt::Display for GateOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Gate parameter placeholder: a fixed angle or a symbolic name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Parameter {
    /// Fixed numeric value.
    Number(f64),
    /// Symbolic name, or `_` for any value.
    Symbol(String),
}

impl Parameter {
    /// A named symbolic parameter.
    pub fn symbol(name: impl Into<String>) -> Self {
        Parameter::Symbol(name.into())
    }

    /// The `_` placeholder.
    pub fn wildcard() -> Self {
        Parameter::Symbol(WILDCARD.into())
    }

    /// Whether this is the `_` placeholder.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Parameter::Symbol(s) if s == WILDCARD)
    }
}

impl From<f64> for Parameter {
    fn from(value: f64) -> Self {
        Parameter::Number(value)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::Number(v) => write!(f, "{v}"),
            Parameter::Symbol(s) => f.write_str(s),
        }
    }
}

/// Gate argument placeholder: a concrete qubit or a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Argument {
    /// Concrete qubit id.
    Qubit(u32),
    /// Symbolic argument, or `_` for any qubit.
    Symbol(String),
}

impl Argument {
    /// The `_` placeholder.
    pub fn wildcard() -> Self {
        Argument::Symbol(WILDCARD.into())
    }

    /// Whether this is the `_` placeholder.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Argument::Symbol(s) if s == WILDCARD)
    }
}

impl From<u32> for Argument {
    fn from(qubit: u32) -> Self {
        Argument::Qubit(qubit)
    }
}

/// A parametric gate a site supports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateInfo {
    /// Gate operator.
    pub operator: GateOperator,
    /// Parameter placeholders, in order.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Argument placeholders, in order.
    #[serde(default)]
    pub arguments: Vec<Argument>,
    /// Gate fidelity, when characterized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fidelity: Option<f64>,
    /// Gate duration in nanoseconds, when characterized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl GateInfo {
    /// Create an uncharacterized capability.
    pub fn new(
        operator: GateOperator,
        parameters: impl IntoIterator<Item = Parameter>,
        arguments: impl IntoIterator<Item = Argument>,
    ) -> Self {
        Self {
            operator,
            parameters: parameters.into_iter().collect(),
            arguments: arguments.into_iter().collect(),
            fidelity: None,
            duration: None,
        }
    }

    /// Set fidelity and duration.
    #[must_use]
    pub fn with_figures(mut self, fidelity: Option<f64>, duration: Option<f64>) -> Self {
        self.fidelity = fidelity;
        self.duration = duration;
        self
    }
}

/// The fixed `MEASURE` operator tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasureOperator {
    /// `MEASURE`.
    #[default]
    #[serde(rename = "MEASURE")]
    Measure,
}

/// A measurement a qubit supports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureInfo {
    /// Always `MEASURE`.
    pub operator: MeasureOperator,
    /// Measured qubit.
    pub qubit: Argument,
    /// Destination; `None` means the result is discarded.
    #[serde(default)]
    pub target: Option<Argument>,
    /// Readout fidelity, when characterized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fidelity: Option<f64>,
    /// Readout duration in nanoseconds, when characterized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl MeasureInfo {
    /// Create an uncharacterized measurement capability.
    pub fn new(qubit: Argument, target: Option<Argument>) -> Self {
        Self {
            operator: MeasureOperator::Measure,
            qubit,
            target,
            fidelity: None,
            duration: None,
        }
    }

    /// Set fidelity and duration.
    #[must_use]
    pub fn with_figures(mut self, fidelity: Option<f64>, duration: Option<f64>) -> Self {
        self.fidelity = fidelity;
        self.duration = duration;
        self
    }
}

/// One capability of a qubit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GateCapability {
    /// Measurement.
    Measure(MeasureInfo),
    /// Parametric gate.
    Gate(GateInfo),
}

impl From<GateInfo> for GateCapability {
    fn from(info: GateInfo) -> Self {
        GateCapability::Gate(info)
    }
}

impl From<MeasureInfo> for GateCapability {
    fn from(info: MeasureInfo) -> Self {
        GateCapability::Measure(info)
    }
}

/// A qubit and its capabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Qubit {
    /// Qubit id.
    pub id: u32,
    /// Disabled sites are excluded from synthesis.
    #[serde(default)]
    pub dead: bool,
    /// Capabilities, in order.
    #[serde(default)]
    pub gates: Vec<GateCapability>,
}

impl Qubit {
    /// A live qubit with no capabilities.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            dead: false,
            gates: Vec::new(),
        }
    }
}

/// An undirected edge and its capabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Member ids.
    #[serde(with = "member_ids")]
    pub ids: EdgeId,
    /// Disabled sites are excluded from synthesis.
    #[serde(default)]
    pub dead: bool,
    /// Capabilities, in order.
    #[serde(default)]
    pub gates: Vec<GateInfo>,
}

impl Edge {
    /// A live edge with no capabilities.
    pub fn new(ids: EdgeId) -> Self {
        Self {
            ids,
            dead: false,
            gates: Vec::new(),
        }
    }
}

/// Qubits and edges of a processor, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireIsa")]
pub struct InstructionSetArchitecture {
    /// Qubits by id.
    #[serde(rename = "1Q")]
    pub qubits: BTreeMap<u32, Qubit>,
    /// Edges by canonical id.
    #[serde(rename = "2Q")]
    pub edges: BTreeMap<EdgeId, Edge>,
}

impl InstructionSetArchitecture {
    /// Create an empty ISA.
    pub fn new() -> Self {
        Self::default()
    }

    /// The qubit `id`, inserted live and empty if absent.
    pub fn add_qubit(&mut self, id: u32) -> &mut Qubit {
        self.qubits.entry(id).or_insert_with(|| Qubit::new(id))
    }

    /// The edge between `a` and `b`, inserted live and empty if absent.
    pub fn add_edge(&mut self, a: u32, b: u32) -> &mut Edge {
        let ids = EdgeId::new(a, b);
        self.edges.entry(ids).or_insert_with(|| Edge::new(ids))
    }

    /// Look up a qubit.
    pub fn qubit(&self, id: u32) -> Option<&Qubit> {
        self.qubits.get(&id)
    }

    /// Look up the edge between `a` and `b`, in either order.
    pub fn edge(&self, a: u32, b: u32) -> Option<&Edge> {
        self.edges.get(&EdgeId::new(a, b))
    }

    /// Qubits that are not dead, ascending.
    pub fn live_qubits(&self) -> impl Iterator<Item = &Qubit> {
        self.qubits.values().filter(|q| !q.dead)
    }

    /// Edges that are not dead, ascending.
    pub fn live_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values().filter(|e| !e.dead)
    }

    /// Whether the ISA has no qubits and no edges.
    pub fn is_empty(&self) -> bool {
        self.qubits.is_empty() && self.edges.is_empty()
    }

    /// Serialize to the JSON wire form.
    pub fn to_json(&self) -> IsaResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> IsaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read the JSON wire form.
    pub fn from_json(json: &str) -> IsaResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Wire form as received: keys are strings, ids may be omitted.
#[derive(Deserialize)]
struct WireIsa {
    #[serde(rename = "1Q", default)]
    qubits: BTreeMap<String, WireQubit>,
    #[serde(rename = "2Q", default)]
    edges: BTreeMap<String, WireEdge>,
}

#[derive(Deserialize)]
struct WireQubit {
    #[serde(default)]
    id: Option<u32>,
    #[serde(default)]
    dead: Option<bool>,
    #[serde(default)]
    gates: Option<Vec<GateCapability>>,
}

#[derive(Deserialize)]
struct WireEdge {
    #[serde(default)]
    ids: Option<[u32; 2]>,
    #[serde(default)]
    dead: Option<bool>,
    #[serde(default)]
    gates: Option<Vec<GateInfo>>,
}

impl TryFrom<WireIsa> for InstructionSetArchitecture {
    type Error = IsaError;

    fn try_from(wire: WireIsa) -> Result<Self, Self::Error> {
        let mut isa = InstructionSetArchitecture::new();

        for (key, raw) in wire.qubits {
            let id = key
                .parse::<u32>()
                .map_err(|_| IsaError::InvalidQubitKey(key.clone()))?;
            if raw.id.is_some_and(|record| record != id) {
                return Err(IsaError::InvalidQubitKey(key));
            }
            isa.qubits.insert(
                id,
                Qubit {
                    id,
                    dead: raw.dead.unwrap_or(false),
                    gates: raw.gates.unwrap_or_default(),
                },
            );
        }

        for (key, raw) in wire.edges {
            let ids = key.parse::<EdgeId>()?;
            if raw.ids.is_some_and(|[a, b]| EdgeId::new(a, b) != ids) {
                return Err(IsaError::InvalidEdgeKey(key));
            }
            isa.edges.insert(
                ids,
                Edge {
                    ids,
                    dead: raw.dead.unwrap_or(false),
                    gates: raw.gates.unwrap_or_default(),
                },
            );
        }

        Ok(isa)
    }
}
