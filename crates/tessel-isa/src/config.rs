//! Synthesis defaults.
//!
//! Supports loading from YAML; every field falls back to its default:
//!
//! ```yaml
//! gates_1q: [I, RX, RZ, MEASURE]
//! gates_2q: [CZ, XY]
//! fidelity: {CZ: 0.89, ISWAP: 0.90, CPHASE: 0.85, XY: 0.86, RX: 0.95, MEASURE: 0.90}
//! duration: {CZ: 200, ISWAP: 200, CPHASE: 200, XY: 200, RX: 50, MEASURE: 2000}
//! perfect_fidelity: 1.0
//! perfect_duration: 0.01
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::IsaResult;

/// Operators whose fidelity comes from vendor characterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalibratedOperator {
    /// Non-zero X rotations.
    Rx,
    /// Readout.
    Measure,
    /// Controlled Z.
    Cz,
    /// iSWAP.
    Iswap,
    /// Controlled phase.
    Cphase,
    /// XY interaction.
    Xy,
}

impl CalibratedOperator {
    /// Name of the vendor characteristic that carries this operator's fidelity.
    pub fn characteristic(self) -> &'static str {
        match self {
            CalibratedOperator::Rx => "f1QRB",
            CalibratedOperator::Measure => "fRO",
            CalibratedOperator::Cz => "fCZ",
            CalibratedOperator::Iswap => "fISWAP",
            CalibratedOperator::Cphase => "fCPHASE",
            CalibratedOperator::Xy => "fXY",
        }
    }
}

/// One number per calibrated operator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct OperatorTable {
    pub cz: f64,
    pub iswap: f64,
    pub cphase: f64,
    pub xy: f64,
    pub rx: f64,
    pub measure: f64,
}

impl OperatorTable {
    /// The entry for `op`.
    pub fn get(&self, op: CalibratedOperator) -> f64 {
        match op {
            CalibratedOperator::Rx => self.rx,
            CalibratedOperator::Measure => self.measure,
            CalibratedOperator::Cz => self.cz,
            CalibratedOperator::Iswap => self.iswap,
            CalibratedOperator::Cphase => self.cphase,
            CalibratedOperator::Xy => self.xy,
        }
    }

    /// Fallback fidelities.
    pub fn default_fidelity() -> Self {
        Self {
            cz: 0.89,
            iswap: 0.90,
            cphase: 0.85,
            xy: 0.86,
            rx: 0.95,
            measure: 0.90,
        }
    }

    /// Fallback durations, in nanoseconds.
    pub fn default_duration() -> Self {
        Self {
            cz: 200.0,
            iswap: 200.0,
            cphase: 200.0,
            xy: 200.0,
            rx: 50.0,
            measure: 2000.0,
        }
    }
}

/// Defaults applied when expanding sites into gate capabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Qubit operators used when a graph is given without a gate list.
    #[serde(default = "default_gates_1q")]
    pub gates_1q: Vec<String>,

    /// Edge operators used when a graph is given without a gate list.
    #[serde(default = "default_gates_2q")]
    pub gates_2q: Vec<String>,

    /// Fidelity when a site has no matching characteristic.
    #[serde(default = "OperatorTable::default_fidelity")]
    pub fidelity: OperatorTable,

    /// Duration of calibrated operators.
    #[serde(default = "OperatorTable::default_duration")]
    pub duration: OperatorTable,

    /// Fidelity of virtual operations (`I`, `RZ`, `RX(0)`, wildcard).
    #[serde(default = "default_perfect_fidelity")]
    pub perfect_fidelity: f64,

    /// Duration of virtual operations.
    #[serde(default = "default_perfect_duration")]
    pub perfect_duration: f64,
}

fn default_gates_1q() -> Vec<String> {
    ["I", "RX", "RZ", "MEASURE"].map(String::from).to_vec()
}

fn default_gates_2q() -> Vec<String> {
    ["CZ", "XY"].map(String::from).to_vec()
}

fn default_perfect_fidelity() -> f64 {
    1.0
}

fn default_perfect_duration() -> f64 {
    0.01
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            gates_1q: default_gates_1q(),
            gates_2q: default_gates_2q(),
            fidelity: OperatorTable::default_fidelity(),
            duration: OperatorTable::default_duration(),
            perfect_fidelity: default_perfect_fidelity(),
            perfect_duration: default_perfect_duration(),
        }
    }
}

impl SynthesisConfig {
    /// Parse from a YAML document.
    pub fn from_yaml_str(yaml: &str) -> IsaResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> IsaResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    /// Write as YAML.
    pub fn to_yaml(&self) -> IsaResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}
