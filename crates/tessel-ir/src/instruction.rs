//! Native-form instructions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::expression::Expression;
use crate::memory::{Declaration, MemoryReference};
use crate::qubit::QubitId;

/// A gate application: `NAME(params) qubits`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// Gate name as it appears in the program (`RZ`, `CZ`, ...).
    pub name: String,
    /// Parameter expressions, in order.
    pub params: Vec<Expression>,
    /// Target qubits, in order.
    pub qubits: Vec<QubitId>,
}

impl Gate {
    /// Create a gate application.
    pub fn new(
        name: impl Into<String>,
        params: impl IntoIterator<Item = Expression>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> Self {
        Self {
            name: name.into(),
            params: params.into_iter().collect(),
            qubits: qubits.into_iter().collect(),
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.params.is_empty() {
            f.write_str("(")?;
            for (i, param) in self.params.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{param}")?;
            }
            f.write_str(")")?;
        }
        for qubit in &self.qubits {
            write!(f, " {qubit}")?;
        }
        Ok(())
    }
}

/// A measurement of one qubit, optionally into a memory location.
///
/// A measurement without a target discards its result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    /// Measured qubit.
    pub qubit: QubitId,
    /// Destination, if any.
    pub target: Option<MemoryReference>,
}

/// One instruction of a native-form program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    /// Memory region declaration.
    Declare(Declaration),
    /// Gate application.
    Gate(Gate),
    /// Measurement.
    Measure(Measurement),
    /// Reset one qubit, or every qubit when `None`.
    Reset(Option<QubitId>),
    /// `PRAGMA` line, kept verbatim (without the keyword).
    Pragma(String),
    /// Any other instruction, passed through untouched.
    Opaque(String),
}

impl Instruction {
    /// Create a declaration.
    pub fn declare(declaration: Declaration) -> Self {
        Instruction::Declare(declaration)
    }

    /// Create a gate application.
    pub fn gate(
        name: impl Into<String>,
        params: impl IntoIterator<Item = Expression>,
        qubits: impl IntoIterator<Item = u32>,
    ) -> Self {
        Instruction::Gate(Gate::new(name, params, qubits.into_iter().map(QubitId)))
    }

    /// Create a measurement into `target`.
    pub fn measure(qubit: u32, target: MemoryReference) -> Self {
        Instruction::Measure(Measurement {
            qubit: QubitId(qubit),
            target: Some(target),
        })
    }

    /// Create a measurement that discards its result.
    pub fn measure_discard(qubit: u32) -> Self {
        Instruction::Measure(Measurement {
            qubit: QubitId(qubit),
            target: None,
        })
    }

    /// Whether this is a declaration.
    pub fn is_declaration(&self) -> bool {
        matches!(self, Instruction::Declare(_))
    }

    /// The gate application, if this is one.
    pub fn as_gate(&self) -> Option<&Gate> {
        match self {
            Instruction::Gate(gate) => Some(gate),
            _ => None,
        }
    }
}

impl From<Gate> for Instruction {
    fn from(gate: Gate) -> Self {
        Instruction::Gate(gate)
    }
}

impl From<Declaration> for Instruction {
    fn from(declaration: Declaration) -> Self {
        Instruction::Declare(declaration)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Declare(declaration) => write!(f, "{declaration}"),
            Instruction::Gate(gate) => write!(f, "{gate}"),
            Instruction::Measure(Measurement { qubit, target }) => match target {
                Some(target) => write!(f, "MEASURE {qubit} {target}"),
                None => write!(f, "MEASURE {qubit}"),
            },
            Instruction::Reset(Some(qubit)) => write!(f, "RESET {qubit}"),
            Instruction::Reset(None) => f.write_str("RESET"),
            Instruction::Pragma(body) => write!(f, "PRAGMA {body}"),
            Instruction::Opaque(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryType;

    #[test]
    fn test_gate_display() {
        let rz = Instruction::gate("RZ", [Expression::from(3) * Expression::address("theta", 0)], [0]);
        assert_eq!(rz.to_string(), "RZ(3 * theta[0]) 0");

        let cz = Instruction::gate("CZ", [], [0, 1]);
        assert_eq!(cz.to_string(), "CZ 0 1");

        let cphase = Instruction::gate("CPHASE", [Expression::pi(), Expression::number(0.5)], [2, 3]);
        assert_eq!(cphase.to_string(), "CPHASE(pi, 0.5) 2 3");
    }

    #[test]
    fn test_measure_display() {
        let m = Instruction::measure(1, MemoryReference::new("ro", 0));
        assert_eq!(m.to_string(), "MEASURE 1 ro[0]");
        assert_eq!(Instruction::measure_discard(4).to_string(), "MEASURE 4");
    }

    #[test]
    fn test_other_display() {
        let decl = Instruction::declare(Declaration::new("theta", MemoryType::Real, 1));
        assert!(decl.is_declaration());
        assert_eq!(decl.to_string(), "DECLARE theta REAL[1]");
        assert_eq!(Instruction::Reset(None).to_string(), "RESET");
        assert_eq!(Instruction::Reset(Some(QubitId(2))).to_string(), "RESET 2");
        assert_eq!(
            Instruction::Pragma("INITIAL_REWIRING \"PARTIAL\"".into()).to_string(),
            "PRAGMA INITIAL_REWIRING \"PARTIAL\""
        );
    }

    #[test]
    fn test_as_gate() {
        let gate = Instruction::gate("RX", [Expression::pi()], [0]);
        assert_eq!(gate.as_gate().map(|g| g.name.as_str()), Some("RX"));
        assert!(Instruction::Reset(None).as_gate().is_none());
    }
}
