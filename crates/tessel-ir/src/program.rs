//! Native-form programs.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::instruction::Instruction;
use crate::memory::Declaration;

/// An ordered list of native-form instructions plus a shot count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// The instructions, in program order.
    pub instructions: Vec<Instruction>,
    /// Number of times the program is run per dispatch.
    pub num_shots: u32,
}

impl Default for Program {
    fn default() -> Self {
        Self {
            instructions: Vec::new(),
            num_shots: 1,
        }
    }
}

impl Program {
    /// Create an empty program with one shot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a program from instructions.
    pub fn from_instructions(instructions: impl IntoIterator<Item = Instruction>) -> Self {
        Self {
            instructions: instructions.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Set the shot count.
    #[must_use]
    pub fn with_shots(mut self, num_shots: u32) -> Self {
        self.num_shots = num_shots;
        self
    }

    /// Append an instruction.
    pub fn push(&mut self, instruction: impl Into<Instruction>) -> &mut Self {
        self.instructions.push(instruction.into());
        self
    }

    /// Iterate over the instructions.
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// All declarations, in program order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.instructions.iter().filter_map(|inst| match inst {
            Instruction::Declare(declaration) => Some(declaration),
            _ => None,
        })
    }

    /// The first declaration of region `name`.
    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations().find(|d| d.name == name)
    }

    /// A program with no instructions and the same shot count.
    pub fn empty_like(&self) -> Self {
        Self {
            instructions: Vec::new(),
            num_shots: self.num_shots,
        }
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

impl FromIterator<Instruction> for Program {
    fn from_iter<T: IntoIterator<Item = Instruction>>(iter: T) -> Self {
        Self::from_instructions(iter)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instruction in &self.instructions {
            writeln!(f, "{instruction}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Expression;
    use crate::memory::{MemoryReference, MemoryType};

    fn sample() -> Program {
        let mut program = Program::new().with_shots(100);
        program
            .push(Declaration::new("ro", MemoryType::Bit, 1))
            .push(Declaration::new("theta", MemoryType::Real, 1))
            .push(Instruction::gate("RZ", [Expression::address("theta", 0)], [0]))
            .push(Instruction::measure(0, MemoryReference::new("ro", 0)));
        program
    }

    #[test]
    fn test_declarations() {
        let program = sample();
        assert_eq!(program.declarations().count(), 2);
        assert_eq!(
            program.declaration("theta").map(|d| d.memory_type),
            Some(MemoryType::Real)
        );
        assert!(program.declaration("beta").is_none());
    }

    #[test]
    fn test_display() {
        let text = sample().to_string();
        assert_eq!(
            text,
            "DECLARE ro BIT[1]\nDECLARE theta REAL[1]\nRZ(theta[0]) 0\nMEASURE 0 ro[0]\n"
        );
    }

    #[test]
    fn test_empty_like_keeps_shots() {
        let program = sample();
        let empty = program.empty_like();
        assert!(empty.is_empty());
        assert_eq!(empty.num_shots, 100);
        assert_eq!(program.len(), 4);
    }
}
