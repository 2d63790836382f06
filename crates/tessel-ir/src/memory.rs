//! Classical memory: region declarations and references into them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::IrError;

/// A single addressable location: region `name`, element `offset`.
///
/// The string form is always `name[offset]`. Reading accepts a bare `name`
/// as a reference to offset 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemoryReference {
    /// Name of the declared region.
    pub name: String,
    /// Element index within the region.
    pub offset: u32,
}

impl MemoryReference {
    /// Create a reference to `name[offset]`.
    pub fn new(name: impl Into<String>, offset: u32) -> Self {
        Self {
            name: name.into(),
            offset,
        }
    }
}

impl fmt::Display for MemoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.offset)
    }
}

impl FromStr for MemoryReference {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let invalid = || IrError::InvalidMemoryReference(s.to_string());

        let (name, offset) = match raw.strip_suffix(']') {
            Some(head) => {
                let (name, offset) = head.split_once('[').ok_or_else(invalid)?;
                let offset = offset.trim().parse::<u32>().map_err(|_| invalid())?;
                (name.trim(), offset)
            }
            None => (raw, 0),
        };

        if !is_identifier(name) {
            return Err(invalid());
        }
        Ok(Self::new(name, offset))
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Element type of a classical memory region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MemoryType {
    /// Single bits (readout registers).
    Bit,
    /// Bytes.
    Octet,
    /// Signed integers.
    Integer,
    /// Double-precision reals (gate parameters).
    Real,
}

impl fmt::Display for MemoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MemoryType::Bit => "BIT",
            MemoryType::Octet => "OCTET",
            MemoryType::Integer => "INTEGER",
            MemoryType::Real => "REAL",
        };
        f.write_str(name)
    }
}

/// Type and length of a declared region, as recorded on an executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Element type.
    #[serde(rename = "type")]
    pub memory_type: MemoryType,
    /// Number of elements.
    pub length: u32,
}

/// A `DECLARE` of a named memory region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Region name.
    pub name: String,
    /// Element type.
    pub memory_type: MemoryType,
    /// Number of elements.
    pub length: u32,
}

impl Declaration {
    /// Create a declaration.
    pub fn new(name: impl Into<String>, memory_type: MemoryType, length: u32) -> Self {
        Self {
            name: name.into(),
            memory_type,
            length,
        }
    }

    /// Type and length of this region.
    pub fn spec(&self) -> ParameterSpec {
        ParameterSpec {
            memory_type: self.memory_type,
            length: self.length,
        }
    }

    /// Whether `offset` lies within the declared length.
    pub fn contains(&self, offset: u32) -> bool {
        offset < self.length
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DECLARE {} {}[{}]", self.name, self.memory_type, self.length)
    }
}
