//! Classical memory writes supplied for one dispatch.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use tessel_ir::MemoryReference;

use crate::error::ExecResult;

/// Values written to classical memory, by region and offset.
///
/// Serializes as `{"theta": {"0": 0.4}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryWrites {
    regions: FxHashMap<String, BTreeMap<u32, f64>>,
}

impl MemoryWrites {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `value` to `name[offset]`, returning any previous value.
    pub fn set(&mut self, name: impl Into<String>, offset: u32, value: f64) -> Option<f64> {
        self.regions
            .entry(name.into())
            .or_default()
            .insert(offset, value)
    }

    /// Write `value` to a location given in text form, such as `theta[1]`.
    pub fn set_parsed(&mut self, reference: &str, value: f64) -> ExecResult<Option<f64>> {
        let reference = MemoryReference::from_str(reference)?;
        Ok(self.set(reference.name, reference.offset, value))
    }

    /// Write `values` to consecutive offsets of `name` starting at zero.
    pub fn set_region(&mut self, name: impl Into<String>, values: impl IntoIterator<Item = f64>) {
        let region = self.regions.entry(name.into()).or_default();
        for (offset, value) in (0u32..).zip(values) {
            region.insert(offset, value);
        }
    }

    /// Builder form of [`MemoryWrites::set`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, offset: u32, value: f64) -> Self {
        self.set(name, offset, value);
        self
    }

    /// Value at `name[offset]`.
    pub fn value(&self, name: &str, offset: u32) -> Option<f64> {
        self.regions.get(name)?.get(&offset).copied()
    }

    /// Value at `reference`.
    pub fn get(&self, reference: &MemoryReference) -> Option<f64> {
        self.value(&reference.name, reference.offset)
    }

    /// Writes to `name`, by offset.
    pub fn region(&self, name: &str) -> Option<&BTreeMap<u32, f64>> {
        self.regions.get(name)
    }

    /// Total number of written locations.
    pub fn len(&self) -> usize {
        self.regions.values().map(BTreeMap::len).sum()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<(MemoryReference, f64)> for MemoryWrites {
    fn from_iter<I: IntoIterator<Item = (MemoryReference, f64)>>(iter: I) -> Self {
        let mut writes = Self::new();
        for (reference, value) in iter {
            writes.set(reference.name, reference.offset, value);
        }
        writes
    }
}
