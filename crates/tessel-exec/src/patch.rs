//! Patch tables for dispatch.
//!
//! A patch table holds the values control hardware writes into classical
//! memory before running an executable: the user's parameter regions and
//! the recalculated `__P<n>` slots.

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use tessel_compile::{Executable, RecalculationTable};
use tracing::{debug, info, instrument, warn};

use crate::error::{ExecError, ExecResult};
use crate::eval::evaluate;
use crate::memory::MemoryWrites;

/// Region name to values.
pub type PatchTable = BTreeMap<String, Vec<f64>>;

/// Longest region [`build_patch_values`] lays out.
pub const MAX_PATCH_REGION_LENGTH: u32 = 1 << 20;

/// Evaluate every rule of `table` against `memory`.
///
/// Values are appended to their slot region's list in table order. The
/// first failing rule aborts resolution.
#[instrument(skip_all, fields(rules = table.len()))]
pub fn resolve(table: &RecalculationTable, memory: &MemoryWrites) -> ExecResult<PatchTable> {
    let mut patch = PatchTable::new();
    for rule in table {
        let value = evaluate(&rule.expression, memory)?;
        debug!(slot = %rule.target, value, "resolved slot");
        patch
            .entry(rule.target.name.clone())
            .or_default()
            .push(value);
    }
    Ok(patch)
}

/// Full patch table for one dispatch of `executable`.
///
/// Each declared region with at least one write, other than the readout
/// region, is laid out densely over its declared length with unwritten
/// offsets zeroed. Recalculated slots are laid out by offset; a slot region
/// holds exactly as many slots as it has rules.
///
/// Fails with [`ExecError::RegionTooLarge`] for a declared length above
/// [`MAX_PATCH_REGION_LENGTH`] and with [`ExecError::SlotOutOfRange`] for a
/// slot offset outside its region.
#[instrument(skip_all, fields(rules = executable.recalculation_table.len(), writes = memory.len()))]
pub fn build_patch_values(executable: &Executable, memory: &MemoryWrites) -> ExecResult<PatchTable> {
    let mut patch = PatchTable::new();

    for (name, spec) in &executable.memory_descriptors {
        if *name == executable.readout_region {
            continue;
        }
        let Some(writes) = memory.region(name) else {
            continue;
        };

        if spec.length > MAX_PATCH_REGION_LENGTH {
            return Err(ExecError::RegionTooLarge {
                region: name.clone(),
                length: spec.length,
                limit: MAX_PATCH_REGION_LENGTH,
            });
        }

        let mut values = vec![0.0; spec.length as usize];
        for (&offset, &value) in writes {
            match values.get_mut(offset as usize) {
                Some(slot) => *slot = value,
                None => warn!(
                    region = %name,
                    offset,
                    length = spec.length,
                    "ignoring write beyond the declared region"
                ),
            }
        }
        patch.insert(name.clone(), values);
    }

    let mut slot_counts: FxHashMap<&str, usize> = FxHashMap::default();
    for rule in &executable.recalculation_table {
        *slot_counts.entry(rule.target.name.as_str()).or_default() += 1;
    }

    for rule in &executable.recalculation_table {
        let length = slot_counts
            .get(rule.target.name.as_str())
            .copied()
            .unwrap_or_default();
        let index = rule.target.offset as usize;
        if index >= length {
            return Err(ExecError::SlotOutOfRange {
                slot: rule.target.to_string(),
                length,
            });
        }

        let value = evaluate(&rule.expression, memory)?;
        let values = patch.entry(rule.target.name.clone()).or_default();
        if values.len() < length {
            values.resize(length, 0.0);
        }
        values[index] = value;
    }

    info!(regions = patch.len(), "built patch values");
    Ok(patch)
}
