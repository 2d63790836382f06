//! Readout sources and memory descriptors.
//!
//! After execution the control system reports one result per measured qubit.
//! The readout sources say which qubit fills which element of the readout
//! region, so results can be written back in declaration order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tessel_ir::{Instruction, Measurement, MemoryReference, ParameterSpec, Program, QubitId};
use tracing::{debug, warn};

use crate::error::{CompileError, CompileResult};

/// Name of the readout region unless configured otherwise.
pub const DEFAULT_READOUT_REGION: &str = "ro";

/// What to do when two measurements write the same readout slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadoutPolicy {
    /// Log a warning and keep the later measurement.
    #[default]
    WarnAndOverwrite,
    /// Fail with [`CompileError::AmbiguousMeasurementTarget`].
    Reject,
}

/// Options for readout collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadoutOptions {
    /// Region that receives measurement results.
    pub region: String,
    /// Handling of repeated writes to one slot.
    pub policy: ReadoutPolicy,
}

impl Default for ReadoutOptions {
    fn default() -> Self {
        Self {
            region: DEFAULT_READOUT_REGION.to_string(),
            policy: ReadoutPolicy::default(),
        }
    }
}

impl ReadoutOptions {
    /// Use `region` as the readout region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Use `policy` for repeated writes.
    #[must_use]
    pub fn with_policy(mut self, policy: ReadoutPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// The qubit whose measurement lands in a readout slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadoutSource {
    /// Readout slot.
    pub target: MemoryReference,
    /// Measured qubit.
    pub qubit: QubitId,
}

impl ReadoutSource {
    /// Label of the result stream, `q<n>`.
    pub fn label(&self) -> String {
        format!("q{}", self.qubit)
    }
}

/// Declared regions by name.
///
/// A region declared twice keeps its last declaration.
pub fn collect_memory_descriptors(program: &Program) -> BTreeMap<String, ParameterSpec> {
    program
        .declarations()
        .map(|decl| (decl.name.clone(), decl.spec()))
        .collect()
}

/// The source of every readout slot, in offset order.
///
/// Slots no measurement writes are `None`. A program that measures nothing
/// into memory and declares no readout region gives an empty list.
pub fn collect_readout_sources(
    program: &Program,
    options: &ReadoutOptions,
) -> CompileResult<Vec<Option<ReadoutSource>>> {
    let mut size = None;
    for decl in program.declarations() {
        if decl.name == options.region {
            if size.is_some() {
                return Err(CompileError::DuplicateReadoutRegion(options.region.clone()));
            }
            size = Some(decl.length);
        }
    }

    let mut sources: BTreeMap<u32, ReadoutSource> = BTreeMap::new();
    for instruction in program {
        let Instruction::Measure(Measurement {
            qubit,
            target: Some(target),
        }) = instruction
        else {
            continue;
        };

        if target.name != options.region {
            return Err(CompileError::UnexpectedReadoutRegion {
                region: target.name.clone(),
                expected: options.region.clone(),
            });
        }

        if let Some(previous) = sources.get(&target.offset) {
            match options.policy {
                ReadoutPolicy::WarnAndOverwrite => warn!(
                    "Overwriting the measured result in register {} from qubit {} to qubit {}",
                    target, previous.qubit, qubit
                ),
                ReadoutPolicy::Reject => {
                    return Err(CompileError::AmbiguousMeasurementTarget {
                        target: target.clone(),
                        previous: previous.qubit,
                        current: *qubit,
                    });
                }
            }
        }

        sources.insert(
            target.offset,
            ReadoutSource {
                target: target.clone(),
                qubit: *qubit,
            },
        );
    }

    match size {
        Some(length) if length > 0 => {
            if let Some((&offset, _)) = sources.range(length..).next() {
                debug!(offset, length, "measurement beyond the declared readout region");
            }
            Ok((0..length).map(|offset| sources.remove(&offset)).collect())
        }
        _ if !sources.is_empty() => Err(CompileError::MissingReadoutRegion(options.region.clone())),
        _ => Ok(Vec::new()),
    }
}
