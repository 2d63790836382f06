//! Executables ready for dispatch.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tessel_ir::{ParameterSpec, Program};
use tracing::{info, instrument};

use crate::error::CompileResult;
use crate::readout::{ReadoutOptions, ReadoutSource, collect_readout_sources};
use crate::recalculation::RecalculationTable;
use crate::rewrite::rewrite_arithmetic;

/// Options for [`Executable::from_native`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutableOptions {
    /// Readout region and overwrite policy.
    pub readout: ReadoutOptions,
}

impl ExecutableOptions {
    /// Use `readout` for readout collection.
    #[must_use]
    pub fn with_readout(mut self, readout: ReadoutOptions) -> Self {
        self.readout = readout;
        self
    }
}

/// A rewritten program with everything needed to patch and read it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Executable {
    /// Rewritten program as Quil text.
    pub program: String,
    /// Shots per dispatch.
    pub num_shots: u32,
    /// Slot expressions evaluated before each dispatch.
    pub recalculation_table: RecalculationTable,
    /// Regions declared by the source program.
    pub memory_descriptors: BTreeMap<String, ParameterSpec>,
    /// Name of the region that receives measurement results.
    pub readout_region: String,
    /// Measured qubit for each readout slot.
    pub ro_sources: Vec<Option<ReadoutSource>>,
}

impl Executable {
    /// Rewrite a native-form program and collect its readout layout.
    #[instrument(skip_all, fields(instructions = program.len()))]
    pub fn from_native(program: &Program, options: &ExecutableOptions) -> CompileResult<Self> {
        let ro_sources = collect_readout_sources(program, &options.readout)?;
        let rewrite = rewrite_arithmetic(program)?;

        info!(
            slots = rewrite.recalculation_table.len(),
            readout = ro_sources.len(),
            "assembled executable"
        );

        Ok(Self {
            program: rewrite.program.to_string(),
            num_shots: rewrite.program.num_shots,
            recalculation_table: rewrite.recalculation_table,
            memory_descriptors: rewrite.memory_descriptors,
            readout_region: options.readout.region.clone(),
            ro_sources,
        })
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> CompileResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> CompileResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
