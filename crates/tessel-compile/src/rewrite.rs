//! Gate-parameter arithmetic rewriting.
//!
//! Control hardware can patch memory between shots but cannot evaluate
//! arithmetic. Every gate parameter that computes over classical memory is
//! moved into a slot of a fresh `REAL` region, and the computation is
//! recorded in a [`RecalculationTable`] to be evaluated on the host before
//! dispatch.

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use tessel_ir::{
    Declaration, Expression, Gate, Instruction, MemoryReference, MemoryType, ParameterSpec,
    Program,
};
use tracing::{debug, info, instrument};

use crate::error::{CompileError, CompileResult};
use crate::readout::collect_memory_descriptors;
use crate::recalculation::RecalculationTable;

/// Prefix of generated slot regions.
pub const SLOT_REGION_PREFIX: &str = "__P";

/// Output of [`rewrite_arithmetic`].
#[derive(Debug, Clone)]
pub struct RewriteResult {
    /// The rewritten program.
    pub program: Program,
    /// One rule per allocated slot.
    pub recalculation_table: RecalculationTable,
    /// Regions declared by the input program.
    pub memory_descriptors: BTreeMap<String, ParameterSpec>,
}

impl RewriteResult {
    /// Name of the slot region, if any slot was allocated.
    pub fn slot_region(&self) -> Option<&str> {
        self.recalculation_table
            .rules()
            .first()
            .map(|rule| rule.target.name.as_str())
    }
}

/// Slots allocated during one rewrite, keyed by canonical expression.
struct ExpressionSlots {
    region: String,
    slots: FxHashMap<Expression, MemoryReference>,
    table: RecalculationTable,
}

impl ExpressionSlots {
    fn new(region: String) -> Self {
        Self {
            region,
            slots: FxHashMap::default(),
            table: RecalculationTable::new(),
        }
    }

    /// The slot holding `expression`, allocating one on first sight.
    fn slot_for(&mut self, expression: &Expression) -> CompileResult<MemoryReference> {
        let key = expression.canonicalize();
        if let Some(slot) = self.slots.get(&key) {
            debug!(%expression, %slot, "reusing slot");
            return Ok(slot.clone());
        }

        let offset = u32::try_from(self.table.len()).unwrap_or(u32::MAX);
        let slot = MemoryReference::new(self.region.clone(), offset);
        debug!(%expression, %slot, "allocating slot");
        self.table.push(slot.clone(), expression.clone())?;
        self.slots.insert(key, slot.clone());
        Ok(slot)
    }

    fn len(&self) -> u32 {
        u32::try_from(self.table.len()).unwrap_or(u32::MAX)
    }
}

/// Smallest `__P<n>` not already declared.
fn slot_region_name(descriptors: &BTreeMap<String, ParameterSpec>) -> String {
    (0u32..)
        .map(|n| format!("{SLOT_REGION_PREFIX}{n}"))
        .find(|name| !descriptors.contains_key(name))
        .unwrap_or_else(|| SLOT_REGION_PREFIX.to_string())
}

fn rewrite_parameter(
    parameter: &Expression,
    descriptors: &BTreeMap<String, ParameterSpec>,
    slots: &mut ExpressionSlots,
) -> CompileResult<Expression> {
    if let Some(undeclared) = parameter
        .memory_references()
        .into_iter()
        .find(|r| !descriptors.contains_key(&r.name))
    {
        return Err(CompileError::UndeclaredMemoryRegion(undeclared));
    }

    if !parameter.literals_are_finite() {
        return Err(CompileError::NonFiniteLiteral(parameter.to_string()));
    }

    if !parameter.is_compound() || !parameter.references_memory() {
        return Ok(parameter.clone());
    }
    Ok(Expression::Address(slots.slot_for(parameter)?))
}

/// Move memory-dependent gate-parameter arithmetic into recalculation slots.
///
/// Literals, constant expressions, bare memory references and formal
/// parameters stay in place. Structurally equal expressions share a slot,
/// with `+` and `*` treated as commutative. When any slot is allocated,
/// `DECLARE __P<n> REAL[k]` becomes the first instruction; every other
/// instruction keeps its position.
#[instrument(skip(program), fields(instructions = program.len()))]
pub fn rewrite_arithmetic(program: &Program) -> CompileResult<RewriteResult> {
    let memory_descriptors = collect_memory_descriptors(program);
    let mut slots = ExpressionSlots::new(slot_region_name(&memory_descriptors));

    let mut rewritten = program.empty_like();
    for instruction in program {
        match instruction {
            Instruction::Gate(gate) => {
                let params = gate
                    .params
                    .iter()
                    .map(|p| rewrite_parameter(p, &memory_descriptors, &mut slots))
                    .collect::<CompileResult<Vec<_>>>()?;
                rewritten.push(Gate {
                    name: gate.name.clone(),
                    params,
                    qubits: gate.qubits.clone(),
                });
            }
            other => {
                rewritten.push(other.clone());
            }
        }
    }

    let slot_count = slots.len();
    if slot_count > 0 {
        let declaration = Declaration::new(slots.region.clone(), MemoryType::Real, slot_count);
        rewritten
            .instructions
            .insert(0, Instruction::declare(declaration));
    }

    info!(
        slots = slot_count,
        region = %slots.region,
        "rewrote gate-parameter arithmetic"
    );

    Ok(RewriteResult {
        program: rewritten,
        recalculation_table: slots.table,
        memory_descriptors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_ir::parse_expression;

    fn theta() -> Expression {
        Expression::address("theta", 0)
    }

    fn base() -> Program {
        Program::from_instructions([
            Instruction::declare(Declaration::new("theta", MemoryType::Real, 1)),
            Instruction::declare(Declaration::new("beta", MemoryType::Real, 1)),
        ])
    }

    fn rz(param: &str) -> Instruction {
        Instruction::gate("RZ", [parse_expression(param).unwrap()], [0])
    }

    #[test]
    fn test_simple_params_untouched() {
        let mut program = base();
        program.push(rz("theta"));
        program.push(rz("pi/2"));
        program.push(rz("-0.5"));

        let result = rewrite_arithmetic(&program).unwrap();
        assert_eq!(result.program, program);
        assert!(result.recalculation_table.is_empty());
        assert_eq!(result.slot_region(), None);
    }

    #[test]
    fn test_compound_param_moves_to_slot() {
        let mut program = base();
        program.push(rz("3*theta"));

        let result = rewrite_arithmetic(&program).unwrap();
        let instructions: Vec<_> = result.program.iter().collect();
        assert_eq!(instructions.len(), 4);
        assert_eq!(instructions[0].to_string(), "DECLARE __P0 REAL[1]");
        assert_eq!(instructions[3].to_string(), "RZ(__P0[0]) 0");

        let rule = &result.recalculation_table.rules()[0];
        assert_eq!(rule.target, MemoryReference::new("__P0", 0));
        assert_eq!(rule.expression, Expression::number(3.0) * theta());
    }

    #[test]
    fn test_commuted_expressions_share_slot() {
        let mut program = base();
        program.push(rz("beta + theta"));
        program.push(rz("theta + beta"));
        program.push(rz("2*theta"));

        let result = rewrite_arithmetic(&program).unwrap();
        assert_eq!(result.recalculation_table.len(), 2);
        let gates: Vec<String> = result
            .program
            .iter()
            .filter_map(Instruction::as_gate)
            .map(ToString::to_string)
            .collect();
        assert_eq!(gates, ["RZ(__P0[0]) 0", "RZ(__P0[0]) 0", "RZ(__P0[1]) 0"]);
    }

    #[test]
    fn test_slot_region_avoids_declared_names() {
        let mut program = base();
        program.push(Instruction::declare(Declaration::new("__P0", MemoryType::Real, 1)));
        program.push(rz("theta*beta"));

        let result = rewrite_arithmetic(&program).unwrap();
        assert_eq!(result.slot_region(), Some("__P1"));
    }

    #[test]
    fn test_undeclared_region() {
        let mut program = base();
        program.push(rz("gamma + 1"));
        let err = rewrite_arithmetic(&program).unwrap_err();
        assert!(
            matches!(err, CompileError::UndeclaredMemoryRegion(r) if r == MemoryReference::new("gamma", 0))
        );
    }

    #[test]
    fn test_non_finite_parameter() {
        let mut program = base();
        program.push(Instruction::gate(
            "RZ",
            [Expression::number(f64::INFINITY) * theta()],
            [0],
        ));
        assert!(matches!(
            rewrite_arithmetic(&program),
            Err(CompileError::NonFiniteLiteral(_))
        ));
    }

    #[test]
    fn test_descriptors_exclude_slot_region() {
        let mut program = base();
        program.push(rz("-theta"));
        let result = rewrite_arithmetic(&program).unwrap();
        assert_eq!(result.recalculation_table.len(), 1);
        assert!(result.memory_descriptors.contains_key("theta"));
        assert!(!result.memory_descriptors.contains_key("__P0"));
    }
}
