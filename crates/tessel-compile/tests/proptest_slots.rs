//! Property-based tests for slot allocation.
//!
//! Tests that reordering the operands of a sum or product never allocates a
//! second slot, and that rewriting leaves non-gate instructions in place.

use proptest::prelude::*;
use tessel_compile::rewrite_arithmetic;
use tessel_ir::{Declaration, Expression, Instruction, MemoryType, Program};

const REGIONS: [&str; 3] = ["theta", "beta", "gamma"];

fn declarations() -> Vec<Instruction> {
    REGIONS
        .iter()
        .map(|name| Instruction::declare(Declaration::new(*name, MemoryType::Real, 4)))
        .collect()
}

fn arb_operand() -> impl Strategy<Value = Expression> {
    prop_oneof![
        (prop::sample::select(REGIONS.to_vec()), 0_u32..4)
            .prop_map(|(name, offset)| Expression::address(name, offset)),
        (1_u32..20).prop_map(|n| Expression::Number(f64::from(n))),
    ]
}

/// Operands with at least one memory reference, plus a shuffled copy.
fn arb_operands() -> impl Strategy<Value = (Vec<Expression>, Vec<Expression>)> {
    (
        (prop::sample::select(REGIONS.to_vec()), 0_u32..4)
            .prop_map(|(name, offset)| Expression::address(name, offset)),
        prop::collection::vec(arb_operand(), 1..5),
    )
        .prop_flat_map(|(head, mut rest)| {
            rest.insert(0, head);
            let shuffled = Just(rest.clone()).prop_shuffle();
            (Just(rest), shuffled)
        })
}

fn fold(operands: &[Expression], product: bool) -> Expression {
    let mut iter = operands.iter().cloned();
    let first = iter.next().unwrap_or(Expression::Number(0.0));
    iter.fold(first, |acc, e| if product { acc * e } else { acc + e })
}

fn rz(param: Expression, qubit: u32) -> Instruction {
    Instruction::gate("RZ", [param], [qubit])
}

proptest! {
    #[test]
    fn reordered_sums_share_a_slot((operands, shuffled) in arb_operands()) {
        let program: Program = declarations()
            .into_iter()
            .chain([rz(fold(&operands, false), 0), rz(fold(&shuffled, false), 1)])
            .collect();

        let result = rewrite_arithmetic(&program).unwrap();
        prop_assert_eq!(result.recalculation_table.len(), 1);
    }

    #[test]
    fn reordered_products_share_a_slot((operands, shuffled) in arb_operands()) {
        let program: Program = declarations()
            .into_iter()
            .chain([rz(fold(&operands, true), 0), rz(fold(&shuffled, true), 1)])
            .collect();

        let result = rewrite_arithmetic(&program).unwrap();
        prop_assert_eq!(result.recalculation_table.len(), 1);
    }

    #[test]
    fn non_gate_instructions_keep_their_place((operands, _) in arb_operands(), qubit in 0_u32..8) {
        let program: Program = declarations()
            .into_iter()
            .chain([
                rz(fold(&operands, false), qubit),
                Instruction::Reset(None),
                Instruction::measure_discard(qubit),
            ])
            .collect();

        let result = rewrite_arithmetic(&program).unwrap();
        let rewritten: Vec<_> = result.program.iter().skip(1).collect();
        prop_assert_eq!(rewritten.len(), program.len());
        for (before, after) in program.iter().zip(rewritten) {
            if before.as_gate().is_none() {
                prop_assert_eq!(before, after);
            }
        }
    }
}
