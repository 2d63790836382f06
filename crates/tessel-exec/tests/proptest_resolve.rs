//! Property-based tests for slot resolution.
//!
//! Tests that resolved slot values equal the same arithmetic done directly,
//! bit for bit, whatever the operand order of the source expression.

use proptest::prelude::*;
use tessel_compile::rewrite_arithmetic;
use tessel_exec::{MemoryWrites, resolve};
use tessel_ir::{Declaration, Expression, Instruction, MemoryType, Program};

fn theta() -> Expression {
    Expression::address("theta", 0)
}

fn beta() -> Expression {
    Expression::address("beta", 0)
}

fn program(params: Vec<Expression>) -> Program {
    [
        Instruction::declare(Declaration::new("theta", MemoryType::Real, 1)),
        Instruction::declare(Declaration::new("beta", MemoryType::Real, 1)),
    ]
    .into_iter()
    .chain(params.into_iter().map(|p| Instruction::gate("RZ", [p], [0])))
    .collect()
}

proptest! {
    #[test]
    fn scaled_and_summed_slots(t in -10.0_f64..10.0, u in -10.0_f64..10.0) {
        let params = vec![Expression::from(3) * theta(), theta() + beta()];
        let rewrite = rewrite_arithmetic(&program(params)).unwrap();
        let memory = MemoryWrites::new().with("theta", 0, t).with("beta", 0, u);

        let patch = resolve(&rewrite.recalculation_table, &memory).unwrap();
        prop_assert_eq!(patch["__P0"][0], 3.0 * t);
        prop_assert_eq!(patch["__P0"][1], t + u);
    }

    #[test]
    fn linear_combination(
        a in -50_i32..50,
        b in -50_i32..50,
        t in -10.0_f64..10.0,
        u in -10.0_f64..10.0,
    ) {
        let expr = Expression::from(a) * theta() + Expression::from(b) * beta();
        let rewrite = rewrite_arithmetic(&program(vec![expr])).unwrap();
        let memory = MemoryWrites::new().with("theta", 0, t).with("beta", 0, u);

        let patch = resolve(&rewrite.recalculation_table, &memory).unwrap();
        let expected = f64::from(a) * t + f64::from(b) * u;
        prop_assert_eq!(patch["__P0"][0], expected);
    }

    #[test]
    fn commuted_forms_resolve_alike(
        c in 1_i32..20,
        t in -10.0_f64..10.0,
        u in -10.0_f64..10.0,
    ) {
        let forward = theta() * beta() + Expression::from(c) - beta();
        let backward = beta() * theta() + Expression::from(c) - beta();
        let rewrite = rewrite_arithmetic(&program(vec![forward, backward])).unwrap();
        prop_assert_eq!(rewrite.recalculation_table.len(), 1);

        let memory = MemoryWrites::new().with("theta", 0, t).with("beta", 0, u);
        let patch = resolve(&rewrite.recalculation_table, &memory).unwrap();
        prop_assert_eq!(patch["__P0"][0], t * u + f64::from(c) - u);
    }

    #[test]
    fn trig_and_roots(t in 0.0_f64..100.0) {
        let expr = Expression::apply(tessel_ir::Function::Sqrt, theta())
            * Expression::apply(tessel_ir::Function::Cos, theta());
        let rewrite = rewrite_arithmetic(&program(vec![expr])).unwrap();
        let memory = MemoryWrites::new().with("theta", 0, t).with("beta", 0, 0.0);

        let patch = resolve(&rewrite.recalculation_table, &memory).unwrap();
        prop_assert_eq!(patch["__P0"][0], t.sqrt() * t.cos());
    }
}
