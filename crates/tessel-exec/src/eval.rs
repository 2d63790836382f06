//! Host-side evaluation of recalculation expressions.

use std::f64::consts::PI;
use tessel_ir::{Expression, Function};

use crate::error::{ExecError, ExecResult};
use crate::memory::MemoryWrites;

/// Evaluate `expression` against `memory`.
///
/// Supports literals, `pi`, memory references, negation, `+ - *` and the
/// functions `SQRT`, `SIN` and `COS`. Division, exponentiation, `EXP` and
/// `CIS` fail with [`ExecError::UnsupportedExpressionOperator`].
pub fn evaluate(expression: &Expression, memory: &MemoryWrites) -> ExecResult<f64> {
    match expression {
        Expression::Number(v) => Ok(*v),
        Expression::Pi => Ok(PI),
        Expression::Address(reference) => {
            memory
                .get(reference)
                .ok_or_else(|| ExecError::MissingMemoryValue {
                    region: reference.name.clone(),
                    offset: reference.offset,
                })
        }
        Expression::Variable(name) => Err(ExecError::UnboundVariable(name.clone())),
        Expression::Neg(e) => Ok(-evaluate(e, memory)?),
        Expression::Add(a, b) => Ok(evaluate(a, memory)? + evaluate(b, memory)?),
        Expression::Sub(a, b) => Ok(evaluate(a, memory)? - evaluate(b, memory)?),
        Expression::Mul(a, b) => Ok(evaluate(a, memory)? * evaluate(b, memory)?),
        Expression::Div(..) => Err(unsupported("/")),
        Expression::Pow(..) => Err(unsupported("^")),
        Expression::Function(function, arg) => match function {
            Function::Sqrt => Ok(evaluate(arg, memory)?.sqrt()),
            Function::Sin => Ok(evaluate(arg, memory)?.sin()),
            Function::Cos => Ok(evaluate(arg, memory)?.cos()),
            Function::Exp | Function::Cis => Err(unsupported(function.name())),
        },
    }
}

fn unsupported(operator: &str) -> ExecError {
    ExecError::UnsupportedExpressionOperator(operator.to_string())
}
