//! Arithmetic expressions used as gate parameters.
//!
//! Expressions compare structurally with a total order: numbers are ordered
//! by [`f64::total_cmp`], so `Expression` can key hash maps and sorted sets.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::f64::consts::PI;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::memory::MemoryReference;

/// Named unary functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Function {
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
    /// Square root.
    Sqrt,
    /// Natural exponential.
    Exp,
    /// `cos(x) + i sin(x)`.
    Cis,
}

impl Function {
    /// The Quil spelling of this function.
    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "SIN",
            Function::Cos => "COS",
            Function::Sqrt => "SQRT",
            Function::Exp => "EXP",
            Function::Cis => "CIS",
        }
    }

    /// Look a function up by name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "SIN" => Some(Function::Sin),
            "COS" => Some(Function::Cos),
            "SQRT" => Some(Function::Sqrt),
            "EXP" => Some(Function::Exp),
            "CIS" => Some(Function::Cis),
            _ => None,
        }
    }
}

/// A gate-parameter expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expression {
    /// A numeric literal.
    Number(f64),
    /// The constant π.
    Pi,
    /// A classical memory location.
    Address(MemoryReference),
    /// A formal parameter (`%theta`), only meaningful inside gate definitions.
    Variable(String),
    /// Negation.
    Neg(Box<Expression>),
    /// Addition.
    Add(Box<Expression>, Box<Expression>),
    /// Subtraction.
    Sub(Box<Expression>, Box<Expression>),
    /// Multiplication.
    Mul(Box<Expression>, Box<Expression>),
    /// Division.
    Div(Box<Expression>, Box<Expression>),
    /// Exponentiation.
    Pow(Box<Expression>, Box<Expression>),
    /// Named function application.
    Function(Function, Box<Expression>),
}

impl Expression {
    /// Create a numeric literal.
    pub fn number(value: f64) -> Self {
        Expression::Number(value)
    }

    /// Create a π constant.
    pub fn pi() -> Self {
        Expression::Pi
    }

    /// Create a reference to `name[offset]`.
    pub fn address(name: impl Into<String>, offset: u32) -> Self {
        Expression::Address(MemoryReference::new(name, offset))
    }

    /// Create a formal parameter.
    pub fn variable(name: impl Into<String>) -> Self {
        Expression::Variable(name.into())
    }

    /// Apply a named function to `arg`.
    pub fn apply(function: Function, arg: Expression) -> Self {
        Expression::Function(function, Box::new(arg))
    }

    /// Whether this is anything other than a single literal, constant,
    /// memory reference or formal parameter.
    pub fn is_compound(&self) -> bool {
        !matches!(
            self,
            Expression::Number(_)
                | Expression::Pi
                | Expression::Address(_)
                | Expression::Variable(_)
        )
    }

    /// Whether any memory location appears in this expression.
    pub fn references_memory(&self) -> bool {
        match self {
            Expression::Address(_) => true,
            Expression::Number(_) | Expression::Pi | Expression::Variable(_) => false,
            Expression::Neg(e) | Expression::Function(_, e) => e.references_memory(),
            Expression::Add(a, b)
            | Expression::Sub(a, b)
            | Expression::Mul(a, b)
            | Expression::Div(a, b)
            | Expression::Pow(a, b) => a.references_memory() || b.references_memory(),
        }
    }

    /// Whether every numeric literal in this expression is finite.
    pub fn literals_are_finite(&self) -> bool {
        match self {
            Expression::Number(v) => v.is_finite(),
            Expression::Pi | Expression::Address(_) | Expression::Variable(_) => true,
            Expression::Neg(e) | Expression::Function(_, e) => e.literals_are_finite(),
            Expression::Add(a, b)
            | Expression::Sub(a, b)
            | Expression::Mul(a, b)
            | Expression::Div(a, b)
            | Expression::Pow(a, b) => a.literals_are_finite() && b.literals_are_finite(),
        }
    }

    /// All memory locations read by this expression.
    pub fn memory_references(&self) -> BTreeSet<MemoryReference> {
        let mut set = BTreeSet::new();
        self.collect_references(&mut set);
        set
    }

    fn collect_references(&self, set: &mut BTreeSet<MemoryReference>) {
        match self {
            Expression::Address(r) => {
                set.insert(r.clone());
            }
            Expression::Number(_) | Expression::Pi | Expression::Variable(_) => {}
            Expression::Neg(e) | Expression::Function(_, e) => e.collect_references(set),
            Expression::Add(a, b)
            | Expression::Sub(a, b)
            | Expression::Mul(a, b)
            | Expression::Div(a, b)
            | Expression::Pow(a, b) => {
                a.collect_references(set);
                b.collect_references(set);
            }
        }
    }

    /// Try to evaluate as a real constant.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Expression::Number(v) => Some(*v),
            Expression::Pi => Some(PI),
            Expression::Address(_) | Expression::Variable(_) => None,
            Expression::Neg(e) => e.as_f64().map(|v| -v),
            Expression::Add(a, b) => Some(a.as_f64()? + b.as_f64()?),
            Expression::Sub(a, b) => Some(a.as_f64()? - b.as_f64()?),
            Expression::Mul(a, b) => Some(a.as_f64()? * b.as_f64()?),
            Expression::Div(a, b) => {
                let divisor = b.as_f64()?;
                if divisor == 0.0 {
                    return None;
                }
                Some(a.as_f64()? / divisor)
            }
            Expression::Pow(a, b) => Some(a.as_f64()?.powf(b.as_f64()?)),
            Expression::Function(function, arg) => {
                let v = arg.as_f64()?;
                match function {
                    Function::Sin => Some(v.sin()),
                    Function::Cos => Some(v.cos()),
                    Function::Sqrt => Some(v.sqrt()),
                    Function::Exp => Some(v.exp()),
                    Function::Cis => None,
                }
            }
        }
    }

    /// Normal form used for structural comparison.
    ///
    /// Chains of `+` and of `*` are flattened, their operands sorted and
    /// rebuilt left-associated, so `beta + theta` and `theta + beta` (or
    /// `(a * b) * c` and `c * (b * a)`) produce the same tree.
    pub fn canonicalize(&self) -> Self {
        match self {
            Expression::Number(_)
            | Expression::Pi
            | Expression::Address(_)
            | Expression::Variable(_) => self.clone(),
            Expression::Add(..) => Self::rebuild_chain(self, Chain::Sum),
            Expression::Mul(..) => Self::rebuild_chain(self, Chain::Product),
            Expression::Neg(e) => Expression::Neg(Box::new(e.canonicalize())),
            Expression::Sub(a, b) => {
                Expression::Sub(Box::new(a.canonicalize()), Box::new(b.canonicalize()))
            }
            Expression::Div(a, b) => {
                Expression::Div(Box::new(a.canonicalize()), Box::new(b.canonicalize()))
            }
            Expression::Pow(a, b) => {
                Expression::Pow(Box::new(a.canonicalize()), Box::new(b.canonicalize()))
            }
            Expression::Function(function, arg) => {
                Expression::Function(*function, Box::new(arg.canonicalize()))
            }
        }
    }

    fn rebuild_chain(root: &Expression, chain: Chain) -> Self {
        let mut operands = Vec::new();
        root.flatten_chain(chain, &mut operands);
        operands.sort();

        let mut operands = operands.into_iter();
        // A chain always has at least two operands.
        let first = operands.next().unwrap_or(Expression::Number(0.0));
        operands.fold(first, |acc, next| match chain {
            Chain::Sum => Expression::Add(Box::new(acc), Box::new(next)),
            Chain::Product => Expression::Mul(Box::new(acc), Box::new(next)),
        })
    }

    fn flatten_chain(&self, chain: Chain, out: &mut Vec<Expression>) {
        match (self, chain) {
            (Expression::Add(a, b), Chain::Sum) | (Expression::Mul(a, b), Chain::Product) => {
                a.flatten_chain(chain, out);
                b.flatten_chain(chain, out);
            }
            _ => out.push(self.canonicalize()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Expression::Number(_) => 0,
            Expression::Pi => 1,
            Expression::Address(_) => 2,
            Expression::Variable(_) => 3,
            Expression::Neg(_) => 4,
            Expression::Add(..) => 5,
            Expression::Sub(..) => 6,
            Expression::Mul(..) => 7,
            Expression::Div(..) => 8,
            Expression::Pow(..) => 9,
            Expression::Function(..) => 10,
        }
    }

    /// Binding strength when printed; higher binds tighter.
    fn precedence(&self) -> u8 {
        match self {
            Expression::Add(..) | Expression::Sub(..) => 1,
            Expression::Mul(..) | Expression::Div(..) => 2,
            Expression::Neg(_) => 3,
            Expression::Number(v) if v.is_sign_negative() => 3,
            Expression::Pow(..) => 4,
            _ => 5,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        if self.precedence() < min {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Chain {
    Sum,
    Product,
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Expression {}

impl PartialOrd for Expression {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Expression {
    fn cmp(&self, other: &Self) -> Ordering {
        use Expression as E;
        match (self, other) {
            (E::Number(a), E::Number(b)) => a.total_cmp(b),
            (E::Pi, E::Pi) => Ordering::Equal,
            (E::Address(a), E::Address(b)) => a.cmp(b),
            (E::Variable(a), E::Variable(b)) => a.cmp(b),
            (E::Neg(a), E::Neg(b)) => a.cmp(b),
            (E::Add(a1, b1), E::Add(a2, b2))
            | (E::Sub(a1, b1), E::Sub(a2, b2))
            | (E::Mul(a1, b1), E::Mul(a2, b2))
            | (E::Div(a1, b1), E::Div(a2, b2))
            | (E::Pow(a1, b1), E::Pow(a2, b2)) => a1.cmp(a2).then_with(|| b1.cmp(b2)),
            (E::Function(f1, a1), E::Function(f2, a2)) => f1.cmp(f2).then_with(|| a1.cmp(a2)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for Expression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Expression::Number(v) => v.to_bits().hash(state),
            Expression::Pi => {}
            Expression::Address(r) => r.hash(state),
            Expression::Variable(name) => name.hash(state),
            Expression::Neg(e) => e.hash(state),
            Expression::Add(a, b)
            | Expression::Sub(a, b)
            | Expression::Mul(a, b)
            | Expression::Div(a, b)
            | Expression::Pow(a, b) => {
                a.hash(state);
                b.hash(state);
            }
            Expression::Function(function, arg) => {
                function.hash(state);
                arg.hash(state);
            }
        }
    }
}

/// Write a literal so the expression reader gets the same value back.
///
/// Magnitudes outside `[1e-5, 1e16)` use exponent form, since plain digits
/// of a large value overflow the integer token. Non-finite values print as
/// overflowing literals, which the reader rejects.
fn fmt_number(v: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if v.is_nan() {
        return f.write_str("(1e999 - 1e999)");
    }
    if v.is_infinite() {
        return f.write_str(if v > 0.0 { "1e999" } else { "-1e999" });
    }
    let magnitude = v.abs();
    if magnitude != 0.0 && !(1e-5..1e16).contains(&magnitude) {
        write!(f, "{v:e}")
    } else {
        write!(f, "{v}")
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Number(v) => fmt_number(*v, f),
            Expression::Pi => f.write_str("pi"),
            Expression::Address(r) => write!(f, "{r}"),
            Expression::Variable(name) => write!(f, "%{name}"),
            // `-0.5` reads back as a negative literal, so a negated
            // non-negative literal keeps its parentheses.
            Expression::Neg(e) => match e.as_ref() {
                Expression::Number(v) if !v.is_sign_negative() => {
                    f.write_str("-(")?;
                    fmt_number(*v, f)?;
                    f.write_str(")")
                }
                _ => {
                    f.write_str("-")?;
                    e.fmt_operand(f, 3)
                }
            },
            Expression::Add(a, b) => {
                a.fmt_operand(f, 1)?;
                f.write_str(" + ")?;
                b.fmt_operand(f, 2)
            }
            Expression::Sub(a, b) => {
                a.fmt_operand(f, 1)?;
                f.write_str(" - ")?;
                b.fmt_operand(f, 2)
            }
            Expression::Mul(a, b) => {
                a.fmt_operand(f, 2)?;
                f.write_str(" * ")?;
                b.fmt_operand(f, 3)
            }
            Expression::Div(a, b) => {
                a.fmt_operand(f, 2)?;
                f.write_str(" / ")?;
                b.fmt_operand(f, 3)
            }
            Expression::Pow(a, b) => {
                a.fmt_operand(f, 5)?;
                f.write_str("^")?;
                b.fmt_operand(f, 4)
            }
            Expression::Function(function, arg) => write!(f, "{}({arg})", function.name()),
        }
    }
}

impl From<f64> for Expression {
    fn from(value: f64) -> Self {
        Expression::Number(value)
    }
}

impl From<i32> for Expression {
    fn from(value: i32) -> Self {
        Expression::Number(f64::from(value))
    }
}

impl From<MemoryReference> for Expression {
    fn from(reference: MemoryReference) -> Self {
        Expression::Address(reference)
    }
}

impl std::ops::Add for Expression {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expression::Add(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Sub for Expression {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expression::Sub(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Mul for Expression {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expression::Mul(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Div for Expression {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expression::Div(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Neg for Expression {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expression::Neg(Box::new(self))
    }
}
