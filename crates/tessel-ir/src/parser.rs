//! Reader for the textual expression form.
//!
//! Recalculation tables travel as `slot -> expression string`; this reads
//! those strings back into [`Expression`] trees. Precedence, loosest first:
//! `+ -`, `* /`, unary `-`, `^` (right-associative).

use std::str::FromStr;

use crate::error::{IrError, IrResult};
use crate::expression::{Expression, Function};
use crate::lexer::{SpannedToken, Token, tokenize};
use crate::memory::MemoryReference;

const NEG_PRECEDENCE: u8 = 3;
const POW_PRECEDENCE: u8 = 4;

/// Parse a single expression.
pub fn parse_expression(source: &str) -> IrResult<Expression> {
    ExpressionParser::new(source)?.parse()
}

impl FromStr for Expression {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_expression(s)
    }
}

/// Precedence-climbing parser over the token stream of one expression.
pub struct ExpressionParser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    end: usize,
}

impl ExpressionParser {
    /// Tokenize `source`.
    pub fn new(source: &str) -> IrResult<Self> {
        let mut tokens = Vec::new();
        for result in tokenize(source) {
            match result {
                Ok(token) => tokens.push(token),
                Err((span, message)) => {
                    return Err(IrError::LexerError {
                        position: span.start,
                        message,
                    });
                }
            }
        }
        Ok(Self {
            tokens,
            pos: 0,
            end: source.len(),
        })
    }

    /// Parse the whole input as one expression.
    pub fn parse(mut self) -> IrResult<Expression> {
        let expr = self.parse_binary_expr(0)?;
        if let Some(trailing) = self.tokens.get(self.pos) {
            return Err(IrError::UnexpectedToken {
                position: trailing.span.start,
                expected: "end of expression".into(),
                found: trailing.token.to_string(),
            });
        }
        Ok(expr)
    }

    fn parse_binary_expr(&mut self, min_prec: u8) -> IrResult<Expression> {
        let mut left = self.parse_unary_expr()?;

        while let Some(op) = self.peek_binary_op() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.advance();

            let next_min = if op.right_associative() { prec } else { prec + 1 };
            let right = self.parse_binary_expr(next_min)?;
            left = op.build(left, right);
        }

        Ok(left)
    }

    fn parse_unary_expr(&mut self) -> IrResult<Expression> {
        if self.consume(&Token::Minus) {
            // A literal directly after the sign is a negative literal, unless
            // an exponent follows: `-2^2` is `-(2^2)`.
            if let Some(value) = self.peek_literal() {
                if self.peek_at(1) != Some(&Token::Caret) {
                    self.advance();
                    return Ok(Expression::Number(-value));
                }
            }
            let operand = self.parse_binary_expr(NEG_PRECEDENCE + 1)?;
            return Ok(Expression::Neg(Box::new(operand)));
        }
        self.parse_primary_expr()
    }

    fn parse_primary_expr(&mut self) -> IrResult<Expression> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| IrError::UnexpectedEof("expression".into()))?;

        match token {
            Token::IntLiteral(v) => {
                self.advance();
                Ok(Expression::Number(v as f64))
            }
            Token::FloatLiteral(v) => {
                self.advance();
                Ok(Expression::Number(v))
            }
            Token::Pi => {
                self.advance();
                Ok(Expression::Pi)
            }
            Token::Variable(name) => {
                self.advance();
                Ok(Expression::Variable(name))
            }
            Token::Identifier(name) => {
                self.advance();
                if self.consume(&Token::LParen) {
                    let function = Function::from_name(&name)
                        .ok_or_else(|| IrError::UnknownFunction(name.clone()))?;
                    let arg = self.parse_binary_expr(0)?;
                    self.expect(&Token::RParen)?;
                    Ok(Expression::apply(function, arg))
                } else if self.consume(&Token::LBracket) {
                    let offset = self.parse_offset(&name)?;
                    self.expect(&Token::RBracket)?;
                    Ok(Expression::Address(MemoryReference::new(name, offset)))
                } else {
                    Ok(Expression::Address(MemoryReference::new(name, 0)))
                }
            }
            Token::LParen => {
                self.advance();
                let expr = self.parse_binary_expr(0)?;
                self.expect(&Token::RParen)?;
                Ok(expr)
            }
            other => Err(IrError::UnexpectedToken {
                position: self.position(),
                expected: "expression".into(),
                found: other.to_string(),
            }),
        }
    }

    fn parse_offset(&mut self, name: &str) -> IrResult<u32> {
        match self.peek().cloned() {
            Some(Token::IntLiteral(v)) => {
                self.advance();
                u32::try_from(v).map_err(|_| IrError::InvalidMemoryReference(format!("{name}[{v}]")))
            }
            Some(other) => Err(IrError::UnexpectedToken {
                position: self.position(),
                expected: "memory offset".into(),
                found: other.to_string(),
            }),
            None => Err(IrError::UnexpectedEof("memory offset".into())),
        }
    }

    fn peek_binary_op(&self) -> Option<BinaryOp> {
        match self.peek()? {
            Token::Plus => Some(BinaryOp::Add),
            Token::Minus => Some(BinaryOp::Sub),
            Token::Star => Some(BinaryOp::Mul),
            Token::Slash => Some(BinaryOp::Div),
            Token::Caret => Some(BinaryOp::Pow),
            _ => None,
        }
    }

    fn peek_literal(&self) -> Option<f64> {
        match self.peek()? {
            Token::IntLiteral(v) => Some(*v as f64),
            Token::FloatLiteral(v) => Some(*v),
            _ => None,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.peek_at(0)
    }

    fn peek_at(&self, ahead: usize) -> Option<&Token> {
        self.tokens.get(self.pos + ahead).map(|t| &t.token)
    }

    fn position(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |t| t.span.start)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn consume(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> IrResult<()> {
        match self.peek() {
            Some(token) if token == expected => {
                self.advance();
                Ok(())
            }
            Some(token) => Err(IrError::UnexpectedToken {
                position: self.position(),
                expected: expected.to_string(),
                found: token.to_string(),
            }),
            None => Err(IrError::UnexpectedEof(expected.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div => 2,
            BinaryOp::Pow => POW_PRECEDENCE,
        }
    }

    fn right_associative(self) -> bool {
        matches!(self, BinaryOp::Pow)
    }

    fn build(self, left: Expression, right: Expression) -> Expression {
        let (l, r) = (Box::new(left), Box::new(right));
        match self {
            BinaryOp::Add => Expression::Add(l, r),
            BinaryOp::Sub => Expression::Sub(l, r),
            BinaryOp::Mul => Expression::Mul(l, r),
            BinaryOp::Div => Expression::Div(l, r),
            BinaryOp::Pow => Expression::Pow(l, r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(name: &str) -> Expression {
        Expression::address(name, 0)
    }

    #[test]
    fn test_precedence() {
        let expr = parse_expression("beta*2 + 1").unwrap();
        assert_eq!(expr, addr("beta") * Expression::from(2) + Expression::from(1));

        let expr = parse_expression("(beta + 2) * (1 + theta)").unwrap();
        assert_eq!(
            expr,
            (addr("beta") + Expression::from(2)) * (Expression::from(1) + addr("theta"))
        );
    }

    #[test]
    fn test_left_associative_subtraction() {
        let expr = parse_expression("a - b - c").unwrap();
        assert_eq!(expr, (addr("a") - addr("b")) - addr("c"));
    }

    #[test]
    fn test_power_binds_tighter_than_negation() {
        let expr = parse_expression("-2^2").unwrap();
        assert_eq!(expr.as_f64(), Some(-4.0));
        let expr = parse_expression("2^3^2").unwrap();
        assert_eq!(expr.as_f64(), Some(512.0));
    }

    #[test]
    fn test_negative_literal() {
        assert_eq!(parse_expression("-0.5").unwrap(), Expression::Number(-0.5));
        assert_eq!(
            parse_expression("-theta").unwrap(),
            Expression::Neg(Box::new(addr("theta")))
        );
    }

    #[test]
    fn test_functions_and_indexing() {
        let expr = parse_expression("COS(beta)*sin(theta[2])").unwrap();
        assert_eq!(
            expr,
            Expression::apply(Function::Cos, addr("beta"))
                * Expression::apply(Function::Sin, Expression::address("theta", 2))
        );
        let expr = parse_expression("SQRT(2) + theta").unwrap();
        assert!(expr.references_memory());
    }

    #[test]
    fn test_display_is_readable_back() {
        let sources = [
            "3 * theta[0]",
            "beta[0] + theta[0]",
            "(beta[0] + 2) * (1 + theta[0])",
            "theta[0] - (beta[0] - theta[0])",
            "-(theta[0] + beta[0])",
            "-(0.5)",
            "COS(beta[0]) * SIN(theta[0])",
            "2^3^2",
            "(-2)^2",
        ];
        for source in sources {
            let expr = parse_expression(source).unwrap();
            assert_eq!(expr.to_string(), source);
            assert_eq!(parse_expression(&expr.to_string()).unwrap(), expr);
        }
    }

    #[test]
    fn test_extreme_literals_read_back() {
        for value in [1e20, 1e-300, -1e20, 2.5e-7, 1.7976931348623157e308] {
            let expr = Expression::Number(value) * Expression::address("theta", 0);
            assert_eq!(parse_expression(&expr.to_string()).unwrap(), expr, "{value}");
        }
    }

    #[test]
    fn test_overflowing_literal_is_rejected() {
        assert!(matches!(
            parse_expression("1e400 * theta"),
            Err(IrError::LexerError { position: 0, .. })
        ));
        assert!(matches!(
            parse_expression("theta - 1e999"),
            Err(IrError::LexerError { .. })
        ));
        let inf = Expression::Number(f64::INFINITY) * Expression::address("theta", 0);
        assert!(parse_expression(&inf.to_string()).is_err());
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse_expression("FOO(1)"),
            Err(IrError::UnknownFunction(name)) if name == "FOO"
        ));
        assert!(matches!(parse_expression("theta +"), Err(IrError::UnexpectedEof(_))));
        assert!(matches!(
            parse_expression("theta theta"),
            Err(IrError::UnexpectedToken { .. })
        ));
        assert!(matches!(parse_expression("theta[x]"), Err(IrError::UnexpectedToken { .. })));
        assert!(matches!(parse_expression("1 $ 2"), Err(IrError::LexerError { .. })));
    }
}
