//! Compiled surface expressions.
//!
//! User-defined surfaces are written as plain arithmetic in `x` and `y`
//! and compiled once into a compact stack bytecode:
//!
//! ```rust
//! use descent_math::expression::CompiledExpression;
//!
//! let expr = CompiledExpression::compile("sin(x) * cos(y) + 0.1 * (x^2 + y^2)").unwrap();
//! assert_eq!(expr.eval(0.0, 0.0), 0.0);
//! ```
//!
//! # Language
//!
//! - Operators: `+ - * /`, power `^` (or `**`), unary `-`/`+`, parentheses
//! - Variables: `x`, `y`
//! - Constants: `pi`, `e`, `tau`
//! - Functions: `sin cos tan asin acos atan sinh cosh tanh exp ln log log10
//!   log2 sqrt cbrt abs floor ceil sign` and `pow atan2 min max hypot`
//!
//! Malformed input is rejected at compile time with the byte offset of the
//! problem. Evaluation itself cannot fail: a division by zero or a
//! logarithm of a negative number yields the IEEE result.

mod compiler;
mod intrinsics;
mod lexer;

use std::fmt;

use thiserror::Error;

use intrinsics::{Binary, Unary};

/// Maximum operand stack depth of a compiled expression.
pub const MAX_STACK_DEPTH: usize = 64;

/// Maximum nesting of parentheses and unary operators.
pub const MAX_NESTING: usize = 128;

/// Errors raised while compiling an expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    /// Input was empty or whitespace.
    #[error("expression is empty")]
    Empty,

    /// A character outside the language.
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar {
        /// The offending character.
        ch: char,
        /// Byte offset.
        pos: usize,
    },

    /// A numeric literal that does not parse.
    #[error("invalid number '{text}' at position {pos}")]
    InvalidNumber {
        /// Literal text.
        text: String,
        /// Byte offset.
        pos: usize,
    },

    /// A token that cannot appear here.
    #[error("unexpected {found} at position {pos}, expected {expected}")]
    UnexpectedToken {
        /// Description of the token found.
        found: String,
        /// Description of what was expected.
        expected: String,
        /// Byte offset.
        pos: usize,
    },

    /// Input ended in the middle of an expression.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd {
        /// Description of what was expected.
        expected: String,
    },

    /// A '(' without its ')'.
    #[error("unclosed parenthesis opened at position {pos}")]
    UnclosedParenthesis {
        /// Byte offset of the opening token.
        pos: usize,
    },

    /// A name that is neither a variable nor a constant.
    #[error("unknown identifier '{name}' at position {pos} (variables are x and y)")]
    UnknownIdentifier {
        /// The name.
        name: String,
        /// Byte offset.
        pos: usize,
    },

    /// A call to a function outside the fixed set.
    #[error("unknown function '{name}' at position {pos}")]
    UnknownFunction {
        /// The name.
        name: String,
        /// Byte offset.
        pos: usize,
    },

    /// A call with the wrong number of arguments.
    #[error("function '{name}' at position {pos} takes {expected} argument(s), got {found}")]
    WrongArity {
        /// The function name.
        name: String,
        /// Required argument count.
        expected: usize,
        /// Supplied argument count.
        found: usize,
        /// Byte offset.
        pos: usize,
    },

    /// The expression exceeds the nesting or stack limit.
    #[error("expression too complex (limit {limit})")]
    TooComplex {
        /// The limit that was hit.
        limit: usize,
    },
}

/// Bytecode instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Op {
    Const(f64),
    X,
    Y,
    Neg,
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Call1(Unary),
    Call2(Binary),
}

/// An expression in `x` and `y`, compiled to stack bytecode.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpression {
    source: String,
    ops: Vec<Op>,
    max_depth: usize,
}

impl CompiledExpression {
    /// Compiles `source`, rejecting anything outside the language.
    pub fn compile(source: &str) -> Result<Self, ExpressionError> {
        compiler::compile(source)
    }

    /// Evaluates the expression at `(x, y)`.
    #[inline]
    pub fn eval(&self, x: f64, y: f64) -> f64 {
        let mut stack = [0.0f64; MAX_STACK_DEPTH];
        let mut sp = 0usize;

        for op in &self.ops {
            match *op {
                Op::Const(v) => {
                    stack[sp] = v;
                    sp += 1;
                }
                Op::X => {
                    stack[sp] = x;
                    sp += 1;
                }
                Op::Y => {
                    stack[sp] = y;
                    sp += 1;
                }
                Op::Neg => stack[sp - 1] = -stack[sp - 1],
                Op::Call1(f) => stack[sp - 1] = f.apply(stack[sp - 1]),
                Op::Add => {
                    sp -= 1;
                    stack[sp - 1] += stack[sp];
                }
                Op::Sub => {
                    sp -= 1;
                    stack[sp - 1] -= stack[sp];
                }
                Op::Mul => {
                    sp -= 1;
                    stack[sp - 1] *= stack[sp];
                }
                Op::Div => {
                    sp -= 1;
                    stack[sp - 1] /= stack[sp];
                }
                Op::Pow => {
                    sp -= 1;
                    stack[sp - 1] = stack[sp - 1].powf(stack[sp]);
                }
                Op::Call2(f) => {
                    sp -= 1;
                    stack[sp - 1] = f.apply(stack[sp - 1], stack[sp]);
                }
            }
        }

        // The compiler guarantees a single result
        stack[0]
    }

    /// The source text this expression was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of bytecode instructions.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Always false for a successfully compiled expression.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Peak operand stack depth during evaluation.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns true if the expression reads `x` or `y`.
    pub fn is_constant(&self) -> bool {
        !self.ops.iter().any(|op| matches!(op, Op::X | Op::Y))
    }

    /// Names of every function callable from an expression.
    pub fn function_names() -> &'static [&'static str] {
        intrinsics::FUNCTION_NAMES
    }
}

impl fmt::Display for CompiledExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for CompiledExpression {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn eval(source: &str, x: f64, y: f64) -> f64 {
        CompiledExpression::compile(source).unwrap().eval(x, y)
    }

    #[test]
    fn test_arithmetic_precedence() {
        assert_eq!(eval("1 + 2 * 3", 0.0, 0.0), 7.0);
        assert_eq!(eval("(1 + 2) * 3", 0.0, 0.0), 9.0);
        assert_eq!(eval("10 - 4 - 3", 0.0, 0.0), 3.0);
        assert_eq!(eval("16 / 4 / 2", 0.0, 0.0), 2.0);
        assert_eq!(eval("x - y", 5.0, 2.0), 3.0);
    }

    #[test]
    fn test_power_binds_tighter_than_unary_minus() {
        assert_eq!(eval("-x^2", 3.0, 0.0), -9.0);
        assert_eq!(eval("(-x)^2", 3.0, 0.0), 9.0);
        assert_eq!(eval("2^3^2", 0.0, 0.0), 512.0);
        assert_eq!(eval("2**-1", 0.0, 0.0), 0.5);
        assert_eq!(eval("--x", 4.0, 0.0), 4.0);
    }

    #[test]
    fn test_functions_and_constants() {
        assert_relative_eq!(eval("sin(pi / 2)", 0.0, 0.0), 1.0, epsilon = 1e-15);
        assert_relative_eq!(eval("cos(2 * pi * x)", 1.0, 0.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(eval("ln(e)", 0.0, 0.0), 1.0, epsilon = 1e-15);
        assert_eq!(eval("pow(x, y)", 2.0, 10.0), 1024.0);
        assert_eq!(eval("max(x, y) - min(x, y)", 2.0, 7.0), 5.0);
        assert_relative_eq!(eval("atan2(y, x)", 1.0, 1.0), PI / 4.0, epsilon = 1e-15);
        assert_eq!(eval("hypot(x, y)", 3.0, 4.0), 5.0);
        assert_eq!(eval("sqrt(abs(x))", -16.0, 0.0), 4.0);
    }

    #[test]
    fn test_rosenbrock_expression() {
        let expr = CompiledExpression::compile("(1 - x)^2 + 100 * (y - x^2)^2").unwrap();
        assert_eq!(expr.eval(1.0, 1.0), 0.0);
        assert_eq!(expr.eval(0.0, 0.0), 1.0);
        assert_eq!(expr.eval(-1.0, 1.0), 4.0);
        assert!(!expr.is_constant());
    }

    #[test]
    fn test_ieee_results_flow_through() {
        assert!(eval("1 / x", 0.0, 0.0).is_infinite());
        assert!(eval("ln(x)", -1.0, 0.0).is_nan());
        assert!(eval("sqrt(x)", -4.0, 0.0).is_nan());
    }

    #[test]
    fn test_compile_errors() {
        assert_eq!(
            CompiledExpression::compile("   ").unwrap_err(),
            ExpressionError::Empty
        );
        assert!(matches!(
            CompiledExpression::compile("x +").unwrap_err(),
            ExpressionError::UnexpectedEnd { .. }
        ));
        assert_eq!(
            CompiledExpression::compile("(x + y").unwrap_err(),
            ExpressionError::UnclosedParenthesis { pos: 0 }
        );
        assert!(matches!(
            CompiledExpression::compile("x + y)").unwrap_err(),
            ExpressionError::UnexpectedToken { pos: 5, .. }
        ));
        assert_eq!(
            CompiledExpression::compile("x * z").unwrap_err(),
            ExpressionError::UnknownIdentifier {
                name: "z".into(),
                pos: 4
            }
        );
        assert_eq!(
            CompiledExpression::compile("foo(x)").unwrap_err(),
            ExpressionError::UnknownFunction {
                name: "foo".into(),
                pos: 0
            }
        );
        assert_eq!(
            CompiledExpression::compile("sin(x, y)").unwrap_err(),
            ExpressionError::WrongArity {
                name: "sin".into(),
                expected: 1,
                found: 2,
                pos: 0
            }
        );
        assert!(matches!(
            CompiledExpression::compile("pow()").unwrap_err(),
            ExpressionError::WrongArity { found: 0, .. }
        ));
        assert!(matches!(
            CompiledExpression::compile("2 x").unwrap_err(),
            ExpressionError::UnexpectedToken { pos: 2, .. }
        ));
    }

    #[test]
    fn test_code_injection_is_rejected() {
        assert!(CompiledExpression::compile("x; process.exit()").is_err());
        assert!(CompiledExpression::compile("Math.sin(x)").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}x{}", "(".repeat(500), ")".repeat(500));
        assert!(matches!(
            CompiledExpression::compile(&deep).unwrap_err(),
            ExpressionError::TooComplex { .. }
        ));

        let fine = format!("{}x{}", "(".repeat(20), ")".repeat(20));
        assert_eq!(CompiledExpression::compile(&fine).unwrap().eval(3.0, 0.0), 3.0);
    }

    #[test]
    fn test_stack_limit() {
        // Right-nested products keep every left operand on the stack
        let mut source = String::from("x");
        for _ in 0..100 {
            source = format!("x * ({source})");
        }
        assert!(CompiledExpression::compile(&source).is_err());
    }

    #[test]
    fn test_metadata() {
        let expr: CompiledExpression = "x + 1".parse().unwrap();
        assert_eq!(expr.source(), "x + 1");
        assert_eq!(expr.to_string(), "x + 1");
        assert_eq!(expr.len(), 3);
        assert_eq!(expr.max_depth(), 2);
        assert!(CompiledExpression::compile("2 * pi").unwrap().is_constant());
    }
}
