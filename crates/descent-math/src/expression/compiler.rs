//! Recursive-descent compiler from tokens to stack bytecode.
//!
//! Grammar (lowest to highest precedence):
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary ('^' unary)?
//! primary := number | ident | ident '(' args ')' | '(' expr ')'
//! ```
//!
//! `^` binds tighter than unary minus and associates to the right, so
//! `-x^2` is `-(x^2)` and `2^3^2` is `2^9`.

use super::intrinsics::{self, Binary, Unary};
use super::lexer::{tokenize, Token, TokenKind};
use super::{CompiledExpression, ExpressionError, Op, MAX_NESTING, MAX_STACK_DEPTH};

pub(crate) fn compile(source: &str) -> Result<CompiledExpression, ExpressionError> {
    if source.trim().is_empty() {
        return Err(ExpressionError::Empty);
    }

    let tokens = tokenize(source)?;
    let mut compiler = Compiler {
        tokens,
        cursor: 0,
        ops: Vec::with_capacity(32),
        depth: 0,
        max_depth: 0,
        nesting: 0,
    };

    compiler.parse_expr()?;
    let trailing = compiler.peek();
    if trailing.kind != TokenKind::End {
        return Err(ExpressionError::UnexpectedToken {
            found: trailing.kind.to_string(),
            expected: "an operator or end of input".into(),
            pos: trailing.pos,
        });
    }

    Ok(CompiledExpression {
        source: source.to_string(),
        ops: compiler.ops,
        max_depth: compiler.max_depth,
    })
}

struct Compiler {
    tokens: Vec<Token>,
    cursor: usize,
    ops: Vec<Op>,
    /// Operand stack depth after the last emitted op.
    depth: usize,
    max_depth: usize,
    nesting: usize,
}

impl Compiler {
    fn peek(&self) -> &Token {
        // tokenize always terminates the stream with End
        &self.tokens[self.cursor.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.cursor < self.tokens.len() - 1 {
            self.cursor += 1;
        }
        token
    }

    fn emit(&mut self, op: Op) -> Result<(), ExpressionError> {
        match op {
            Op::Const(_) | Op::X | Op::Y => self.depth += 1,
            Op::Add | Op::Sub | Op::Mul | Op::Div | Op::Pow | Op::Call2(_) => self.depth -= 1,
            Op::Neg | Op::Call1(_) => {}
        }
        if self.depth > MAX_STACK_DEPTH {
            return Err(ExpressionError::TooComplex {
                limit: MAX_STACK_DEPTH,
            });
        }
        self.max_depth = self.max_depth.max(self.depth);
        self.ops.push(op);
        Ok(())
    }

    fn parse_expr(&mut self) -> Result<(), ExpressionError> {
        self.parse_term()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => Op::Add,
                TokenKind::Minus => Op::Sub,
                _ => return Ok(()),
            };
            self.advance();
            self.parse_term()?;
            self.emit(op)?;
        }
    }

    fn parse_term(&mut self) -> Result<(), ExpressionError> {
        self.parse_unary()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => Op::Mul,
                TokenKind::Slash => Op::Div,
                _ => return Ok(()),
            };
            self.advance();
            self.parse_unary()?;
            self.emit(op)?;
        }
    }

    fn parse_unary(&mut self) -> Result<(), ExpressionError> {
        self.nesting += 1;
        if self.nesting > MAX_NESTING {
            return Err(ExpressionError::TooComplex { limit: MAX_NESTING });
        }

        let result = match self.peek().kind {
            TokenKind::Minus => {
                self.advance();
                self.parse_unary().and_then(|()| self.emit(Op::Neg))
            }
            TokenKind::Plus => {
                self.advance();
                self.parse_unary()
            }
            _ => self.parse_power(),
        };

        self.nesting -= 1;
        result
    }

    fn parse_power(&mut self) -> Result<(), ExpressionError> {
        self.parse_primary()?;
        if self.peek().kind == TokenKind::Caret {
            self.advance();
            self.parse_unary()?;
            self.emit(Op::Pow)?;
        }
        Ok(())
    }

    fn parse_primary(&mut self) -> Result<(), ExpressionError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Number(value) => self.emit(Op::Const(value)),
            TokenKind::Ident(name) => {
                if self.peek().kind == TokenKind::LParen {
                    self.advance();
                    self.parse_call(&name, token.pos)
                } else {
                    self.parse_identifier(&name, token.pos)
                }
            }
            TokenKind::LParen => {
                self.parse_expr()?;
                self.expect_close(token.pos)
            }
            TokenKind::End => Err(ExpressionError::UnexpectedEnd {
                expected: "a number, variable or '('".into(),
            }),
            other => Err(ExpressionError::UnexpectedToken {
                found: other.to_string(),
                expected: "a number, variable or '('".into(),
                pos: token.pos,
            }),
        }
    }

    fn parse_identifier(&mut self, name: &str, pos: usize) -> Result<(), ExpressionError> {
        match name {
            "x" => self.emit(Op::X),
            "y" => self.emit(Op::Y),
            _ => match intrinsics::constant(name) {
                Some(value) => self.emit(Op::Const(value)),
                None => Err(ExpressionError::UnknownIdentifier {
                    name: name.to_string(),
                    pos,
                }),
            },
        }
    }

    fn parse_call(&mut self, name: &str, pos: usize) -> Result<(), ExpressionError> {
        let (expected, op) = if let Some(f) = Unary::lookup(name) {
            (1, Op::Call1(f))
        } else if let Some(f) = Binary::lookup(name) {
            (2, Op::Call2(f))
        } else {
            return Err(ExpressionError::UnknownFunction {
                name: name.to_string(),
                pos,
            });
        };

        let mut found = 0;
        if self.peek().kind != TokenKind::RParen {
            loop {
                self.parse_expr()?;
                found += 1;
                if self.peek().kind == TokenKind::Comma {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect_close(pos)?;

        if found != expected {
            return Err(ExpressionError::WrongArity {
                name: name.to_string(),
                expected,
                found,
                pos,
            });
        }
        self.emit(op)
    }

    fn expect_close(&mut self, open_pos: usize) -> Result<(), ExpressionError> {
        let token = self.advance();
        match token.kind {
            TokenKind::RParen => Ok(()),
            TokenKind::End => Err(ExpressionError::UnclosedParenthesis { pos: open_pos }),
            other => Err(ExpressionError::UnexpectedToken {
                found: other.to_string(),
                expected: "')'".into(),
                pos: token.pos,
            }),
        }
    }
}
