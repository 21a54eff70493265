use crate::{
    lex::{ErrorKind, LineError, Token, TokenClass, TokenKind},
    numeral,
};

/// A binary operator. All operators share one precedence and fold strictly
/// left to right; only parentheses change grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Subtract,
    Multiply,
    Divide,
    Exponent,
}

impl Op {
    pub fn from_kind(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Add => Op::Add,
            TokenKind::Subtract => Op::Subtract,
            TokenKind::Multiply => Op::Multiply,
            TokenKind::Divide => Op::Divide,
            TokenKind::Exponent => Op::Exponent,
            _ => return None,
        })
    }

    /// Applies the operator without range checking the result.
    pub fn apply(self, lhs: i32, rhs: i32) -> Result<i32, ErrorKind> {
        Ok(match self {
            Op::Add => lhs + rhs,
            Op::Subtract => lhs - rhs,
            Op::Multiply => lhs * rhs,
            Op::Divide => {
                if rhs == 0 {
                    return Err(ErrorKind::DivisionByZero);
                }
                lhs / rhs
            }
            // Saturates on overflow, which the range check then rejects.
            Op::Exponent => f64::from(lhs).powi(rhs) as i32,
        })
    }
}

/// Evaluates a tokenized line in one pass, without building a tree.
///
/// `previous` is the result of the last successful line. It becomes the left
/// operand when the line starts with an operator.
pub struct Evaluator<'a, 'de> {
    line: &'de str,
    tokens: &'a [Token<'de>],
    previous: i32,
}

impl<'a, 'de> Evaluator<'a, 'de> {
    pub fn new(line: &'de str, tokens: &'a [Token<'de>], previous: i32) -> Self {
        Evaluator {
            line,
            tokens,
            previous,
        }
    }

    pub fn evaluate(&self) -> Result<i32, LineError> {
        self.expression(0, false).map(|(value, _)| value)
    }

    // Past the end behaves like the end of the line.
    fn token(&self, index: usize) -> Token<'de> {
        self.tokens.get(index).copied().unwrap_or(Token {
            kind: TokenKind::EndOfLine,
            literal: "",
            end: self.line.len().saturating_sub(1),
        })
    }

    fn fail(&self, kind: ErrorKind, token: Token<'de>) -> LineError {
        LineError::new(kind, self.line, token.end)
    }

    /// Evaluates from `start` up to the terminator: `)` when `nested`, the
    /// end of line otherwise. Returns the value and the terminator's index.
    fn expression(&self, start: usize, nested: bool) -> Result<(i32, usize), LineError> {
        let terminator = if nested {
            TokenKind::RightParen
        } else {
            TokenKind::EndOfLine
        };

        let first = self.token(start);
        let (mut value, mut next) = match first.kind.class() {
            TokenClass::Ender => return Err(self.fail(ErrorKind::MissingExpression, first)),
            TokenClass::Operand => self.operand(start)?,
            // The operator itself is the first one folded below.
            TokenClass::Operator if !nested && start == 0 => (self.previous, start),
            TokenClass::Operator => return Err(self.fail(ErrorKind::InvalidExpression, first)),
        };

        loop {
            let token = self.token(next);
            if token.kind == terminator {
                return Ok((value, next));
            }
            let Some(op) = Op::from_kind(token.kind) else {
                let kind = match token.kind.class() {
                    TokenClass::Ender => ErrorKind::IncompleteExpression,
                    _ => ErrorKind::MissingOperator,
                };
                return Err(self.fail(kind, token));
            };

            let (rhs, after) = self.operand(next + 1)?;
            let last = self.token(after - 1);
            value = op.apply(value, rhs).map_err(|kind| self.fail(kind, last))?;
            if !(numeral::MIN..=numeral::MAX).contains(&value) {
                return Err(self.fail(ErrorKind::ResultOutOfRange, last));
            }
            next = after;
        }
    }

    /// Resolves an integer or a parenthesized group at `index`. Returns its
    /// value and the index just past it.
    fn operand(&self, index: usize) -> Result<(i32, usize), LineError> {
        let token = self.token(index);
        match token.kind {
            TokenKind::Integer(value) => Ok((value, index + 1)),
            TokenKind::LeftParen => {
                let (value, close) = self.expression(index + 1, true)?;
                Ok((value, close + 1))
            }
            _ => Err(self.fail(ErrorKind::MissingOperand, token)),
        }
    }
}

/// Tokenizes and evaluates one normalized line.
pub fn evaluate(line: &str, previous: i32) -> Result<i32, LineError> {
    let tokens = crate::lex::tokenize(line)?;
    Evaluator::new(line, &tokens, previous).evaluate()
}
