use std::fmt::Display;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::numeral;

/// What went wrong on a line. The message text is the description shown to
/// the user.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("a missing expression")]
    MissingExpression,
    #[error("an invalid expression")]
    InvalidExpression,
    #[error("an invalid character")]
    InvalidCharacter,
    #[error("an incomplete expression")]
    IncompleteExpression,
    #[error("a missing operator")]
    MissingOperator,
    #[error("a missing operand")]
    MissingOperand,
    #[error("a division by zero")]
    DivisionByZero,
    #[error("a result out of range")]
    ResultOutOfRange,
}

impl ErrorKind {
    fn help(self) -> &'static str {
        match self {
            ErrorKind::MissingExpression => "put an expression before the end or the `)`",
            ErrorKind::InvalidExpression => "a parenthesized expression must start with an operand",
            ErrorKind::InvalidCharacter => {
                "use the letters MDCLXVI (or O for zero), `+ - * / **`, and parentheses"
            }
            ErrorKind::IncompleteExpression => "check that every `(` has a matching `)`",
            ErrorKind::MissingOperator => "put an operator between the two operands",
            ErrorKind::MissingOperand => "every operator needs an operand on its right",
            ErrorKind::DivisionByZero => "the divisor must not be O",
            ErrorKind::ResultOutOfRange => "results must stay within -MMMCMXCIX..=MMMCMXCIX",
        }
    }
}

/// An error somewhere in one input line, pointing at the character where it
/// was detected.
#[derive(Error, Debug, Diagnostic)]
#[error("There's {kind} detected at the end of this text: {context}")]
pub struct LineError {
    pub kind: ErrorKind,

    #[source_code]
    src: NamedSource<String>,

    #[label("detected here")]
    bad_bit: SourceSpan,

    #[help]
    help: String,

    context: String,
}

impl LineError {
    /// `position` is the byte offset of the faulty character within `line`.
    pub fn new(kind: ErrorKind, line: &str, position: usize) -> Self {
        let position = position.min(line.len().saturating_sub(1));
        let width = line
            .get(position..)
            .and_then(|rest| rest.chars().next())
            .map_or(0, char::len_utf8);
        let end = position + width;

        LineError {
            kind,
            src: NamedSource::new("<input>", line.to_string()),
            bad_bit: SourceSpan::from(position..end),
            help: kind.help().to_string(),
            context: line[..end].to_string(),
        }
    }

    pub fn position(&self) -> usize {
        self.bad_bit.offset()
    }

    /// The line up to and including the faulty character.
    pub fn context(&self) -> &str {
        &self.context
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'de> {
    pub kind: TokenKind,
    pub literal: &'de str,
    /// Byte offset of the token's last character.
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    EndOfLine,
    RightParen,
    LeftParen,
    Integer(i32),
    Add,
    Subtract,
    Multiply,
    Divide,
    Exponent,
}

/// The three disjoint roles a token can play for the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    /// May end an expression: end of line or `)`.
    Ender,
    /// May start an operand: an integer or `(`.
    Operand,
    Operator,
}

impl TokenKind {
    pub fn class(self) -> TokenClass {
        match self {
            TokenKind::EndOfLine | TokenKind::RightParen => TokenClass::Ender,
            TokenKind::LeftParen | TokenKind::Integer(_) => TokenClass::Operand,
            TokenKind::Add
            | TokenKind::Subtract
            | TokenKind::Multiply
            | TokenKind::Divide
            | TokenKind::Exponent => TokenClass::Operator,
        }
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lit = self.literal;
        match self.kind {
            TokenKind::EndOfLine => write!(f, "EOL {lit} null"),
            TokenKind::RightParen => write!(f, "RIGHT_PAREN {lit} null"),
            TokenKind::LeftParen => write!(f, "LEFT_PAREN {lit} null"),
            TokenKind::Integer(n) => write!(f, "INTEGER {lit} {n}"),
            TokenKind::Add => write!(f, "PLUS {lit} null"),
            TokenKind::Subtract => write!(f, "MINUS {lit} null"),
            TokenKind::Multiply => write!(f, "STAR {lit} null"),
            TokenKind::Divide => write!(f, "SLASH {lit} null"),
            TokenKind::Exponent => write!(f, "STAR_STAR {lit} null"),
        }
    }
}

/// Splits one normalized line into tokens, finishing with a single
/// [`TokenKind::EndOfLine`]. The iterator is fused after the end of line or
/// the first error.
pub struct Lexer<'de> {
    whole: &'de str,
    rest: &'de str,
    byte: usize,
    finished: bool,
}

impl<'de> Lexer<'de> {
    pub fn new(input: &'de str) -> Self {
        Lexer {
            whole: input,
            rest: input,
            byte: 0,
            finished: false,
        }
    }

    fn error(
        &mut self,
        kind: ErrorKind,
        position: usize,
    ) -> Option<Result<Token<'de>, LineError>> {
        self.finished = true;
        Some(Err(LineError::new(kind, self.whole, position)))
    }
}

/// Tokenizes a whole line, stopping at the first error.
pub fn tokenize(line: &str) -> Result<Vec<Token<'_>>, LineError> {
    Lexer::new(line).collect()
}

impl<'de> Iterator for Lexer<'de> {
    type Item = Result<Token<'de>, LineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            let mut chars = self.rest.chars();
            let Some(c) = chars.next() else {
                self.finished = true;
                return Some(Ok(Token {
                    kind: TokenKind::EndOfLine,
                    literal: "",
                    end: self.whole.len().saturating_sub(1),
                }));
            };
            let start = self.byte;
            let cur = self.rest;

            if c.is_ascii() && numeral::is_letter(c as u8) {
                let Some((value, used)) = numeral::decode_prefix(cur.as_bytes()) else {
                    return self.error(ErrorKind::InvalidCharacter, start);
                };
                self.rest = &cur[used..];
                self.byte += used;

                // A literal may not run straight into another numeral letter.
                if self.rest.bytes().next().is_some_and(numeral::is_letter) {
                    return self.error(ErrorKind::InvalidCharacter, self.byte);
                }

                return Some(Ok(Token {
                    kind: TokenKind::Integer(value),
                    literal: &cur[..used],
                    end: self.byte - 1,
                }));
            }

            self.rest = chars.as_str();
            self.byte += c.len_utf8();

            let process = move |kind: TokenKind, len: usize| {
                Some(Ok(Token {
                    kind,
                    literal: &cur[..len],
                    end: start + len - 1,
                }))
            };

            return match c {
                '+' => process(TokenKind::Add, 1),
                '-' => process(TokenKind::Subtract, 1),
                '/' => process(TokenKind::Divide, 1),
                '(' => process(TokenKind::LeftParen, 1),
                ')' => process(TokenKind::RightParen, 1),
                '*' if self.rest.starts_with('*') => {
                    self.rest = &self.rest[1..];
                    self.byte += 1;
                    process(TokenKind::Exponent, 2)
                }
                '*' => process(TokenKind::Multiply, 1),
                ' ' => continue,
                _ => self.error(ErrorKind::InvalidCharacter, start),
            };
        }
    }
}
