use std::fmt::Display;

use crate::{
    eval::Evaluator,
    lex::{self, ErrorKind, LineError, TokenClass},
    numeral::Numeral,
};

pub const BANNER: &[&str] = &[
    "Welcome to the Roman numeral desk calculator!",
    "Any number of times, you can type an expression and Enter",
    "to see the result; type QUIT or EXIT to quit.",
    "You can end a line with = (but the = has no effect).",
    "You can use integers up through MMMCMXCIX (Arabic 3,999).",
    "Unlike the original Roman numerals, you can also",
    "specify zero, by using the LETTER (NOT DIGIT) O.",
    "You can also use lower case, parentheses,",
    "and these operators: +, -, *, /, and ** (exponent).",
    "To achieve the effect of a negative integer,",
    "use O, -, and a positive integer; you MUST include the O.",
    "If you start a line with an operator,",
    "the operator's left operand is the previous line's result.",
    "NO fractions are allowed in expressions or in results.",
];

/// What the calculator answers to one line of input.
#[derive(Debug)]
pub enum Reply {
    /// The line was empty or just `=`.
    Prompt,
    /// The line used the digit 0 instead of the letter O.
    DigitZero,
    Quit,
    Value {
        value: Numeral,
        uses_previous: bool,
    },
    Error(LineError),
}

impl Reply {
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }
}

impl Display for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reply::Prompt => write!(f, "Please type an expression, QUIT, or EXIT."),
            Reply::DigitZero => write!(f, "For zero, specify the LETTER (NOT DIGIT) O."),
            Reply::Quit => write!(f, "Bye!  Visit again!"),
            Reply::Value {
                value,
                uses_previous,
            } => {
                let note = if *uses_previous {
                    " (which uses previous line's result)"
                } else {
                    ""
                };
                write!(f, "Result{note}: Roman {value} (Arabic {}).", value.value())
            }
            Reply::Error(e) => write!(f, "{e}"),
        }
    }
}

/// Turns a raw input line into the form the lexer expects: upper case,
/// trimmed, one trailing `=` dropped and a blank appended.
///
/// Lines that never reach the lexer come back as the reply to show instead.
pub fn normalize(raw: &str) -> Result<String, Reply> {
    // Blanks and control characters, the way the calculator always trimmed.
    let mut line = raw
        .to_uppercase()
        .trim_matches(|c: char| c <= ' ')
        .to_string();
    if line.is_empty() || line == "=" {
        return Err(Reply::Prompt);
    }
    if line.contains('0') {
        return Err(Reply::DigitZero);
    }
    if line.ends_with('=') {
        line.pop();
    }
    line.push(' ');

    if line.contains("QUIT") || line.contains("EXIT") {
        return Err(Reply::Quit);
    }
    Ok(line)
}

/// Carries the previous line's result from one line to the next.
#[derive(Debug, Default)]
pub struct Session {
    previous: Numeral,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous(&self) -> Numeral {
        self.previous
    }

    /// Handles one line. The previous result only changes when the line
    /// evaluates without error.
    pub fn process(&mut self, raw: &str) -> Reply {
        let line = match normalize(raw) {
            Ok(line) => line,
            Err(reply) => return reply,
        };

        let tokens = match lex::tokenize(&line) {
            Ok(tokens) => tokens,
            Err(e) => return Reply::Error(e),
        };
        let uses_previous = tokens
            .first()
            .is_some_and(|token| token.kind.class() == TokenClass::Operator);

        let value = match Evaluator::new(&line, &tokens, self.previous.value()).evaluate() {
            Ok(value) => value,
            Err(e) => return Reply::Error(e),
        };
        let Some(value) = Numeral::new(value) else {
            let end = line.len() - 1;
            return Reply::Error(LineError::new(ErrorKind::ResultOutOfRange, &line, end));
        };

        self.previous = value;
        Reply::Value {
            value,
            uses_previous,
        }
    }
}
