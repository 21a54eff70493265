use std::{fmt::Display, str::FromStr};

use thiserror::Error;

/// Smallest value a numeral can express (`-MMMCMXCIX`).
pub const MIN: i32 = -3999;
/// Largest value a numeral can express (`MMMCMXCIX`).
pub const MAX: i32 = 3999;

/// Stand-alone letter for zero. It never combines with other letters.
pub const ZERO: char = 'O';

/// Every letter that can start or continue a numeral literal.
pub const LETTERS: &str = "MDCLXVIO";

// Indexed by decimal place: units, tens, hundreds, thousands.
const ONE: [u8; 4] = [b'I', b'X', b'C', b'M'];
const FIVE: [Option<u8>; 4] = [Some(b'V'), Some(b'L'), Some(b'D'), None];
const PLACE_VALUE: [i32; 4] = [1, 10, 100, 1000];

pub fn is_letter(c: u8) -> bool {
    LETTERS.as_bytes().contains(&c)
}

/// Decodes the letters of a single decimal place at the start of `rest`.
///
/// Returns the digit (0 through 9) and how many bytes it used. A digit of 0
/// consumes nothing, which lets the caller move straight on to the next place.
/// Thousands have no five letter and no subtractive forms. `place` is 0 for
/// units through 3 for thousands.
pub(crate) fn decode_digit_group(rest: &[u8], place: usize) -> (i32, usize) {
    let one = ONE[place];
    let five = FIVE[place];
    let ten = ONE.get(place + 1).copied();

    match rest {
        [first, second, ..] if *first == one && Some(*second) == ten => return (9, 2),
        [first, second, ..] if *first == one && Some(*second) == five => return (4, 2),
        _ => {}
    }

    let mut digit = 0;
    let mut used = 0;
    if five.is_some() && rest.first().copied() == five {
        digit = 5;
        used = 1;
    }
    let ones = rest[used..]
        .iter()
        .take(3)
        .take_while(|&&c| c == one)
        .count();

    (digit + ones as i32, used + ones)
}

/// Decodes the longest canonical numeral at the start of `input`.
///
/// Returns `None` when `input` does not start with a numeral letter. Whatever
/// follows the returned length is left to the caller; a numeral letter there
/// means the text was not canonical.
pub fn decode_prefix(input: &[u8]) -> Option<(i32, usize)> {
    match input.first() {
        Some(&c) if c == ZERO as u8 => return Some((0, 1)),
        Some(&c) if is_letter(c) => {}
        _ => return None,
    }

    let mut value = 0;
    let mut used = 0;
    for place in (0..4).rev() {
        let (digit, len) = decode_digit_group(&input[used..], place);
        value += digit * PLACE_VALUE[place];
        used += len;
    }

    (used > 0).then_some((value, used))
}

/// Decodes a whole numeral, with an optional leading minus sign for
/// non-zero values.
pub fn decode(text: &str) -> Result<i32, ParseNumeralError> {
    if text.is_empty() {
        return Err(ParseNumeralError::Empty);
    }
    let invalid = || ParseNumeralError::Invalid {
        text: text.to_string(),
    };

    let (negative, digits) = match text.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, text),
    };
    let (value, used) = decode_prefix(digits.as_bytes()).ok_or_else(invalid)?;
    if used != digits.len() || (negative && value == 0) {
        return Err(invalid());
    }

    Ok(if negative { -value } else { value })
}

/// Encodes `value` as upper-case letters, `-` first for negatives.
///
/// Callers keep `value` within [`MIN`, `MAX`].
pub fn encode(value: i32) -> String {
    debug_assert!((MIN..=MAX).contains(&value), "{value} is not a numeral");

    if value == 0 {
        return ZERO.to_string();
    }

    let mut out = String::new();
    if value < 0 {
        out.push('-');
    }
    let mut rest = value.unsigned_abs() as i32;
    for place in (0..4).rev() {
        let digit = rest / PLACE_VALUE[place];
        rest %= PLACE_VALUE[place];

        let one = ONE[place] as char;
        match digit {
            9 => {
                out.push(one);
                out.push(ONE[place + 1] as char);
            }
            4 => {
                out.push(one);
                out.extend(FIVE[place].map(char::from));
            }
            _ => {
                let mut ones = digit;
                if digit >= 5 {
                    out.extend(FIVE[place].map(char::from));
                    ones -= 5;
                }
                out.extend(std::iter::repeat_n(one, ones as usize));
            }
        }
    }
    out
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseNumeralError {
    #[error("empty numeral")]
    Empty,
    #[error("`{text}` is not a canonical numeral")]
    Invalid { text: String },
    #[error("{0} is outside -3999..=3999")]
    OutOfRange(i32),
}

/// An integer that is known to fit in a numeral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Numeral(i32);

impl Numeral {
    pub const MIN: Numeral = Numeral(MIN);
    pub const MAX: Numeral = Numeral(MAX);
    pub const ZERO: Numeral = Numeral(0);

    pub fn new(value: i32) -> Option<Self> {
        (MIN..=MAX).contains(&value).then_some(Numeral(value))
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for Numeral {
    type Error = ParseNumeralError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Numeral::new(value).ok_or(ParseNumeralError::OutOfRange(value))
    }
}

impl From<Numeral> for i32 {
    fn from(numeral: Numeral) -> Self {
        numeral.0
    }
}

impl FromStr for Numeral {
    type Err = ParseNumeralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s).map(Numeral)
    }
}

impl Display for Numeral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&encode(self.0))
    }
}
