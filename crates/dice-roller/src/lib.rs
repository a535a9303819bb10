//! Dice notation parsing and injectable dice services.
//!
//! The combat engine draws every random number through the [`DiceService`]
//! trait so that encounters can be replayed bit-for-bit: production code uses
//! [`RngDice`], reproducible simulations use [`SeededDice`], and tests script
//! exact outcomes with [`FixedDice`].

mod service;

use thiserror::Error;

pub use service::{DiceService, DiceServiceExt, FixedDice, RngDice, SeededDice};

/// Errors produced while parsing notation or drawing from a dice service.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DiceError {
    /// The notation string did not match `NdS[+|-M]`.
    #[error("invalid dice notation '{0}'")]
    InvalidNotation(String),

    /// A [`FixedDice`] sequence ran out of scripted values.
    #[error("fixed dice sequence exhausted after {drawn} draws")]
    SequenceExhausted { drawn: usize },

    /// `choice` was asked to pick from an empty sequence.
    #[error("cannot choose from an empty sequence")]
    EmptyChoice,
}

/// Parsed form of a dice notation string such as `2d6+1`.
///
/// The grammar is deliberately small: an optional count (default 1), a
/// required `d`, a positive number of sides, and an optional signed modifier.
/// There is no keep/drop/explode syntax.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RollSpec {
    pub count: u32,
    pub sides: u32,
    pub modifier: i32,
}

impl RollSpec {
    /// Smallest total this spec can produce.
    pub fn minimum(&self) -> i32 {
        self.count as i32 + self.modifier
    }

    /// Largest total this spec can produce.
    pub fn maximum(&self) -> i32 {
        (self.count * self.sides) as i32 + self.modifier
    }
}

/// Parses `NdS[+|-M]` notation into a [`RollSpec`].
pub fn parse_notation(notation: &str) -> Result<RollSpec, DiceError> {
    let invalid = || DiceError::InvalidNotation(notation.to_string());
    let text = notation.trim().to_ascii_lowercase();

    let d_index = text.find('d').ok_or_else(invalid)?;
    let (count_text, rest) = text.split_at(d_index);
    let rest = &rest[1..];

    let count: u32 = if count_text.is_empty() {
        1
    } else {
        count_text.parse().map_err(|_| invalid())?
    };

    let (sides_text, modifier) = match rest.find(['+', '-']) {
        Some(sign_index) => {
            let (sides_text, modifier_text) = rest.split_at(sign_index);
            let modifier: i32 = modifier_text.parse().map_err(|_| invalid())?;
            (sides_text, modifier)
        }
        None => (rest, 0),
    };
    let sides: u32 = sides_text.parse().map_err(|_| invalid())?;

    if count == 0 || sides == 0 {
        return Err(invalid());
    }

    Ok(RollSpec {
        count,
        sides,
        modifier,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_notation() {
        assert_eq!(
            parse_notation("3d6").unwrap(),
            RollSpec {
                count: 3,
                sides: 6,
                modifier: 0
            }
        );
    }

    #[test]
    fn count_defaults_to_one() {
        assert_eq!(
            parse_notation("d20").unwrap(),
            RollSpec {
                count: 1,
                sides: 20,
                modifier: 0
            }
        );
    }

    #[test]
    fn parses_signed_modifiers() {
        assert_eq!(parse_notation("1d6+1").unwrap().modifier, 1);
        assert_eq!(parse_notation("2d8-4").unwrap().modifier, -4);
    }

    #[test]
    fn tolerates_whitespace_and_case() {
        assert_eq!(
            parse_notation(" 1D8+2 ").unwrap(),
            RollSpec {
                count: 1,
                sides: 8,
                modifier: 2
            }
        );
    }

    #[test]
    fn rejects_malformed_notation() {
        for bad in ["", "d", "1d", "6", "0d6", "1d0", "1d6++1", "xd6", "1dyy"] {
            assert!(parse_notation(bad).is_err(), "expected {bad:?} to fail");
        }
    }

    #[test]
    fn min_max_bounds() {
        let spec = parse_notation("2d6+1").unwrap();
        assert_eq!(spec.minimum(), 3);
        assert_eq!(spec.maximum(), 13);
    }
}
