//! Operand tokens: `n/d` fractions or bare integers.

use crate::error::Result;
use crate::rational::{parse_integer, Rational};

/// Split a line into whitespace-delimited tokens.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Parse one operand token.
///
/// Tokens containing `/` go through [`Rational::parse_fraction`]; anything
/// else must be a signed integer and becomes `n/1`.
pub fn parse_token(token: &str) -> Result<Rational> {
    if token.contains('/') {
        Rational::parse_fraction(token)
    } else {
        parse_integer(token).map(Rational::from_integer)
    }
}

/// True for the four binary operator tokens.
pub fn is_operator(token: &str) -> bool {
    matches!(token, "+" | "-" | "*" | "/")
}
