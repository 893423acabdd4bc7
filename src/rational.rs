//! Exact rational number arithmetic over native integers
//!
//! A [`Rational`] is always kept in canonical form: the denominator is
//! positive and coprime with the numerator. Arithmetic runs in `i128` and is
//! narrowed back to `i64`, so results outside the native range surface as
//! [`RationalError::Overflow`] instead of wrapping.

use crate::error::{RationalError, Result};
use num_integer::Integer;
use num_rational::Ratio;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};
use std::num::IntErrorKind;
use std::str::FromStr;
use wasm_bindgen::prelude::*;

/// Canonical fraction `numer/denom` with `denom > 0` and `gcd(|numer|, denom) = 1`.
#[wasm_bindgen]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RationalRepr", into = "RationalRepr")]
pub struct Rational {
    numer: i64,
    denom: i64,
}

/// Wire form used by serde; validated on the way in.
#[derive(Clone, Copy, Serialize, Deserialize)]
struct RationalRepr {
    n: i64,
    d: i64,
}

/// Named access to the two components of a [`Rational`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Numerator,
    Denominator,
}

/// How a [`Rational`] is turned into text for display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderStyle {
    /// Always `n/d`, also for whole numbers (`3/1`).
    #[default]
    Canonical,
    /// `n` when the denominator is 1, `n/d` otherwise.
    BareInteger,
}

/// Right-hand side of an arithmetic operation: a rational or a bare integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    Rational(Rational),
    Integer(i64),
}

impl Operand {
    /// Coerce to a rational; integers become `n/1`.
    pub fn into_rational(self) -> Rational {
        match self {
            Operand::Rational(r) => r,
            Operand::Integer(n) => Rational::from_integer(n),
        }
    }

    /// Accept a dynamically typed number (e.g. from JavaScript) as an integer operand.
    pub fn from_number(value: f64) -> Result<Operand> {
        // 2^63 is exactly representable; everything strictly below it fits in i64
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;
        if value.is_finite() && value.fract() == 0.0 && value >= -LIMIT && value < LIMIT {
            Ok(Operand::Integer(value as i64))
        } else {
            Err(RationalError::InvalidOperand(format!("number {}", value)))
        }
    }
}

impl From<Rational> for Operand {
    fn from(r: Rational) -> Self {
        Operand::Rational(r)
    }
}

impl From<&Rational> for Operand {
    fn from(r: &Rational) -> Self {
        Operand::Rational(*r)
    }
}

impl From<i64> for Operand {
    fn from(n: i64) -> Self {
        Operand::Integer(n)
    }
}

impl From<i32> for Operand {
    fn from(n: i32) -> Self {
        Operand::Integer(n as i64)
    }
}

/// Reduce `numer/denom` to canonical form and narrow it to `i64`.
fn canonical(numer: i128, denom: i128) -> Result<Rational> {
    if denom.is_zero() {
        return Err(RationalError::InvalidDenominator);
    }

    let common = numer.gcd(&denom);
    let (mut numer, mut denom) = (numer / common, denom / common);
    if denom < 0 {
        numer = numer.checked_neg().ok_or(RationalError::Overflow)?;
        denom = denom.checked_neg().ok_or(RationalError::Overflow)?;
    }

    Ok(Rational {
        numer: i64::try_from(numer).map_err(|_| RationalError::Overflow)?,
        denom: i64::try_from(denom).map_err(|_| RationalError::Overflow)?,
    })
}

/// Parse a signed decimal integer, tolerating surrounding whitespace and a leading `+`.
pub(crate) fn parse_integer(text: &str) -> Result<i64> {
    let trimmed = text.trim();
    trimmed.parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => RationalError::Overflow,
        _ => RationalError::NotANumber(trimmed.to_string()),
    })
}

impl Rational {
    /// Create a rational from a numerator/denominator pair, reducing it.
    pub fn new(numer: i64, denom: i64) -> Result<Rational> {
        canonical(numer as i128, denom as i128)
    }

    /// Create `n/1`.
    pub fn from_integer(n: i64) -> Rational {
        Rational { numer: n, denom: 1 }
    }

    /// Parse the `n/d` form; whitespace around either integer is allowed.
    pub fn parse_fraction(text: &str) -> Result<Rational> {
        let trimmed = text.trim();
        let malformed = || RationalError::MalformedFraction(trimmed.to_string());

        let mut parts = trimmed.split('/');
        let (numer, denom) = match (parts.next(), parts.next(), parts.next()) {
            (Some(n), Some(d), None) => (n, d),
            _ => return Err(malformed()),
        };

        let component = |part: &str| match parse_integer(part) {
            Err(RationalError::NotANumber(_)) => Err(malformed()),
            other => other,
        };
        Rational::new(component(numer)?, component(denom)?)
    }

    pub fn zero() -> Rational {
        Rational::from_integer(0)
    }

    pub fn one() -> Rational {
        Rational::from_integer(1)
    }

    pub fn numerator(&self) -> i64 {
        self.numer
    }

    pub fn denominator(&self) -> i64 {
        self.denom
    }

    /// Keyed read access.
    pub fn get(&self, field: Field) -> i64 {
        match field {
            Field::Numerator => self.numer,
            Field::Denominator => self.denom,
        }
    }

    /// Keyed write access; the value is re-canonicalized afterwards.
    ///
    /// On failure the value is left untouched.
    pub fn set(&mut self, field: Field, value: i64) -> Result<()> {
        let updated = match field {
            Field::Numerator => Rational::new(value, self.denom)?,
            Field::Denominator => Rational::new(self.numer, value)?,
        };
        *self = updated;
        Ok(())
    }

    pub fn is_zero(&self) -> bool {
        self.numer.is_zero()
    }

    pub fn is_integer(&self) -> bool {
        self.denom.is_one()
    }

    /// Add a rational or an integer.
    pub fn checked_add(&self, other: impl Into<Operand>) -> Result<Rational> {
        let other = other.into().into_rational();
        let (a, b, c, d) = self.widen(&other);
        let numer = (a * d).checked_add(c * b).ok_or(RationalError::Overflow)?;
        canonical(numer, b * d)
    }

    /// Subtract a rational or an integer.
    pub fn checked_sub(&self, other: impl Into<Operand>) -> Result<Rational> {
        let other = other.into().into_rational();
        let (a, b, c, d) = self.widen(&other);
        let numer = (a * d).checked_sub(c * b).ok_or(RationalError::Overflow)?;
        canonical(numer, b * d)
    }

    /// Multiply by a rational or an integer.
    pub fn checked_mul(&self, other: impl Into<Operand>) -> Result<Rational> {
        let other = other.into().into_rational();
        let (a, b, c, d) = self.widen(&other);
        canonical(a * c, b * d)
    }

    /// Divide by a rational or an integer.
    ///
    /// Fails with [`RationalError::DivisionByZero`] when the divisor is zero.
    pub fn checked_div(&self, other: impl Into<Operand>) -> Result<Rational> {
        let other = other.into().into_rational();
        if other.is_zero() {
            return Err(RationalError::DivisionByZero);
        }
        let (a, b, c, d) = self.widen(&other);
        canonical(a * d, b * c)
    }

    pub fn negate(&self) -> Result<Rational> {
        let numer = self.numer.checked_neg().ok_or(RationalError::Overflow)?;
        Ok(Rational {
            numer,
            denom: self.denom,
        })
    }

    pub fn abs(&self) -> Result<Rational> {
        if self.numer < 0 {
            self.negate()
        } else {
            Ok(*self)
        }
    }

    /// The reciprocal `d/n`.
    pub fn recip(&self) -> Result<Rational> {
        Rational::one().checked_div(*self)
    }

    /// Lossy floating-point approximation, for display only.
    pub fn to_float_approx(&self) -> f64 {
        self.numer as f64 / self.denom as f64
    }

    /// Render as text in the requested style.
    pub fn render(&self, style: RenderStyle) -> String {
        match style {
            RenderStyle::BareInteger if self.is_integer() => self.numer.to_string(),
            _ => format!("{}/{}", self.numer, self.denom),
        }
    }

    fn widen(&self, other: &Rational) -> (i128, i128, i128, i128) {
        (
            self.numer as i128,
            self.denom as i128,
            other.numer as i128,
            other.denom as i128,
        )
    }
}

impl Default for Rational {
    fn default() -> Self {
        Rational::zero()
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rational({}/{})", self.numer, self.denom)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numer, self.denom)
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b, c, d) = self.widen(other);
        (a * d).cmp(&(c * b))
    }
}

impl<T: Into<Operand>> Add<T> for Rational {
    type Output = Result<Rational>;

    fn add(self, rhs: T) -> Result<Rational> {
        self.checked_add(rhs)
    }
}

impl<T: Into<Operand>> Sub<T> for Rational {
    type Output = Result<Rational>;

    fn sub(self, rhs: T) -> Result<Rational> {
        self.checked_sub(rhs)
    }
}

impl<T: Into<Operand>> Mul<T> for Rational {
    type Output = Result<Rational>;

    fn mul(self, rhs: T) -> Result<Rational> {
        self.checked_mul(rhs)
    }
}

impl<T: Into<Operand>> Div<T> for Rational {
    type Output = Result<Rational>;

    fn div(self, rhs: T) -> Result<Rational> {
        self.checked_div(rhs)
    }
}

impl FromStr for Rational {
    type Err = RationalError;

    fn from_str(s: &str) -> Result<Rational> {
        Rational::parse_fraction(s)
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Rational::from_integer(n)
    }
}

impl From<i32> for Rational {
    fn from(n: i32) -> Self {
        Rational::from_integer(n as i64)
    }
}

impl TryFrom<(i64, i64)> for Rational {
    type Error = RationalError;

    fn try_from((n, d): (i64, i64)) -> Result<Rational> {
        Rational::new(n, d)
    }
}

impl From<Rational> for Ratio<i64> {
    fn from(r: Rational) -> Self {
        // already reduced with a positive denominator
        Ratio::new_raw(r.numer, r.denom)
    }
}

impl TryFrom<Ratio<i64>> for Rational {
    type Error = RationalError;

    fn try_from(r: Ratio<i64>) -> Result<Rational> {
        Rational::new(*r.numer(), *r.denom())
    }
}

impl TryFrom<RationalRepr> for Rational {
    type Error = RationalError;

    fn try_from(repr: RationalRepr) -> Result<Rational> {
        Rational::new(repr.n, repr.d)
    }
}

impl From<Rational> for RationalRepr {
    fn from(r: Rational) -> Self {
        RationalRepr {
            n: r.numer,
            d: r.denom,
        }
    }
}
