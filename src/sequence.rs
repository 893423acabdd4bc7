//! Ordered collection of rationals with summation
//!
//! Elements keep insertion order and may repeat. Integers are coerced to
//! `n/1` when they are stored.

use crate::error::Result;
use crate::rational::{Operand, Rational};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Index};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RationalSequence {
    elements: Vec<Rational>,
}

/// What can be appended to a [`RationalSequence`]: another sequence or a single value.
#[derive(Clone, Debug)]
pub enum Extension<'a> {
    Sequence(&'a RationalSequence),
    Value(Operand),
}

impl<'a> From<&'a RationalSequence> for Extension<'a> {
    fn from(seq: &'a RationalSequence) -> Self {
        Extension::Sequence(seq)
    }
}

impl From<Rational> for Extension<'_> {
    fn from(r: Rational) -> Self {
        Extension::Value(Operand::Rational(r))
    }
}

impl From<&Rational> for Extension<'_> {
    fn from(r: &Rational) -> Self {
        Extension::Value(Operand::Rational(*r))
    }
}

impl From<Operand> for Extension<'_> {
    fn from(op: Operand) -> Self {
        Extension::Value(op)
    }
}

impl From<i64> for Extension<'_> {
    fn from(n: i64) -> Self {
        Extension::Value(Operand::Integer(n))
    }
}

impl From<i32> for Extension<'_> {
    fn from(n: i32) -> Self {
        Extension::Value(Operand::Integer(n as i64))
    }
}

impl RationalSequence {
    pub fn new() -> RationalSequence {
        RationalSequence::default()
    }

    /// Build from initial values, coercing integers.
    pub fn from_operands<I, T>(initial: I) -> RationalSequence
    where
        I: IntoIterator<Item = T>,
        T: Into<Operand>,
    {
        RationalSequence {
            elements: initial
                .into_iter()
                .map(|item| item.into().into_rational())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Rational> {
        self.elements.get(index)
    }

    /// Replace the element at `index`; returns the previous value, or `None`
    /// (leaving the sequence unchanged) when `index` is out of bounds.
    pub fn set(&mut self, index: usize, value: impl Into<Operand>) -> Option<Rational> {
        let slot = self.elements.get_mut(index)?;
        Some(std::mem::replace(slot, value.into().into_rational()))
    }

    pub fn append(&mut self, value: impl Into<Operand>) {
        self.elements.push(value.into().into_rational());
    }

    /// New sequence holding `self` followed by `other`; neither operand changes.
    pub fn concatenate<'a>(&self, other: impl Into<Extension<'a>>) -> RationalSequence {
        let mut combined = self.clone();
        combined.extend_in_place(other);
        combined
    }

    /// Append `other` to `self`.
    pub fn extend_in_place<'a>(&mut self, other: impl Into<Extension<'a>>) {
        match other.into() {
            Extension::Sequence(seq) => self.elements.extend_from_slice(&seq.elements),
            Extension::Value(op) => self.append(op),
        }
    }

    /// Left fold with `+` starting from `0/1`.
    pub fn sum(&self) -> Result<Rational> {
        self.elements
            .iter()
            .try_fold(Rational::zero(), |total, value| total.checked_add(value))
    }

    /// Elements by denominator descending, ties by numerator descending.
    ///
    /// The stored order is not affected.
    pub fn ordered_view(&self) -> Vec<Rational> {
        let mut sorted = self.elements.clone();
        sorted.sort_by(|a, b| {
            b.denominator()
                .cmp(&a.denominator())
                .then_with(|| b.numerator().cmp(&a.numerator()))
        });
        sorted
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rational> {
        self.elements.iter()
    }

    pub fn as_slice(&self) -> &[Rational] {
        &self.elements
    }
}

impl Index<usize> for RationalSequence {
    type Output = Rational;

    fn index(&self, index: usize) -> &Rational {
        &self.elements[index]
    }
}

impl<'a> IntoIterator for &'a RationalSequence {
    type Item = &'a Rational;
    type IntoIter = std::slice::Iter<'a, Rational>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl IntoIterator for RationalSequence {
    type Item = Rational;
    type IntoIter = std::vec::IntoIter<Rational>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl FromIterator<Rational> for RationalSequence {
    fn from_iter<I: IntoIterator<Item = Rational>>(iter: I) -> Self {
        RationalSequence {
            elements: iter.into_iter().collect(),
        }
    }
}

impl Extend<Rational> for RationalSequence {
    fn extend<I: IntoIterator<Item = Rational>>(&mut self, iter: I) {
        self.elements.extend(iter);
    }
}

impl<'a, T: Into<Extension<'a>>> Add<T> for &RationalSequence {
    type Output = RationalSequence;

    fn add(self, rhs: T) -> RationalSequence {
        self.concatenate(rhs)
    }
}

impl<'a, T: Into<Extension<'a>>> AddAssign<T> for RationalSequence {
    fn add_assign(&mut self, rhs: T) {
        self.extend_in_place(rhs);
    }
}
