//! Two-pass precedence evaluator
//!
//! Evaluates whitespace-tokenized infix expressions such as `1/2 + 1/3 * 2`
//! without building a tree. The first pass folds `*` and `/` left to right,
//! replacing each `a op b` triple by its value; the second pass folds the
//! remaining `+` and `-` left to right over the result. There are no
//! parentheses and no unary operators.

use crate::config::Config;
use crate::error::{RationalError, Result};
use crate::rational::Rational;
use crate::token::{parse_token, tokenize};
use std::fmt;
use tracing::debug;

/// Default upper bound on tokens in one expression.
pub const DEFAULT_MAX_TOKENS: usize = 4096;

/// Entry of the intermediate sequence built by the multiplicative pass
#[derive(Clone, Copy)]
enum Item<'a> {
    /// Token copied through untouched (operand or additive operator)
    Token(&'a str),
    /// Result of a folded `*` or `/`
    Value(Rational),
}

impl Item<'_> {
    fn resolve(self) -> Result<Rational> {
        match self {
            Item::Token(token) => parse_token(token),
            Item::Value(value) => Ok(value),
        }
    }
}

impl fmt::Display for Item<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Token(token) => f.write_str(token),
            Item::Value(value) => write!(f, "{}", value),
        }
    }
}

fn malformed(message: String) -> RationalError {
    RationalError::MalformedExpression(message)
}

/// Precedence evaluator for `+ - * /` over rationals
#[derive(Clone, Debug)]
pub struct Evaluator {
    max_tokens: usize,
}

impl Evaluator {
    pub fn new() -> Evaluator {
        Evaluator {
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(max_tokens: usize) -> Evaluator {
        Evaluator { max_tokens }
    }

    pub fn from_config(config: &Config) -> Evaluator {
        Evaluator::with_max_tokens(config.max_tokens)
    }

    /// Tokenize and evaluate one line.
    ///
    /// Returns `Ok(None)` for a line without tokens.
    pub fn evaluate_line(&self, line: &str) -> Result<Option<Rational>> {
        self.evaluate_tokens(&tokenize(line))
    }

    /// Evaluate an already tokenized expression.
    ///
    /// Returns `Ok(None)` when `tokens` is empty. The first failure aborts
    /// the evaluation.
    pub fn evaluate_tokens(&self, tokens: &[&str]) -> Result<Option<Rational>> {
        if tokens.is_empty() {
            return Ok(None);
        }
        if tokens.len() > self.max_tokens {
            return Err(malformed(format!(
                "{} tokens exceed the limit of {}",
                tokens.len(),
                self.max_tokens
            )));
        }

        let intermediate = Self::multiplicative_pass(tokens)?;
        debug!(
            tokens = tokens.len(),
            remaining = intermediate.len(),
            "multiplicative pass done"
        );

        let total = Self::additive_pass(intermediate)?;
        debug!(result = %total, "additive pass done");
        Ok(Some(total))
    }

    fn multiplicative_pass<'a>(tokens: &[&'a str]) -> Result<Vec<Item<'a>>> {
        let mut intermediate: Vec<Item<'a>> = Vec::with_capacity(tokens.len());
        let mut i = 0;

        while i < tokens.len() {
            let token = tokens[i];
            if token == "*" || token == "/" {
                let prev = intermediate
                    .pop()
                    .ok_or_else(|| malformed(format!("'{}' has no left operand", token)))?;
                let next = tokens
                    .get(i + 1)
                    .ok_or_else(|| malformed(format!("'{}' has no right operand", token)))?;

                let rhs = parse_token(next)?;
                let lhs = prev.resolve()?;
                let value = if token == "*" {
                    lhs.checked_mul(rhs)?
                } else {
                    lhs.checked_div(rhs)?
                };
                intermediate.push(Item::Value(value));
                i += 2;
            } else {
                intermediate.push(Item::Token(token));
                i += 1;
            }
        }

        Ok(intermediate)
    }

    fn additive_pass(intermediate: Vec<Item<'_>>) -> Result<Rational> {
        let mut items = intermediate.into_iter();
        let mut total = match items.next() {
            Some(first) => first.resolve()?,
            None => return Err(malformed("no operands".to_string())),
        };

        while let Some(op) = items.next() {
            let add = match op {
                Item::Token("+") => true,
                Item::Token("-") => false,
                other => {
                    return Err(malformed(format!(
                        "expected '+' or '-', found '{}'",
                        other
                    )))
                }
            };
            let operand = items
                .next()
                .ok_or_else(|| malformed(format!("'{}' has no right operand", op)))?
                .resolve()?;

            total = if add {
                total.checked_add(operand)?
            } else {
                total.checked_sub(operand)?
            };
        }

        Ok(total)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new()
    }
}

/// Evaluate one expression line with default settings.
pub fn evaluate_expression(line: &str) -> Result<Option<Rational>> {
    Evaluator::new().evaluate_line(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(line: &str) -> Result<Option<Rational>> {
        evaluate_expression(line)
    }

    fn value(line: &str) -> Rational {
        eval(line).unwrap().unwrap()
    }

    fn r(n: i64, d: i64) -> Rational {
        Rational::new(n, d).unwrap()
    }

    #[test]
    fn test_precedence() {
        let result = value("1/2 + 1/3 * 2");
        assert_eq!(result.numerator(), 7);
        assert_eq!(result.denominator(), 6);

        assert_eq!(value("1 - 1/2 / 2 + 3"), r(15, 4));
        assert_eq!(value("2 * 3 + 4 * 5"), r(26, 1));
    }

    #[test]
    fn test_multiplicative_chain_is_left_associative() {
        assert_eq!(value("1/2 * 2 * 3"), r(3, 1));
        assert_eq!(value("8/1 / 2 / 2"), r(2, 1));
        assert_eq!(value("1 / 2 * 4"), r(2, 1));
    }

    #[test]
    fn test_additive_chain_is_left_associative() {
        assert_eq!(value("10 - 3 - 2"), r(5, 1));
        assert_eq!(value("1/2 - 1/3 + 1/6"), r(1, 3));
    }

    #[test]
    fn test_single_operand() {
        assert_eq!(value("  -4/8 "), r(-1, 2));
        assert_eq!(value("5"), r(5, 1));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(eval(""), Ok(None));
        assert_eq!(eval(" \t "), Ok(None));
        assert_eq!(Evaluator::new().evaluate_tokens(&[]), Ok(None));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval("1/2 / 0"), Err(RationalError::DivisionByZero));
        assert_eq!(eval("3 + 1 / 0/5"), Err(RationalError::DivisionByZero));
    }

    #[test]
    fn test_operand_failures_surface() {
        assert_eq!(eval("1 + x"), Err(RationalError::NotANumber("x".into())));
        assert_eq!(eval("1/0 + 1"), Err(RationalError::InvalidDenominator));
        assert!(matches!(
            eval("1/2/3 * 2"),
            Err(RationalError::MalformedFraction(_))
        ));
    }

    #[test]
    fn test_malformed_expressions() {
        for line in ["* 2", "2 *", "1 +", "1 2", "1 * 2 3", "2 / 1 4"] {
            assert!(
                matches!(eval(line), Err(RationalError::MalformedExpression(_))),
                "{line:?} should be malformed"
            );
        }
        // an operator where an operand belongs is parsed as an operand
        assert_eq!(eval("1 + + 2"), Err(RationalError::NotANumber("+".into())));
        assert_eq!(eval("1 * + 2"), Err(RationalError::NotANumber("+".into())));
    }

    #[test]
    fn test_token_limit() {
        let evaluator = Evaluator::with_max_tokens(3);
        assert_eq!(evaluator.evaluate_line("1 + 2"), Ok(Some(r(3, 1))));
        assert!(matches!(
            evaluator.evaluate_line("1 + 2 + 3"),
            Err(RationalError::MalformedExpression(_))
        ));
    }

    #[test]
    fn test_overflow() {
        let line = format!("{} * 2", i64::MAX);
        assert_eq!(eval(&line), Err(RationalError::Overflow));
    }
}
