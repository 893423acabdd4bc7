//! JavaScript bindings
//!
//! Numbers and strings coming from JavaScript are untyped, so operands and
//! elements are checked here and rejected with `InvalidOperand` /
//! `InvalidElement` before they reach the core.

use crate::batch::{accumulate_lines, Batch, FileOutcome, MemorySource};
use crate::error::RationalError;
use crate::evaluator::evaluate_expression;
use crate::rational::{Field, Operand, Rational};
use crate::sequence::RationalSequence;
use crate::token::parse_token;
use serde::Serialize;
use wasm_bindgen::prelude::*;

impl From<RationalError> for JsValue {
    fn from(err: RationalError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Interpret a JS number (integer) or string token as an operand.
fn operand_from_js(value: &JsValue) -> Result<Operand, RationalError> {
    if let Some(number) = value.as_f64() {
        return Operand::from_number(number);
    }
    if let Some(text) = value.as_string() {
        return parse_token(&text).map(Operand::Rational);
    }
    Err(RationalError::InvalidOperand(format!("{:?}", value)))
}

/// A JS number that must hold an integer, as taken by the constructor and `setField`.
fn integer_from_js(value: f64) -> Result<i64, RationalError> {
    match Operand::from_number(value) {
        Ok(Operand::Integer(n)) => Ok(n),
        _ => Err(RationalError::NotANumber(value.to_string())),
    }
}

fn rational_from_numbers(numerator: f64, denominator: f64) -> Result<Rational, RationalError> {
    Rational::new(integer_from_js(numerator)?, integer_from_js(denominator)?)
}

#[wasm_bindgen]
impl Rational {
    #[wasm_bindgen(constructor)]
    pub fn js_new(numerator: f64, denominator: f64) -> Result<Rational, JsValue> {
        Ok(rational_from_numbers(numerator, denominator)?)
    }

    #[wasm_bindgen(js_name = fromString)]
    pub fn js_from_string(text: &str) -> Result<Rational, JsValue> {
        Ok(Rational::parse_fraction(text)?)
    }

    #[wasm_bindgen(js_name = add)]
    pub fn js_add(&self, other: JsValue) -> Result<Rational, JsValue> {
        Ok(self.checked_add(operand_from_js(&other)?)?)
    }

    #[wasm_bindgen(js_name = sub)]
    pub fn js_sub(&self, other: JsValue) -> Result<Rational, JsValue> {
        Ok(self.checked_sub(operand_from_js(&other)?)?)
    }

    #[wasm_bindgen(js_name = mul)]
    pub fn js_mul(&self, other: JsValue) -> Result<Rational, JsValue> {
        Ok(self.checked_mul(operand_from_js(&other)?)?)
    }

    #[wasm_bindgen(js_name = div)]
    pub fn js_div(&self, other: JsValue) -> Result<Rational, JsValue> {
        Ok(self.checked_div(operand_from_js(&other)?)?)
    }

    #[wasm_bindgen(js_name = addRational)]
    pub fn js_add_rational(&self, other: &Rational) -> Result<Rational, JsValue> {
        Ok(self.checked_add(other)?)
    }

    #[wasm_bindgen(js_name = subRational)]
    pub fn js_sub_rational(&self, other: &Rational) -> Result<Rational, JsValue> {
        Ok(self.checked_sub(other)?)
    }

    #[wasm_bindgen(js_name = mulRational)]
    pub fn js_mul_rational(&self, other: &Rational) -> Result<Rational, JsValue> {
        Ok(self.checked_mul(other)?)
    }

    #[wasm_bindgen(js_name = divRational)]
    pub fn js_div_rational(&self, other: &Rational) -> Result<Rational, JsValue> {
        Ok(self.checked_div(other)?)
    }

    #[wasm_bindgen(getter, js_name = numerator)]
    pub fn js_numerator(&self) -> i64 {
        self.numerator()
    }

    #[wasm_bindgen(getter, js_name = denominator)]
    pub fn js_denominator(&self) -> i64 {
        self.denominator()
    }

    #[wasm_bindgen(js_name = getField)]
    pub fn js_get_field(&self, field: JsField) -> i64 {
        self.get(field.into())
    }

    #[wasm_bindgen(js_name = setField)]
    pub fn js_set_field(&mut self, field: JsField, value: f64) -> Result<(), JsValue> {
        Ok(self.set(field.into(), integer_from_js(value)?)?)
    }

    #[wasm_bindgen(js_name = toFloatApprox)]
    pub fn js_to_float_approx(&self) -> f64 {
        self.to_float_approx()
    }

    #[wasm_bindgen(js_name = toString)]
    pub fn js_to_string(&self) -> String {
        self.to_string()
    }
}

/// Field selector exported to JavaScript.
#[wasm_bindgen(js_name = Field)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JsField {
    Numerator = 0,
    Denominator = 1,
}

impl From<JsField> for Field {
    fn from(field: JsField) -> Self {
        match field {
            JsField::Numerator => Field::Numerator,
            JsField::Denominator => Field::Denominator,
        }
    }
}

/// Growable list of rationals for JavaScript callers.
#[wasm_bindgen(js_name = RationalSequence)]
#[derive(Default)]
pub struct JsRationalSequence {
    inner: RationalSequence,
}

#[wasm_bindgen(js_class = RationalSequence)]
impl JsRationalSequence {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsRationalSequence {
        JsRationalSequence::default()
    }

    /// Append an integer or a `n/d` string.
    pub fn append(&mut self, value: JsValue) -> Result<(), JsValue> {
        let operand = operand_from_js(&value).map_err(|err| match err {
            RationalError::InvalidOperand(what) => RationalError::InvalidElement(what),
            other => other,
        })?;
        self.inner.append(operand);
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.inner.len()
    }

    pub fn sum(&self) -> Result<Rational, JsValue> {
        Ok(self.inner.sum()?)
    }

    /// Values by denominator, then numerator, both descending.
    #[wasm_bindgen(js_name = orderedStrings)]
    pub fn ordered_strings(&self) -> Vec<String> {
        self.inner
            .ordered_view()
            .iter()
            .map(Rational::to_string)
            .collect()
    }
}

/// Evaluate one expression line; `undefined` for a blank line.
#[wasm_bindgen(js_name = evaluateExpression)]
pub fn evaluate_expression_js(line: &str) -> Result<Option<String>, JsValue> {
    Ok(evaluate_expression(line)?.map(|value| value.to_string()))
}

#[derive(Debug, PartialEq, Serialize)]
struct SumSummary {
    total: String,
    approx: f64,
    count: usize,
    skipped: usize,
}

fn summarize(text: &str) -> Result<SumSummary, RationalError> {
    let lines: Vec<&str> = text.lines().collect();
    let (values, skipped) = accumulate_lines(&lines);
    let total = values.sum()?;
    Ok(SumSummary {
        total: total.to_string(),
        approx: total.to_float_approx(),
        count: values.len(),
        skipped: skipped.len(),
    })
}

/// Sum every valid token of `text`; returns `{ total, approx, count, skipped }`.
#[wasm_bindgen(js_name = sumValues)]
pub fn sum_values(text: &str) -> Result<JsValue, JsValue> {
    let summary = summarize(text)?;
    Ok(serde_wasm_bindgen::to_value(&summary)?)
}

/// Sorted listing of every valid token of `text`, as written to result files.
#[wasm_bindgen(js_name = sortedListing)]
pub fn sorted_listing(text: &str) -> Option<String> {
    let batch = Batch::default();
    match batch.collect_source(&MemorySource::new("input", text)).outcome {
        FileOutcome::Collected(report) => Some(batch.render_sorted_listing(&report)),
        _ => None,
    }
}
