//! Batch processing over injected line sources
//!
//! The orchestrator never opens files itself: every input is a
//! [`LineSource`], so the same code runs against real files, in-memory text
//! or JavaScript strings. Failures are contained per line (expressions) or
//! per token (sums); one bad item never stops the rest of a file, and one
//! unreadable file never stops the rest of a batch.

use crate::config::Config;
use crate::error::{RationalError, SourceError};
use crate::evaluator::Evaluator;
use crate::rational::Rational;
use crate::sequence::RationalSequence;
use crate::token::{parse_token, tokenize};
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Anything that can hand the batch a named list of text lines.
pub trait LineSource {
    fn name(&self) -> &str;
    fn read_lines(&self) -> Result<Vec<String>, SourceError>;
}

impl<T: LineSource + ?Sized> LineSource for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn read_lines(&self) -> Result<Vec<String>, SourceError> {
        (**self).read_lines()
    }
}

/// A source backed by a string already in memory.
#[derive(Clone, Debug)]
pub struct MemorySource {
    name: String,
    text: String,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> MemorySource {
        MemorySource {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl LineSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_lines(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.text.lines().map(str::to_string).collect())
    }
}

/// What to do with every source of a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Each line is an expression
    Evaluate,
    /// Every valid token is added to a running total
    Sum,
    /// Every valid token is collected and listed in display order
    Collect,
}

fn serialize_error<S: Serializer>(error: &RationalError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Result of one expression line (1-based `line`).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineOutcome {
    pub line: usize,
    #[serde(flatten)]
    pub result: LineResult,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LineResult {
    Value {
        value: Rational,
        approx: f64,
    },
    Empty,
    Failed {
        #[serde(serialize_with = "serialize_error")]
        error: RationalError,
    },
}

/// A token that was dropped while accumulating values.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SkippedToken {
    pub line: usize,
    pub token: String,
    #[serde(serialize_with = "serialize_error")]
    pub error: RationalError,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SumReport {
    pub total: Rational,
    pub approx: f64,
    pub count: usize,
    pub skipped: Vec<SkippedToken>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CollectedReport {
    /// Values by denominator descending, then numerator descending
    pub values: Vec<Rational>,
    pub count: usize,
    pub skipped: Vec<SkippedToken>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Expressions { lines: Vec<LineOutcome> },
    Sum(SumReport),
    Collected(CollectedReport),
    NoValues,
    Failed {
        #[serde(serialize_with = "serialize_error")]
        error: RationalError,
    },
    Unreadable { reason: String },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FileReport {
    pub name: String,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Parse every token of every line, keeping the valid ones.
pub fn accumulate_lines<S: AsRef<str>>(lines: &[S]) -> (RationalSequence, Vec<SkippedToken>) {
    let mut values = RationalSequence::new();
    let mut skipped = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        for token in tokenize(line.as_ref()) {
            match parse_token(token) {
                Ok(value) => values.append(value),
                Err(error) => {
                    warn!(line = idx + 1, token, %error, "skipping token");
                    skipped.push(SkippedToken {
                        line: idx + 1,
                        token: token.to_string(),
                        error,
                    });
                }
            }
        }
    }

    (values, skipped)
}

/// Runs sources through the core with one configuration.
#[derive(Clone, Debug, Default)]
pub struct Batch {
    config: Config,
    evaluator: Evaluator,
}

impl Batch {
    pub fn new(config: Config) -> Batch {
        let evaluator = Evaluator::from_config(&config);
        Batch { config, evaluator }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn run<S: LineSource>(&self, sources: &[S], mode: Mode) -> Vec<FileReport> {
        sources
            .iter()
            .map(|source| match mode {
                Mode::Evaluate => self.evaluate_source(source),
                Mode::Sum => self.sum_source(source),
                Mode::Collect => self.collect_source(source),
            })
            .collect()
    }

    /// Evaluate each line of `source` as an expression.
    pub fn evaluate_source(&self, source: &dyn LineSource) -> FileReport {
        self.with_lines(source, |lines| {
            let outcomes = lines
                .iter()
                .enumerate()
                .map(|(idx, line)| LineOutcome {
                    line: idx + 1,
                    result: self.evaluate_line(idx + 1, line),
                })
                .collect();
            FileOutcome::Expressions { lines: outcomes }
        })
    }

    fn evaluate_line(&self, line: usize, text: &str) -> LineResult {
        match self.evaluator.evaluate_line(text) {
            Ok(Some(value)) => LineResult::Value {
                value,
                approx: value.to_float_approx(),
            },
            Ok(None) => LineResult::Empty,
            Err(error) => {
                warn!(line, %error, "expression failed");
                LineResult::Failed { error }
            }
        }
    }

    /// Add up every valid token of `source`.
    pub fn sum_source(&self, source: &dyn LineSource) -> FileReport {
        self.with_lines(source, |lines| {
            let (values, skipped) = accumulate_lines(lines);
            match values.sum() {
                Ok(total) => FileOutcome::Sum(SumReport {
                    total,
                    approx: total.to_float_approx(),
                    count: values.len(),
                    skipped,
                }),
                Err(error) => FileOutcome::Failed { error },
            }
        })
    }

    /// Collect every valid token of `source` in display order.
    pub fn collect_source(&self, source: &dyn LineSource) -> FileReport {
        self.with_lines(source, |lines| {
            let (values, skipped) = accumulate_lines(lines);
            if values.is_empty() {
                return FileOutcome::NoValues;
            }
            FileOutcome::Collected(CollectedReport {
                values: values.ordered_view(),
                count: values.len(),
                skipped,
            })
        })
    }

    fn with_lines<F>(&self, source: &dyn LineSource, process: F) -> FileReport
    where
        F: FnOnce(&[String]) -> FileOutcome,
    {
        let name = source.name().to_string();
        let outcome = match source.read_lines() {
            Ok(lines) => process(&lines),
            Err(error) => {
                warn!(source = %name, %error, "cannot read source");
                FileOutcome::Unreadable {
                    reason: error.to_string(),
                }
            }
        };
        info!(source = %name, outcome = outcome.kind(), "source processed");
        FileReport { name, outcome }
    }

    /// Human-readable summary lines for a report.
    pub fn describe(&self, report: &FileReport) -> Vec<String> {
        let style = self.config.render;
        let name = &report.name;
        match &report.outcome {
            FileOutcome::Expressions { lines } => lines
                .iter()
                .map(|outcome| match &outcome.result {
                    LineResult::Value { value, approx } => {
                        format!("line {}: {} = {:?}", outcome.line, value.render(style), approx)
                    }
                    LineResult::Empty => format!("line {}: (empty)", outcome.line),
                    LineResult::Failed { error } => {
                        format!("line {}: error - {}", outcome.line, error)
                    }
                })
                .collect(),
            FileOutcome::Sum(sum) => vec![format!(
                "{}: sum = {} = {:?}",
                name,
                sum.total.render(style),
                sum.approx
            )],
            FileOutcome::Collected(collected) => {
                vec![format!("{}: {} valid fractions", name, collected.count)]
            }
            FileOutcome::NoValues => vec![format!("{}: no valid fractions", name)],
            FileOutcome::Failed { error } => vec![format!("{}: error - {}", name, error)],
            FileOutcome::Unreadable { reason } => vec![format!("{}: {}", name, reason)],
        }
    }

    /// Text of the companion result file for a collected report.
    pub fn render_sorted_listing(&self, report: &CollectedReport) -> String {
        let mut out = String::new();
        out.push_str("Fractions by descending denominator:\n");
        out.push_str("------------------------------------\n");
        for value in &report.values {
            out.push_str(&value.render(self.config.render));
            out.push('\n');
        }
        out.push_str(&format!("\nTotal valid fractions: {}", report.count));
        out
    }

    pub fn result_path(&self, input: &Path) -> PathBuf {
        result_path(input, &self.config.result_suffix)
    }
}

impl FileOutcome {
    fn kind(&self) -> &'static str {
        match self {
            FileOutcome::Expressions { .. } => "expressions",
            FileOutcome::Sum(_) => "sum",
            FileOutcome::Collected(_) => "collected",
            FileOutcome::NoValues => "no_values",
            FileOutcome::Failed { .. } => "failed",
            FileOutcome::Unreadable { .. } => "unreadable",
        }
    }
}

/// `input01.txt` becomes `input01<suffix>.txt`; other names get `<suffix>.txt` appended.
pub fn result_path(input: &Path, suffix: &str) -> PathBuf {
    let is_txt = input.extension().map_or(false, |ext| ext == "txt");
    let base = if is_txt {
        input.file_stem()
    } else {
        input.file_name()
    };
    let base = base.map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    input.with_file_name(format!("{}{}.txt", base, suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rational::RenderStyle;

    fn r(n: i64, d: i64) -> Rational {
        Rational::new(n, d).unwrap()
    }

    struct BrokenSource;

    impl LineSource for BrokenSource {
        fn name(&self) -> &str {
            "missing.txt"
        }

        fn read_lines(&self) -> Result<Vec<String>, SourceError> {
            Err(SourceError::NotFound(PathBuf::from("missing.txt")))
        }
    }

    #[test]
    fn test_evaluate_source_keeps_going() {
        let batch = Batch::default();
        let source = MemorySource::new("input01.txt", "1/2 + 1/3 * 2\n\n1 / 0\n8/1 / 2 / 2\n");
        let report = batch.evaluate_source(&source);

        let lines = match report.outcome {
            FileOutcome::Expressions { lines } => lines,
            other => panic!("unexpected outcome {:?}", other),
        };
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0].result,
            LineResult::Value {
                value: r(7, 6),
                approx: 7.0 / 6.0
            }
        );
        assert_eq!(lines[1].result, LineResult::Empty);
        assert_eq!(
            lines[2].result,
            LineResult::Failed {
                error: RationalError::DivisionByZero
            }
        );
        assert_eq!(lines[3].line, 4);
        assert!(matches!(lines[3].result, LineResult::Value { value, .. } if value == r(2, 1)));
    }

    #[test]
    fn test_sum_skips_bad_tokens() {
        let batch = Batch::default();
        let source = MemorySource::new("input02.txt", "1/2 abc 1/3\n1/0 1/6 2/x\n  1\n");
        let report = batch.sum_source(&source);

        match report.outcome {
            FileOutcome::Sum(sum) => {
                assert_eq!(sum.total, r(2, 1));
                assert_eq!(sum.approx, 2.0);
                assert_eq!(sum.count, 4);
                let tokens: Vec<_> = sum.skipped.iter().map(|s| s.token.as_str()).collect();
                assert_eq!(tokens, vec!["abc", "1/0", "2/x"]);
                assert_eq!(sum.skipped[1].line, 2);
                assert_eq!(sum.skipped[1].error, RationalError::InvalidDenominator);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_sum_of_nothing_is_zero() {
        let report = Batch::default().sum_source(&MemorySource::new("empty.txt", ""));
        assert!(matches!(
            report.outcome,
            FileOutcome::Sum(SumReport { total, count: 0, .. }) if total == Rational::zero()
        ));
    }

    #[test]
    fn test_collect_orders_values() {
        let batch = Batch::default();
        let report = batch.collect_source(&MemorySource::new("input03.txt", "1/2 5 -1/3\n2/3 3/2 oops"));

        match report.outcome {
            FileOutcome::Collected(collected) => {
                assert_eq!(
                    collected.values,
                    vec![r(2, 3), r(-1, 3), r(3, 2), r(1, 2), r(5, 1)]
                );
                assert_eq!(collected.count, 5);
                assert_eq!(collected.skipped.len(), 1);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_collect_without_values() {
        let report = Batch::default().collect_source(&MemorySource::new("junk.txt", "a b c"));
        assert_eq!(report.outcome, FileOutcome::NoValues);
    }

    #[test]
    fn test_run_continues_after_unreadable_source() {
        let batch = Batch::default();
        let reports = batch.run(
            &[
                Box::new(BrokenSource) as Box<dyn LineSource>,
                Box::new(MemorySource::new("ok.txt", "1 2 3")),
            ],
            Mode::Sum,
        );

        assert_eq!(reports.len(), 2);
        assert_eq!(
            reports[0].outcome,
            FileOutcome::Unreadable {
                reason: "file missing.txt not found".to_string()
            }
        );
        assert!(matches!(&reports[1].outcome, FileOutcome::Sum(sum) if sum.total == r(6, 1)));
    }

    #[test]
    fn test_sum_overflow_fails_the_file() {
        let text = format!("{} 1", i64::MAX);
        let report = Batch::default().sum_source(&MemorySource::new("big.txt", text));
        assert_eq!(
            report.outcome,
            FileOutcome::Failed {
                error: RationalError::Overflow
            }
        );
    }

    #[test]
    fn test_describe() {
        let batch = Batch::new(Config {
            render: RenderStyle::BareInteger,
            ..Config::default()
        });
        let report = batch.sum_source(&MemorySource::new("input04.txt", "1/2 1/2 1"));
        assert_eq!(batch.describe(&report), vec!["input04.txt: sum = 2 = 2.0"]);

        let report = batch.evaluate_source(&MemorySource::new("e.txt", "1 / 2\n1 + q"));
        assert_eq!(
            batch.describe(&report),
            vec!["line 1: 1/2 = 0.5", "line 2: error - 'q' is not an integer"]
        );
    }

    #[test]
    fn test_sorted_listing() {
        let batch = Batch::default();
        let report = CollectedReport {
            values: vec![r(1, 3), r(2, 1)],
            count: 2,
            skipped: Vec::new(),
        };
        assert_eq!(
            batch.render_sorted_listing(&report),
            "Fractions by descending denominator:\n\
             ------------------------------------\n\
             1/3\n\
             2/1\n\
             \n\
             Total valid fractions: 2"
        );
    }

    #[test]
    fn test_result_path() {
        assert_eq!(
            result_path(Path::new("data/input01.txt"), "_result"),
            PathBuf::from("data/input01_result.txt")
        );
        assert_eq!(
            result_path(Path::new("values.dat"), "_out"),
            PathBuf::from("values.dat_out.txt")
        );
    }

    #[test]
    fn test_report_json() {
        let report = Batch::default().evaluate_source(&MemorySource::new("x.txt", "1 / 0"));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["name"], "x.txt");
        assert_eq!(json["status"], "expressions");
        assert_eq!(json["lines"][0]["status"], "failed");
        assert_eq!(json["lines"][0]["error"], "division by zero");
    }
}
