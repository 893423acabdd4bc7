//! Error types for the rational core and its file collaborators.

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by rational construction, arithmetic, parsing and
/// expression evaluation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RationalError {
    #[error("denominator cannot be zero")]
    InvalidDenominator,
    #[error("invalid fraction '{0}', expected 'n/d'")]
    MalformedFraction(String),
    #[error("'{0}' is not an integer")]
    NotANumber(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("operand must be a rational or an integer, got {0}")]
    InvalidOperand(String),
    #[error("only rationals or integers can be stored, got {0}")]
    InvalidElement(String),
    #[error("malformed expression: {0}")]
    MalformedExpression(String),
    #[error("integer overflow in rational arithmetic")]
    Overflow,
}

pub type Result<T> = std::result::Result<T, RationalError>;

/// Failures of the collaborators that feed the core with text.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("file {} not found", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unknown log level '{0}'")]
    InvalidLogLevel(String),
    #[error("invalid configuration")]
    Config(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            RationalError::InvalidDenominator.to_string(),
            "denominator cannot be zero"
        );
        assert_eq!(
            RationalError::NotANumber("abc".into()).to_string(),
            "'abc' is not an integer"
        );
        let err = SourceError::NotFound(PathBuf::from("input01.txt"));
        assert_eq!(err.to_string(), "file input01.txt not found");
    }
}
