//! Error types.
//!
//! Row-level ingestion failures are non-fatal: they are collected into a
//! [`LoadReport`](crate::catalog::LoadReport) and logged, never returned as
//! `Err` from a load call. Planning only fails for invalid configuration.

use thiserror::Error;

use crate::validation::ValidationError;

/// A course code could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    #[error("empty course code")]
    Empty,

    #[error("invalid subject prefix in '{0}'")]
    InvalidSubject(String),

    #[error("course number in '{0}' must be exactly 3 digits")]
    InvalidNumber(String),
}

/// Why a single table row was rejected during catalog loading.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: String, found: usize },

    #[error(transparent)]
    InvalidCode(#[from] CodeError),

    #[error("invalid numeric value '{0}'")]
    InvalidNumber(String),

    #[error("invalid relation flag '{0}' (expected -1 or 0)")]
    InvalidFlag(String),

    #[error("course {0} is not in the catalog")]
    UnknownCourse(String),

    #[error("course {0} lists itself as a prerequisite")]
    SelfReference(String),

    #[error("{declared} sections declared, {found} found")]
    SectionCount { declared: usize, found: usize },

    #[error("line is not valid UTF-8")]
    InvalidEncoding,
}

/// A row skipped while loading, with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {error}")]
pub struct SkippedRow {
    pub line: usize,
    pub error: RowError,
}

/// Planning could not start.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid degree configuration: {}", summarize(.0))]
    InvalidConfig(Vec<ValidationError>),
}

/// A degree configuration file could not be read.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_skipped_row_display() {
        let row = SkippedRow {
            line: 7,
            error: RowError::InvalidNumber("abc".into()),
        };
        assert_eq!(row.to_string(), "line 7: invalid numeric value 'abc'");
    }

    #[test]
    fn test_plan_error_lists_messages() {
        let err = PlanError::InvalidConfig(vec![
            ValidationError::new(ValidationErrorKind::NonPositiveCreditCap, "cap is 0"),
            ValidationError::new(ValidationErrorKind::ZeroTerms, "no terms"),
        ]);
        assert_eq!(
            err.to_string(),
            "invalid degree configuration: cap is 0; no terms"
        );
    }
}
