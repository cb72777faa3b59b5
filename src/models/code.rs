//! Fixed-width course codes.
//!
//! A code is a subject prefix padded with `_` up to a constant width,
//! followed by a 3-digit course number:
//!
//! | Subject | Number | Code |
//! |---------|--------|------|
//! | `CS` | `141` | `CS___141` |
//! | `MATH` | `180` | `MATH_180` |
//! | `STAT` | `381` | `STAT_381` |
//!
//! Equality is exact string equality on the normalized form. Collisions
//! between distinct (subject, number) pairs are the ingestion layer's
//! concern and are not re-checked here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CodeError;

/// Total width of a normalized code.
pub const CODE_WIDTH: usize = 8;
/// Width of the numeric part.
pub const NUMBER_WIDTH: usize = 3;
/// Padding character between subject and number.
pub const FILLER: char = '_';

const MAX_SUBJECT_LEN: usize = CODE_WIDTH - NUMBER_WIDTH;

/// A normalized course identifier.
///
/// Ordering is lexicographic on the normalized string. The `_` filler
/// sorts after letters, so `CSC__100` precedes `CS___141`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseCode(String);

impl CourseCode {
    /// Builds a code from a subject prefix and a course number.
    ///
    /// # Example
    /// ```
    /// use u_courseplan::models::CourseCode;
    ///
    /// let code = CourseCode::new("cs", "141").unwrap();
    /// assert_eq!(code.as_str(), "CS___141");
    /// assert_eq!(code.level(), 1);
    /// ```
    pub fn new(subject: &str, number: &str) -> Result<Self, CodeError> {
        let subject = subject.trim().to_ascii_uppercase();
        let number = number.trim();

        if subject.is_empty()
            || subject.len() > MAX_SUBJECT_LEN
            || !subject.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(CodeError::InvalidSubject(format!("{subject}{number}")));
        }
        if number.len() != NUMBER_WIDTH || !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(CodeError::InvalidNumber(format!("{subject}{number}")));
        }

        let fill = CODE_WIDTH - subject.len() - NUMBER_WIDTH;
        let mut code = String::with_capacity(CODE_WIDTH);
        code.push_str(&subject);
        code.extend(std::iter::repeat(FILLER).take(fill));
        code.push_str(number);
        Ok(Self(code))
    }

    /// Parses a normalized or loosely formatted code.
    ///
    /// Accepts `CS___141`, `CS 141`, `cs141` and `CS_141`.
    pub fn parse(raw: &str) -> Result<Self, CodeError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(CodeError::Empty);
        }

        let subject_end = raw
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(raw.len());
        let (subject, rest) = raw.split_at(subject_end);
        let number = rest.trim_start_matches(|c: char| c == FILLER || c.is_whitespace());

        if subject.is_empty() {
            return Err(CodeError::InvalidSubject(raw.to_string()));
        }
        Self::new(subject, number)
    }

    /// The normalized string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Subject prefix without padding.
    pub fn subject(&self) -> &str {
        self.0[..CODE_WIDTH - NUMBER_WIDTH].trim_end_matches(FILLER)
    }

    /// Course number as an integer (`141` for `CS___141`).
    pub fn number(&self) -> u32 {
        self.0[CODE_WIDTH - NUMBER_WIDTH..].parse().unwrap_or(0)
    }

    /// Course level: the hundreds digit of the number (`1` for `CS___141`).
    pub fn level(&self) -> u32 {
        self.number() / 100
    }

    /// Whether the normalized code starts with `prefix`.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CourseCode {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CourseCode {
    type Error = CodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for CourseCode {
    type Error = CodeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<CourseCode> for String {
    fn from(code: CourseCode) -> Self {
        code.0
    }
}

impl AsRef<str> for CourseCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_to_fixed_width() {
        assert_eq!(CourseCode::new("CS", "141").unwrap().as_str(), "CS___141");
        assert_eq!(CourseCode::new("MATH", "180").unwrap().as_str(), "MATH_180");
        assert_eq!(CourseCode::new("BIOSC", "101").unwrap().as_str(), "BIOSC101");
        for code in ["CS___141", "MATH_180", "E____100"] {
            assert_eq!(CourseCode::parse(code).unwrap().as_str().len(), CODE_WIDTH);
        }
    }

    #[test]
    fn test_parse_loose_forms() {
        let expected = CourseCode::new("CS", "141").unwrap();
        for raw in ["CS___141", "CS 141", "cs141", "CS_141", "  CS   141 "] {
            assert_eq!(CourseCode::parse(raw).unwrap(), expected, "input {raw:?}");
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(CourseCode::parse(""), Err(CodeError::Empty));
        assert!(matches!(
            CourseCode::parse("141"),
            Err(CodeError::InvalidSubject(_))
        ));
        assert!(matches!(
            CourseCode::parse("CS___XXX"),
            Err(CodeError::InvalidNumber(_))
        ));
        assert!(matches!(
            CourseCode::parse("CS 1410"),
            Err(CodeError::InvalidNumber(_))
        ));
        assert!(matches!(
            CourseCode::parse("TOOLONG101"),
            Err(CodeError::InvalidSubject(_))
        ));
    }

    #[test]
    fn test_accessors() {
        let code = CourseCode::parse("MATH_210").unwrap();
        assert_eq!(code.subject(), "MATH");
        assert_eq!(code.number(), 210);
        assert_eq!(code.level(), 2);
        assert!(code.has_prefix("MATH_2"));
        assert!(!code.has_prefix("CS"));
    }

    #[test]
    fn test_ordering_is_by_normalized_string() {
        let mut codes: Vec<CourseCode> = ["MATH_180", "CS___251", "CS___141", "CSC__100"]
            .iter()
            .map(|c| CourseCode::parse(c).unwrap())
            .collect();
        codes.sort();
        let sorted: Vec<&str> = codes.iter().map(|c| c.as_str()).collect();
        assert_eq!(sorted, vec!["CSC__100", "CS___141", "CS___251", "MATH_180"]);
    }

    #[test]
    fn test_serde_normalizes() {
        let code: CourseCode = serde_json::from_str("\"cs 141\"").unwrap();
        assert_eq!(code.as_str(), "CS___141");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"CS___141\"");
        assert!(serde_json::from_str::<CourseCode>("\"nope\"").is_err());
    }
}
