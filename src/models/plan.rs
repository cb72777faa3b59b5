//! Plan (solution) model.
//!
//! A plan is an ordered list of terms, each holding the courses admitted
//! to it and the credits used. Advisory warnings from the degree audit
//! travel next to it; they never alter the plan.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::{CourseCode, Season};

/// A multi-term course plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Terms in chronological order.
    pub terms: Vec<Term>,
}

/// One planned term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    /// Zero-based position in the plan.
    pub index: usize,
    /// Season of this term.
    pub season: Season,
    /// Admitted courses in admission order.
    pub entries: Vec<PlanEntry>,
    /// Sum of `entries[*].credits`.
    pub total_credits: f64,
}

/// A course placed in a term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    /// Scheduled course.
    pub code: CourseCode,
    /// Credits counted for it.
    pub credits: f64,
}

/// An advisory finding about a finished plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanWarning {
    /// Type of warning.
    pub kind: WarningKind,
    /// Related course code or requirement name.
    pub subject: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of plan warnings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// A required course (and all its equivalents) is missing.
    MissingRequired,
    /// Fewer elective-pool courses than required.
    ElectiveShortfall,
    /// Total scheduled credits below the graduation minimum.
    CreditShortfall,
}

impl Term {
    /// Creates an empty term.
    pub fn new(index: usize, season: Season) -> Self {
        Self {
            index,
            season,
            entries: Vec::new(),
            total_credits: 0.0,
        }
    }

    /// Adds a course and its credits.
    pub fn push(&mut self, code: CourseCode, credits: f64) {
        self.total_credits += credits;
        self.entries.push(PlanEntry { code, credits });
    }

    /// Whether `code` is in this term.
    pub fn contains(&self, code: &CourseCode) -> bool {
        self.entries.iter().any(|e| &e.code == code)
    }

    /// Course codes in admission order.
    pub fn codes(&self) -> impl Iterator<Item = &CourseCode> {
        self.entries.iter().map(|e| &e.code)
    }

    /// Whether nothing was admitted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PlanWarning {
    /// Creates a missing-required-course warning.
    pub fn missing_required(code: &CourseCode) -> Self {
        Self {
            kind: WarningKind::MissingRequired,
            subject: code.to_string(),
            message: format!("required course {code} is not covered by the plan"),
        }
    }

    /// Creates an elective shortfall warning.
    pub fn elective_shortfall(taken: usize, required: usize) -> Self {
        Self {
            kind: WarningKind::ElectiveShortfall,
            subject: "electives".to_string(),
            message: format!("only {taken} of {required} required electives are planned"),
        }
    }

    /// Creates a total-credit shortfall warning.
    pub fn credit_shortfall(planned: f64, required: f64) -> Self {
        Self {
            kind: WarningKind::CreditShortfall,
            subject: "credits".to_string(),
            message: format!("plan totals {planned} credits, {required} are required"),
        }
    }
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Plan {
    /// Creates an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a term.
    pub fn add_term(&mut self, term: Term) {
        self.terms.push(term);
    }

    /// Number of terms.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Credits across all terms.
    pub fn total_credits(&self) -> f64 {
        self.terms.iter().map(|t| t.total_credits).sum()
    }

    /// Index of the term holding `code`.
    pub fn term_of(&self, code: &CourseCode) -> Option<usize> {
        self.terms.iter().find(|t| t.contains(code)).map(|t| t.index)
    }

    /// Whether `code` is scheduled anywhere.
    pub fn contains(&self, code: &CourseCode) -> bool {
        self.term_of(code).is_some()
    }

    /// All scheduled course codes.
    pub fn scheduled(&self) -> BTreeSet<CourseCode> {
        self.terms
            .iter()
            .flat_map(|t| t.codes().cloned())
            .collect()
    }

    /// Number of scheduled courses.
    pub fn course_count(&self) -> usize {
        self.terms.iter().map(|t| t.entries.len()).sum()
    }

    /// Whether no term was planned.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for term in &self.terms {
            writeln!(f, "Term {} ({}):", term.index + 1, term.season)?;
            for entry in &term.entries {
                writeln!(f, "  {} ({} credits)", entry.code, entry.credits)?;
            }
            writeln!(f, "  Total: {} credits", term.total_credits)?;
        }
        Ok(())
    }
}
