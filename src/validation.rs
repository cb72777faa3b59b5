//! Input validation for course planning.
//!
//! Checks the degree configuration and the catalog before planning.
//! Detects:
//! - Credit caps or term counts that can never yield a non-empty plan
//! - Elective minimums larger than the elective pool
//! - Configured courses missing from the catalog
//! - Circular strict prerequisites (DAG validation)
//! - Courses without any credit value
//!
//! Only [`validate_config`] is fatal: the planner refuses to start when it
//! fails, since no term could ever be filled. Every other check is
//! advisory; the planner logs it and the degree audit reports the
//! resulting shortfall.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use petgraph::algo::toposort;
use std::collections::BTreeSet;

use crate::catalog::CourseCatalog;
use crate::models::{CourseCode, DegreeConfig};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// `max_credits_per_term` is zero, negative or not finite.
    NonPositiveCreditCap,
    /// `max_terms` is zero.
    ZeroTerms,
    /// `minimum_total_credits` is negative or not finite.
    InvalidCreditMinimum,
    /// The elective minimum exceeds the pool size.
    UnreachableElectiveMinimum,
    /// The configuration names a course the catalog does not have.
    UnknownCourse,
    /// Strict prerequisite graph contains a cycle.
    CyclicDependency,
    /// A course has no positive credit value and can never be scheduled.
    MissingCredits,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the parts of a configuration planning cannot proceed without.
///
/// Checks:
/// 1. Credit cap is positive
/// 2. At least one term is planned
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_config(config: &DegreeConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if !(config.max_credits_per_term.is_finite() && config.max_credits_per_term > 0.0) {
        errors.push(ValidationError::new(
            ValidationErrorKind::NonPositiveCreditCap,
            format!(
                "max_credits_per_term must be positive, got {}",
                config.max_credits_per_term
            ),
        ));
    }

    if config.max_terms == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::ZeroTerms,
            "max_terms must be at least 1",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks that the degree targets are attainable.
///
/// Checks:
/// 1. Credit minimum is a non-negative number
/// 2. Elective minimum fits in the pool
pub fn validate_targets(config: &DegreeConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if !(config.minimum_total_credits.is_finite() && config.minimum_total_credits >= 0.0) {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidCreditMinimum,
            format!(
                "minimum_total_credits must be non-negative, got {}",
                config.minimum_total_credits
            ),
        ));
    }

    let pool = &config.elective_pool;
    if pool.minimum_required > pool.courses.len() {
        errors.push(ValidationError::new(
            ValidationErrorKind::UnreachableElectiveMinimum,
            format!(
                "elective minimum {} exceeds pool of {} courses",
                pool.minimum_required,
                pool.courses.len()
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks that every course named by the configuration is in the catalog.
pub fn validate_references(config: &DegreeConfig, catalog: &CourseCatalog) -> ValidationResult {
    let mut named: BTreeSet<(&str, &CourseCode)> = BTreeSet::new();
    named.extend(config.required_courses.iter().map(|c| ("required course", c)));
    for (required, alternatives) in &config.required_equivalents {
        named.insert(("required course", required));
        named.extend(alternatives.iter().map(|c| ("equivalent", c)));
    }
    named.extend(config.elective_pool.courses.iter().map(|c| ("elective", c)));
    named.extend(config.intro_courses.iter().map(|c| ("intro course", c)));
    named.extend(config.deferred_courses.iter().map(|c| ("deferred course", c)));

    let errors: Vec<ValidationError> = named
        .into_iter()
        .filter(|(_, code)| !catalog.contains(code))
        .map(|(role, code)| {
            ValidationError::new(
                ValidationErrorKind::UnknownCourse,
                format!("{role} {code} is not in the catalog"),
            )
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks catalog integrity.
///
/// Checks:
/// 1. The strict dependency graph is acyclic
/// 2. Every course has a positive credit value
pub fn validate_catalog(catalog: &CourseCatalog) -> ValidationResult {
    let mut errors = Vec::new();

    if let Some(cycle_err) = detect_cycles(catalog) {
        errors.push(cycle_err);
    }

    for course in catalog.courses() {
        if course.max_credits() <= 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingCredits,
                format!("course {} has no positive credit value", course.code),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Detects cycles in the strict prerequisite graph.
///
/// A cycle means none of its courses can ever satisfy its strict groups
/// through the cycle alone. Reports one course on the cycle.
fn detect_cycles(catalog: &CourseCatalog) -> Option<ValidationError> {
    let graph = catalog.graph();
    toposort(graph, None).err().map(|cycle| {
        ValidationError::new(
            ValidationErrorKind::CyclicDependency,
            format!(
                "Circular prerequisite detected involving course '{}'",
                graph[cycle.node_id()]
            ),
        )
    })
}
