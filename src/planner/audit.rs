//! Degree audit and plan metrics.
//!
//! The audit compares a finished plan against the degree configuration and
//! reports shortfalls as [`PlanWarning`]s. It never modifies the plan.
//!
//! # Checks
//!
//! | Check | Satisfied when |
//! |-------|----------------|
//! | Required coverage | The course or any listed equivalent is completed |
//! | Elective minimum | Completed pool courses ≥ `minimum_required` |
//! | Credit minimum | Scheduled credits ≥ `minimum_total_credits` |
//!
//! Starting courses count toward coverage and electives but not toward
//! scheduled credits.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{CourseCode, DegreeConfig, Plan, PlanWarning};

/// Audits a plan.
///
/// # Arguments
/// * `plan` - The generated plan.
/// * `config` - Degree requirements.
/// * `completed` - Starting courses plus every scheduled course.
pub fn audit_plan(
    plan: &Plan,
    config: &DegreeConfig,
    completed: &BTreeSet<CourseCode>,
) -> Vec<PlanWarning> {
    let mut warnings: Vec<PlanWarning> = config
        .required_courses
        .iter()
        .filter(|required| !config.requirement_met(required, completed))
        .map(PlanWarning::missing_required)
        .collect();

    let pool = &config.elective_pool;
    let taken = pool.courses.intersection(completed).count();
    if taken < pool.minimum_required {
        warnings.push(PlanWarning::elective_shortfall(taken, pool.minimum_required));
    }

    let planned = plan.total_credits();
    if planned < config.minimum_total_credits {
        warnings.push(PlanWarning::credit_shortfall(planned, config.minimum_total_credits));
    }

    warnings
}

/// Plan summary metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Number of generated terms.
    pub term_count: usize,
    /// Number of scheduled courses.
    pub course_count: usize,
    /// Scheduled credits across all terms.
    pub total_credits: f64,
    /// Mean credits per generated term.
    pub avg_credits_per_term: f64,
    /// Heaviest term load.
    pub max_term_credits: f64,
}

impl PlanSummary {
    /// Computes metrics from a plan.
    pub fn calculate(plan: &Plan) -> Self {
        let term_count = plan.term_count();
        let total_credits = plan.total_credits();
        let avg_credits_per_term = if term_count == 0 {
            0.0
        } else {
            total_credits / term_count as f64
        };
        let max_term_credits = plan
            .terms
            .iter()
            .map(|t| t.total_credits)
            .fold(0.0, f64::max);

        Self {
            term_count,
            course_count: plan.course_count(),
            total_credits,
            avg_credits_per_term,
            max_term_credits,
        }
    }

    /// Whether the plan reaches `minimum_credits` within `max_terms` terms.
    pub fn meets_targets(&self, minimum_credits: f64, max_terms: usize) -> bool {
        self.total_credits >= minimum_credits && self.term_count <= max_terms
    }
}
