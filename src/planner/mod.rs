//! Term-by-term greedy course planner.
//!
//! Builds a [`Plan`] from a [`CourseCatalog`](crate::catalog::CourseCatalog)
//! and a [`DegreeConfig`](crate::models::DegreeConfig).
//!
//! # Algorithm
//!
//! For each term (seasons alternate from `start_season`, at most `max_terms`):
//!
//! 1. **Filter**: catalog courses in (level, code) order pass through the
//!    admission filters in a fixed order (see [`filters`]).
//! 2. **Pass 1 (strict)**: admit candidates whose concurrent groups are
//!    already satisfied by prior completions.
//! 3. **Pass 2 (concurrent unlock)**: re-scan the rest, counting courses
//!    admitted this term toward concurrent groups.
//! 4. **Commit**: admitted courses join the completed set.
//!
//! In both passes a candidate is skipped when it would exceed the credit
//! cap, overlap in meeting time with an admitted course, or be a second
//! intro course. An empty term stops planning.
//!
//! The planner is greedy and deterministic. It does not search for a
//! minimum-term plan.
//!
//! # Usage
//!
//! ```
//! use u_courseplan::catalog::CourseCatalog;
//! use u_courseplan::models::{Course, CourseCode, DegreeConfig, PrerequisiteRelation};
//! use u_courseplan::planner::Planner;
//!
//! let intro = CourseCode::parse("CS 141").unwrap();
//! let data = CourseCode::parse("CS 251").unwrap();
//! let catalog = CourseCatalog::new()
//!     .with_course(Course::new(intro.clone()).with_credits([3.0]))
//!     .with_course(Course::new(data.clone()).with_credits([4.0]))
//!     .with_requirement(data.clone(), PrerequisiteRelation::strict([intro.clone()]));
//!
//! let config = DegreeConfig::new("cs").with_max_terms(2);
//! let outcome = Planner::new(&catalog, config).plan([]).unwrap();
//!
//! assert_eq!(outcome.plan.term_of(&intro), Some(0));
//! assert_eq!(outcome.plan.term_of(&data), Some(1));
//! ```
//!
//! # References
//!
//! - Kahn (1962), "Topological sorting of large networks"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4

mod audit;
pub mod conflict;
pub mod filters;
mod greedy;
mod state;

pub use audit::{audit_plan, PlanSummary};
pub use greedy::Planner;
pub use state::PlanningState;

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::catalog::CourseCatalog;
use crate::models::{Course, DegreeConfig, Plan, PlanWarning, Season};

/// A finished plan with its advisory audit findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanOutcome {
    /// Generated terms.
    pub plan: Plan,
    /// Degree audit warnings. Never affect `plan`.
    pub warnings: Vec<PlanWarning>,
}

impl PlanOutcome {
    /// Whether the audit found nothing.
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Summary metrics of the plan.
    pub fn summary(&self) -> PlanSummary {
        PlanSummary::calculate(&self.plan)
    }
}

/// Read-only view of one term handed to admission filters.
#[derive(Debug, Clone, Copy)]
pub struct TermContext<'a> {
    /// Zero-based term index.
    pub index: usize,
    /// Season of the term.
    pub season: Season,
    /// Whether this is the last configured term.
    pub is_final: bool,
    /// Degree configuration.
    pub config: &'a DegreeConfig,
    /// Catalog being planned over.
    pub catalog: &'a CourseCatalog,
    /// Completions before this term.
    pub state: &'a PlanningState,
}

/// A predicate deciding whether a course may be considered this term.
///
/// Filters see only state from before the term started. Budget, timing and
/// intro checks against courses admitted in the same term happen during
/// admission, not here.
pub trait AdmissionFilter: Send + Sync + Debug {
    /// Filter name (e.g., "Offered").
    fn name(&self) -> &'static str;

    /// Whether `course` passes in the given term.
    fn admits(&self, course: &Course, context: &TermContext<'_>) -> bool;

    /// Filter description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
