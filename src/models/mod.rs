//! Course planning domain models.
//!
//! Provides the data types for describing a course catalog, a degree
//! program, and the resulting multi-term plan.
//!
//! # Domain Mappings
//!
//! | u-courseplan | Generic scheduling |
//! |--------------|--------------------|
//! | Course | Task |
//! | PrerequisiteRule | Precedence constraint (disjunctive) |
//! | Term | Time bucket with capacity |
//! | MeetingInterval | Resource occupation window |
//! | Plan | Schedule |

mod code;
mod course;
mod degree;
mod plan;
mod prerequisite;

pub use code::{CourseCode, CODE_WIDTH, FILLER, NUMBER_WIDTH};
pub use course::{Course, MeetingInterval, Offerings, Season, Section};
pub use degree::{
    DegreeConfig, ElectivePool, DEFAULT_MAX_CREDITS_PER_TERM, DEFAULT_MAX_TERMS,
    DEFAULT_MIN_TOTAL_CREDITS, DEFAULT_VARIABLE_CREDIT_DELAY_TERMS,
};
pub use plan::{Plan, PlanEntry, PlanWarning, Term, WarningKind};
pub use prerequisite::{OrGroup, PrerequisiteRelation, PrerequisiteRule};
