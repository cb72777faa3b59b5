//! Academic course planning.
//!
//! Builds multi-term course plans from a course catalog, a degree
//! configuration and a set of already-completed courses. Each term is
//! filled greedily with courses whose prerequisites are met, within the
//! term credit cap and without meeting-time overlaps.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `CourseCode`, `Course`, `PrerequisiteRule`,
//!   `DegreeConfig`, `Plan`, `PlanWarning`
//! - **`catalog`**: `CourseCatalog` with the OR-group dependency graph and
//!   tab-separated table loaders
//! - **`planner`**: Two-pass greedy term planner, admission filters,
//!   conflict detection, degree audit
//! - **`validation`**: Configuration and catalog integrity checks
//! - **`error`**: Error types
//!
//! # Example
//!
//! ```
//! use u_courseplan::catalog::CourseCatalog;
//! use u_courseplan::models::{Course, CourseCode, DegreeConfig, PrerequisiteRelation};
//! use u_courseplan::planner::Planner;
//!
//! let code = |s: &str| CourseCode::parse(s).unwrap();
//!
//! let mut catalog = CourseCatalog::new();
//! catalog.load_credits("CS___107\t4\nCS___111\t3\nCS___211\t3\n".as_bytes()).unwrap();
//! catalog.load_prerequisites("CS___107\tCS___211\t-1\t1\nCS___111\tCS___211\t-1\t1\n".as_bytes()).unwrap();
//!
//! // Either intro course unlocks CS___211.
//! let config = DegreeConfig::new("cs")
//!     .with_required(code("CS___211"))
//!     .with_minimum_total_credits(6.0);
//! let outcome = Planner::new(&catalog, config).plan([code("CS___111")]).unwrap();
//!
//! assert_eq!(outcome.plan.term_of(&code("CS___211")), Some(0));
//! assert!(outcome.is_complete());
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Cormen et al. (2009), "Introduction to Algorithms", Ch. 22

pub mod catalog;
pub mod error;
pub mod models;
pub mod planner;
pub mod validation;

pub use catalog::CourseCatalog;
pub use error::{ConfigError, PlanError, RowError};
pub use models::{CourseCode, DegreeConfig, Plan};
pub use planner::{PlanOutcome, Planner};
