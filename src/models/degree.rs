//! Degree configuration.
//!
//! Everything the planner needs to know about a degree program besides the
//! catalog itself: per-term limits, required and elective courses, and the
//! admission policies that used to be hardcoded per subject.
//!
//! # JSON Shape
//!
//! ```json
//! {
//!   "name": "Computer Science",
//!   "max_credits_per_term": 18,
//!   "max_terms": 8,
//!   "required_courses": ["CS___141", "CS___151"],
//!   "required_equivalents": { "CS___111": ["CS___107", "CS___113"] },
//!   "elective_pool": { "courses": ["CS___411", "CS___412"], "minimum_required": 1 },
//!   "intro_courses": ["CS___107", "CS___111", "CS___113"],
//!   "excluded_prefixes": ["CS___499"],
//!   "excluded_levels": [5, 6],
//!   "min_total_credits": 128
//! }
//! ```
//!
//! Missing fields take their defaults.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use super::{CourseCode, Season};
use crate::error::ConfigError;

/// Default per-term credit cap.
pub const DEFAULT_MAX_CREDITS_PER_TERM: f64 = 18.0;
/// Default number of terms.
pub const DEFAULT_MAX_TERMS: usize = 8;
/// Default minimum credits for graduation.
pub const DEFAULT_MIN_TOTAL_CREDITS: f64 = 120.0;
/// Default number of leading terms in which open-ended variable-credit
/// courses are held back.
pub const DEFAULT_VARIABLE_CREDIT_DELAY_TERMS: usize = 4;

/// Elective courses and how many of them must be taken.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElectivePool {
    /// Courses counting toward the elective requirement.
    pub courses: BTreeSet<CourseCode>,
    /// Minimum number of pool courses to complete.
    pub minimum_required: usize,
}

/// Degree program configuration. Immutable input to the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DegreeConfig {
    /// Program name (informational).
    #[serde(alias = "major")]
    pub name: String,
    /// Credit cap per term.
    pub max_credits_per_term: f64,
    /// Number of terms to plan.
    pub max_terms: usize,
    /// Season of the first planned term.
    pub start_season: Season,
    /// Courses that must be completed.
    pub required_courses: BTreeSet<CourseCode>,
    /// Alternatives accepted in place of a required course.
    pub required_equivalents: BTreeMap<CourseCode, BTreeSet<CourseCode>>,
    /// Elective pool.
    pub elective_pool: ElectivePool,
    /// Mutually exclusive introductory courses; at most one is ever scheduled.
    pub intro_courses: BTreeSet<CourseCode>,
    /// Courses schedulable only in the final term.
    pub deferred_courses: BTreeSet<CourseCode>,
    /// Code prefixes never scheduled (e.g. `CS___499`, `CS___5`).
    pub excluded_prefixes: Vec<String>,
    /// Course levels never scheduled (e.g. `5` for 500-level).
    pub excluded_levels: BTreeSet<u32>,
    /// Credits required for graduation.
    #[serde(alias = "min_total_credits")]
    pub minimum_total_credits: f64,
    /// Leading terms during which variable-credit courses without
    /// prerequisites are not scheduled.
    pub variable_credit_delay_terms: usize,
}

impl Default for DegreeConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            max_credits_per_term: DEFAULT_MAX_CREDITS_PER_TERM,
            max_terms: DEFAULT_MAX_TERMS,
            start_season: Season::Fall,
            required_courses: BTreeSet::new(),
            required_equivalents: BTreeMap::new(),
            elective_pool: ElectivePool::default(),
            intro_courses: BTreeSet::new(),
            deferred_courses: BTreeSet::new(),
            excluded_prefixes: Vec::new(),
            excluded_levels: BTreeSet::new(),
            minimum_total_credits: DEFAULT_MIN_TOTAL_CREDITS,
            variable_credit_delay_terms: DEFAULT_VARIABLE_CREDIT_DELAY_TERMS,
        }
    }
}

impl DegreeConfig {
    /// Creates a configuration with defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Parses a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses JSON from a reader.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Reads and parses a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }

    /// Sets the credit cap per term.
    pub fn with_max_credits_per_term(mut self, credits: f64) -> Self {
        self.max_credits_per_term = credits;
        self
    }

    /// Sets the number of terms.
    pub fn with_max_terms(mut self, terms: usize) -> Self {
        self.max_terms = terms;
        self
    }

    /// Sets the first season.
    pub fn with_start_season(mut self, season: Season) -> Self {
        self.start_season = season;
        self
    }

    /// Adds a required course.
    pub fn with_required(mut self, code: CourseCode) -> Self {
        self.required_courses.insert(code);
        self
    }

    /// Adds an accepted alternative for a required course.
    pub fn with_equivalent(mut self, required: CourseCode, alternative: CourseCode) -> Self {
        self.required_equivalents
            .entry(required)
            .or_default()
            .insert(alternative);
        self
    }

    /// Sets the elective pool.
    pub fn with_electives(
        mut self,
        courses: impl IntoIterator<Item = CourseCode>,
        minimum_required: usize,
    ) -> Self {
        self.elective_pool = ElectivePool {
            courses: courses.into_iter().collect(),
            minimum_required,
        };
        self
    }

    /// Sets the mutually exclusive intro set.
    pub fn with_intro_courses(mut self, courses: impl IntoIterator<Item = CourseCode>) -> Self {
        self.intro_courses = courses.into_iter().collect();
        self
    }

    /// Adds a course restricted to the final term.
    pub fn with_deferred(mut self, code: CourseCode) -> Self {
        self.deferred_courses.insert(code);
        self
    }

    /// Adds an excluded code prefix.
    pub fn with_excluded_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.excluded_prefixes.push(prefix.into());
        self
    }

    /// Adds an excluded course level.
    pub fn with_excluded_level(mut self, level: u32) -> Self {
        self.excluded_levels.insert(level);
        self
    }

    /// Sets the graduation credit minimum.
    pub fn with_minimum_total_credits(mut self, credits: f64) -> Self {
        self.minimum_total_credits = credits;
        self
    }

    /// Sets the variable-credit hold-back window.
    pub fn with_variable_credit_delay(mut self, terms: usize) -> Self {
        self.variable_credit_delay_terms = terms;
        self
    }

    /// Whether `code` is excluded by prefix or level.
    pub fn is_excluded(&self, code: &CourseCode) -> bool {
        self.excluded_levels.contains(&code.level())
            || self.excluded_prefixes.iter().any(|p| code.has_prefix(p))
    }

    /// Whether `code` or an accepted equivalent is in `completed`.
    pub fn requirement_met(&self, required: &CourseCode, completed: &BTreeSet<CourseCode>) -> bool {
        completed.contains(required)
            || self
                .required_equivalents
                .get(required)
                .is_some_and(|alts| alts.iter().any(|a| completed.contains(a)))
    }
}
