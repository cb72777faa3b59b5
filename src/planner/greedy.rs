//! Greedy two-pass term planner.
//!
//! # Algorithm
//!
//! 1. Validate the configuration (fail fast on an unusable cap or term count).
//! 2. For each term, filter catalog courses and sort by (level, code).
//! 3. Pass 1 admits candidates whose concurrent groups are met by prior
//!    completions; Pass 2 re-scans once, counting this term's admissions.
//! 4. Commit the term. Stop early when nothing was admitted.
//! 5. Audit the finished plan.
//!
//! # Complexity
//! O(t · n · (f + k)) where t=terms, n=courses, f=filters, k=admitted per term.

use std::collections::BTreeSet;

use super::audit::audit_plan;
use super::conflict::find_conflict;
use super::filters::default_filters;
use super::{AdmissionFilter, PlanOutcome, PlanningState, TermContext};
use crate::catalog::CourseCatalog;
use crate::error::PlanError;
use crate::models::{Course, CourseCode, DegreeConfig, Plan, Season, Term};
use crate::validation::{validate_config, validate_references, validate_targets};

/// Greedy term-by-term course planner.
///
/// Borrows the catalog read-only. Every [`plan`](Self::plan) call starts
/// from a fresh [`PlanningState`], so one planner can answer any number of
/// what-if queries.
///
/// # Example
///
/// ```
/// use u_courseplan::catalog::CourseCatalog;
/// use u_courseplan::models::{Course, CourseCode, DegreeConfig, Offerings};
/// use u_courseplan::planner::Planner;
///
/// let a = CourseCode::parse("CS 101").unwrap();
/// let catalog = CourseCatalog::new()
///     .with_course(Course::new(a.clone()).with_credits([3.0]).with_offerings(Offerings::fall_only()));
///
/// let planner = Planner::new(&catalog, DegreeConfig::new("cs"));
/// let outcome = planner.plan([]).unwrap();
/// assert_eq!(outcome.plan.term_count(), 1);
///
/// // Already completed: nothing left to plan.
/// let outcome = planner.plan([a]).unwrap();
/// assert!(outcome.plan.is_empty());
/// ```
#[derive(Debug)]
pub struct Planner<'a> {
    catalog: &'a CourseCatalog,
    config: DegreeConfig,
    filters: Vec<Box<dyn AdmissionFilter>>,
}

/// Admissions of the term being built.
struct TermAdmission {
    term: Term,
    admitted: BTreeSet<CourseCode>,
    intro_admitted: bool,
}

impl<'a> Planner<'a> {
    /// Creates a planner with the built-in filters.
    pub fn new(catalog: &'a CourseCatalog, config: DegreeConfig) -> Self {
        Self {
            catalog,
            config,
            filters: default_filters(),
        }
    }

    /// Appends a filter after the built-in ones.
    pub fn with_filter(mut self, filter: impl AdmissionFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// The degree configuration.
    pub fn config(&self) -> &DegreeConfig {
        &self.config
    }

    /// Filter names in application order.
    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Plans terms starting from the `starting` completed courses.
    ///
    /// # Errors
    /// [`PlanError::InvalidConfig`] when the configuration fails
    /// [`validate_config`]. Shortfalls are reported as warnings instead.
    pub fn plan(
        &self,
        starting: impl IntoIterator<Item = CourseCode>,
    ) -> Result<PlanOutcome, PlanError> {
        validate_config(&self.config).map_err(PlanError::InvalidConfig)?;
        if let Err(unknown) = validate_references(&self.config, self.catalog) {
            for error in unknown {
                tracing::warn!(message = %error.message, "configuration references unknown course");
            }
        }
        if let Err(unreachable) = validate_targets(&self.config) {
            for error in unreachable {
                tracing::warn!(message = %error.message, "degree target cannot be met");
            }
        }

        let mut state = PlanningState::new(self.catalog, &self.config, starting);
        let mut plan = Plan::new();
        let mut season = self.config.start_season;

        for index in 0..self.config.max_terms {
            let term = self.plan_term(index, season, &state);
            if term.is_empty() {
                tracing::info!(term = index, %season, "no admissible course, planning stopped");
                break;
            }

            tracing::info!(
                term = index,
                %season,
                courses = term.entries.len(),
                credits = term.total_credits,
                "term committed"
            );
            state.commit(self.catalog, &self.config, term.codes().cloned());
            plan.add_term(term);
            season = season.next();
        }

        let warnings = audit_plan(&plan, &self.config, state.completed());
        tracing::info!(
            terms = plan.term_count(),
            credits = plan.total_credits(),
            warnings = warnings.len(),
            "plan complete"
        );
        Ok(PlanOutcome { plan, warnings })
    }

    /// Builds one term from the state before it.
    fn plan_term(&self, index: usize, season: Season, state: &PlanningState) -> Term {
        let context = TermContext {
            index,
            season,
            is_final: index + 1 == self.config.max_terms,
            config: &self.config,
            catalog: self.catalog,
            state,
        };
        let candidates = self.candidates(&context);
        tracing::debug!(term = index, %season, candidates = candidates.len(), "candidates filtered");

        let mut admission = TermAdmission {
            term: Term::new(index, season),
            admitted: BTreeSet::new(),
            intro_admitted: false,
        };
        let nothing = BTreeSet::new();

        // Pass 1: concurrent groups met by prior completions only.
        for course in &candidates {
            let ready = self
                .catalog
                .rule(&course.code)
                .is_none_or(|rule| rule.concurrent_satisfied(state.completed(), &nothing));
            if ready {
                self.try_admit(&mut admission, course, 1);
            }
        }

        // Pass 2: this term's admissions count toward concurrent groups.
        for course in &candidates {
            if admission.admitted.contains(&course.code) {
                continue;
            }
            let ready = self
                .catalog
                .rule(&course.code)
                .is_none_or(|rule| rule.concurrent_satisfied(state.completed(), &admission.admitted));
            if ready {
                self.try_admit(&mut admission, course, 2);
            }
        }

        admission.term
    }

    /// Courses passing every filter, in (level, code) order.
    fn candidates(&self, context: &TermContext<'_>) -> Vec<&'a Course> {
        let mut candidates: Vec<&'a Course> = self
            .catalog
            .courses()
            .filter(|course| self.filters.iter().all(|f| f.admits(course, context)))
            .collect();
        candidates.sort_by(|a, b| {
            (a.code.level(), &a.code).cmp(&(b.code.level(), &b.code))
        });
        candidates
    }

    /// Admits `course` unless it breaks the credit cap, the intro rule or
    /// a meeting time already taken this term.
    fn try_admit(&self, admission: &mut TermAdmission, course: &Course, pass: u8) -> bool {
        let code = &course.code;
        let credits = course.max_credits();

        if admission.term.total_credits + credits > self.config.max_credits_per_term {
            tracing::debug!(course = %code, pass, credits, "skipped: credit cap");
            return false;
        }

        let is_intro = self.config.intro_courses.contains(code);
        if is_intro && admission.intro_admitted {
            tracing::debug!(course = %code, pass, "skipped: intro course already admitted");
            return false;
        }

        let season = admission.term.season;
        if let Some(other) = find_conflict(self.catalog, season, code, admission.term.codes()) {
            tracing::debug!(course = %code, pass, conflict = %other, "skipped: meeting time conflict");
            return false;
        }

        admission.term.push(code.clone(), credits);
        admission.admitted.insert(code.clone());
        admission.intro_admitted |= is_intro;
        tracing::debug!(course = %code, pass, credits, "admitted");
        true
    }
}
