//! Per-call planning state.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::catalog::CourseCatalog;
use crate::models::{CourseCode, DegreeConfig};

/// Working state of one [`Planner::plan`](super::Planner::plan) call.
///
/// Owns the completed set and a private copy of the group-counted
/// indegree. Each call builds a fresh state, so plans computed over the
/// same catalog never share anything mutable.
///
/// # Indegree bookkeeping
///
/// `remaining_groups[c]` starts at the number of strict OR-groups of `c`.
/// Completing `p` walks every edge `p → c` labelled with group `g`; the
/// first completed member of `(c, g)` decrements `remaining_groups[c]`,
/// later members of the same group do not.
#[derive(Debug, Clone, Default)]
pub struct PlanningState {
    completed: BTreeSet<CourseCode>,
    remaining_groups: HashMap<CourseCode, usize>,
    satisfied_groups: HashSet<(CourseCode, usize)>,
    taken_intro: bool,
}

impl PlanningState {
    /// Creates a state with `starting` courses already completed.
    ///
    /// Starting courses unknown to the catalog still count as completed
    /// for degree requirements; they unlock nothing.
    pub fn new(
        catalog: &CourseCatalog,
        config: &DegreeConfig,
        starting: impl IntoIterator<Item = CourseCode>,
    ) -> Self {
        let remaining_groups = catalog
            .codes()
            .map(|c| (c.clone(), catalog.indegree(c)))
            .filter(|(_, n)| *n > 0)
            .collect();

        let mut state = Self {
            remaining_groups,
            ..Self::default()
        };
        state.commit(catalog, config, starting);
        state
    }

    /// Courses completed at start or in committed terms.
    pub fn completed(&self) -> &BTreeSet<CourseCode> {
        &self.completed
    }

    /// Whether `code` is completed.
    pub fn is_completed(&self, code: &CourseCode) -> bool {
        self.completed.contains(code)
    }

    /// Strict OR-groups of `code` still lacking a completed member.
    pub fn remaining_groups(&self, code: &CourseCode) -> usize {
        self.remaining_groups.get(code).copied().unwrap_or(0)
    }

    /// Whether an intro course has been completed.
    pub fn taken_intro(&self) -> bool {
        self.taken_intro
    }

    /// Marks `codes` completed and releases the groups they satisfy.
    pub fn commit(
        &mut self,
        catalog: &CourseCatalog,
        config: &DegreeConfig,
        codes: impl IntoIterator<Item = CourseCode>,
    ) {
        for code in codes {
            if !self.completed.insert(code.clone()) {
                continue;
            }
            if config.intro_courses.contains(&code) {
                self.taken_intro = true;
            }
            for (dependent, group) in catalog.dependents(&code) {
                if !self.satisfied_groups.insert((dependent.clone(), group)) {
                    continue;
                }
                if let Some(remaining) = self.remaining_groups.get_mut(dependent) {
                    *remaining = remaining.saturating_sub(1);
                }
            }
        }
    }
}
