//! Prerequisite rules with disjunctive (OR-group) requirements.
//!
//! A rule is a conjunction of OR-groups: every group must be satisfied,
//! and a group is satisfied by any single member.
//!
//! - **Strict** groups need a member completed in an earlier term.
//! - **Concurrent** groups also accept a member taken in the same term.
//!
//! ```text
//! CS___251 strict: [{CS___141}, {MATH_180, MATH_181}]
//!   → CS___141 AND (MATH_180 OR MATH_181)
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::CourseCode;

/// A set of alternative courses; completing any one satisfies the group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrGroup(BTreeSet<CourseCode>);

impl OrGroup {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an alternative.
    pub fn with(mut self, code: CourseCode) -> Self {
        self.0.insert(code);
        self
    }

    /// Adds an alternative in place. Returns `false` if already present.
    pub fn insert(&mut self, code: CourseCode) -> bool {
        self.0.insert(code)
    }

    /// Whether `code` is one of the alternatives.
    pub fn contains(&self, code: &CourseCode) -> bool {
        self.0.contains(code)
    }

    /// Alternatives in code order.
    pub fn members(&self) -> impl Iterator<Item = &CourseCode> {
        self.0.iter()
    }

    /// Number of alternatives.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the group has no alternatives.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any member is in `completed`.
    #[inline]
    pub fn satisfied_by(&self, completed: &BTreeSet<CourseCode>) -> bool {
        self.0.iter().any(|c| completed.contains(c))
    }
}

impl FromIterator<CourseCode> for OrGroup {
    fn from_iter<I: IntoIterator<Item = CourseCode>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A single requirement attached to a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "relation", content = "group", rename_all = "lowercase")]
pub enum PrerequisiteRelation {
    /// One member completed in a prior term.
    Strict(OrGroup),
    /// One member completed before or scheduled in the same term.
    Concurrent(OrGroup),
}

impl PrerequisiteRelation {
    /// Creates a strict relation from alternatives.
    pub fn strict(codes: impl IntoIterator<Item = CourseCode>) -> Self {
        Self::Strict(codes.into_iter().collect())
    }

    /// Creates a concurrent relation from alternatives.
    pub fn concurrent(codes: impl IntoIterator<Item = CourseCode>) -> Self {
        Self::Concurrent(codes.into_iter().collect())
    }

    /// The underlying group.
    pub fn group(&self) -> &OrGroup {
        match self {
            Self::Strict(g) | Self::Concurrent(g) => g,
        }
    }
}

/// All requirements of one course.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrerequisiteRule {
    /// Groups that must be satisfied by earlier terms.
    pub strict: Vec<OrGroup>,
    /// Groups that may be satisfied in the same term.
    pub concurrent: Vec<OrGroup>,
}

impl PrerequisiteRule {
    /// Creates an empty (unconstrained) rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a relation.
    pub fn with(mut self, relation: PrerequisiteRelation) -> Self {
        self.push(relation);
        self
    }

    /// Adds a relation in place and returns the index of its group within
    /// the strict or concurrent list.
    pub fn push(&mut self, relation: PrerequisiteRelation) -> usize {
        match relation {
            PrerequisiteRelation::Strict(g) => {
                self.strict.push(g);
                self.strict.len() - 1
            }
            PrerequisiteRelation::Concurrent(g) => {
                self.concurrent.push(g);
                self.concurrent.len() - 1
            }
        }
    }

    /// Every strict group has a member in `completed`.
    ///
    /// Vacuously true when there are no strict groups.
    pub fn strict_satisfied(&self, completed: &BTreeSet<CourseCode>) -> bool {
        self.strict.iter().all(|g| g.satisfied_by(completed))
    }

    /// Every concurrent group has a member in `completed ∪ in_progress`.
    pub fn concurrent_satisfied(
        &self,
        completed: &BTreeSet<CourseCode>,
        in_progress: &BTreeSet<CourseCode>,
    ) -> bool {
        self.concurrent
            .iter()
            .all(|g| g.members().any(|c| completed.contains(c) || in_progress.contains(c)))
    }

    /// Whether any strict group exists.
    pub fn has_strict(&self) -> bool {
        !self.strict.is_empty()
    }

    /// Whether any concurrent group exists.
    pub fn has_concurrent(&self) -> bool {
        !self.concurrent.is_empty()
    }

    /// Whether the rule imposes nothing.
    pub fn is_empty(&self) -> bool {
        self.strict.is_empty() && self.concurrent.is_empty()
    }

    /// Every course mentioned by the rule.
    pub fn prerequisites(&self) -> impl Iterator<Item = &CourseCode> {
        self.strict
            .iter()
            .chain(self.concurrent.iter())
            .flat_map(|g| g.members())
    }
}
