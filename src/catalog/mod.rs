//! Course catalog and prerequisite dependency graph.
//!
//! The catalog owns every [`Course`], one [`PrerequisiteRule`] per
//! constrained course, and a directed multigraph of strict dependencies.
//!
//! # Dependency Graph
//!
//! For every strict OR-group `g` of course `c` and every member `p` of `g`
//! there is an edge `p → c` labelled with `g`'s index. The indegree of `c`
//! counts strict **groups**, not edges:
//!
//! ```text
//! CS___211 strict: [{CS___107, CS___111, CS___113}]
//!
//!   CS___107 ─┐
//!   CS___111 ─┼─(group 0)─▶ CS___211     indegree = 1
//!   CS___113 ─┘
//! ```
//!
//! Completing any one of the three members satisfies group 0 and unblocks
//! `CS___211`. Concurrent groups are kept on the rule only; they add no
//! edges and no indegree.
//!
//! The catalog is populated once, then shared read-only by planners.

mod tables;

pub use tables::{CatalogSources, LoadReport};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;

use crate::error::RowError;
use crate::models::{
    Course, CourseCode, MeetingInterval, Offerings, PrerequisiteRelation, PrerequisiteRule,
    Season, Section,
};

/// Edge label: which strict OR-group of the dependent course this edge
/// belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dependency {
    /// Index into the dependent course's `strict` groups.
    pub group: usize,
}

/// A course catalog with its strict dependency graph.
#[derive(Debug, Clone, Default)]
pub struct CourseCatalog {
    courses: BTreeMap<CourseCode, Course>,
    rules: BTreeMap<CourseCode, PrerequisiteRule>,
    indegree: HashMap<CourseCode, usize>,
    graph: DiGraph<CourseCode, Dependency>,
    nodes: HashMap<CourseCode, NodeIndex>,
}

impl CourseCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a course, replacing any previous record with the same code.
    ///
    /// Rules and graph edges already attached to the code are kept.
    pub fn insert_course(&mut self, course: Course) {
        self.ensure_node(&course.code);
        self.courses.insert(course.code.clone(), course);
    }

    /// Adds a course (builder form).
    pub fn with_course(mut self, course: Course) -> Self {
        self.insert_course(course);
        self
    }

    /// Adds a requirement (builder form). A rejected requirement is logged
    /// and dropped, as during table loading.
    pub fn with_requirement(mut self, course: CourseCode, relation: PrerequisiteRelation) -> Self {
        if let Err(error) = self.add_requirement(&course, relation) {
            tracing::warn!(course = %course, %error, "requirement dropped");
        }
        self
    }

    /// Sets credit options, creating the course (offered every term) if needed.
    /// Last write wins.
    pub fn set_credits(&mut self, code: &CourseCode, options: impl IntoIterator<Item = f64>) {
        match self.courses.get_mut(code) {
            Some(course) => course.set_credit_options(options),
            None => self.insert_course(Course::new(code.clone()).with_credits(options)),
        }
    }

    /// Overwrites the offered seasons of an existing course.
    pub fn set_offerings(&mut self, code: &CourseCode, offerings: Offerings) -> Result<(), RowError> {
        let course = self
            .courses
            .get_mut(code)
            .ok_or_else(|| RowError::UnknownCourse(code.to_string()))?;
        course.offerings = offerings;
        Ok(())
    }

    /// Registers a meeting section for an existing course.
    ///
    /// `season = None` applies the section to every season.
    pub fn add_section(
        &mut self,
        code: &CourseCode,
        season: Option<Season>,
        section: Section,
    ) -> Result<(), RowError> {
        let course = self
            .courses
            .get_mut(code)
            .ok_or_else(|| RowError::UnknownCourse(code.to_string()))?;
        match season {
            Some(season) => course
                .seasonal_sections
                .entry(season)
                .or_default()
                .push(section),
            None => course.sections.push(section),
        }
        Ok(())
    }

    /// Attaches a requirement to `course`.
    ///
    /// Both the course and every group member must already be in the
    /// catalog, and the course may not list itself. Strict groups add one
    /// edge per member and one unit of indegree. Empty groups are ignored.
    pub fn add_requirement(
        &mut self,
        course: &CourseCode,
        relation: PrerequisiteRelation,
    ) -> Result<(), RowError> {
        if !self.courses.contains_key(course) {
            return Err(RowError::UnknownCourse(course.to_string()));
        }
        let group = relation.group();
        if group.contains(course) {
            return Err(RowError::SelfReference(course.to_string()));
        }
        if let Some(missing) = group.members().find(|m| !self.courses.contains_key(*m)) {
            return Err(RowError::UnknownCourse(missing.to_string()));
        }
        if group.is_empty() {
            return Ok(());
        }

        let is_strict = matches!(relation, PrerequisiteRelation::Strict(_));
        let members: Vec<CourseCode> = group.members().cloned().collect();
        let index = self.rules.entry(course.clone()).or_default().push(relation);

        if is_strict {
            let target = self.ensure_node(course);
            for member in &members {
                let source = self.ensure_node(member);
                self.graph
                    .add_edge(source, target, Dependency { group: index });
            }
            *self.indegree.entry(course.clone()).or_insert(0) += 1;
        }
        Ok(())
    }

    /// Number of courses.
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Whether the catalog has no courses.
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Whether `code` is in the catalog.
    pub fn contains(&self, code: &CourseCode) -> bool {
        self.courses.contains_key(code)
    }

    /// Looks up a course.
    pub fn course(&self, code: &CourseCode) -> Option<&Course> {
        self.courses.get(code)
    }

    /// Courses in code order.
    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.courses.values()
    }

    /// Course codes in code order.
    pub fn codes(&self) -> impl Iterator<Item = &CourseCode> {
        self.courses.keys()
    }

    /// The rule of `code`, if it has any requirement.
    pub fn rule(&self, code: &CourseCode) -> Option<&PrerequisiteRule> {
        self.rules.get(code)
    }

    /// Number of strict OR-groups of `code`.
    pub fn indegree(&self, code: &CourseCode) -> usize {
        self.indegree.get(code).copied().unwrap_or(0)
    }

    /// Courses directly unlocked by completing `code`, with the index of
    /// the strict group each edge belongs to. Sorted by code, then group.
    pub fn dependents(&self, code: &CourseCode) -> Vec<(&CourseCode, usize)> {
        let Some(&node) = self.nodes.get(code) else {
            return Vec::new();
        };
        let mut out: Vec<(&CourseCode, usize)> = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .map(|e| (&self.graph[e.target()], e.weight().group))
            .collect();
        out.sort();
        out
    }

    /// Representative meeting intervals of `code` in `season`.
    pub fn meetings(&self, code: &CourseCode, season: Season) -> &[MeetingInterval] {
        self.courses
            .get(code)
            .map(|c| c.meetings(season))
            .unwrap_or(&[])
    }

    /// The strict dependency graph.
    pub fn graph(&self) -> &DiGraph<CourseCode, Dependency> {
        &self.graph
    }

    /// Human-readable summary of a course's requirements.
    ///
    /// ```text
    /// CS___251:
    ///   strict: [CS___141] [MATH_180 | MATH_181]
    ///   concurrent: none
    ///   indegree: 2
    /// ```
    pub fn describe(&self, code: &CourseCode) -> String {
        let Some(rule) = self.rules.get(code) else {
            return format!("{code}: no prerequisites\n");
        };

        let mut out = format!("{code}:\n");
        for (label, groups) in [("strict", &rule.strict), ("concurrent", &rule.concurrent)] {
            let _ = write!(out, "  {label}:");
            if groups.is_empty() {
                out.push_str(" none");
            }
            for group in groups {
                let members: Vec<&str> = group.members().map(|c| c.as_str()).collect();
                let _ = write!(out, " [{}]", members.join(" | "));
            }
            out.push('\n');
        }
        let _ = writeln!(out, "  indegree: {}", self.indegree(code));
        out
    }

    fn ensure_node(&mut self, code: &CourseCode) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(code) {
            return idx;
        }
        let idx = self.graph.add_node(code.clone());
        self.nodes.insert(code.clone(), idx);
        idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn code(s: &str) -> CourseCode {
        CourseCode::parse(s).unwrap()
    }

    fn course(s: &str, credits: f64) -> Course {
        Course::new(code(s)).with_credits([credits])
    }

    fn sample_catalog() -> CourseCatalog {
        CourseCatalog::new()
            .with_course(course("CS___107", 4.0))
            .with_course(course("CS___111", 3.0))
            .with_course(course("CS___113", 3.0))
            .with_course(course("CS___211", 3.0))
            .with_course(course("MATH_180", 5.0))
            .with_course(course("CS___251", 4.0))
            .with_requirement(
                code("CS___211"),
                PrerequisiteRelation::strict([code("CS___107"), code("CS___111"), code("CS___113")]),
            )
            .with_requirement(code("CS___251"), PrerequisiteRelation::strict([code("CS___211")]))
            .with_requirement(code("CS___251"), PrerequisiteRelation::strict([code("MATH_180")]))
    }

    #[test]
    fn test_indegree_counts_groups_not_members() {
        let catalog = sample_catalog();
        assert_eq!(catalog.indegree(&code("CS___211")), 1);
        assert_eq!(catalog.indegree(&code("CS___251")), 2);
        assert_eq!(catalog.indegree(&code("CS___107")), 0);
        // One edge per member.
        assert_eq!(catalog.graph().edge_count(), 5);
    }

    #[test]
    fn test_dependents_carry_group_index() {
        let catalog = sample_catalog();
        let cs107 = code("CS___107");
        let deps = catalog.dependents(&cs107);
        assert_eq!(deps, vec![(&code("CS___211"), 0)]);

        let math = code("MATH_180");
        assert_eq!(catalog.dependents(&math), vec![(&code("CS___251"), 1)]);
        assert!(catalog.dependents(&code("CS___251")).is_empty());
    }

    #[test]
    fn test_or_group_satisfied_by_single_member() {
        let catalog = sample_catalog();
        let rule = catalog.rule(&code("CS___211")).unwrap();
        let completed: BTreeSet<CourseCode> = [code("CS___113")].into_iter().collect();
        assert!(rule.strict_satisfied(&completed));
    }

    #[test]
    fn test_concurrent_adds_no_indegree() {
        let mut catalog = sample_catalog().with_course(course("PHYS_141", 4.0));
        catalog
            .add_requirement(&code("PHYS_141"), PrerequisiteRelation::concurrent([code("MATH_180")]))
            .unwrap();

        assert_eq!(catalog.indegree(&code("PHYS_141")), 0);
        assert!(catalog.rule(&code("PHYS_141")).unwrap().has_concurrent());
        assert_eq!(catalog.graph().edge_count(), 5);
    }

    #[test]
    fn test_rejects_self_and_unknown_references() {
        let mut catalog = sample_catalog();
        assert_eq!(
            catalog.add_requirement(&code("CS___211"), PrerequisiteRelation::strict([code("CS___211")])),
            Err(RowError::SelfReference("CS___211".into()))
        );
        assert_eq!(
            catalog.add_requirement(&code("CS___211"), PrerequisiteRelation::strict([code("CS___999")])),
            Err(RowError::UnknownCourse("CS___999".into()))
        );
        assert_eq!(
            catalog.add_requirement(&code("CS___999"), PrerequisiteRelation::strict([code("CS___211")])),
            Err(RowError::UnknownCourse("CS___999".into()))
        );
        assert_eq!(catalog.indegree(&code("CS___211")), 1);
    }

    #[test]
    fn test_set_credits_last_write_wins() {
        let mut catalog = CourseCatalog::new();
        catalog.set_credits(&code("CS___499"), [1.0, 2.0, 3.0]);
        assert!(catalog.course(&code("CS___499")).unwrap().is_variable_credit());

        catalog.set_credits(&code("CS___499"), [3.0]);
        let c = catalog.course(&code("CS___499")).unwrap();
        assert_eq!(c.credit_options, vec![3.0]);
        assert_eq!(c.offerings, Offerings::both());
    }

    #[test]
    fn test_sections_and_meetings() {
        let mut catalog = sample_catalog();
        catalog
            .add_section(&code("CS___211"), None, Section::new("1").with_interval(540, 590))
            .unwrap();
        catalog
            .add_section(
                &code("CS___211"),
                Some(Season::Spring),
                Section::new("2").with_interval(900, 950),
            )
            .unwrap();

        assert_eq!(
            catalog.meetings(&code("CS___211"), Season::Fall),
            &[MeetingInterval::new(540, 590)]
        );
        assert_eq!(
            catalog.meetings(&code("CS___211"), Season::Spring),
            &[MeetingInterval::new(900, 950)]
        );
        assert!(catalog
            .add_section(&code("CS___999"), None, Section::new("3"))
            .is_err());
    }

    #[test]
    fn test_describe() {
        let catalog = sample_catalog();
        let text = catalog.describe(&code("CS___251"));
        assert_eq!(
            text,
            "CS___251:\n  strict: [CS___211] [MATH_180]\n  concurrent: none\n  indegree: 2\n"
        );
        assert_eq!(
            catalog.describe(&code("CS___107")),
            "CS___107: no prerequisites\n"
        );
    }
}
