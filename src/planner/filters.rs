//! Built-in admission filters.
//!
//! Applied in this order by [`default_filters`]:
//!
//! | # | Filter | Rejects |
//! |---|--------|---------|
//! | 1 | [`NotCompleted`] | Courses already completed |
//! | 2 | [`Offered`] | Courses not offered in the term's season |
//! | 3 | [`NotExcluded`] | Excluded prefixes and levels |
//! | 4 | [`IntroExclusive`] | Intro courses once one was taken |
//! | 5 | [`DeferredToFinal`] | Deferred courses outside the final term |
//! | 6 | [`HasCredit`] | Courses worth zero credits |
//! | 7 | [`VariableCreditDelay`] | Open-ended variable-credit courses in early terms |
//! | 8 | [`StrictPrerequisites`] | Courses with an unsatisfied strict group |

use super::{AdmissionFilter, TermContext};
use crate::models::Course;

/// Rejects courses completed before this term.
#[derive(Debug, Clone, Copy)]
pub struct NotCompleted;

impl AdmissionFilter for NotCompleted {
    fn name(&self) -> &'static str {
        "NotCompleted"
    }

    fn admits(&self, course: &Course, context: &TermContext<'_>) -> bool {
        !context.state.is_completed(&course.code)
    }

    fn description(&self) -> &'static str {
        "Course not yet completed"
    }
}

/// Rejects courses not offered in the term's season.
#[derive(Debug, Clone, Copy)]
pub struct Offered;

impl AdmissionFilter for Offered {
    fn name(&self) -> &'static str {
        "Offered"
    }

    fn admits(&self, course: &Course, context: &TermContext<'_>) -> bool {
        course.offerings.includes(context.season)
    }

    fn description(&self) -> &'static str {
        "Course offered this season"
    }
}

/// Rejects courses matching an excluded prefix or level.
#[derive(Debug, Clone, Copy)]
pub struct NotExcluded;

impl AdmissionFilter for NotExcluded {
    fn name(&self) -> &'static str {
        "NotExcluded"
    }

    fn admits(&self, course: &Course, context: &TermContext<'_>) -> bool {
        !context.config.is_excluded(&course.code)
    }

    fn description(&self) -> &'static str {
        "Course prefix and level not excluded"
    }
}

/// Rejects every intro course once any intro course was completed.
#[derive(Debug, Clone, Copy)]
pub struct IntroExclusive;

impl AdmissionFilter for IntroExclusive {
    fn name(&self) -> &'static str {
        "IntroExclusive"
    }

    fn admits(&self, course: &Course, context: &TermContext<'_>) -> bool {
        !(context.state.taken_intro() && context.config.intro_courses.contains(&course.code))
    }

    fn description(&self) -> &'static str {
        "At most one intro course"
    }
}

/// Holds deferred courses back until the final configured term.
#[derive(Debug, Clone, Copy)]
pub struct DeferredToFinal;

impl AdmissionFilter for DeferredToFinal {
    fn name(&self) -> &'static str {
        "DeferredToFinal"
    }

    fn admits(&self, course: &Course, context: &TermContext<'_>) -> bool {
        context.is_final || !context.config.deferred_courses.contains(&course.code)
    }

    fn description(&self) -> &'static str {
        "Deferred courses only in the final term"
    }
}

/// Rejects courses with no positive credit value.
#[derive(Debug, Clone, Copy)]
pub struct HasCredit;

impl AdmissionFilter for HasCredit {
    fn name(&self) -> &'static str {
        "HasCredit"
    }

    fn admits(&self, course: &Course, _context: &TermContext<'_>) -> bool {
        course.max_credits() > 0.0
    }

    fn description(&self) -> &'static str {
        "Course carries credit"
    }
}

/// Suppresses variable-credit courses without any prerequisite (independent
/// study, research slots) during the first
/// `config.variable_credit_delay_terms` terms.
#[derive(Debug, Clone, Copy)]
pub struct VariableCreditDelay;

impl AdmissionFilter for VariableCreditDelay {
    fn name(&self) -> &'static str {
        "VariableCreditDelay"
    }

    fn admits(&self, course: &Course, context: &TermContext<'_>) -> bool {
        if !course.is_variable_credit() || context.index >= context.config.variable_credit_delay_terms {
            return true;
        }
        context
            .catalog
            .rule(&course.code)
            .is_some_and(|rule| !rule.is_empty())
    }

    fn description(&self) -> &'static str {
        "Open-ended variable-credit courses wait for early terms to pass"
    }
}

/// Requires every strict OR-group to have a completed member.
///
/// Checks both the group-counted remaining indegree and the rule itself;
/// the two agree unless the state was built from a different catalog.
#[derive(Debug, Clone, Copy)]
pub struct StrictPrerequisites;

impl AdmissionFilter for StrictPrerequisites {
    fn name(&self) -> &'static str {
        "StrictPrerequisites"
    }

    fn admits(&self, course: &Course, context: &TermContext<'_>) -> bool {
        let state = context.state;
        state.remaining_groups(&course.code) == 0
            && context
                .catalog
                .rule(&course.code)
                .is_none_or(|rule| rule.strict_satisfied(state.completed()))
    }

    fn description(&self) -> &'static str {
        "Strict prerequisites completed in an earlier term"
    }
}

/// The built-in filters in their fixed order.
pub fn default_filters() -> Vec<Box<dyn AdmissionFilter>> {
    vec![
        Box::new(NotCompleted),
        Box::new(Offered),
        Box::new(NotExcluded),
        Box::new(IntroExclusive),
        Box::new(DeferredToFinal),
        Box::new(HasCredit),
        Box::new(VariableCreditDelay),
        Box::new(StrictPrerequisites),
    ]
}
