//! Meeting-time conflict detection.
//!
//! Two courses conflict in a season when any pair of their representative
//! intervals overlaps (half-open, `s1 < e2 && s2 < e1`). A course with no
//! registered timing never conflicts.

use crate::catalog::CourseCatalog;
use crate::models::{CourseCode, Season};

/// Whether `a` and `b` overlap in `season`.
pub fn courses_conflict(catalog: &CourseCatalog, season: Season, a: &CourseCode, b: &CourseCode) -> bool {
    let first = catalog.meetings(a, season);
    let second = catalog.meetings(b, season);
    first
        .iter()
        .any(|x| second.iter().any(|y| x.overlaps(y)))
}

/// First course in `admitted` that overlaps `candidate` in `season`.
pub fn find_conflict<'a>(
    catalog: &CourseCatalog,
    season: Season,
    candidate: &CourseCode,
    admitted: impl IntoIterator<Item = &'a CourseCode>,
) -> Option<&'a CourseCode> {
    if catalog.meetings(candidate, season).is_empty() {
        return None;
    }
    admitted
        .into_iter()
        .find(|other| courses_conflict(catalog, season, candidate, other))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, Section};

    fn code(s: &str) -> CourseCode {
        CourseCode::parse(s).unwrap()
    }

    fn catalog() -> CourseCatalog {
        let course = |s: &str| Course::new(code(s)).with_credits([3.0]);
        CourseCatalog::new()
            .with_course(course("CS___141").with_section(Section::new("10001").with_interval(540, 600)))
            .with_course(course("CS___151").with_section(Section::new("10002").with_interval(580, 640)))
            .with_course(course("CS___211").with_section(Section::new("10003").with_interval(600, 650)))
            .with_course(
                course("CS___251")
                    .with_seasonal_section(Season::Spring, Section::new("20001").with_interval(560, 570)),
            )
            .with_course(course("CS___261"))
    }

    #[test]
    fn test_overlap_detected() {
        let catalog = catalog();
        assert!(courses_conflict(&catalog, Season::Fall, &code("CS___141"), &code("CS___151")));
        // Touching endpoints do not overlap.
        assert!(!courses_conflict(&catalog, Season::Fall, &code("CS___141"), &code("CS___211")));
    }

    #[test]
    fn test_seasonal_timing() {
        let catalog = catalog();
        assert!(!courses_conflict(&catalog, Season::Fall, &code("CS___141"), &code("CS___251")));
        assert!(courses_conflict(&catalog, Season::Spring, &code("CS___141"), &code("CS___251")));
    }

    #[test]
    fn test_find_first_conflict() {
        let catalog = catalog();
        let admitted = [code("CS___211"), code("CS___151"), code("CS___141")];
        assert_eq!(
            find_conflict(&catalog, Season::Fall, &code("CS___141"), &admitted[..2]),
            Some(&code("CS___151"))
        );
        assert_eq!(
            find_conflict(&catalog, Season::Fall, &code("CS___261"), &admitted),
            None
        );
    }
}
