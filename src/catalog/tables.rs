//! Tab-separated catalog tables.
//!
//! The ingestion layer hands the catalog four tables, one row per line:
//!
//! | Table | Row |
//! |-------|-----|
//! | Credits | `code  creditSpec` (`3`, `3.5`, `1,2,3`) |
//! | Offerings | `code  fall(0/1)  spring(0/1)` |
//! | Prerequisites | `prereq  course  flag(-1 strict / 0 concurrent)  [line]` |
//! | Timings | `code  [term]  sections  sessions  (crn start end)×sessions` |
//!
//! # OR-Grouping
//! One requirement line is one OR-group. Rows with the same course, flag
//! and `line` label are alternatives of a single group. Without a `line`
//! column every row is its own line, so each listed prerequisite is
//! mandatory.
//!
//! Loading is best-effort: a malformed row, or one that references a
//! course missing from the catalog, is skipped and reported; the rest of
//! the table still loads.

use std::collections::HashMap;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use super::CourseCatalog;
use crate::error::{RowError, SkippedRow};
use crate::models::{
    CourseCode, MeetingInterval, Offerings, OrGroup, PrerequisiteRelation, Season, Section,
};

/// Outcome of loading one or more tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Rows applied to the catalog.
    pub accepted: usize,
    /// Rows rejected, with reasons.
    pub skipped: Vec<SkippedRow>,
}

impl LoadReport {
    /// Whether every row was accepted.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Folds another report into this one.
    pub fn merge(&mut self, other: LoadReport) {
        self.accepted += other.accepted;
        self.skipped.extend(other.skipped);
    }

    fn skip(&mut self, table: &'static str, line: usize, error: RowError) {
        tracing::warn!(table, line, %error, "skipping catalog row");
        self.skipped.push(SkippedRow { line, error });
    }
}

/// File locations of the four catalog tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSources {
    /// Credits table; the only one that creates courses.
    pub credits: PathBuf,
    /// Offerings table.
    pub offerings: PathBuf,
    /// Prerequisites table.
    pub prerequisites: PathBuf,
    /// Optional; without it no course has meeting times.
    pub timings: Option<PathBuf>,
}

impl CatalogSources {
    /// Creates sources without a timings table.
    pub fn new(
        credits: impl Into<PathBuf>,
        offerings: impl Into<PathBuf>,
        prerequisites: impl Into<PathBuf>,
    ) -> Self {
        Self {
            credits: credits.into(),
            offerings: offerings.into(),
            prerequisites: prerequisites.into(),
            timings: None,
        }
    }

    /// Sets the timings table.
    pub fn with_timings(mut self, timings: impl Into<PathBuf>) -> Self {
        self.timings = Some(timings.into());
        self
    }
}

impl CourseCatalog {
    /// Builds a catalog from table files, in dependency order: credits,
    /// offerings, prerequisites, timings.
    pub fn from_sources(sources: &CatalogSources) -> io::Result<(Self, LoadReport)> {
        let mut catalog = Self::new();
        let mut report = catalog.load_credits(open(&sources.credits)?)?;
        report.merge(catalog.load_offerings(open(&sources.offerings)?)?);
        report.merge(catalog.load_prerequisites(open(&sources.prerequisites)?)?);
        if let Some(timings) = &sources.timings {
            report.merge(catalog.load_timings(open(timings)?)?);
        }
        tracing::info!(
            courses = catalog.len(),
            accepted = report.accepted,
            skipped = report.skipped.len(),
            "catalog loaded"
        );
        Ok((catalog, report))
    }

    /// Loads `code<TAB>creditSpec` rows. Creates missing courses.
    pub fn load_credits<R: BufRead>(&mut self, reader: R) -> io::Result<LoadReport> {
        let mut report = LoadReport::default();
        for (line_no, fields) in rows(reader)? {
            match fields.and_then(|f| parse_credit_row(&f)) {
                Ok((code, credits)) => {
                    self.set_credits(&code, credits);
                    report.accepted += 1;
                }
                Err(e) => report.skip("credits", line_no, e),
            }
        }
        Ok(report)
    }

    /// Loads `code<TAB>fall<TAB>spring` rows for existing courses.
    pub fn load_offerings<R: BufRead>(&mut self, reader: R) -> io::Result<LoadReport> {
        let mut report = LoadReport::default();
        for (line_no, fields) in rows(reader)? {
            let applied = fields
                .and_then(|f| parse_offering_row(&f))
                .and_then(|(code, offerings)| self.set_offerings(&code, offerings));
            match applied {
                Ok(()) => report.accepted += 1,
                Err(e) => report.skip("offerings", line_no, e),
            }
        }
        Ok(report)
    }

    /// Loads `prereq<TAB>course<TAB>flag[<TAB>line]` rows, grouping rows of
    /// one requirement line into one OR-group.
    pub fn load_prerequisites<R: BufRead>(&mut self, reader: R) -> io::Result<LoadReport> {
        let mut report = LoadReport::default();
        let mut groups: Vec<PendingGroup> = Vec::new();
        let mut by_key: HashMap<(CourseCode, bool, GroupLabel), usize> = HashMap::new();

        for (line_no, fields) in rows(reader)? {
            let row = match fields.and_then(|f| self.parse_prerequisite_row(&f)) {
                Ok(row) => row,
                Err(e) => {
                    report.skip("prerequisites", line_no, e);
                    continue;
                }
            };

            let label = row.line.map_or(GroupLabel::Row(line_no), GroupLabel::Labelled);
            let key = (row.course.clone(), row.strict, label);
            let slot = *by_key.entry(key).or_insert_with(|| {
                groups.push(PendingGroup {
                    first_line: line_no,
                    course: row.course.clone(),
                    strict: row.strict,
                    members: OrGroup::new(),
                    rows: 0,
                });
                groups.len() - 1
            });
            groups[slot].members.insert(row.prereq);
            groups[slot].rows += 1;
        }

        for group in groups {
            let relation = if group.strict {
                PrerequisiteRelation::Strict(group.members)
            } else {
                PrerequisiteRelation::Concurrent(group.members)
            };
            match self.add_requirement(&group.course, relation) {
                Ok(()) => report.accepted += group.rows,
                Err(e) => report.skip("prerequisites", group.first_line, e),
            }
        }
        Ok(report)
    }

    /// Loads timing rows. Sessions sharing a CRN become one section; rows
    /// without a term apply to every season.
    pub fn load_timings<R: BufRead>(&mut self, reader: R) -> io::Result<LoadReport> {
        let mut report = LoadReport::default();
        for (line_no, fields) in rows(reader)? {
            let applied = fields
                .and_then(|f| parse_timing_row(&f))
                .and_then(|(code, season, sections)| {
                    if !self.contains(&code) {
                        return Err(RowError::UnknownCourse(code.to_string()));
                    }
                    for section in sections {
                        self.add_section(&code, season, section)?;
                    }
                    Ok(())
                });
            match applied {
                Ok(()) => report.accepted += 1,
                Err(e) => report.skip("timings", line_no, e),
            }
        }
        Ok(report)
    }

    fn parse_prerequisite_row(&self, fields: &[String]) -> Result<PrerequisiteRow, RowError> {
        if fields.len() != 3 && fields.len() != 4 {
            return Err(field_count("3 or 4", fields));
        }
        let prereq = CourseCode::parse(&fields[0])?;
        let course = CourseCode::parse(&fields[1])?;
        let strict = match fields[2].trim() {
            "-1" => true,
            "0" => false,
            other => return Err(RowError::InvalidFlag(other.to_string())),
        };
        if prereq == course {
            return Err(RowError::SelfReference(course.to_string()));
        }
        for code in [&prereq, &course] {
            if !self.contains(code) {
                return Err(RowError::UnknownCourse(code.to_string()));
            }
        }
        let line = fields
            .get(3)
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        Ok(PrerequisiteRow {
            prereq,
            course,
            strict,
            line,
        })
    }
}

struct PrerequisiteRow {
    prereq: CourseCode,
    course: CourseCode,
    strict: bool,
    line: Option<String>,
}

/// Identity of a requirement line: the `line` column when present,
/// otherwise the row itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupLabel {
    Labelled(String),
    Row(usize),
}

struct PendingGroup {
    first_line: usize,
    course: CourseCode,
    strict: bool,
    members: OrGroup,
    rows: usize,
}

fn open(path: &Path) -> io::Result<io::BufReader<std::fs::File>> {
    Ok(io::BufReader::new(std::fs::File::open(path)?))
}

/// Non-blank lines split on tabs, with 1-based line numbers.
///
/// A line that is not UTF-8 yields `RowError::InvalidEncoding` for that
/// line only; `Err` is reserved for read failures.
fn rows<R: BufRead>(reader: R) -> io::Result<Vec<(usize, Result<Vec<String>, RowError>)>> {
    let mut out = Vec::new();
    for (i, bytes) in reader.split(b'\n').enumerate() {
        let line_no = i + 1;
        let Ok(line) = String::from_utf8(bytes?) else {
            out.push((line_no, Err(RowError::InvalidEncoding)));
            continue;
        };
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        out.push((line_no, Ok(line.split('\t').map(str::to_string).collect())));
    }
    Ok(out)
}

fn field_count(expected: &str, fields: &[impl AsRef<str>]) -> RowError {
    RowError::FieldCount {
        expected: expected.to_string(),
        found: fields.len(),
    }
}

fn parse_credit_row(fields: &[String]) -> Result<(CourseCode, Vec<f64>), RowError> {
    if fields.len() != 2 {
        return Err(field_count("2", fields));
    }
    let code = CourseCode::parse(&fields[0])?;
    let credits = fields[1]
        .split(',')
        .map(|c| {
            let c = c.trim();
            c.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .ok_or_else(|| RowError::InvalidNumber(c.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((code, credits))
}

fn parse_offering_row(fields: &[String]) -> Result<(CourseCode, Offerings), RowError> {
    if fields.len() != 3 {
        return Err(field_count("3", fields));
    }
    let code = CourseCode::parse(&fields[0])?;
    Ok((
        code,
        Offerings {
            fall: parse_flag(&fields[1])?,
            spring: parse_flag(&fields[2])?,
        },
    ))
}

fn parse_flag(raw: &str) -> Result<bool, RowError> {
    match raw.trim() {
        "1" => Ok(true),
        "0" => Ok(false),
        other => Err(RowError::InvalidNumber(other.to_string())),
    }
}

fn parse_count(raw: &str) -> Result<usize, RowError> {
    raw.trim()
        .parse()
        .map_err(|_| RowError::InvalidNumber(raw.trim().to_string()))
}

fn parse_minute(raw: &str) -> Result<u32, RowError> {
    raw.trim()
        .parse()
        .map_err(|_| RowError::InvalidNumber(raw.trim().to_string()))
}

fn parse_timing_row(
    fields: &[String],
) -> Result<(CourseCode, Option<Season>, Vec<Section>), RowError> {
    if fields.len() < 3 {
        return Err(field_count("at least 3", fields));
    }
    let code = CourseCode::parse(&fields[0])?;
    let season = Season::parse(&fields[1]);
    let base = if season.is_some() { 2 } else { 1 };
    if fields.len() < base + 2 {
        return Err(field_count(&format!("at least {}", base + 2), fields));
    }

    let declared = parse_count(&fields[base])?;
    let sessions = parse_count(&fields[base + 1])?;
    let expected = base + 2 + sessions * 3;
    if fields.len() != expected {
        return Err(field_count(&expected.to_string(), fields));
    }

    let mut sections: Vec<Section> = Vec::new();
    for chunk in fields[base + 2..expected].chunks(3) {
        let crn = chunk[0].trim();
        let start = parse_minute(&chunk[1])?;
        let end = parse_minute(&chunk[2])?;
        if end <= start {
            return Err(RowError::InvalidNumber(format!("{start}-{end}")));
        }
        match sections.iter_mut().find(|s| s.crn == crn) {
            Some(section) => section.intervals.push(MeetingInterval::new(start, end)),
            None => sections.push(Section::new(crn).with_interval(start, end)),
        }
    }
    if sections.len() != declared {
        return Err(RowError::SectionCount {
            declared,
            found: sections.len(),
        });
    }
    Ok((code, season, sections))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CourseCode {
        CourseCode::parse(s).unwrap()
    }

    fn loaded(credits: &str) -> CourseCatalog {
        let mut catalog = CourseCatalog::new();
        let report = catalog.load_credits(credits.as_bytes()).unwrap();
        assert!(report.is_clean(), "{:?}", report.skipped);
        catalog
    }

    const CREDITS: &str = "CS___107\t4\nCS___111\t3\nCS___113\t3\nCS___141\t3\nCS___211\t3\nMATH_180\t5\nPHYS_141\t4\n";

    #[test]
    fn test_load_credits_variants() {
        let mut catalog = CourseCatalog::new();
        let report = catalog
            .load_credits("CS___141\t3\nCS___499\t1,2,3\nCS___301\t3.5\nCS___302\t???\nCS___303\n".as_bytes())
            .unwrap();

        assert_eq!(report.accepted, 3);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.skipped[0].line, 4);
        assert_eq!(report.skipped[0].error, RowError::InvalidNumber("???".into()));
        assert!(matches!(report.skipped[1].error, RowError::FieldCount { found: 1, .. }));

        assert_eq!(catalog.course(&code("CS___499")).unwrap().credit_options, vec![1.0, 2.0, 3.0]);
        assert_eq!(catalog.course(&code("CS___301")).unwrap().max_credits(), 3.5);
        assert!(!catalog.contains(&code("CS___302")));
    }

    #[test]
    fn test_load_offerings_drops_unknown_course() {
        let mut catalog = loaded(CREDITS);
        let report = catalog
            .load_offerings("CS___141\t1\t0\nCS___999\t1\t1\nCS___211\tyes\t1\n".as_bytes())
            .unwrap();

        assert_eq!(report.accepted, 1);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.skipped[0].error, RowError::UnknownCourse("CS___999".into()));
        assert_eq!(catalog.course(&code("CS___141")).unwrap().offerings, Offerings::fall_only());
        assert!(!catalog.contains(&code("CS___999")));
    }

    #[test]
    fn test_prerequisite_rows_without_line_are_mandatory() {
        let mut catalog = loaded(CREDITS);
        let report = catalog
            .load_prerequisites("CS___141\tCS___211\t-1\nMATH_180\tCS___211\t-1\n".as_bytes())
            .unwrap();

        assert_eq!(report.accepted, 2);
        assert_eq!(catalog.indegree(&code("CS___211")), 2);
        assert_eq!(catalog.rule(&code("CS___211")).unwrap().strict.len(), 2);
    }

    #[test]
    fn test_prerequisite_rows_sharing_line_form_or_group() {
        let mut catalog = loaded(CREDITS);
        let table = "CS___107\tCS___141\t-1\tintro\n\
                     CS___111\tCS___141\t-1\tintro\n\
                     CS___113\tCS___141\t-1\tintro\n\
                     MATH_180\tPHYS_141\t0\n";
        let report = catalog.load_prerequisites(table.as_bytes()).unwrap();

        assert!(report.is_clean());
        assert_eq!(report.accepted, 4);
        assert_eq!(catalog.indegree(&code("CS___141")), 1);
        let rule = catalog.rule(&code("CS___141")).unwrap();
        assert_eq!(rule.strict.len(), 1);
        assert_eq!(rule.strict[0].len(), 3);

        assert_eq!(catalog.indegree(&code("PHYS_141")), 0);
        assert_eq!(catalog.rule(&code("PHYS_141")).unwrap().concurrent.len(), 1);
    }

    #[test]
    fn test_prerequisite_bad_rows_skipped() {
        let mut catalog = loaded(CREDITS);
        let table = "CS___141\tCS___211\t2\n\
                     CS___211\tCS___211\t-1\n\
                     CS___999\tCS___211\t-1\n\
                     CS___141\tCS___211\n\
                     CS___141\tCS___211\t-1\n";
        let report = catalog.load_prerequisites(table.as_bytes()).unwrap();

        assert_eq!(report.accepted, 1);
        let errors: Vec<&RowError> = report.skipped.iter().map(|s| &s.error).collect();
        assert_eq!(errors[0], &RowError::InvalidFlag("2".into()));
        assert_eq!(errors[1], &RowError::SelfReference("CS___211".into()));
        assert_eq!(errors[2], &RowError::UnknownCourse("CS___999".into()));
        assert!(matches!(errors[3], RowError::FieldCount { .. }));
        assert_eq!(catalog.indegree(&code("CS___211")), 1);
    }

    #[test]
    fn test_load_timings_groups_sessions_by_crn() {
        let mut catalog = loaded(CREDITS);
        let table = "CS___141\t2\t3\t101\t540\t590\t101\t3420\t3470\t102\t600\t650\n\
                     CS___211\tspring\t1\t1\t201\t800\t850\n\
                     CS___999\t1\t1\t1\t540\t590\n\
                     CS___211\tfall\t1\t2\t202\t800\t850\n\
                     MATH_180\t1\t1\t301\t700\t650\n";
        let report = catalog.load_timings(table.as_bytes()).unwrap();

        assert_eq!(report.accepted, 2);
        assert_eq!(report.skipped.len(), 3);

        let cs141 = catalog.course(&code("CS___141")).unwrap();
        assert_eq!(cs141.sections.len(), 2);
        assert_eq!(
            catalog.meetings(&code("CS___141"), Season::Fall),
            &[MeetingInterval::new(540, 590), MeetingInterval::new(3420, 3470)]
        );
        assert_eq!(
            catalog.meetings(&code("CS___211"), Season::Spring),
            &[MeetingInterval::new(800, 850)]
        );
        assert!(catalog.meetings(&code("CS___211"), Season::Fall).is_empty());
    }

    #[test]
    fn test_blank_lines_ignored_and_line_numbers_kept() {
        let mut catalog = CourseCatalog::new();
        let report = catalog
            .load_credits("\nCS___141\t3\r\n\nbad\t3\n".as_bytes())
            .unwrap();
        assert_eq!(report.accepted, 1);
        assert_eq!(report.skipped[0].line, 4);
    }

    #[test]
    fn test_invalid_utf8_line_skipped() {
        let mut catalog = CourseCatalog::new();
        let report = catalog
            .load_credits(&b"CS___141\t3\nCS___1\xff1\t3\nCS___151\t4\n"[..])
            .unwrap();

        assert_eq!(report.accepted, 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].line, 2);
        assert_eq!(report.skipped[0].error, RowError::InvalidEncoding);
        assert!(catalog.contains(&code("CS___141")));
        assert!(catalog.contains(&code("CS___151")));
    }

    #[test]
    fn test_timing_row_field_count_is_exact() {
        let mut catalog = loaded(CREDITS);
        let table = "CS___141\t1\t1\t101\t540\t590\tjunk\t9\n\
                     CS___211\t2\t1\t201\t540\t590\n\
                     MATH_180\t1\t2\t301\t540\t590\t302\t600\t650\n\
                     PHYS_141\t1\t2\t401\t540\t590\t401\t3420\t3470\n";
        let report = catalog.load_timings(table.as_bytes()).unwrap();

        assert_eq!(report.accepted, 1);
        let errors: Vec<&RowError> = report.skipped.iter().map(|s| &s.error).collect();
        assert_eq!(
            errors[0],
            &RowError::FieldCount {
                expected: "6".into(),
                found: 8
            }
        );
        assert_eq!(errors[1], &RowError::SectionCount { declared: 2, found: 1 });
        assert_eq!(errors[2], &RowError::SectionCount { declared: 1, found: 2 });
        assert!(catalog.meetings(&code("CS___141"), Season::Fall).is_empty());
        assert_eq!(catalog.meetings(&code("PHYS_141"), Season::Fall).len(), 2);
    }

    #[test]
    fn test_row_groups_do_not_merge_with_hash_labels() {
        let mut catalog = loaded(CREDITS);
        // Row 2 has no line column; "#2" is an unrelated user label.
        let table = "CS___107\tCS___211\t-1\t#2\n\
                     CS___111\tCS___211\t-1\n";
        let report = catalog.load_prerequisites(table.as_bytes()).unwrap();

        assert!(report.is_clean());
        assert_eq!(catalog.indegree(&code("CS___211")), 2);
    }

    #[test]
    fn test_from_sources_missing_file() {
        let sources = CatalogSources::new("/nonexistent/credits", "/nonexistent/o", "/nonexistent/p");
        assert!(CourseCatalog::from_sources(&sources).is_err());
    }
}
