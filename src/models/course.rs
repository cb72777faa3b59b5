//! Course model.
//!
//! A course carries its credit options, the seasons it is offered in,
//! and the meeting sections registered for it.
//!
//! # Time Model
//! Meeting times are minutes elapsed since the start of a canonical
//! Monday (Monday 09:00 = 540, Tuesday 09:00 = 1980). Intervals are
//! half-open: `[start, end)`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::CourseCode;

/// Academic term season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Fall,
    Spring,
}

impl Season {
    /// The season that follows this one.
    pub fn next(self) -> Self {
        match self {
            Season::Fall => Season::Spring,
            Season::Spring => Season::Fall,
        }
    }

    /// Parses `fall` / `spring` (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fall" => Some(Season::Fall),
            "spring" => Some(Season::Spring),
            _ => None,
        }
    }

    /// Lowercase label.
    pub fn label(self) -> &'static str {
        match self {
            Season::Fall => "fall",
            Season::Spring => "spring",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Seasons in which a course is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offerings {
    pub fall: bool,
    pub spring: bool,
}

impl Offerings {
    /// Offered every term.
    pub fn both() -> Self {
        Self {
            fall: true,
            spring: true,
        }
    }

    /// Offered in fall only.
    pub fn fall_only() -> Self {
        Self {
            fall: true,
            spring: false,
        }
    }

    /// Offered in spring only.
    pub fn spring_only() -> Self {
        Self {
            fall: false,
            spring: true,
        }
    }

    /// Whether the course runs in `season`.
    #[inline]
    pub fn includes(&self, season: Season) -> bool {
        match season {
            Season::Fall => self.fall,
            Season::Spring => self.spring,
        }
    }
}

impl Default for Offerings {
    fn default() -> Self {
        Self::both()
    }
}

/// A weekly meeting interval `[start_minute, end_minute)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingInterval {
    /// Start (minutes since Monday 00:00, inclusive).
    pub start_minute: u32,
    /// End (minutes since Monday 00:00, exclusive).
    pub end_minute: u32,
}

impl MeetingInterval {
    /// Creates a new interval.
    pub fn new(start_minute: u32, end_minute: u32) -> Self {
        Self {
            start_minute,
            end_minute,
        }
    }

    /// Length in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> u32 {
        self.end_minute.saturating_sub(self.start_minute)
    }

    /// Whether two intervals overlap. Touching intervals do not.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_minute < other.end_minute && other.start_minute < self.end_minute
    }
}

/// One scheduled section of a course, identified by its CRN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Course reference number.
    pub crn: String,
    /// Weekly sessions of this section.
    pub intervals: Vec<MeetingInterval>,
}

impl Section {
    /// Creates an empty section.
    pub fn new(crn: impl Into<String>) -> Self {
        Self {
            crn: crn.into(),
            intervals: Vec::new(),
        }
    }

    /// Adds a session.
    pub fn with_interval(mut self, start_minute: u32, end_minute: u32) -> Self {
        self.intervals
            .push(MeetingInterval::new(start_minute, end_minute));
        self
    }
}

/// A catalog course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Normalized course code.
    pub code: CourseCode,
    /// Allowed credit values, ascending. More than one = variable credit.
    pub credit_options: Vec<f64>,
    /// Seasons offered.
    pub offerings: Offerings,
    /// Sections registered for a specific season.
    pub seasonal_sections: BTreeMap<Season, Vec<Section>>,
    /// Sections that apply to every season the course is offered in.
    pub sections: Vec<Section>,
}

impl Course {
    /// Creates a course with no credits, offered every term.
    pub fn new(code: CourseCode) -> Self {
        Self {
            code,
            credit_options: Vec::new(),
            offerings: Offerings::both(),
            seasonal_sections: BTreeMap::new(),
            sections: Vec::new(),
        }
    }

    /// Sets the credit options (sorted and deduplicated).
    pub fn with_credits(mut self, options: impl IntoIterator<Item = f64>) -> Self {
        self.set_credit_options(options);
        self
    }

    /// Sets the offered seasons.
    pub fn with_offerings(mut self, offerings: Offerings) -> Self {
        self.offerings = offerings;
        self
    }

    /// Adds a section used in every season.
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Adds a section used only in `season`.
    pub fn with_seasonal_section(mut self, season: Season, section: Section) -> Self {
        self.seasonal_sections
            .entry(season)
            .or_default()
            .push(section);
        self
    }

    /// Replaces the credit options.
    pub fn set_credit_options(&mut self, options: impl IntoIterator<Item = f64>) {
        let mut options: Vec<f64> = options.into_iter().filter(|c| c.is_finite()).collect();
        options.sort_by(|a, b| a.total_cmp(b));
        options.dedup();
        self.credit_options = options;
    }

    /// Largest credit option, `0.0` if none.
    pub fn max_credits(&self) -> f64 {
        self.credit_options.last().copied().unwrap_or(0.0)
    }

    /// Whether the course offers more than one credit value.
    pub fn is_variable_credit(&self) -> bool {
        self.credit_options.len() > 1
    }

    /// Representative meeting intervals for `season`.
    ///
    /// The first season-specific section wins; otherwise the first
    /// season-agnostic section. Empty when no timing is registered.
    pub fn meetings(&self, season: Season) -> &[MeetingInterval] {
        self.seasonal_sections
            .get(&season)
            .and_then(|s| s.first())
            .or_else(|| self.sections.first())
            .map(|s| s.intervals.as_slice())
            .unwrap_or(&[])
    }
}
