//! World calendar for event timestamps
//!
//! Legends exports stamp events with a year and an offset into that year
//! measured in "seconds72" ticks. A year has 12 months of 28 days; each
//! day is 1200 ticks. Three consecutive months form a season.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const TICKS_PER_DAY: i32 = 1200;
pub const DAYS_PER_MONTH: i32 = 28;
pub const TICKS_PER_MONTH: i32 = TICKS_PER_DAY * DAYS_PER_MONTH;
pub const MONTHS_PER_YEAR: i32 = 12;
pub const TICKS_PER_YEAR: i32 = TICKS_PER_MONTH * MONTHS_PER_YEAR;

const MONTH_NAMES: [&str; 12] = [
    "Granite",
    "Slate",
    "Felsite",
    "Hematite",
    "Malachite",
    "Galena",
    "Limestone",
    "Sandstone",
    "Timber",
    "Moonstone",
    "Opal",
    "Obsidian",
];

/// Seasons of the year, three months each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub fn from_month(month: i32) -> Self {
        match month.rem_euclid(MONTHS_PER_YEAR) {
            0..=2 => Season::Spring,
            3..=5 => Season::Summer,
            6..=8 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }
}

/// Early, mid or late part of a season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeasonPart {
    Early,
    Mid,
    Late,
}

impl SeasonPart {
    pub fn from_month(month: i32) -> Self {
        match month.rem_euclid(3) {
            0 => SeasonPart::Early,
            1 => SeasonPart::Mid,
            _ => SeasonPart::Late,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SeasonPart::Early => "early",
            SeasonPart::Mid => "mid",
            SeasonPart::Late => "late",
        }
    }
}

/// A point in world history
///
/// `year == -1` marks events from before recorded time and
/// `seconds72 == -1` an unknown offset within the year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    pub year: i32,
    pub seconds72: i32,
}

impl Timestamp {
    pub fn new(year: i32, seconds72: i32) -> Self {
        Self { year, seconds72 }
    }

    pub fn is_before_time(&self) -> bool {
        self.year < 0
    }

    pub fn has_offset(&self) -> bool {
        self.seconds72 >= 0
    }

    /// Zero-based month, if the in-year offset is known
    pub fn month(&self) -> Option<i32> {
        self.has_offset()
            .then(|| (self.seconds72 / TICKS_PER_MONTH).min(MONTHS_PER_YEAR - 1))
    }

    /// One-based day of the month, if the in-year offset is known
    pub fn day(&self) -> Option<i32> {
        self.has_offset()
            .then(|| (self.seconds72 % TICKS_PER_MONTH) / TICKS_PER_DAY + 1)
    }

    pub fn month_name(&self) -> Option<&'static str> {
        self.month().map(|m| MONTH_NAMES[m as usize])
    }

    pub fn season(&self) -> Option<(SeasonPart, Season)> {
        self.month()
            .map(|m| (SeasonPart::from_month(m), Season::from_month(m)))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_before_time() {
            return f.write_str("a time before time");
        }
        match self.season() {
            Some((part, season)) => {
                write!(f, "in the {} {} of {}", part.name(), season.name(), self.year)
            }
            None => write!(f, "in {}", self.year),
        }
    }
}

/// Describe a span such as a war's start and end
pub fn describe_span(start: Timestamp, end: Timestamp) -> String {
    if end.is_before_time() || end == start {
        return start.to_string();
    }
    format!("{} until {}", start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_of_year_is_early_spring() {
        let ts = Timestamp::new(125, 0);
        assert_eq!(ts.to_string(), "in the early spring of 125");
        assert_eq!(ts.month_name(), Some("Granite"));
        assert_eq!(ts.day(), Some(1));
    }

    #[test]
    fn test_late_winter() {
        let ts = Timestamp::new(3, TICKS_PER_YEAR - 1);
        assert_eq!(ts.season(), Some((SeasonPart::Late, Season::Winter)));
        assert_eq!(ts.month_name(), Some("Obsidian"));
        assert_eq!(ts.day(), Some(28));
    }

    #[test]
    fn test_unknown_offset_and_before_time() {
        assert_eq!(Timestamp::new(40, -1).to_string(), "in 40");
        assert_eq!(Timestamp::new(-1, -1).to_string(), "a time before time");
    }

    #[test]
    fn test_mid_summer() {
        let ts = Timestamp::new(7, 4 * TICKS_PER_MONTH + 5 * TICKS_PER_DAY);
        assert_eq!(ts.to_string(), "in the mid summer of 7");
        assert_eq!(ts.day(), Some(6));
    }

    #[test]
    fn test_span_collapses_open_end() {
        let start = Timestamp::new(10, 0);
        assert_eq!(describe_span(start, Timestamp::new(-1, -1)), start.to_string());
    }
}
