//! Date validation and range normalization for APOD queries.
//!
//! APOD dates are `YYYY-MM-DD` strings bounded by the first archive entry
//! ([`ARCHIVE_START`]) and the server's current local date.

use chrono::{Local, NaiveDate};

/// Format accepted for every date query parameter.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// First day of the APOD archive.
pub const ARCHIVE_START: NaiveDate = match NaiveDate::from_ymd_opt(1995, 6, 16) {
    Some(date) => date,
    None => panic!("invalid archive start date"),
};

/// Current date on the server's local clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a `YYYY-MM-DD` string exactly; surrounding whitespace is rejected.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    if input.trim() != input {
        return None;
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT).ok()
}

/// Whether `date` lies within `[ARCHIVE_START, today]`.
pub fn in_archive(date: NaiveDate, today: NaiveDate) -> bool {
    ARCHIVE_START <= date && date <= today
}

/// Parse and bound-check an APOD date.
///
/// Returns `None` for unparseable input and for dates outside the archive.
pub fn validate_date(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    parse_date(input).filter(|date| in_archive(*date, today))
}

/// Outcome of checking one optional date parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateParam {
    /// Parameter missing or empty
    Absent,
    /// Parameter present and within the archive
    Valid(NaiveDate),
    /// Parameter present but unparseable or out of bounds
    Invalid,
}

impl DateParam {
    /// Classify a raw query value. Only an empty string counts as absent;
    /// whitespace is treated as a malformed date.
    pub fn check(raw: Option<&str>, today: NaiveDate) -> Self {
        match raw.filter(|s| !s.is_empty()) {
            None => DateParam::Absent,
            Some(s) => match validate_date(s, today) {
                Some(date) => DateParam::Valid(date),
                None => DateParam::Invalid,
            },
        }
    }

    /// The validated date, if any.
    pub fn date(self) -> Option<NaiveDate> {
        match self {
            DateParam::Valid(date) => Some(date),
            _ => None,
        }
    }
}

/// An inclusive, ordered APOD date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Result of normalizing a start/end pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeCheck {
    /// Validated start (after any swap)
    pub start: Option<NaiveDate>,
    /// Validated end (after any swap)
    pub end: Option<NaiveDate>,
    /// The start bound was given but rejected
    pub start_invalid: bool,
    /// The end bound was given but rejected
    pub end_invalid: bool,
    /// The bounds were inverted and have been swapped
    pub swapped: bool,
}

impl RangeCheck {
    /// The complete range, only when both bounds survived validation.
    pub fn range(&self) -> Option<DateRange> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(DateRange { start, end }),
            _ => None,
        }
    }
}

/// Validate both bounds independently, then order them.
pub fn normalize_range(start: Option<&str>, end: Option<&str>, today: NaiveDate) -> RangeCheck {
    let start_param = DateParam::check(start, today);
    let end_param = DateParam::check(end, today);

    let mut start = start_param.date();
    let mut end = end_param.date();
    let mut swapped = false;

    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            start = Some(e);
            end = Some(s);
            swapped = true;
        }
    }

    RangeCheck {
        start,
        end,
        start_invalid: start_param == DateParam::Invalid,
        end_invalid: end_param == DateParam::Invalid,
        swapped,
    }
}
