use crate::schedule::ScheduleError;
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

/// Timestamp format used by every file format and prompt.
pub const DATE_TIME_FORMAT: &str = "%d.%m.%Y %H:%M";
pub const DATE_FORMAT: &str = "%d.%m.%Y";
pub const TIME_FORMAT: &str = "%H:%M";

/// One client booking of the court. `start` is inclusive, `end` exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRecord {
    pub name: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ReservationRecord {
    pub fn new(
        name: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, ScheduleError> {
        let record = Self {
            name: name.into(),
            start,
            end,
        };
        record.validate()?;
        Ok(record)
    }

    /// Rejects blank names and intervals that do not run forward.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.name.trim().is_empty() {
            return Err(ScheduleError::InvalidRecord(
                "reservation name must not be empty".into(),
            ));
        }
        if self.start >= self.end {
            return Err(ScheduleError::InvalidRecord(format!(
                "reservation for {} starts at {} but ends at {}",
                self.name,
                format_date_time(self.start),
                format_date_time(self.end)
            )));
        }
        Ok(())
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }

    /// True when `instant` lies in `[start, end)`.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn matches(&self, name: &str, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.name == name && self.start == start && self.end == end
    }
}

impl fmt::Display for ReservationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} - {}",
            self.name,
            format_date_time(self.start),
            format_date_time(self.end)
        )
    }
}

pub fn format_date_time(value: NaiveDateTime) -> String {
    value.format(DATE_TIME_FORMAT).to_string()
}

pub fn format_date(value: NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

pub fn format_time(value: NaiveDateTime) -> String {
    value.format(TIME_FORMAT).to_string()
}

pub fn parse_date_time(input: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(input.trim(), DATE_TIME_FORMAT)
}

pub fn parse_date(input: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
}
