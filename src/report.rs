use crate::calendar::day_label;
use crate::reservation::{ReservationRecord, format_date};
use crate::schedule::ScheduleStore;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;

/// Requested range reaches past the records on file. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeWarning {
    BeforeFirstDate(NaiveDate),
    AfterLastDate(NaiveDate),
}

impl fmt::Display for RangeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeWarning::BeforeFirstDate(date) => {
                write!(f, "The first date on the schedule is {}", format_date(*date))
            }
            RangeWarning::AfterLastDate(date) => {
                write!(f, "The last date on the schedule is {}", format_date(*date))
            }
        }
    }
}

/// Records whose start date falls in an inclusive date range, grouped by day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSelection {
    pub days: BTreeMap<NaiveDate, Vec<ReservationRecord>>,
    pub warnings: Vec<RangeWarning>,
}

impl RangeSelection {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn records(&self) -> impl Iterator<Item = &ReservationRecord> {
        self.days.values().flatten()
    }
}

pub fn select_range(
    store: &ScheduleStore,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> RangeSelection {
    let mut warnings = Vec::new();
    if let Some(first) = store.first_date() {
        if start_date < first {
            warnings.push(RangeWarning::BeforeFirstDate(first));
        }
    }
    if let Some(last) = store.last_date() {
        if end_date > last {
            warnings.push(RangeWarning::AfterLastDate(last));
        }
    }
    for warning in &warnings {
        log::warn!("{warning}");
    }

    let mut days: BTreeMap<NaiveDate, Vec<ReservationRecord>> = BTreeMap::new();
    for record in store.iter() {
        let date = record.start_date();
        if start_date <= date && date <= end_date {
            days.entry(date).or_default().push(record.clone());
        }
    }
    for records in days.values_mut() {
        records.sort_by_key(|record| record.start);
    }

    RangeSelection { days, warnings }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayListing {
    pub date: NaiveDate,
    pub label: String,
    pub lines: Vec<String>,
}

/// Human readable schedule for a date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleListing {
    pub warnings: Vec<RangeWarning>,
    pub days: Vec<DayListing>,
}

impl ScheduleListing {
    pub fn build(selection: &RangeSelection, today: NaiveDate) -> Self {
        let days = selection
            .days
            .iter()
            .map(|(date, records)| DayListing {
                date: *date,
                label: day_label(*date, today),
                lines: records.iter().map(ToString::to_string).collect(),
            })
            .collect();
        Self {
            warnings: selection.warnings.clone(),
            days,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl fmt::Display for ScheduleListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for warning in &self.warnings {
            writeln!(f, "{warning}")?;
        }
        if self.days.is_empty() {
            return writeln!(f, "no reservations on selected dates");
        }
        for day in &self.days {
            writeln!(f, "{}", day.label)?;
            for line in &day.lines {
                writeln!(f, "\t*{line}")?;
            }
        }
        Ok(())
    }
}
