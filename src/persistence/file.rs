use super::{PersistenceError, PersistenceResult};
use crate::report::{RangeSelection, RangeWarning};
use crate::reservation::{
    DATE_TIME_FORMAT, ReservationRecord, format_date, format_date_time, format_time,
};
use crate::ScheduleStore;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::Path;

const CSV_HEADER: [&str; 3] = ["Name", " start_time", " end_time"];

/// Year assumed for JSON day keys written as a bare `DD.MM`.
pub const DEFAULT_JSON_YEAR: i32 = 2023;

#[derive(Debug, Serialize, Deserialize)]
struct JsonReservation {
    name: String,
    start_time: String,
    end_time: String,
}

impl From<&ReservationRecord> for JsonReservation {
    fn from(record: &ReservationRecord) -> Self {
        Self {
            name: record.name.clone(),
            start_time: format_time(record.start),
            end_time: format_time(record.end),
        }
    }
}

/// Day-keyed JSON document, written in date order.
struct JsonDays<'a>(&'a BTreeMap<NaiveDate, Vec<ReservationRecord>>);

impl Serialize for JsonDays<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (date, records) in self.0 {
            let rows: Vec<JsonReservation> = records.iter().map(JsonReservation::from).collect();
            map.serialize_entry(&format_date(*date), &rows)?;
        }
        map.end()
    }
}

/// Parses a whole CSV file. Nothing is returned unless every row parses.
pub fn load_csv_file<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<ReservationRecord>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file);

    let mut records = Vec::new();
    for (row_idx, row) in reader.records().enumerate() {
        let row = row?;
        let line = row_idx + 2;
        let field = |idx: usize, column: &str| {
            row.get(idx).ok_or_else(|| {
                PersistenceError::InvalidData(format!(
                    "{}: line {line} is missing {column}",
                    path.display()
                ))
            })
        };
        let name = field(0, "name")?;
        let start = parse_timestamp(path, line, field(1, "start_time")?)?;
        let end = parse_timestamp(path, line, field(2, "end_time")?)?;
        records.push(build_record(path, line, name, start, end)?);
    }
    Ok(records)
}

/// Parses a whole JSON file of `{"DD.MM.YYYY": [{name, start_time, end_time}]}`.
pub fn load_json_file<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<ReservationRecord>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let days: BTreeMap<String, Vec<JsonReservation>> = serde_json::from_reader(file)?;

    let mut records = Vec::new();
    for (key, rows) in days {
        let key = key.trim();
        let day = if key.len() == 10 {
            key.to_string()
        } else {
            format!("{key}.{DEFAULT_JSON_YEAR}")
        };
        for (row_idx, row) in rows.into_iter().enumerate() {
            let line = row_idx + 1;
            let start = parse_timestamp(
                path,
                line,
                &format!("{day} {}", row.start_time.trim()),
            )?;
            let mut end = parse_timestamp(path, line, &format!("{day} {}", row.end_time.trim()))?;
            // Times only carry the day of the key; an end before the start
            // ran past midnight.
            if end < start {
                end = end.checked_add_signed(Duration::days(1)).ok_or_else(|| {
                    PersistenceError::InvalidData(format!(
                        "{}: {day} entry {line} ends out of range",
                        path.display()
                    ))
                })?;
            }
            records.push(build_record(path, line, row.name.trim(), start, end)?);
        }
    }
    Ok(records)
}

fn parse_timestamp(path: &Path, line: usize, value: &str) -> PersistenceResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), DATE_TIME_FORMAT).map_err(|err| {
        PersistenceError::InvalidData(format!(
            "{}: line {line} has invalid date '{value}': {err}",
            path.display()
        ))
    })
}

fn build_record(
    path: &Path,
    line: usize,
    name: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> PersistenceResult<ReservationRecord> {
    ReservationRecord::new(name, start, end).map_err(|err| {
        PersistenceError::InvalidData(format!("{}: line {line}: {err}", path.display()))
    })
}

fn write_csv<'a, I>(path: &Path, records: I) -> PersistenceResult<()>
where
    I: IntoIterator<Item = &'a ReservationRecord>,
{
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.write_record([
            record.name.clone(),
            format!(" {}", format_date_time(record.start)),
            format!(" {}", format_date_time(record.end)),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the reservations starting within `[start_date, end_date]` as CSV.
pub fn save_csv<P: AsRef<Path>>(
    store: &ScheduleStore,
    start_date: NaiveDate,
    end_date: NaiveDate,
    path: P,
) -> PersistenceResult<Vec<RangeWarning>> {
    let selection = store.select_range(start_date, end_date);
    write_csv(path.as_ref(), selection.records())?;
    log::info!(
        "saved {} reservations to {}",
        selection.record_count(),
        path.as_ref().display()
    );
    Ok(selection.warnings)
}

/// Writes the reservations starting within `[start_date, end_date]` as
/// day-keyed JSON.
pub fn save_json<P: AsRef<Path>>(
    store: &ScheduleStore,
    start_date: NaiveDate,
    end_date: NaiveDate,
    path: P,
) -> PersistenceResult<Vec<RangeWarning>> {
    let selection = store.select_range(start_date, end_date);
    write_json(path.as_ref(), &selection)?;
    log::info!(
        "saved {} reservations to {}",
        selection.record_count(),
        path.as_ref().display()
    );
    Ok(selection.warnings)
}

fn write_json(path: &Path, selection: &RangeSelection) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(file, formatter);
    JsonDays(&selection.days).serialize(&mut serializer)?;
    Ok(())
}

/// Writes every reservation, in start order, to `path`.
pub fn make_backup<P: AsRef<Path>>(store: &ScheduleStore, path: P) -> PersistenceResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut records: Vec<&ReservationRecord> = store.iter().collect();
    records.sort_by_key(|record| record.start);
    write_csv(path, records)?;
    log::info!("backed up {} reservations to {}", store.len(), path.display());
    Ok(())
}
