use crate::ScheduleStore;
use serde_json::Error as SerdeJsonError;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum PersistenceError {
    Serialization(SerdeJsonError),
    Io(io::Error),
    Csv(csv::Error),
    InvalidData(String),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Serialization(err) => write!(f, "serialization error: {err}"),
            PersistenceError::Io(err) => write!(f, "io error: {err}"),
            PersistenceError::Csv(err) => write!(f, "csv error: {err}"),
            PersistenceError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<SerdeJsonError> for PersistenceError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Serialization(value)
    }
}

impl From<io::Error> for PersistenceError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for PersistenceError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Outcome of ingesting a data directory.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub files_found: Vec<PathBuf>,
    pub inserted: usize,
    pub duplicates: usize,
    pub failed: Vec<(PathBuf, PersistenceError)>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Loads every `*.csv` and then every `*.json` file in `dir` into `store`.
/// A file that fails to parse is skipped as a whole; exact duplicates of
/// records already in the store are not inserted again.
pub fn load_directory<P: AsRef<Path>>(
    store: &mut ScheduleStore,
    dir: P,
) -> PersistenceResult<LoadReport> {
    let dir = dir.as_ref();
    let mut report = LoadReport::default();
    for extension in ["csv", "json"] {
        for path in files_with_extension(dir, extension)? {
            log::info!("found {}", path.display());
            report.files_found.push(path.clone());
            let parsed = match extension {
                "csv" => file::load_csv_file(&path),
                _ => file::load_json_file(&path),
            };
            match parsed {
                Ok(records) => {
                    for record in records {
                        if !store.new_booking(&record.name, record.start, record.end) {
                            report.duplicates += 1;
                            continue;
                        }
                        match store.add_record(record) {
                            Ok(()) => report.inserted += 1,
                            Err(err) => log::warn!("{}: skipped record: {err}", path.display()),
                        }
                    }
                }
                Err(err) => {
                    log::warn!("{} upload failed: {err}", path.display());
                    report.failed.push((path, err));
                }
            }
        }
    }
    Ok(report)
}

fn files_with_extension(dir: &Path, extension: &str) -> PersistenceResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

pub mod file;

pub use file::{load_csv_file, load_json_file, make_backup, save_csv, save_json};
