use log::LevelFilter;
use std::path::PathBuf;

pub const DATA_DIR_VAR: &str = "COURT_BOOKING_DATA_DIR";
pub const BACKUP_VAR: &str = "COURT_BOOKING_BACKUP";
pub const LOG_FILE_VAR: &str = "COURT_BOOKING_LOG_FILE";
pub const LOG_LEVEL_VAR: &str = "RUST_LOG";

const DEFAULT_DATA_DIR: &str = "schedule";
const BACKUP_FILE_NAME: &str = "last_session.csv";

/// Runtime settings for the booking CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingConfig {
    /// Directory scanned for `*.csv` and `*.json` schedules at startup.
    pub data_dir: PathBuf,
    /// File the whole schedule is written to on exit.
    pub backup_path: PathBuf,
    pub log_file: Option<PathBuf>,
    pub log_level: LevelFilter,
}

impl Default for BookingConfig {
    fn default() -> Self {
        let data_dir = PathBuf::from(DEFAULT_DATA_DIR);
        Self {
            backup_path: data_dir.join(BACKUP_FILE_NAME),
            data_dir,
            log_file: None,
            log_level: LevelFilter::Warn,
        }
    }
}

impl BookingConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = value(DATA_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let backup_path = value(BACKUP_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(BACKUP_FILE_NAME));
        let log_level = value(LOG_LEVEL_VAR)
            .and_then(|level| level.trim().parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Warn);

        Self {
            data_dir,
            backup_path,
            log_file: value(LOG_FILE_VAR).map(PathBuf::from),
            log_level,
        }
    }
}
