pub mod booking;
pub mod calculations;
pub mod calendar;
pub mod config;
pub mod logger;
pub mod persistence;
pub mod report;
pub mod reservation;
pub mod schedule;

pub use calculations::{Availability, SlotTier, WEEKLY_RESERVATION_LIMIT};
pub use config::BookingConfig;
pub use persistence::{
    LoadReport, PersistenceError, load_csv_file, load_directory, load_json_file, make_backup,
    save_csv, save_json,
};
pub use report::{DayListing, RangeSelection, RangeWarning, ScheduleListing};
pub use reservation::ReservationRecord;
pub use schedule::{ScheduleError, ScheduleStore};
