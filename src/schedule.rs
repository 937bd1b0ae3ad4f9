use crate::calculations::{Availability, AvailabilitySweep, WeeklyQuota};
use crate::report::{self, RangeSelection, ScheduleListing};
use crate::reservation::{ReservationRecord, format_date_time};
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Timestamp arithmetic left the representable date range.
    OutOfRange { instant: NaiveDateTime },
    IndexOutOfBounds { index: usize, len: usize },
    InvalidRecord(String),
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::OutOfRange { instant } => write!(
                f,
                "date {} is too far in the future",
                format_date_time(*instant)
            ),
            ScheduleError::IndexOutOfBounds { index, len } => {
                write!(f, "reservation index {index} out of bounds for {len} records")
            }
            ScheduleError::InvalidRecord(message) => write!(f, "invalid reservation: {message}"),
        }
    }
}

impl std::error::Error for ScheduleError {}

/// The court's reservations. Owned by the caller and handed to every
/// collaborator; records stay in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleStore {
    records: Vec<ReservationRecord>,
}

impl ScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ReservationRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReservationRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends a reservation. Availability and quota are the caller's job.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<(), ScheduleError> {
        self.add_record(ReservationRecord::new(name, start, end)?)
    }

    /// Appends an already built record after the same checks as
    /// [`ReservationRecord::new`].
    pub fn add_record(&mut self, record: ReservationRecord) -> Result<(), ScheduleError> {
        record.validate()?;
        log::info!("added reservation {record}");
        self.records.push(record);
        Ok(())
    }

    /// Removes the record at `index`. Indices come from
    /// [`ScheduleStore::reservation_exists`] and are invalidated by any
    /// other mutation.
    pub fn delete(&mut self, index: usize) -> Result<ReservationRecord, ScheduleError> {
        if index >= self.records.len() {
            return Err(ScheduleError::IndexOutOfBounds {
                index,
                len: self.records.len(),
            });
        }
        let removed = self.records.remove(index);
        log::info!("cancelled reservation {removed}");
        Ok(removed)
    }

    /// Position of the booking `name` holds starting exactly at `start`.
    pub fn reservation_exists(&self, name: &str, start: NaiveDateTime) -> Option<usize> {
        self.records
            .iter()
            .position(|record| record.name == name && record.start == start)
    }

    /// False when an identical record is already stored.
    pub fn new_booking(&self, name: &str, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        !self
            .records
            .iter()
            .any(|record| record.matches(name, start, end))
    }

    /// First bookable instant at or after `instant` and the free time from
    /// there.
    pub fn date_is_free(&self, instant: NaiveDateTime) -> Result<Availability, ScheduleError> {
        let availability = AvailabilitySweep::new(&self.records).execute(instant)?;
        log::debug!(
            "availability for {}: {} ({})",
            format_date_time(instant),
            format_date_time(availability.start),
            availability.tier
        );
        Ok(availability)
    }

    /// True once `name` holds the weekly limit of bookings in the week of
    /// `instant`. Evaluate before adding the candidate booking.
    pub fn too_many_reservation(&self, name: &str, instant: NaiveDateTime) -> bool {
        WeeklyQuota::new(&self.records).is_exhausted(name, instant)
    }

    /// Earliest start date on file.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.iter().map(ReservationRecord::start_date).min()
    }

    /// Latest end date on file.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.iter().map(ReservationRecord::end_date).max()
    }

    pub fn select_range(&self, start_date: NaiveDate, end_date: NaiveDate) -> RangeSelection {
        report::select_range(self, start_date, end_date)
    }

    pub fn print_schedule_output(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        today: NaiveDate,
    ) -> ScheduleListing {
        ScheduleListing::build(&self.select_range(start_date, end_date), today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::SlotTier;
    use crate::reservation::parse_date_time;

    fn dt(input: &str) -> NaiveDateTime {
        parse_date_time(input).unwrap()
    }

    fn sample() -> ScheduleStore {
        let mut store = ScheduleStore::new();
        store
            .add("Piotr W", dt("25.04.2023 15:00"), dt("25.04.2023 16:00"))
            .unwrap();
        store
    }

    #[test]
    fn date_is_free_does_not_reorder_records() {
        let mut store = ScheduleStore::new();
        store
            .add("Late B", dt("02.05.2023 10:00"), dt("02.05.2023 11:00"))
            .unwrap();
        store
            .add("Early A", dt("01.05.2023 10:00"), dt("01.05.2023 11:00"))
            .unwrap();
        let before = store.clone();
        store.date_is_free(dt("01.05.2023 10:30")).unwrap();
        assert_eq!(store, before);
        assert_eq!(store.records()[0].name, "Late B");
    }

    #[test]
    fn delete_out_of_bounds_is_an_error() {
        let mut store = sample();
        let err = store.delete(3).unwrap_err();
        assert_eq!(err, ScheduleError::IndexOutOfBounds { index: 3, len: 1 });
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn lookup_ignores_end_time() {
        let store = sample();
        assert_eq!(store.reservation_exists("Piotr W", dt("25.04.2023 15:00")), Some(0));
        assert_eq!(store.reservation_exists("Piotr W", dt("25.04.2023 15:30")), None);
        assert_eq!(store.reservation_exists("piotr w", dt("25.04.2023 15:00")), None);
    }

    #[test]
    fn new_booking_requires_all_three_fields() {
        let store = sample();
        assert!(!store.new_booking("Piotr W", dt("25.04.2023 15:00"), dt("25.04.2023 16:00")));
        assert!(store.new_booking("Piotr W", dt("25.04.2023 15:00"), dt("25.04.2023 15:30")));
        assert!(store.new_booking("Anna N", dt("25.04.2023 15:00"), dt("25.04.2023 16:00")));
    }

    #[test]
    fn first_and_last_dates_use_start_and_end() {
        let mut store = sample();
        assert!(ScheduleStore::new().first_date().is_none());
        store
            .add("Anna N", dt("27.04.2023 23:30"), dt("28.04.2023 00:30"))
            .unwrap();
        assert_eq!(store.first_date(), Some(dt("25.04.2023 00:00").date()));
        assert_eq!(store.last_date(), Some(dt("28.04.2023 00:00").date()));
    }

    #[test]
    fn boundary_instant_is_free() {
        let store = sample();
        let availability = store.date_is_free(dt("25.04.2023 16:00")).unwrap();
        assert_eq!(availability.start, dt("25.04.2023 16:00"));
        assert_eq!(availability.tier, SlotTier::NinetyMinutes);
    }

    #[test]
    fn add_record_checks_hand_built_records() {
        let mut store = ScheduleStore::new();
        let inverted = ReservationRecord {
            name: "Piotr W".into(),
            start: dt("25.04.2023 16:00"),
            end: dt("25.04.2023 15:00"),
        };
        assert!(matches!(
            store.add_record(inverted),
            Err(ScheduleError::InvalidRecord(_))
        ));
        let nameless = ReservationRecord {
            name: "  ".into(),
            start: dt("25.04.2023 15:00"),
            end: dt("25.04.2023 16:00"),
        };
        assert!(matches!(
            store.add_record(nameless),
            Err(ScheduleError::InvalidRecord(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn add_rejects_inverted_interval() {
        let mut store = ScheduleStore::new();
        assert!(
            store
                .add("Piotr W", dt("25.04.2023 16:00"), dt("25.04.2023 15:00"))
                .is_err()
        );
        assert!(store.is_empty());
    }
}
