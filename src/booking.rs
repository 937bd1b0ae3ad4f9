//! Booking and cancellation rules applied on top of [`ScheduleStore`]:
//! input validation, the one hour lead time, the weekly quota and the
//! durations a slot can offer. Nothing here prompts; every expected
//! condition comes back as a value.

use crate::calculations::{Availability, SlotTier};
use crate::reservation::{
    DATE_FORMAT, DATE_TIME_FORMAT, ReservationRecord, format_date_time,
};
use crate::schedule::{ScheduleError, ScheduleStore};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::fmt;

/// Bookings and cancellations close this many minutes before the start.
pub const LEAD_TIME_MINUTES: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    NameTooShort,
    MissingSurname,
    InvalidName,
    WrongFormat { expected: &'static str },
    TooLate,
    TooFarInFuture,
    StartAfterEnd,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::NameTooShort => write!(f, "Name is too short"),
            InputError::MissingSurname => write!(f, "You must enter your first name and surname"),
            InputError::InvalidName => write!(f, "Name is wrong"),
            InputError::WrongFormat { expected } => {
                write!(f, "Wrong format, use {{{expected}}}")
            }
            InputError::TooLate => write!(f, "It's already too late to book this"),
            InputError::TooFarInFuture => write!(f, "This date is too far from now"),
            InputError::StartAfterEnd => write!(f, "The start date is later than the end date"),
        }
    }
}

impl std::error::Error for InputError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingRejection {
    QuotaExceeded,
    DurationUnavailable {
        requested: BookingDuration,
        tier: SlotTier,
    },
    NotFound,
    TooLateToCancel,
    OutOfRange,
    InvalidBooking(String),
}

impl fmt::Display for BookingRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingRejection::QuotaExceeded => {
                write!(f, "You have exceeded your booking limit for this week")
            }
            BookingRejection::DurationUnavailable { requested, tier } => write!(
                f,
                "{requested} is not available, the court is free for {tier}"
            ),
            BookingRejection::NotFound => {
                write!(f, "There is no reservation for you on this date")
            }
            BookingRejection::TooLateToCancel => write!(f, "It is too late to cancel"),
            BookingRejection::OutOfRange => write!(f, "This date is too far from now"),
            BookingRejection::InvalidBooking(message) => write!(f, "Booking refused: {message}"),
        }
    }
}

impl std::error::Error for BookingRejection {}

impl From<ScheduleError> for BookingRejection {
    fn from(value: ScheduleError) -> Self {
        match value {
            ScheduleError::IndexOutOfBounds { .. } => BookingRejection::NotFound,
            ScheduleError::OutOfRange { .. } => BookingRejection::OutOfRange,
            ScheduleError::InvalidRecord(message) => BookingRejection::InvalidBooking(message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BookingDuration {
    ThirtyMinutes,
    SixtyMinutes,
    NinetyMinutes,
}

impl BookingDuration {
    pub const ALL: [BookingDuration; 3] = [
        BookingDuration::ThirtyMinutes,
        BookingDuration::SixtyMinutes,
        BookingDuration::NinetyMinutes,
    ];

    pub fn minutes(self) -> i64 {
        match self {
            BookingDuration::ThirtyMinutes => 30,
            BookingDuration::SixtyMinutes => 60,
            BookingDuration::NinetyMinutes => 90,
        }
    }

    pub fn duration(self) -> Duration {
        Duration::minutes(self.minutes())
    }

    /// Durations a slot of the given tier can hold.
    pub fn allowed_for(tier: SlotTier) -> &'static [BookingDuration] {
        match tier {
            SlotTier::HalfHour => &[BookingDuration::ThirtyMinutes],
            SlotTier::Hour => &[
                BookingDuration::ThirtyMinutes,
                BookingDuration::SixtyMinutes,
            ],
            SlotTier::NinetyMinutes => &Self::ALL,
        }
    }

    /// Menu answer `1`, `2` or `3`.
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(BookingDuration::ThirtyMinutes),
            "2" => Some(BookingDuration::SixtyMinutes),
            "3" => Some(BookingDuration::NinetyMinutes),
            _ => None,
        }
    }
}

impl fmt::Display for BookingDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} minutes", self.minutes())
    }
}

/// Trimmed full name made of letters, whitespace and `-`, with at least a
/// first name and a surname.
pub fn validate_name(raw: &str) -> Result<String, InputError> {
    let name = raw.trim();
    if name.chars().count() <= 1 {
        return Err(InputError::NameTooShort);
    }
    if !name.contains(' ') {
        return Err(InputError::MissingSurname);
    }
    if name
        .chars()
        .all(|c| c.is_alphabetic() || c.is_whitespace() || c == '-')
    {
        return Ok(name.to_string());
    }
    Err(InputError::InvalidName)
}

/// Parses `DD.MM.YYYY HH:MM` and checks it is bookable from `now`.
pub fn parse_booking_time(raw: &str, now: NaiveDateTime) -> Result<NaiveDateTime, InputError> {
    let date = NaiveDateTime::parse_from_str(raw.trim(), DATE_TIME_FORMAT).map_err(|_| {
        InputError::WrongFormat {
            expected: "DD.MM.YYYY HH:MM",
        }
    })?;
    if date.checked_add_signed(Duration::minutes(90)).is_none() {
        return Err(InputError::TooFarInFuture);
    }
    if is_within_lead_time(date, now) {
        return Err(InputError::TooLate);
    }
    Ok(date)
}

/// Parses an inclusive `DD.MM.YYYY` range.
pub fn parse_date_range(start_raw: &str, end_raw: &str) -> Result<(NaiveDate, NaiveDate), InputError> {
    let parse = |raw: &str| {
        NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| InputError::WrongFormat {
            expected: "DD.MM.YYYY",
        })
    };
    let start = parse(start_raw)?;
    let end = parse(end_raw)?;
    if start > end {
        return Err(InputError::StartAfterEnd);
    }
    Ok((start, end))
}

fn is_within_lead_time(start: NaiveDateTime, now: NaiveDateTime) -> bool {
    match now.checked_add_signed(Duration::minutes(LEAD_TIME_MINUTES)) {
        Some(cutoff) => cutoff >= start,
        None => true,
    }
}

/// Free slot at or after `requested`.
pub fn check_slot(
    store: &ScheduleStore,
    requested: NaiveDateTime,
) -> Result<Availability, BookingRejection> {
    Ok(store.date_is_free(requested)?)
}

/// Books `duration` from `start` for `name`, where `tier` is the free time
/// reported for `start`. The quota is checked against the bookings already
/// held.
pub fn book(
    store: &mut ScheduleStore,
    name: &str,
    start: NaiveDateTime,
    tier: SlotTier,
    duration: BookingDuration,
) -> Result<ReservationRecord, BookingRejection> {
    if store.too_many_reservation(name, start) {
        return Err(BookingRejection::QuotaExceeded);
    }
    if !BookingDuration::allowed_for(tier).contains(&duration) {
        return Err(BookingRejection::DurationUnavailable {
            requested: duration,
            tier,
        });
    }
    let end = start
        .checked_add_signed(duration.duration())
        .ok_or(BookingRejection::OutOfRange)?;
    let record = ReservationRecord::new(name, start, end)?;
    store.add_record(record.clone())?;
    Ok(record)
}

/// Removes the booking `name` holds at `start`, provided it is more than the
/// lead time away from `now`.
pub fn cancel(
    store: &mut ScheduleStore,
    name: &str,
    start: NaiveDateTime,
    now: NaiveDateTime,
) -> Result<ReservationRecord, BookingRejection> {
    let index = store
        .reservation_exists(name, start)
        .ok_or(BookingRejection::NotFound)?;
    if is_within_lead_time(start, now) {
        log::debug!(
            "refused late cancellation for {name} at {}",
            format_date_time(start)
        );
        return Err(BookingRejection::TooLateToCancel);
    }
    Ok(store.delete(index)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservation::parse_date_time;

    fn dt(input: &str) -> NaiveDateTime {
        parse_date_time(input).unwrap()
    }

    #[test]
    fn name_rules() {
        assert_eq!(validate_name("  Piotr W "), Ok("Piotr W".to_string()));
        assert_eq!(validate_name("Anna-Maria Nowak"), Ok("Anna-Maria Nowak".to_string()));
        assert_eq!(validate_name("Łucja Żak"), Ok("Łucja Żak".to_string()));
        assert_eq!(validate_name("P"), Err(InputError::NameTooShort));
        assert_eq!(validate_name("Piotr"), Err(InputError::MissingSurname));
        assert_eq!(validate_name("Piotr W2"), Err(InputError::InvalidName));
    }

    #[test]
    fn booking_time_needs_an_hour_of_notice() {
        let now = dt("25.04.2023 12:00");
        assert_eq!(
            parse_booking_time("25.04.2023 13:00", now),
            Err(InputError::TooLate)
        );
        assert_eq!(
            parse_booking_time("25.04.2023 13:01", now),
            Ok(dt("25.04.2023 13:01"))
        );
        assert!(matches!(
            parse_booking_time("2023-04-25 13:01", now),
            Err(InputError::WrongFormat { .. })
        ));
    }

    #[test]
    fn date_range_must_be_ordered() {
        assert_eq!(
            parse_date_range("26.04.2023", "25.04.2023"),
            Err(InputError::StartAfterEnd)
        );
        let (start, end) = parse_date_range("25.04.2023", "25.04.2023").unwrap();
        assert_eq!(start, end);
    }

    #[test]
    fn allowed_durations_follow_tier() {
        assert_eq!(
            BookingDuration::allowed_for(SlotTier::HalfHour),
            &[BookingDuration::ThirtyMinutes]
        );
        assert_eq!(BookingDuration::allowed_for(SlotTier::NinetyMinutes).len(), 3);
        assert_eq!(BookingDuration::from_choice(" 2 "), Some(BookingDuration::SixtyMinutes));
        assert_eq!(BookingDuration::from_choice("4"), None);
    }

    #[test]
    fn book_reports_blank_name_as_invalid_booking() {
        let mut store = ScheduleStore::new();
        let err = book(
            &mut store,
            "",
            dt("25.04.2023 14:00"),
            SlotTier::NinetyMinutes,
            BookingDuration::SixtyMinutes,
        )
        .unwrap_err();
        assert!(matches!(err, BookingRejection::InvalidBooking(_)));
        assert_ne!(err.to_string(), BookingRejection::OutOfRange.to_string());
        assert!(store.is_empty());
    }

    #[test]
    fn book_rejects_duration_longer_than_slot() {
        let mut store = ScheduleStore::new();
        let err = book(
            &mut store,
            "Piotr W",
            dt("25.04.2023 14:00"),
            SlotTier::Hour,
            BookingDuration::NinetyMinutes,
        )
        .unwrap_err();
        assert!(matches!(err, BookingRejection::DurationUnavailable { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn cancel_checks_existence_then_lead_time() {
        let mut store = ScheduleStore::new();
        store
            .add("Piotr W", dt("25.04.2023 15:00"), dt("25.04.2023 16:00"))
            .unwrap();
        assert_eq!(
            cancel(&mut store, "Piotr W", dt("25.04.2023 16:00"), dt("25.04.2023 10:00")),
            Err(BookingRejection::NotFound)
        );
        assert_eq!(
            cancel(&mut store, "Piotr W", dt("25.04.2023 15:00"), dt("25.04.2023 14:30")),
            Err(BookingRejection::TooLateToCancel)
        );
        let removed =
            cancel(&mut store, "Piotr W", dt("25.04.2023 15:00"), dt("25.04.2023 10:00")).unwrap();
        assert_eq!(removed.end, dt("25.04.2023 16:00"));
        assert!(store.is_empty());
    }
}
