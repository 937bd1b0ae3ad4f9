use crate::reservation::ReservationRecord;
use crate::schedule::ScheduleError;
use chrono::{Duration, NaiveDateTime};
use std::fmt;

/// Longest booking the court hands out, in minutes.
pub const MAX_BOOKING_MINUTES: i64 = 90;

/// Quantized free time from a bookable start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SlotTier {
    HalfHour,
    Hour,
    NinetyMinutes,
}

impl SlotTier {
    pub fn ordinal(self) -> u8 {
        match self {
            SlotTier::HalfHour => 0,
            SlotTier::Hour => 1,
            SlotTier::NinetyMinutes => 2,
        }
    }

    pub fn minutes(self) -> i64 {
        match self {
            SlotTier::HalfHour => 30,
            SlotTier::Hour => 60,
            SlotTier::NinetyMinutes => 90,
        }
    }
}

impl fmt::Display for SlotTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} minutes", self.minutes())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Availability {
    /// First free instant at or after the requested one.
    pub start: NaiveDateTime,
    pub tier: SlotTier,
}

impl Availability {
    pub fn as_tuple(&self) -> (NaiveDateTime, u8) {
        (self.start, self.tier.ordinal())
    }
}

/// Sweep over the reservations in start order that finds the first free
/// instant and how long the court stays free from there.
pub struct AvailabilitySweep<'a> {
    sorted: Vec<&'a ReservationRecord>,
}

impl<'a> AvailabilitySweep<'a> {
    pub fn new(records: &'a [ReservationRecord]) -> Self {
        let mut sorted: Vec<&ReservationRecord> = records.iter().collect();
        sorted.sort_by_key(|record| record.start);
        Self { sorted }
    }

    pub fn execute(&self, instant: NaiveDateTime) -> Result<Availability, ScheduleError> {
        let half_hour = Duration::minutes(30);
        let hour = Duration::minutes(60);

        let mut anchor = instant;
        let (mut hour_probe, mut ninety_probe) = probes(anchor)?;

        for record in &self.sorted {
            // The anchor may move to any record end, so every end must leave
            // room for the longest booking.
            checked_add(record.end, Duration::minutes(MAX_BOOKING_MINUTES))?;

            if record.contains(anchor) {
                anchor = record.end;
                (hour_probe, ninety_probe) = probes(anchor)?;
            } else if record.contains(hour_probe) {
                hour_probe = record.end;
            } else if record.contains(ninety_probe) {
                ninety_probe = record.end;
            }
        }

        let hour_clear = checked_add(anchor, half_hour)? == hour_probe;
        let ninety_clear = checked_add(anchor, hour)? == ninety_probe;
        let tier = match (hour_clear, ninety_clear) {
            (true, true) => SlotTier::NinetyMinutes,
            (true, false) => SlotTier::Hour,
            _ => SlotTier::HalfHour,
        };
        Ok(Availability { start: anchor, tier })
    }
}

fn probes(anchor: NaiveDateTime) -> Result<(NaiveDateTime, NaiveDateTime), ScheduleError> {
    checked_add(anchor, Duration::minutes(MAX_BOOKING_MINUTES))?;
    Ok((
        checked_add(anchor, Duration::minutes(30))?,
        checked_add(anchor, Duration::minutes(60))?,
    ))
}

fn checked_add(value: NaiveDateTime, delta: Duration) -> Result<NaiveDateTime, ScheduleError> {
    value
        .checked_add_signed(delta)
        .ok_or(ScheduleError::OutOfRange { instant: value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservation::parse_date_time;

    fn dt(input: &str) -> NaiveDateTime {
        parse_date_time(input).unwrap()
    }

    fn record(name: &str, start: &str, end: &str) -> ReservationRecord {
        ReservationRecord::new(name, dt(start), dt(end)).unwrap()
    }

    #[test]
    fn empty_schedule_is_fully_free() {
        let sweep = AvailabilitySweep::new(&[]);
        let result = sweep.execute(dt("01.05.2023 10:00")).unwrap();
        assert_eq!(result.start, dt("01.05.2023 10:00"));
        assert_eq!(result.tier, SlotTier::NinetyMinutes);
    }

    #[test]
    fn booking_half_hour_ahead_leaves_only_half_hour() {
        let records = vec![record("A B", "01.05.2023 10:30", "01.05.2023 11:00")];
        let result = AvailabilitySweep::new(&records)
            .execute(dt("01.05.2023 10:00"))
            .unwrap();
        assert_eq!(result.start, dt("01.05.2023 10:00"));
        assert_eq!(result.tier, SlotTier::HalfHour);
    }

    #[test]
    fn chained_records_push_anchor_through_each_end() {
        // Inserted out of order; the sweep sorts its own view.
        let records = vec![
            record("C D", "01.05.2023 11:00", "01.05.2023 12:00"),
            record("A B", "01.05.2023 10:00", "01.05.2023 11:00"),
        ];
        let result = AvailabilitySweep::new(&records)
            .execute(dt("01.05.2023 10:15"))
            .unwrap();
        assert_eq!(result.start, dt("01.05.2023 12:00"));
        assert_eq!(result.tier, SlotTier::NinetyMinutes);
    }

    #[test]
    fn record_end_near_max_is_out_of_range() {
        let end = NaiveDateTime::MAX - Duration::minutes(10);
        let start = end - Duration::minutes(30);
        let records = vec![ReservationRecord::new("A B", start, end).unwrap()];
        let err = AvailabilitySweep::new(&records)
            .execute(dt("01.05.2023 10:00"))
            .unwrap_err();
        assert!(matches!(err, ScheduleError::OutOfRange { .. }));
    }

    #[test]
    fn tier_ordinals_follow_free_time() {
        assert_eq!(SlotTier::HalfHour.ordinal(), 0);
        assert_eq!(SlotTier::Hour.ordinal(), 1);
        assert_eq!(SlotTier::NinetyMinutes.ordinal(), 2);
    }
}
