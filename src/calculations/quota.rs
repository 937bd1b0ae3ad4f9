use crate::calendar::QuotaWeek;
use crate::reservation::ReservationRecord;
use chrono::NaiveDateTime;

/// Bookings a single client may hold within one Monday to Sunday week.
pub const WEEKLY_RESERVATION_LIMIT: usize = 2;

pub struct WeeklyQuota<'a> {
    records: &'a [ReservationRecord],
    limit: usize,
}

impl<'a> WeeklyQuota<'a> {
    pub fn new(records: &'a [ReservationRecord]) -> Self {
        Self {
            records,
            limit: WEEKLY_RESERVATION_LIMIT,
        }
    }

    /// Bookings `name` already holds in the week of `instant`. `None` when
    /// the week boundaries cannot be represented.
    pub fn count(&self, name: &str, instant: NaiveDateTime) -> Option<usize> {
        let week = QuotaWeek::containing(instant)?;
        Some(
            self.records
                .iter()
                .filter(|record| record.name == name && week.contains(record.start))
                .count(),
        )
    }

    pub fn is_exhausted(&self, name: &str, instant: NaiveDateTime) -> bool {
        self.count(name, instant)
            .is_some_and(|count| count >= self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservation::parse_date_time;

    fn record(name: &str, start: &str, end: &str) -> ReservationRecord {
        ReservationRecord::new(
            name,
            parse_date_time(start).unwrap(),
            parse_date_time(end).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn counts_only_the_named_client() {
        let records = vec![
            record("Piotr W", "25.04.2023 15:00", "25.04.2023 16:00"),
            record("Anna N", "26.04.2023 15:00", "26.04.2023 16:00"),
            record("Anna N", "27.04.2023 15:00", "27.04.2023 16:00"),
        ];
        let quota = WeeklyQuota::new(&records);
        let instant = parse_date_time("28.04.2023 10:00").unwrap();
        assert_eq!(quota.count("Piotr W", instant), Some(1));
        assert!(!quota.is_exhausted("Piotr W", instant));
        assert!(quota.is_exhausted("Anna N", instant));
    }

    #[test]
    fn previous_week_does_not_count() {
        let records = vec![
            record("Piotr W", "23.04.2023 15:00", "23.04.2023 16:00"),
            record("Piotr W", "22.04.2023 15:00", "22.04.2023 16:00"),
        ];
        let quota = WeeklyQuota::new(&records);
        assert!(!quota.is_exhausted("Piotr W", parse_date_time("24.04.2023 08:00").unwrap()));
    }

    #[test]
    fn unrepresentable_week_is_not_exhausted() {
        let quota = WeeklyQuota::new(&[]);
        assert_eq!(quota.count("Piotr W", NaiveDateTime::MAX), None);
        assert!(!quota.is_exhausted("Piotr W", NaiveDateTime::MAX));
    }
}
