use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};

/// A Monday 00:00 to next Monday 00:00 window, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaWeek {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl QuotaWeek {
    /// Week containing `instant`, or `None` when either boundary falls
    /// outside the representable date range.
    pub fn containing(instant: NaiveDateTime) -> Option<Self> {
        let offset = i64::from(instant.weekday().num_days_from_monday());
        let monday = instant
            .date()
            .checked_sub_signed(Duration::days(offset))?;
        let next_monday = monday.checked_add_signed(Duration::days(7))?;
        Some(Self {
            start: monday.and_hms_opt(0, 0, 0)?,
            end: next_monday.and_hms_opt(0, 0, 0)?,
        })
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Heading used for a day in the printed schedule.
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        return "Today".to_string();
    }
    if today.succ_opt() == Some(date) {
        return "Tomorrow".to_string();
    }
    weekday_name(date.weekday()).to_string()
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn week_is_anchored_on_monday_midnight() {
        // 2023-04-25 is a Tuesday
        let instant = d(2023, 4, 25).and_hms_opt(13, 0, 0).unwrap();
        let week = QuotaWeek::containing(instant).unwrap();
        assert_eq!(week.start, d(2023, 4, 24).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(week.end, d(2023, 5, 1).and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn sunday_evening_belongs_to_its_week() {
        let sunday = d(2023, 4, 30).and_hms_opt(23, 30, 0).unwrap();
        let week = QuotaWeek::containing(sunday).unwrap();
        assert!(week.contains(sunday));
        assert!(!week.contains(d(2023, 5, 1).and_hms_opt(0, 0, 0).unwrap()));
    }

    #[test]
    fn week_at_end_of_range_is_none() {
        assert!(QuotaWeek::containing(NaiveDateTime::MAX).is_none());
    }

    #[test]
    fn labels_today_tomorrow_and_weekdays() {
        let today = d(2023, 4, 25);
        assert_eq!(day_label(today, today), "Today");
        assert_eq!(day_label(d(2023, 4, 26), today), "Tomorrow");
        assert_eq!(day_label(d(2023, 4, 28), today), "Friday");
        assert_eq!(day_label(d(2023, 4, 24), today), "Monday");
    }
}
