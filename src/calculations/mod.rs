pub mod availability;
pub mod quota;

pub use availability::{Availability, AvailabilitySweep, SlotTier};
pub use quota::{WEEKLY_RESERVATION_LIMIT, WeeklyQuota};
