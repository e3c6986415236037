use core::hash::Hash;

use chrono::{DateTime, Months, NaiveDate, NaiveDateTime, Utc};

/// A point in time that supports calendar-month lookbacks.
///
/// Trailing windows are measured in calendar months rather than a fixed number of days,
/// so a three month window ending on 31 May starts on 29 February in a leap year and on
/// 28 February otherwise. Implementations must preserve time of day, because alignment
/// matches timestamps exactly.
pub trait CalendarTimestamp: Copy + Ord + Hash {
    /// Returns the instant `months` calendar months before `self`
    ///
    /// The day of month is kept where it exists and clamped to the last day of the
    /// target month where it does not.
    ///
    /// # Arguments
    ///
    /// * `months` - Number of calendar months to step back
    ///
    /// # Returns
    ///
    /// * `Option<Self>` - The shifted instant, or `None` if it falls outside the representable range
    fn months_before(self, months: u32) -> Option<Self>;
}

impl CalendarTimestamp for NaiveDate {
    #[inline]
    fn months_before(self, months: u32) -> Option<Self> {
        self.checked_sub_months(Months::new(months))
    }
}

impl CalendarTimestamp for NaiveDateTime {
    #[inline]
    fn months_before(self, months: u32) -> Option<Self> {
        self.checked_sub_months(Months::new(months))
    }
}

impl CalendarTimestamp for DateTime<Utc> {
    #[inline]
    fn months_before(self, months: u32) -> Option<Self> {
        self.checked_sub_months(Months::new(months))
    }
}
