use alloc::collections::VecDeque;

use crate::CalendarTimestamp;

/// A trailing window that holds every entry stamped within a fixed number of calendar months.
///
/// Unlike a fixed-size buffer, the number of entries varies with the sampling density of the
/// series. Pushing a new entry at `t` evicts every entry stamped strictly before
/// `t - months`, so the window always covers `[t - months, t]` inclusive.
#[derive(Debug, Clone)]
pub struct CalendarWindow<S, V> {
    /// Entries in timestamp order, oldest first
    buf: VecDeque<(S, V)>,
    /// Lookback length in calendar months
    months: u32,
    /// Inclusive lower bound of the window after the last push
    start: Option<S>,
}

impl<S, V> CalendarWindow<S, V>
where
    S: CalendarTimestamp,
{
    /// Creates a new window with the specified lookback, panics if `months` is 0
    pub fn new(months: u32) -> Self {
        assert!(months > 0, "window months can not be zero");

        Self {
            buf: VecDeque::new(),
            months,
            start: None,
        }
    }

    /// Clears the window, resetting its state.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.start = None;
    }

    /// Returns the lookback length in calendar months
    pub const fn months(&self) -> u32 {
        self.months
    }

    /// Returns the current number of entries in the window.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been pushed since creation or the last reset
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns the inclusive lower bound of the window, `None` before the first push or when
    /// the bound falls outside the representable range
    pub const fn start(&self) -> Option<S> {
        self.start
    }

    /// Pushes a new entry and evicts the entries that fell out of the lookback
    ///
    /// # Arguments
    ///
    /// * `timestamp` - Timestamp of the entry, must be strictly after the previous one
    /// * `value` - The value to push into the window
    ///
    /// # Returns
    ///
    /// * `usize` - The number of entries evicted
    pub fn next(&mut self, timestamp: S, value: V) -> usize {
        if let Some((last, _)) = self.buf.back() {
            assert!(*last < timestamp, "timestamps must be strictly increasing");
        }

        self.buf.push_back((timestamp, value));
        self.start = timestamp.months_before(self.months);

        let mut evicted = 0;
        if let Some(start) = self.start {
            while self.buf.front().is_some_and(|(ts, _)| *ts < start) {
                self.buf.pop_front();
                evicted += 1;
            }
        }
        evicted
    }

    /// Returns an iterator over the entries in logical (oldest to newest) order.
    pub fn iter(&self) -> impl Iterator<Item = &(S, V)> + Clone {
        self.buf.iter()
    }
}
