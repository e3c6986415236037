use ahash::RandomState;
use hashbrown::HashMap;
use num_traits::Float;

use alloc::vec::Vec;

use crate::CalendarTimestamp;

/// A single observation of a time series
///
/// A `None` value marks an explicitly missing observation. Non-finite values are
/// treated as missing as well when series are aligned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimePoint<S, T> {
    /// Instant of the observation
    pub timestamp: S,
    /// Observed value, `None` when missing
    pub value: Option<T>,
}

impl<S, T> TimePoint<S, T> {
    /// Creates an observation with a present value
    pub const fn new(timestamp: S, value: T) -> Self {
        Self {
            timestamp,
            value: Some(value),
        }
    }

    /// Creates an observation whose value is missing
    pub const fn missing(timestamp: S) -> Self {
        Self {
            timestamp,
            value: None,
        }
    }
}

impl<S, T> From<(S, T)> for TimePoint<S, T> {
    fn from((timestamp, value): (S, T)) -> Self {
        Self::new(timestamp, value)
    }
}

/// One row of an aligned series: both values observed at the same instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedRow<S, T> {
    /// Common instant of both observations
    pub timestamp: S,
    /// Hedge leg value, the regressor
    pub leg: T,
    /// Fly value, the regressand
    pub fly: T,
}

/// Two series joined on their common timestamps
///
/// Rows are strictly increasing by timestamp and every value is finite. The only way to
/// build one is through [`align`], which enforces both properties.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSeries<S, T> {
    rows: Vec<AlignedRow<S, T>>,
}

impl<S, T> AlignedSeries<S, T> {
    /// Returns the number of aligned rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the two series had no common, fully observed timestamp
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the rows in timestamp order
    pub fn rows(&self) -> &[AlignedRow<S, T>] {
        &self.rows
    }

    /// Returns an iterator over the rows in timestamp order
    pub fn iter(&self) -> core::slice::Iter<'_, AlignedRow<S, T>> {
        self.rows.iter()
    }

    /// Returns the earliest row
    pub fn first(&self) -> Option<&AlignedRow<S, T>> {
        self.rows.first()
    }

    /// Returns the latest row
    pub fn last(&self) -> Option<&AlignedRow<S, T>> {
        self.rows.last()
    }
}

impl<'a, S, T> IntoIterator for &'a AlignedSeries<S, T> {
    type Item = &'a AlignedRow<S, T>;
    type IntoIter = core::slice::Iter<'a, AlignedRow<S, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

// Later observations of a timestamp overwrite earlier ones, missing or not.
fn lookup<S, T>(points: &[TimePoint<S, T>]) -> HashMap<S, Option<T>, RandomState>
where
    S: CalendarTimestamp,
    T: Copy,
{
    let mut map = HashMap::with_capacity_and_hasher(points.len(), RandomState::default());
    for point in points {
        map.insert(point.timestamp, point.value);
    }
    map
}

/// Joins a fly series and a leg series on their common timestamps
///
/// Each input may contain duplicate timestamps; the last occurrence in input order wins,
/// even when that occurrence is missing. Rows where either value is missing or not finite
/// are dropped, and the remaining rows are sorted ascending by timestamp. The result does
/// not depend on input order beyond that rule, and is empty when no timestamp is fully
/// observed in both series.
///
/// # Arguments
///
/// * `fly` - The dependent series
/// * `leg` - The hedge series
///
/// # Returns
///
/// * `AlignedSeries<S, T>` - The joined rows
///
/// # Examples
///
/// ```
/// use hedge_residuals::{TimePoint, align};
/// use chrono::NaiveDate;
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
/// let fly = [
///     TimePoint::new(day(4), 1.5),
///     TimePoint::new(day(1), 1.0),
///     TimePoint::missing(day(2)),
///     TimePoint::new(day(3), 1.2),
/// ];
/// let leg = [
///     TimePoint::new(day(1), 10.0),
///     TimePoint::new(day(2), 11.0),
///     TimePoint::new(day(3), 12.0),
///     TimePoint::new(day(3), 12.5),
/// ];
///
/// let aligned = align(&fly, &leg);
/// let rows: Vec<_> = aligned.iter().map(|r| (r.timestamp, r.leg, r.fly)).collect();
/// assert_eq!(rows, vec![(day(1), 10.0, 1.0), (day(3), 12.5, 1.2)]);
/// ```
pub fn align<S, T>(fly: &[TimePoint<S, T>], leg: &[TimePoint<S, T>]) -> AlignedSeries<S, T>
where
    S: CalendarTimestamp,
    T: Float,
{
    let fly_values = lookup(fly);
    let leg_values = lookup(leg);

    let mut rows: Vec<AlignedRow<S, T>> = fly_values
        .iter()
        .filter_map(|(&timestamp, &fly)| {
            let fly = fly.filter(|v| v.is_finite())?;
            let leg = leg_values.get(&timestamp).copied().flatten()?;
            leg.is_finite().then_some(AlignedRow {
                timestamp,
                leg,
                fly,
            })
        })
        .collect();
    rows.sort_unstable_by_key(|row| row.timestamp);

    log::debug!(
        "aligned {} rows from {} fly and {} leg timestamps",
        rows.len(),
        fly_values.len(),
        leg_values.len()
    );

    AlignedSeries { rows }
}
