use num_traits::Float;

use alloc::{string::String, vec::Vec};

use crate::{
    AlignedRow, AlignedSeries, CalendarTimestamp, FitError, MetricsRecord, RegressionConfig,
    RegressionRecord, ResidualSummary,
};

/// One aligned row together with its regression output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportRow<S, T> {
    /// Common instant of both observations
    pub timestamp: S,
    /// Hedge leg value
    pub leg: T,
    /// Fly value
    pub fly: T,
    /// Hedge ratio of the row's trailing window
    pub slope: Option<T>,
    /// Intercept of the row's trailing window
    pub intercept: Option<T>,
    /// Fitted fly value of the row
    pub predicted: Option<T>,
    /// `fly - predicted`
    pub residual: Option<T>,
}

/// Result of a full hedge regression run
///
/// Holds the aligned series, one regression record per row and the residual summary.
/// Only [`run`](crate::run) builds one, so the summary always describes the records.
/// Nothing can be changed after construction.
///
/// ```compile_fail
/// use chrono::NaiveDate;
/// use hedge_residuals::{RegressionConfig, RegressionReport, ResidualSummary, align};
///
/// let series = align::<NaiveDate, f64>(&[], &[]);
/// let _ = RegressionReport::new(
///     RegressionConfig::default(),
///     series,
///     Vec::new(),
///     ResidualSummary::default(),
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionReport<S, T> {
    config: RegressionConfig,
    series: AlignedSeries<S, T>,
    records: Vec<RegressionRecord<T>>,
    summary: ResidualSummary<T>,
}

impl<S, T> RegressionReport<S, T>
where
    S: CalendarTimestamp,
    T: Float + Default,
{
    /// Assembles a report from the outputs of the pipeline stages
    ///
    /// # Panics
    ///
    /// If `records` does not hold exactly one record per aligned row.
    pub(crate) fn new(
        config: RegressionConfig,
        series: AlignedSeries<S, T>,
        records: Vec<RegressionRecord<T>>,
        summary: ResidualSummary<T>,
    ) -> Self {
        assert_eq!(
            series.len(),
            records.len(),
            "one regression record per aligned row"
        );
        Self {
            config,
            series,
            records,
            summary,
        }
    }

    /// Returns the configuration the report was computed with
    pub const fn config(&self) -> &RegressionConfig {
        &self.config
    }

    /// Returns the aligned input series
    pub const fn series(&self) -> &AlignedSeries<S, T> {
        &self.series
    }

    /// Returns the per-row regression records, in timestamp order
    pub fn records(&self) -> &[RegressionRecord<T>] {
        &self.records
    }

    /// Returns the residual summary
    pub const fn summary(&self) -> &ResidualSummary<T> {
        &self.summary
    }

    /// Returns the number of aligned rows
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Returns `true` if the input series had no common timestamp
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Returns the number of rows with a fit
    pub fn defined_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_defined()).count()
    }

    /// Returns an iterator over the rows in timestamp order
    pub fn rows(&self) -> impl ExactSizeIterator<Item = ReportRow<S, T>> + '_ {
        self.series
            .iter()
            .zip(&self.records)
            .map(|(row, record)| report_row(row, record))
    }

    /// Returns the row at `index` in timestamp order
    pub fn row(&self, index: usize) -> Option<ReportRow<S, T>> {
        let row = self.series.rows().get(index)?;
        self.records.get(index).map(|record| report_row(row, record))
    }

    /// Returns why the row at `index` has no fit
    pub fn error(&self, index: usize) -> Option<FitError> {
        self.records.get(index).and_then(|r| r.error())
    }

    /// Returns the earliest aligned timestamp
    pub fn first_timestamp(&self) -> Option<S> {
        self.series.first().map(|r| r.timestamp)
    }

    /// Returns the latest aligned timestamp, the end of the most recent window
    pub fn last_timestamp(&self) -> Option<S> {
        self.series.last().map(|r| r.timestamp)
    }

    /// Returns `true` if the latest aligned row has a fit
    ///
    /// When it does not, [`RegressionReport::latest_residual`] and
    /// [`RegressionReport::z_score`] refer to an earlier row.
    pub fn is_latest_defined(&self) -> bool {
        self.records.last().is_some_and(|r| r.is_defined())
    }

    /// Returns the timestamp of the row the latest residual belongs to
    pub fn latest_residual_timestamp(&self) -> Option<S> {
        self.series
            .iter()
            .zip(&self.records)
            .rev()
            .find_map(|(row, record)| record.is_defined().then_some(row.timestamp))
    }

    /// Returns the mean of the residuals
    pub const fn mean(&self) -> Option<T> {
        self.summary.mean()
    }

    /// Returns the sample standard deviation of the residuals
    pub const fn std_dev(&self) -> Option<T> {
        self.summary.std_dev()
    }

    /// Returns the population skewness of the residuals
    pub const fn skewness(&self) -> Option<T> {
        self.summary.skewness()
    }

    /// Returns the raw kurtosis of the residuals
    pub const fn kurtosis(&self) -> Option<T> {
        self.summary.kurtosis()
    }

    /// Returns the most recent defined residual
    pub const fn latest_residual(&self) -> Option<T> {
        self.summary.latest_residual()
    }

    /// Returns the z-score of the most recent defined residual
    pub const fn z_score(&self) -> Option<T> {
        self.summary.z_score()
    }

    /// Captures the summary under a name, ready to be appended to a metrics history
    ///
    /// # Arguments
    ///
    /// * `butterfly` - Name of the fly series, usually its source file name
    ///
    /// # Returns
    ///
    /// * `MetricsRecord<T>` - The named summary
    pub fn metrics(&self, butterfly: impl Into<String>) -> MetricsRecord<T> {
        MetricsRecord {
            butterfly: butterfly.into(),
            mean: self.mean(),
            std: self.std_dev(),
            skew: self.skewness(),
            kurtosis: self.kurtosis(),
            z_score: self.z_score(),
        }
    }
}

fn report_row<S: Copy, T: Float>(
    row: &AlignedRow<S, T>,
    record: &RegressionRecord<T>,
) -> ReportRow<S, T> {
    ReportRow {
        timestamp: row.timestamp,
        leg: row.leg,
        fly: row.fly,
        slope: record.slope(),
        intercept: record.intercept(),
        predicted: record.predicted(),
        residual: record.residual(),
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use chrono::{Days, NaiveDate};

    use super::*;
    use crate::{TimePoint, align, compute, run, summarize};

    fn day(i: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Days::new(i)
    }

    fn series(n: u64) -> (Vec<TimePoint<NaiveDate, f64>>, Vec<TimePoint<NaiveDate, f64>>) {
        let leg: Vec<_> = (0..n)
            .map(|i| TimePoint::new(day(i), 50.0 + (i % 5) as f64))
            .collect();
        let fly = leg
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let noise = if i % 2 == 0 { 0.05 } else { -0.05 };
                TimePoint::new(p.timestamp, 3.0 * p.value.unwrap_or_default() + noise)
            })
            .collect();
        (fly, leg)
    }

    #[test]
    fn rows_join_series_and_records() {
        let (fly, leg) = series(40);
        let report = run(&fly, &leg, &RegressionConfig::new(1, 10));

        assert_eq!(report.len(), 40);
        assert_eq!(report.rows().len(), 40);
        assert_eq!(report.defined_count(), 31);
        assert_eq!(report.first_timestamp(), Some(day(0)));
        assert_eq!(report.last_timestamp(), Some(day(39)));

        for (i, row) in report.rows().enumerate() {
            assert_eq!(Some(row), report.row(i));
            assert_eq!(row.timestamp, day(i as u64));
            assert_eq!(row.leg, leg[i].value.unwrap());
            assert_eq!(row.fly, fly[i].value.unwrap());
            assert_eq!(row.residual, report.records()[i].residual());
            if let (Some(predicted), Some(residual)) = (row.predicted, row.residual) {
                assert_approx_eq!(row.fly - predicted, residual, 1e-12);
            }
        }
        assert_eq!(report.row(40), None);
        assert_eq!(
            report.error(0),
            Some(FitError::InsufficientWindow {
                len: 1,
                required: 10
            })
        );
        assert_eq!(report.error(39), None);
    }

    #[test]
    fn statistics_delegate_to_summary() {
        let (fly, leg) = series(60);
        let config = RegressionConfig::new(1, 10);
        let report = run(&fly, &leg, &config);

        let records = compute(&align(&fly, &leg), &config);
        let summary = summarize(records.iter().map(|r| r.residual()));
        assert_eq!(report.summary(), &summary);
        assert_eq!(report.config(), &config);
        assert_eq!(report.mean(), summary.mean());
        assert_eq!(report.std_dev(), summary.std_dev());
        assert_eq!(report.skewness(), summary.skewness());
        assert_eq!(report.kurtosis(), summary.kurtosis());
        assert_eq!(report.latest_residual(), summary.latest_residual());
        assert_eq!(report.z_score(), summary.z_score());
        assert_eq!(report.summary().count(), report.defined_count());

        let metrics = report.metrics("fly_mar.csv");
        assert_eq!(metrics.butterfly, "fly_mar.csv");
        assert_eq!(metrics.mean, report.mean());
        assert_eq!(metrics.std, report.std_dev());
        assert_eq!(metrics.skew, report.skewness());
        assert_eq!(metrics.kurtosis, report.kurtosis());
        assert_eq!(metrics.z_score, report.z_score());
    }

    #[test]
    fn latest_residual_skips_undefined_tail() {
        let (mut fly, mut leg) = series(30);
        // the last three rows fall into a constant leg window of their own
        for i in 0..3 {
            let ts = day(200 + i);
            leg.push(TimePoint::new(ts, 7.0));
            fly.push(TimePoint::new(ts, 1.0 + i as f64));
        }
        let report = run(&fly, &leg, &RegressionConfig::new(1, 3));

        assert_eq!(report.len(), 33);
        assert!(!report.is_latest_defined());
        assert_eq!(report.error(32), Some(FitError::DegenerateFit));
        assert_eq!(report.latest_residual_timestamp(), Some(day(29)));
        assert_eq!(report.latest_residual(), report.row(29).and_then(|r| r.residual));
    }

    #[test]
    fn empty_report() {
        let report = run::<NaiveDate, f64>(&[], &[], &RegressionConfig::default());
        assert!(report.is_empty());
        assert_eq!(report.rows().len(), 0);
        assert_eq!(report.defined_count(), 0);
        assert_eq!(report.first_timestamp(), None);
        assert_eq!(report.latest_residual_timestamp(), None);
        assert!(!report.is_latest_defined());
        assert_eq!(report.summary(), &ResidualSummary::default());

        let metrics = report.metrics("empty.csv");
        assert_eq!(metrics.mean, None);
        assert_eq!(metrics.z_score, None);
    }

    #[test]
    #[should_panic(expected = "one regression record per aligned row")]
    fn mismatched_records_panic() {
        let (fly, leg) = series(5);
        let aligned = align(&fly, &leg);
        let _ = RegressionReport::new(
            RegressionConfig::default(),
            aligned,
            Vec::new(),
            ResidualSummary::default(),
        );
    }
}
