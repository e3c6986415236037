#![doc = include_str!("../README.md")]
#![no_std]
#![deny(
    unsafe_code,
    unused_imports,
    unused_variables,
    unused_must_use,
    missing_docs,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented
)]
#![allow(clippy::just_underscores_and_digits, clippy::len_without_is_empty)]

extern crate alloc;

use num_traits::Float;

pub(crate) type Kbn<T> = compensated_summation::KahanBabuskaNeumaier<T>;

mod utils;

mod calendar;
pub use calendar::CalendarTimestamp;

mod config;
pub use config::RegressionConfig;

mod series;
pub use series::{AlignedRow, AlignedSeries, TimePoint, align};

mod ols;
pub use ols::{FitError, LineFit, fit_line};

mod rolling_regression;
pub use rolling_regression::{RegressionRecord, RollingRegression, compute};

mod residual_statistics;
pub use residual_statistics::{ResidualSummary, summarize};

mod report;
pub use report::{RegressionReport, ReportRow};

mod history;
pub use history::{MetricsHistory, MetricsRecord};

/// Runs the full pipeline: alignment, rolling regression and residual statistics
///
/// Every stage is a pure function of its input, so calling `run` twice on the same series
/// yields identical reports. Inputs without a common timestamp produce an empty report
/// whose statistics are all `None`.
///
/// # Arguments
///
/// * `fly` - The dependent series
/// * `leg` - The hedge series
/// * `config` - Window length and minimum observations
///
/// # Returns
///
/// * `RegressionReport<S, T>` - Per-row regression output and residual summary
///
/// # Examples
///
/// ```
/// use hedge_residuals::{RegressionConfig, TimePoint, run};
/// use chrono::{Days, NaiveDate};
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let mut fly = vec![];
/// let mut leg = vec![];
/// for i in 0..120u64 {
///     let ts = start + Days::new(i);
///     let x = 10.0 + (i % 9) as f64;
///     leg.push(TimePoint::new(ts, x));
///     fly.push(TimePoint::new(ts, 2.0 * x + 5.0 + if i % 2 == 0 { 0.1 } else { -0.1 }));
/// }
///
/// let report = run(&fly, &leg, &RegressionConfig::default());
/// assert_eq!(report.len(), 120);
/// assert_eq!(report.defined_count(), 71);
/// assert!(report.z_score().is_some());
/// ```
pub fn run<S, T>(
    fly: &[TimePoint<S, T>],
    leg: &[TimePoint<S, T>],
    config: &RegressionConfig,
) -> RegressionReport<S, T>
where
    S: CalendarTimestamp,
    T: Float + Default,
{
    let series = align(fly, leg);
    let records = compute(&series, config);
    let summary = summarize(records.iter().map(|r| r.residual()));

    log::debug!(
        "summarized {} residuals over {} aligned rows",
        summary.count(),
        series.len()
    );

    RegressionReport::new(*config, series, records, summary)
}
