use num_traits::Float;

use alloc::vec::Vec;

use crate::{
    AlignedRow, AlignedSeries, CalendarTimestamp, FitError, LineFit, RegressionConfig, fit_line,
    utils::CalendarWindow,
};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Fitted<T> {
    line: LineFit<T>,
    predicted: T,
    residual: T,
}

/// Regression output for one aligned row
///
/// Either every field is defined or none is; [`RegressionRecord::error`] tells why a row
/// was left undefined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionRecord<T>(Result<Fitted<T>, FitError>);

impl<T: Float> RegressionRecord<T> {
    /// Builds the record of a row from the fit of its window
    ///
    /// # Arguments
    ///
    /// * `fit` - The line fitted over the row's trailing window
    /// * `leg` - The row's leg value
    /// * `fly` - The row's fly value
    ///
    /// # Returns
    ///
    /// * `Self` - The record, undefined if the fit is or if the prediction is not finite
    pub fn new(fit: Result<LineFit<T>, FitError>, leg: T, fly: T) -> Self {
        Self(fit.and_then(|line| {
            let predicted = line.predict(leg);
            let residual = fly - predicted;
            if predicted.is_finite() && residual.is_finite() {
                Ok(Fitted {
                    line,
                    predicted,
                    residual,
                })
            } else {
                Err(FitError::NonFinite)
            }
        }))
    }

    /// Returns `true` if the row has a fit
    pub const fn is_defined(&self) -> bool {
        self.0.is_ok()
    }

    /// Returns why the row has no fit, `None` if it has one
    pub fn error(&self) -> Option<FitError> {
        self.0.err()
    }

    /// Returns the fitted line of the row's window
    pub fn line(&self) -> Option<LineFit<T>> {
        self.0.ok().map(|f| f.line)
    }

    /// Returns the hedge ratio of the row's window
    pub fn slope(&self) -> Option<T> {
        self.0.ok().map(|f| f.line.slope)
    }

    /// Returns the intercept of the row's window
    pub fn intercept(&self) -> Option<T> {
        self.0.ok().map(|f| f.line.intercept)
    }

    /// Returns the fitted fly value `slope * leg + intercept` of the row
    pub fn predicted(&self) -> Option<T> {
        self.0.ok().map(|f| f.predicted)
    }

    /// Returns the residual `fly - predicted` of the row
    pub fn residual(&self) -> Option<T> {
        self.0.ok().map(|f| f.residual)
    }
}

/// Rolling regression of a fly series on a leg series over a trailing calendar window
///
/// Rows are pushed in timestamp order with [`RollingRegression::next`]. Each push evicts
/// the rows older than `window_months` calendar months before the new row and fits
/// `fly = slope * leg + intercept` over what remains, provided the window holds at least
/// `min_periods` rows including the new one. Only past and current rows are ever part of
/// a window.
#[derive(Debug, Clone)]
pub struct RollingRegression<S, T> {
    /// Trailing window of `(leg, fly)` pairs
    buf: CalendarWindow<S, (T, T)>,
    /// Minimum observations for a fit
    min_periods: usize,
    /// Record of the most recent row
    record: Option<RegressionRecord<T>>,
}

impl<S, T> RollingRegression<S, T>
where
    S: CalendarTimestamp,
    T: Float + Default,
{
    /// Creates a new `RollingRegression` instance with the specified configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Window length and minimum observations
    ///
    /// # Returns
    ///
    /// * `Self` - The `RollingRegression` instance
    pub fn new(config: &RegressionConfig) -> Self {
        Self {
            buf: CalendarWindow::new(config.window_months()),
            min_periods: config.min_periods(),
            record: None,
        }
    }

    /// Returns the trailing window length in calendar months
    pub const fn window_months(&self) -> u32 {
        self.buf.months()
    }

    /// Returns the minimum number of observations for a fit
    pub const fn min_periods(&self) -> usize {
        self.min_periods
    }

    /// Resets the regression
    ///
    /// # Returns
    ///
    /// * `&mut Self` - The regression object
    pub fn reset(&mut self) -> &mut Self {
        self.buf.reset();
        self.record = None;
        self
    }

    /// Updates the regression with the next aligned row
    ///
    /// # Arguments
    ///
    /// * `row` - The next row, stamped strictly after the previous one
    ///
    /// # Returns
    ///
    /// * `&mut Self` - The updated regression object for method chaining
    ///
    /// # Panics
    ///
    /// If `row.timestamp` is not after the previously pushed timestamp.
    pub fn next(&mut self, row: AlignedRow<S, T>) -> &mut Self {
        self.push(row);
        self
    }

    fn push(&mut self, row: AlignedRow<S, T>) -> RegressionRecord<T> {
        self.buf.next(row.timestamp, (row.leg, row.fly));
        let record = RegressionRecord::new(self.fit(), row.leg, row.fly);
        if let Some(err) = record.error() {
            log::trace!("row left undefined: {err}");
        }
        self.record = Some(record);
        record
    }

    fn fit(&self) -> Result<LineFit<T>, FitError> {
        let len = self.buf.len();
        if len < self.min_periods {
            return Err(FitError::InsufficientWindow {
                len,
                required: self.min_periods,
            });
        }
        fit_line(self.buf.iter().map(|(_, pair)| *pair))
    }

    /// Returns the number of rows in the current window
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if no row has been pushed since creation or the last reset
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns the inclusive start of the current window
    pub const fn window_start(&self) -> Option<S> {
        self.buf.start()
    }

    /// Returns the record of the most recently pushed row
    pub const fn record(&self) -> Option<RegressionRecord<T>> {
        self.record
    }

    /// Returns the hedge ratio of the current window
    ///
    /// # Returns
    ///
    /// * `Option<T>` - The slope, or `None` if the window is under-populated or degenerate
    ///
    /// # Examples
    ///
    /// ```
    /// use hedge_residuals::{AlignedRow, RegressionConfig, RollingRegression};
    /// use assert_approx_eq::assert_approx_eq;
    /// use chrono::NaiveDate;
    ///
    /// let mut reg = RollingRegression::new(&RegressionConfig::new(1, 3));
    /// let mut results = vec![];
    /// let inputs = [(1.0, 7.0), (2.0, 9.0), (4.0, 13.0), (3.0, 10.0)];
    /// for (d, (leg, fly)) in inputs.into_iter().enumerate() {
    ///     let timestamp = NaiveDate::from_ymd_opt(2024, 1, d as u32 + 1).unwrap();
    ///     reg.next(AlignedRow { timestamp, leg, fly }).slope().map(|v| results.push(v));
    /// }
    ///
    /// let expected: [f64; 2] = [2.0, 1.9];
    /// for (i, e) in expected.iter().enumerate() {
    ///     assert_approx_eq!(e, results[i], 1e-9);
    /// }
    /// ```
    pub fn slope(&self) -> Option<T> {
        self.record.and_then(|r| r.slope())
    }

    /// Returns the intercept of the current window
    pub fn intercept(&self) -> Option<T> {
        self.record.and_then(|r| r.intercept())
    }

    /// Returns the fitted fly value of the most recent row
    pub fn predicted(&self) -> Option<T> {
        self.record.and_then(|r| r.predicted())
    }

    /// Returns the residual of the most recent row
    pub fn residual(&self) -> Option<T> {
        self.record.and_then(|r| r.residual())
    }
}

/// Runs the rolling regression over a whole aligned series
///
/// # Arguments
///
/// * `aligned` - The aligned fly and leg series
/// * `config` - Window length and minimum observations
///
/// # Returns
///
/// * `Vec<RegressionRecord<T>>` - One record per aligned row, in the same order
pub fn compute<S, T>(
    aligned: &AlignedSeries<S, T>,
    config: &RegressionConfig,
) -> Vec<RegressionRecord<T>>
where
    S: CalendarTimestamp,
    T: Float + Default,
{
    let mut regression = RollingRegression::new(config);
    let records: Vec<_> = aligned.iter().map(|row| regression.push(*row)).collect();

    log::debug!(
        "fitted {} of {} rows over a {} month window with min periods {}",
        records.iter().filter(|r| r.is_defined()).count(),
        records.len(),
        config.window_months(),
        config.min_periods()
    );

    records
}
