use num_traits::Float;
use thiserror::Error;

use crate::Kbn;

/// Reason a regression row carries no fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FitError {
    /// The trailing window holds fewer observations than required
    #[error("window holds {len} observations, {required} required")]
    InsufficientWindow {
        /// Observations in the window, the current one included
        len: usize,
        /// Minimum number of observations for a fit
        required: usize,
    },
    /// Every predictor value in the window is identical
    #[error("predictor has zero variance within the window")]
    DegenerateFit,
    /// The fit or its prediction overflowed or produced NaN
    #[error("fit produced a non-finite value")]
    NonFinite,
}

/// Slope and intercept of an ordinary least squares line `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit<T> {
    /// Sensitivity of `y` to `x`, the hedge ratio
    pub slope: T,
    /// Value of `y` at `x = 0`
    pub intercept: T,
    /// Number of observations used in the fit
    pub len: usize,
}

impl<T: Float> LineFit<T> {
    /// Evaluates the fitted line at `x`
    #[inline]
    pub fn predict(&self, x: T) -> T {
        self.slope * x + self.intercept
    }
}

/// Fits `y = slope * x + intercept` by ordinary least squares
///
/// The fit is computed in two passes: the means first, then the centered cross products,
/// both accumulated with Kahan-Babuska-Neumaier summation. Centering keeps the fit accurate
/// for price-like series where the raw sums of squares would cancel catastrophically.
///
/// # Arguments
///
/// * `points` - The `(x, y)` observations; iterated twice
///
/// # Returns
///
/// * `Result<LineFit<T>, FitError>` - The fitted line, or why no line could be fitted
///
/// # Examples
///
/// ```
/// use hedge_residuals::{FitError, fit_line};
/// use assert_approx_eq::assert_approx_eq;
///
/// let points: [(f64, f64); 5] = [(1.0, 2.0), (2.0, 4.0), (3.0, 5.0), (4.0, 4.0), (5.0, 5.0)];
/// let fit = fit_line(points).unwrap();
/// assert_approx_eq!(fit.slope, 0.6, 1e-12);
/// assert_approx_eq!(fit.intercept, 2.2, 1e-12);
///
/// let flat: [(f64, f64); 3] = [(3.0, 1.0), (3.0, 2.0), (3.0, 4.0)];
/// assert_eq!(fit_line(flat), Err(FitError::DegenerateFit));
/// ```
pub fn fit_line<T, I>(points: I) -> Result<LineFit<T>, FitError>
where
    T: Float + Default,
    I: IntoIterator<Item = (T, T)>,
    I::IntoIter: Clone,
{
    let points = points.into_iter();

    let mut len = 0;
    let mut sum_x = Kbn::<T>::default();
    let mut sum_y = Kbn::<T>::default();
    let mut first_x = None;
    let mut constant_x = true;
    for (x, y) in points.clone() {
        len += 1;
        sum_x += x;
        sum_y += y;
        match first_x {
            None => first_x = Some(x),
            Some(x0) => constant_x &= x == x0,
        }
    }

    if len == 0 {
        return Err(FitError::InsufficientWindow { len, required: 1 });
    }
    if constant_x {
        return Err(FitError::DegenerateFit);
    }

    let n = T::from(len).ok_or(FitError::NonFinite)?;
    let mean_x = sum_x.total() / n;
    let mean_y = sum_y.total() / n;

    let mut sxx = Kbn::<T>::default();
    let mut sxy = Kbn::<T>::default();
    for (x, y) in points {
        let dx = x - mean_x;
        sxx += dx * dx;
        sxy += dx * (y - mean_y);
    }
    let (sxx, sxy) = (sxx.total(), sxy.total());

    if !sxx.is_finite() || !sxy.is_finite() {
        return Err(FitError::NonFinite);
    }
    if sxx <= T::zero() {
        return Err(FitError::DegenerateFit);
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    if slope.is_finite() && intercept.is_finite() {
        Ok(LineFit {
            slope,
            intercept,
            len,
        })
    } else {
        Err(FitError::NonFinite)
    }
}
