use num_traits::Float;

use alloc::vec::Vec;

use crate::Kbn;

/// Distribution statistics of a residual series
///
/// Every statistic is computed from the finite residuals only and is `None` when the
/// residuals do not meet its precondition. Statistics are independent of each other, so a
/// single residual still has a mean and a latest value but no standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResidualSummary<T> {
    /// Number of finite residuals
    count: usize,
    /// Arithmetic mean
    mean: Option<T>,
    /// Sample standard deviation
    std_dev: Option<T>,
    /// Population skewness
    skewness: Option<T>,
    /// Raw (non-excess) kurtosis
    kurtosis: Option<T>,
    /// Most recent finite residual
    latest_residual: Option<T>,
    /// Standard score of the latest residual
    z_score: Option<T>,
}

impl<T: Float> ResidualSummary<T> {
    /// Returns the number of finite residuals the summary was computed from
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Returns the arithmetic mean of the residuals
    ///
    /// # Returns
    ///
    /// * `Option<T>` - The mean, or `None` if there are no residuals
    pub const fn mean(&self) -> Option<T> {
        self.mean
    }

    /// Returns the sample standard deviation of the residuals
    ///
    /// The sum of squared deviations is divided by `n - 1`.
    ///
    /// # Returns
    ///
    /// * `Option<T>` - The standard deviation, or `None` with fewer than two residuals
    pub const fn std_dev(&self) -> Option<T> {
        self.std_dev
    }

    /// Returns the skewness of the residuals
    ///
    /// Fisher-Pearson coefficient `m3 / m2^(3/2)` over population central moments
    /// `mk = sum((r - mean)^k) / n`, without small-sample bias correction. A symmetric
    /// distribution has a skewness of 0.
    ///
    /// # Returns
    ///
    /// * `Option<T>` - The skewness, or `None` if there are no residuals or all are equal
    pub const fn skewness(&self) -> Option<T> {
        self.skewness
    }

    /// Returns the kurtosis of the residuals
    ///
    /// Pearson kurtosis `m4 / m2^2` in raw form: a normal distribution maps to 3, not 0.
    ///
    /// # Returns
    ///
    /// * `Option<T>` - The kurtosis, or `None` if there are no residuals or all are equal
    pub const fn kurtosis(&self) -> Option<T> {
        self.kurtosis
    }

    /// Returns the most recent finite residual
    pub const fn latest_residual(&self) -> Option<T> {
        self.latest_residual
    }

    /// Returns the z-score of the latest residual against all residuals
    ///
    /// # Returns
    ///
    /// * `Option<T>` - `(latest - mean) / std_dev`, or `None` if the standard deviation is
    ///   undefined or zero
    pub const fn z_score(&self) -> Option<T> {
        self.z_score
    }

    /// Evaluates the normal density fitted to the residuals at `x`
    ///
    /// Uses the residual mean and sample standard deviation as the normal parameters.
    ///
    /// # Arguments
    ///
    /// * `x` - The point to evaluate
    ///
    /// # Returns
    ///
    /// * `Option<T>` - The density, or `None` if the standard deviation is undefined or zero
    pub fn normal_pdf(&self, x: T) -> Option<T> {
        let (mean, std_dev) = self.mean.zip(self.std_dev)?;
        if std_dev <= T::zero() {
            return None;
        }
        let tau = T::from(core::f64::consts::TAU)?;
        let _2 = T::from(2.0)?;
        let z = (x - mean) / std_dev;
        Some((-(z * z) / _2).exp() / (std_dev * tau.sqrt()))
    }
}

/// Summarizes the distribution of a residual series
///
/// Undefined (`None`) and non-finite residuals are skipped. The remaining residuals keep
/// their order, so the latest residual is the last finite one: when the newest rows of the
/// series are undefined, the z-score refers to the most recent defined row.
///
/// Central moments are accumulated in a second pass over the data with
/// Kahan-Babuska-Neumaier summation.
///
/// # Arguments
///
/// * `residuals` - Residuals in timestamp order
///
/// # Returns
///
/// * `ResidualSummary<T>` - The summary statistics
///
/// # Examples
///
/// ```
/// use hedge_residuals::summarize;
/// use assert_approx_eq::assert_approx_eq;
///
/// let residuals: [Option<f64>; 6] = [None, Some(-2.0), Some(-1.0), Some(0.0), Some(1.0), Some(2.0)];
/// let summary = summarize(residuals);
/// assert_eq!(summary.count(), 5);
/// assert_approx_eq!(summary.mean().unwrap(), 0.0, 1e-12);
/// assert_approx_eq!(summary.std_dev().unwrap(), 1.58113883, 1e-8);
/// assert_approx_eq!(summary.z_score().unwrap(), 1.26491106, 1e-8);
///
/// let empty = summarize(Vec::<Option<f64>>::new());
/// assert_eq!(empty.mean(), None);
/// assert_eq!(empty.z_score(), None);
/// ```
pub fn summarize<T, I>(residuals: I) -> ResidualSummary<T>
where
    T: Float + Default,
    I: IntoIterator<Item = Option<T>>,
{
    let values: Vec<T> = residuals
        .into_iter()
        .flatten()
        .filter(|r| r.is_finite())
        .collect();
    summarize_finite(&values).unwrap_or_default()
}

fn summarize_finite<T>(values: &[T]) -> Option<ResidualSummary<T>>
where
    T: Float + Default,
{
    let latest = *values.last()?;
    let count = values.len();
    let n = T::from(count)?;

    let mut sum = Kbn::<T>::default();
    for &v in values {
        sum += v;
    }
    let mean = sum.total() / n;

    let mut sum_sq = Kbn::<T>::default();
    let mut sum_cube = Kbn::<T>::default();
    let mut sum_quad = Kbn::<T>::default();
    for &v in values {
        let d = v - mean;
        let d2 = d * d;
        sum_sq += d2;
        sum_cube += d2 * d;
        sum_quad += d2 * d2;
    }

    let m2 = sum_sq.total() / n;
    let m3 = sum_cube.total() / n;
    let m4 = sum_quad.total() / n;

    let std_dev = (count >= 2)
        .then(|| sum_sq.total() / (n - T::one()))
        .filter(|var| *var >= T::zero())
        .map(|var| var.sqrt());

    let (skewness, kurtosis) = if m2 > T::zero() {
        (Some(m3 / (m2 * m2.sqrt())), Some(m4 / (m2 * m2)))
    } else {
        (None, None)
    };

    let z_score = std_dev
        .filter(|sd| *sd > T::zero())
        .map(|sd| (latest - mean) / sd)
        .filter(|z| z.is_finite());

    Some(ResidualSummary {
        count,
        mean: Some(mean),
        std_dev,
        skewness,
        kurtosis,
        latest_residual: Some(latest),
        z_score,
    })
}
