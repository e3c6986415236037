/// Parameters of the rolling hedge regression
///
/// Defaults to a three month trailing window that needs at least 50 aligned observations
/// before a row gets a fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegressionConfig {
    /// Trailing window length in calendar months
    window_months: u32,
    /// Minimum observations in the window, current row included
    min_periods: usize,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self::new(3, 50)
    }
}

impl RegressionConfig {
    /// Creates a new configuration, panics if `window_months` is 0
    ///
    /// # Arguments
    ///
    /// * `window_months` - Trailing window length in calendar months
    /// * `min_periods` - Minimum observations in the window for a row to be fitted
    ///
    /// # Returns
    ///
    /// * `Self` - The configuration
    pub const fn new(window_months: u32, min_periods: usize) -> Self {
        assert!(window_months > 0, "window months can not be zero");
        Self {
            window_months,
            min_periods,
        }
    }

    /// Returns the trailing window length in calendar months
    pub const fn window_months(&self) -> u32 {
        self.window_months
    }

    /// Returns the minimum number of observations for a fit
    pub const fn min_periods(&self) -> usize {
        self.min_periods
    }

    /// Sets the trailing window length, panics if `window_months` is 0
    ///
    /// # Arguments
    ///
    /// * `window_months` - Trailing window length in calendar months
    ///
    /// # Returns
    ///
    /// * `&mut Self` - The configuration
    pub const fn set_window_months(&mut self, window_months: u32) -> &mut Self {
        assert!(window_months > 0, "window months can not be zero");
        self.window_months = window_months;
        self
    }

    /// Sets the minimum number of observations for a fit
    ///
    /// # Arguments
    ///
    /// * `min_periods` - Minimum observations in the window, current row included
    ///
    /// # Returns
    ///
    /// * `&mut Self` - The configuration
    pub const fn set_min_periods(&mut self, min_periods: usize) -> &mut Self {
        self.min_periods = min_periods;
        self
    }
}
