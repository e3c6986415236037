use alloc::{string::String, vec::Vec};

/// Named snapshot of a residual summary
///
/// Field names follow the exported history columns
/// `butterfly, mean, std, skew, kurtosis, z_score`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricsRecord<T> {
    /// Name of the fly series
    pub butterfly: String,
    /// Residual mean
    pub mean: Option<T>,
    /// Residual sample standard deviation
    pub std: Option<T>,
    /// Residual skewness
    pub skew: Option<T>,
    /// Residual raw kurtosis
    pub kurtosis: Option<T>,
    /// Z-score of the latest residual
    pub z_score: Option<T>,
}

/// Append-only list of saved metrics
///
/// The history belongs to the caller: [`MetricsHistory::record`] consumes it and hands it
/// back with the new entry, and there is no way to remove or edit an entry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MetricsHistory<T> {
    entries: Vec<MetricsRecord<T>>,
}

impl<T> Default for MetricsHistory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MetricsHistory<T> {
    /// Creates an empty history
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an entry and returns the extended history
    ///
    /// # Arguments
    ///
    /// * `entry` - The metrics to save
    ///
    /// # Returns
    ///
    /// * `Self` - The history with `entry` at the end
    ///
    /// # Examples
    ///
    /// ```
    /// use hedge_residuals::{MetricsHistory, MetricsRecord};
    ///
    /// let entry = MetricsRecord {
    ///     butterfly: "fly_mar.csv".to_string(),
    ///     mean: Some(0.0),
    ///     std: Some(1.2),
    ///     skew: Some(0.1),
    ///     kurtosis: Some(3.1),
    ///     z_score: Some(-0.4),
    /// };
    ///
    /// let history = MetricsHistory::new().record(entry.clone());
    /// let history = history.record(MetricsRecord { butterfly: "fly_jun.csv".to_string(), ..entry });
    /// assert_eq!(history.len(), 2);
    /// assert_eq!(history.last().map(|e| e.butterfly.as_str()), Some("fly_jun.csv"));
    /// ```
    #[must_use]
    pub fn record(mut self, entry: MetricsRecord<T>) -> Self {
        self.entries.push(entry);
        self
    }

    /// Returns the number of saved entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been saved
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the most recently saved entry
    pub fn last(&self) -> Option<&MetricsRecord<T>> {
        self.entries.last()
    }

    /// Returns the entries in the order they were saved
    pub fn entries(&self) -> &[MetricsRecord<T>] {
        &self.entries
    }

    /// Returns an iterator over the entries in the order they were saved
    pub fn iter(&self) -> core::slice::Iter<'_, MetricsRecord<T>> {
        self.entries.iter()
    }
}

impl<'a, T> IntoIterator for &'a MetricsHistory<T> {
    type Item = &'a MetricsRecord<T>;
    type IntoIter = core::slice::Iter<'a, MetricsRecord<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
