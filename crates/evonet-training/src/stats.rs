//! Summary statistics over a generation's fitness values.

use serde::Serialize;

/// Descriptive statistics for one generation's fitness.
///
/// NaN values are not part of the statistics; they are only counted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitnessStats {
    pub count: usize,
    /// Number of NaN values that were excluded.
    pub nan_count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Upper median for even counts.
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

impl FitnessStats {
    /// Computes statistics from unsorted values.
    ///
    /// Returns `None` if there is no non-NaN value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use evonet_training::stats::FitnessStats;
    /// let stats = FitnessStats::new([3.0, f64::NAN, 1.0, 2.0]).unwrap();
    /// assert_eq!(stats.count, 3);
    /// assert_eq!(stats.nan_count, 1);
    /// assert_eq!(stats.mean, 2.0);
    /// assert_eq!(stats.median, 2.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut nan_count = 0;
        let mut values = values
            .into_iter()
            .filter(|v| {
                let nan = v.is_nan();
                nan_count += usize::from(nan);
                !nan
            })
            .collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);

        let min = *values.first()?;
        let max = *values.last()?;
        let count = values.len();
        #[expect(clippy::cast_precision_loss)]
        let n = count as f64;
        let mean = values.iter().sum::<f64>() / n;
        let median = values[count / 2];
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Some(Self {
            count,
            nan_count,
            min,
            max,
            mean,
            median,
            std_dev: variance.sqrt(),
        })
    }
}
