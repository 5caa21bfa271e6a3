/// Summary of a sample of scores or move counts.
///
/// Variance and standard deviation are population statistics; the median of an even-sized
/// sample is its upper middle value.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub variance: f64,
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Summarizes `values` in any order; `None` for an empty sample.
    ///
    /// ```
    /// # use sarsa2048_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([512.0, 128.0, 256.0]).unwrap();
    /// assert_eq!((stats.min, stats.median, stats.max), (128.0, 256.0, 512.0));
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values.into_iter().collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted)
    }

    /// Summarizes an ascending sample without re-sorting it.
    ///
    /// # Panics
    ///
    /// Panics if `sorted` is not ascending.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted: &[f64]) -> Option<Self> {
        assert!(
            sorted.is_sorted_by(|a, b| a <= b),
            "sample must be in ascending order"
        );
        let (&min, &max) = (sorted.first()?, sorted.last()?);
        let n = sorted.len() as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            count: sorted.len(),
            min,
            max,
            mean,
            median: sorted[sorted.len() / 2],
            variance,
            std_dev: variance.sqrt(),
        })
    }
}
