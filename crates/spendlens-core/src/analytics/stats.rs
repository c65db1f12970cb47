//! Descriptive statistics over a numeric series (usually monthly totals)

use serde::{Deserialize, Serialize};

/// Where a value sits relative to the series mean and standard deviation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DistributionBucket {
    /// Below `mean - stddev`
    Low,
    /// In `[mean - stddev, mean)`
    Medium,
    /// In `[mean, mean + stddev)`
    High,
    /// At or above `mean + stddev`
    VeryHigh,
}

impl DistributionBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::VeryHigh => "veryHigh",
        }
    }
}

impl std::fmt::Display for DistributionBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Summary statistics of a series. Variance is the population variance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStatistics {
    pub count: usize,
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    pub median: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub range: f64,
}

impl SeriesStatistics {
    /// Compute statistics for `values`.
    ///
    /// Returns `None` for an empty series; callers must not treat an empty
    /// series as having a mean of zero.
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let n = values.len() as f64;

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 1 {
            sorted[mid]
        } else {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        };

        let min = sorted[0];
        let max = sorted[sorted.len() - 1];

        // Summing a constant series can drift off the value itself, which
        // would leave a spurious nonzero spread
        let (mean, variance) = if min == max {
            (min, 0.0)
        } else {
            let mean = values.iter().sum::<f64>() / n;
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            (mean, variance)
        };
        let std_dev = variance.sqrt();

        Some(Self {
            count: values.len(),
            max,
            min,
            mean,
            median,
            variance,
            std_dev,
            range: max - min,
        })
    }

    /// Bucket a single value against this series.
    ///
    /// When the standard deviation is zero (a single element, or every element
    /// equal) the four ranges collapse onto the mean; such values are always
    /// reported as `Medium`.
    pub fn classify(&self, value: f64) -> DistributionBucket {
        if self.std_dev == 0.0 {
            return DistributionBucket::Medium;
        }

        if value < self.mean - self.std_dev {
            DistributionBucket::Low
        } else if value < self.mean {
            DistributionBucket::Medium
        } else if value < self.mean + self.std_dev {
            DistributionBucket::High
        } else {
            DistributionBucket::VeryHigh
        }
    }

    /// Bucket every element of `values`, in order
    pub fn distribution(&self, values: &[f64]) -> Vec<DistributionBucket> {
        values.iter().map(|v| self.classify(*v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_series_has_no_statistics() {
        assert!(SeriesStatistics::compute(&[]).is_none());
    }

    #[test]
    fn test_median_odd_and_even() {
        let odd = SeriesStatistics::compute(&[30.0, 10.0, 20.0]).unwrap();
        assert!(approx(odd.median, 20.0));

        let even = SeriesStatistics::compute(&[10.0, 40.0, 20.0, 30.0]).unwrap();
        assert!(approx(even.median, 25.0));
    }

    #[test]
    fn test_constant_series_has_zero_spread() {
        let stats = SeriesStatistics::compute(&[50.0, 50.0, 50.0]).unwrap();
        assert!(approx(stats.variance, 0.0));
        assert!(approx(stats.std_dev, 0.0));
        assert!(approx(stats.range, 0.0));
        assert!(approx(stats.mean, 50.0));
    }

    #[test]
    fn test_population_variance() {
        // mean 5, squared deviations sum to 32 over 8 values
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = SeriesStatistics::compute(&values).unwrap();
        assert!(approx(stats.mean, 5.0));
        assert!(approx(stats.variance, 4.0));
        assert!(approx(stats.std_dev, 2.0));
        assert!(approx(stats.min, 2.0));
        assert!(approx(stats.max, 9.0));
        assert!(approx(stats.range, 7.0));
        assert_eq!(stats.count, 8);
    }

    #[test]
    fn test_distribution_buckets() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = SeriesStatistics::compute(&values).unwrap();
        // mean 5, stddev 2: low < 3 <= medium < 5 <= high < 7 <= veryHigh
        assert_eq!(stats.classify(2.0), DistributionBucket::Low);
        assert_eq!(stats.classify(3.0), DistributionBucket::Medium);
        assert_eq!(stats.classify(4.0), DistributionBucket::Medium);
        assert_eq!(stats.classify(5.0), DistributionBucket::High);
        assert_eq!(stats.classify(7.0), DistributionBucket::VeryHigh);
        assert_eq!(stats.classify(9.0), DistributionBucket::VeryHigh);
    }

    #[test]
    fn test_single_element_is_medium() {
        let stats = SeriesStatistics::compute(&[420.0]).unwrap();
        assert!(approx(stats.std_dev, 0.0));
        assert!(approx(stats.median, 420.0));
        assert_eq!(stats.distribution(&[420.0]), vec![DistributionBucket::Medium]);
    }

    #[test]
    fn test_inexact_constant_series_is_all_medium() {
        for (value, n) in [(33.33, 6), (0.1, 8), (0.7, 3), (1234.56, 6), (2.675, 3)] {
            let values = vec![value; n];
            let stats = SeriesStatistics::compute(&values).unwrap();
            assert_eq!(stats.variance, 0.0, "variance for {} x {}", value, n);
            assert_eq!(stats.std_dev, 0.0, "std_dev for {} x {}", value, n);
            assert_eq!(stats.mean, value);
            assert!(stats
                .distribution(&values)
                .iter()
                .all(|b| *b == DistributionBucket::Medium));
        }
    }

    #[test]
    fn test_constant_series_is_all_medium() {
        let values = [50.0, 50.0, 50.0];
        let stats = SeriesStatistics::compute(&values).unwrap();
        assert!(stats
            .distribution(&values)
            .iter()
            .all(|b| *b == DistributionBucket::Medium));
    }
}
