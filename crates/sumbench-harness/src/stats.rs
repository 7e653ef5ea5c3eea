//! Mean and population standard deviation over repeated samples.

use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, HarnessResult};

/// Aggregate of one variant's samples at one configuration.
///
/// The raw samples are kept next to the summary so nothing is lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantStats {
    /// Arithmetic mean, seconds.
    pub mean: f64,
    /// Population standard deviation, seconds.
    pub std: f64,
    /// Samples in invocation order.
    pub times: Vec<f64>,
}

impl VariantStats {
    /// Summarize `times`. An empty sequence is an error, not NaN.
    ///
    /// ```
    /// use sumbench_harness::VariantStats;
    ///
    /// let stats = VariantStats::from_samples(vec![2.0, 4.0, 6.0]).unwrap();
    /// assert_eq!(stats.mean, 4.0);
    /// assert!((stats.std - 1.632_993).abs() < 1e-6);
    /// ```
    pub fn from_samples(times: Vec<f64>) -> HarnessResult<Self> {
        let mean = mean(&times)?;
        let std = population_std(&times, mean);
        Ok(Self { mean, std, times })
    }

    /// Number of samples behind this aggregate.
    pub fn sample_count(&self) -> usize {
        self.times.len()
    }
}

fn mean(samples: &[f64]) -> HarnessResult<f64> {
    if samples.is_empty() {
        return Err(HarnessError::EmptySamples);
    }
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

fn population_std(samples: &[f64], mean: f64) -> f64 {
    let variance = samples
        .iter()
        .map(|x| {
            let d = x - mean;
            d * d
        })
        .sum::<f64>()
        / samples.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_values() {
        let stats = VariantStats::from_samples(vec![2.0, 4.0, 6.0]).unwrap();
        assert_eq!(stats.mean, 4.0);
        assert!((stats.std - (8.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(stats.times, vec![2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_single_sample() {
        let stats = VariantStats::from_samples(vec![0.25]).unwrap();
        assert_eq!(stats.mean, 0.25);
        assert_eq!(stats.std, 0.0);
        assert_eq!(stats.sample_count(), 1);
    }

    #[test]
    fn test_empty_is_error() {
        let err = VariantStats::from_samples(vec![]).unwrap_err();
        assert!(matches!(err, HarnessError::EmptySamples));
    }

    #[test]
    fn test_preserves_order() {
        let stats = VariantStats::from_samples(vec![3.0, 1.0, 2.0]).unwrap();
        assert_eq!(stats.times, vec![3.0, 1.0, 2.0]);
    }

    proptest! {
        #[test]
        fn mean_within_bounds(samples in prop::collection::vec(0.0f64..1.0e3, 1..50)) {
            let stats = VariantStats::from_samples(samples.clone()).unwrap();
            let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
            let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(stats.mean >= min - 1e-9 && stats.mean <= max + 1e-9);
            prop_assert!(stats.std >= 0.0);
            prop_assert!(stats.std <= (max - min) + 1e-9);
        }

        #[test]
        fn constant_samples_have_zero_std(value in 0.0f64..10.0, n in 1usize..20) {
            let stats = VariantStats::from_samples(vec![value; n]).unwrap();
            prop_assert!(stats.std.abs() < 1e-9);
            prop_assert!((stats.mean - value).abs() < 1e-9);
        }
    }
}
