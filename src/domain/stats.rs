//! Timing statistics for benchmark samples.

use std::time::Duration;

/// Summary of a set of nanosecond samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    pub min: Duration,
    pub max: Duration,
    pub mean: Duration,
    pub stddev: Duration,
}

impl Statistics {
    /// Compute statistics over nanosecond samples. An empty slice yields all
    /// zeros. The standard deviation is the sample form (n - 1 denominator)
    /// and zero for a single sample.
    pub fn from_nanos(samples: &[u64]) -> Statistics {
        if samples.is_empty() {
            return Statistics {
                min: Duration::ZERO,
                max: Duration::ZERO,
                mean: Duration::ZERO,
                stddev: Duration::ZERO,
            };
        }

        let count = samples.len() as u64;
        let mut total = 0u128;
        let mut min = u64::MAX;
        let mut max = 0u64;
        for &sample in samples {
            total += u128::from(sample);
            if sample < min {
                min = sample;
            }
            if sample > max {
                max = sample;
            }
        }
        let mean = (total / u128::from(count)) as u64;

        let stddev = if count > 1 {
            let mut deviation_squares = 0.0f64;
            for &sample in samples {
                let deviation = sample as f64 - mean as f64;
                deviation_squares += deviation * deviation;
            }
            (deviation_squares / (count - 1) as f64).sqrt().round() as u64
        } else {
            0
        };

        Statistics {
            min: Duration::from_nanos(min),
            max: Duration::from_nanos(max),
            mean: Duration::from_nanos(mean),
            stddev: Duration::from_nanos(stddev),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_samples_are_all_zero() {
        let stats = Statistics::from_nanos(&[]);
        assert_eq!(stats.min, Duration::ZERO);
        assert_eq!(stats.max, Duration::ZERO);
        assert_eq!(stats.mean, Duration::ZERO);
        assert_eq!(stats.stddev, Duration::ZERO);
    }

    #[test]
    fn test_single_sample() {
        let stats = Statistics::from_nanos(&[42]);
        assert_eq!(stats.min, Duration::from_nanos(42));
        assert_eq!(stats.max, Duration::from_nanos(42));
        assert_eq!(stats.mean, Duration::from_nanos(42));
        assert_eq!(stats.stddev, Duration::ZERO);
    }

    #[test]
    fn test_mean_is_integer_nanos() {
        let stats = Statistics::from_nanos(&[1, 2]);
        assert_eq!(stats.mean, Duration::from_nanos(1));
        assert_eq!(stats.min, Duration::from_nanos(1));
        assert_eq!(stats.max, Duration::from_nanos(2));
    }

    #[test]
    fn test_sample_stddev() {
        // Samples 2, 4, 4, 4, 5, 5, 7, 9: mean 5, sample variance 32/7.
        let stats = Statistics::from_nanos(&[2, 4, 4, 4, 5, 5, 7, 9]);
        assert_eq!(stats.mean, Duration::from_nanos(5));
        let expected = (32.0f64 / 7.0).sqrt().round() as u64;
        assert_eq!(stats.stddev, Duration::from_nanos(expected));
    }
}
