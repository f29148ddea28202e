use crate::domain::config::IntervalConfig;
use rand::Rng;
use std::time::Duration;

/// Inclusive duration range for randomized scheduling
#[derive(Debug, Clone, Copy)]
pub struct IntervalBounds {
    min: Duration,
    max: Duration,
}

impl IntervalBounds {
    /// Create bounds from millisecond values
    pub fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min: Duration::from_millis(min_ms),
            max: Duration::from_millis(max_ms),
        }
    }

    /// Draw a uniform value from the range
    ///
    /// A degenerate range (min == max) always yields that value.
    pub fn sample(&self) -> Duration {
        if self.min >= self.max {
            return self.min;
        }

        let min_ms = self.min.as_millis() as u64;
        let max_ms = self.max.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min_ms..=max_ms))
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }
}

impl From<IntervalConfig> for IntervalBounds {
    fn from(config: IntervalConfig) -> Self {
        Self::from_millis(config.min_ms, config.max_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_within_bounds() {
        let bounds = IntervalBounds::from_millis(100, 500);

        for _ in 0..100 {
            let sampled = bounds.sample();
            assert!(sampled >= Duration::from_millis(100));
            assert!(sampled <= Duration::from_millis(500));
        }
    }

    #[test]
    fn test_degenerate_range() {
        let bounds = IntervalBounds::from_millis(250, 250);
        assert_eq!(bounds.sample(), Duration::from_millis(250));

        let zero = IntervalBounds::from_millis(0, 0);
        assert_eq!(zero.sample(), Duration::ZERO);
    }

    #[test]
    fn test_from_interval_config() {
        let bounds: IntervalBounds = IntervalConfig::new(10, 20).into();
        assert_eq!(bounds.min(), Duration::from_millis(10));
        assert_eq!(bounds.max(), Duration::from_millis(20));
    }
}
