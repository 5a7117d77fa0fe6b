pub const DEFAULT_ROUND_TRIP_MS: u32 = 500;

#[derive(Debug, Clone, Default)]
pub struct NetworkStats {
    pub packets_sent: u64,
    pub packets_received: u64,
    pub packets_dropped: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub rtt_ms: u32,
}

/// Smoothed round-trip time. The first sample is taken as-is, later ones
/// move the estimate by an eighth of the difference.
#[derive(Debug, Clone)]
pub struct RttEstimator {
    rtt_ms: u32,
    sampled: bool,
}

impl Default for RttEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl RttEstimator {
    pub fn new() -> Self {
        Self {
            rtt_ms: DEFAULT_ROUND_TRIP_MS,
            sampled: false,
        }
    }

    pub fn sample(&mut self, sample_ms: u32) {
        if !self.sampled {
            self.rtt_ms = sample_ms;
            self.sampled = true;
            return;
        }

        let current = self.rtt_ms as i64;
        let delta = sample_ms as i64 - current;
        self.rtt_ms = (current + delta / 8).max(0) as u32;
    }

    pub fn rtt_ms(&self) -> u32 {
        self.rtt_ms
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_replaces_default() {
        let mut rtt = RttEstimator::new();
        assert_eq!(rtt.rtt_ms(), DEFAULT_ROUND_TRIP_MS);

        rtt.sample(40);
        assert_eq!(rtt.rtt_ms(), 40);
    }

    #[test]
    fn later_samples_are_smoothed() {
        let mut rtt = RttEstimator::new();
        rtt.sample(40);
        rtt.sample(120);
        assert_eq!(rtt.rtt_ms(), 50);

        rtt.sample(10);
        assert_eq!(rtt.rtt_ms(), 45);
    }
}
