use std::time::Duration;

use drift::ConnectionTimings;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub frame_rate: u32,
    pub connection_timeout_secs: u64,
    pub connect_retry_ms: u64,
    pub ping_interval_secs: f32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            connection_timeout_secs: 10,
            connect_retry_ms: 500,
            ping_interval_secs: 0.25,
        }
    }
}

impl ClientConfig {
    pub fn timings(&self) -> ConnectionTimings {
        ConnectionTimings {
            timeout: Duration::from_secs(self.connection_timeout_secs),
            retry_interval: Duration::from_millis(self.connect_retry_ms),
            ping_interval: Duration::from_secs_f32(self.ping_interval_secs),
        }
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate.max(1) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_duration_follows_rate() {
        let config = ClientConfig {
            frame_rate: 4,
            ..Default::default()
        };
        assert_eq!(config.frame_duration(), Duration::from_millis(250));

        let zero = ClientConfig {
            frame_rate: 0,
            ..Default::default()
        };
        assert_eq!(zero.frame_duration(), Duration::from_secs(1));
    }
}
