//! Clock and timing utilities for the gaze sample stream.
//!
//! Samples are stamped against a monotonic epoch recorded when the
//! source is opened. Channel freshness, on the other hand, compares
//! filesystem modification times, which are wall-clock values.

use std::time::{Duration, Instant, SystemTime};

/// A monotonic clock anchored to the moment a sample source was opened.
#[derive(Debug, Clone)]
pub struct GazeClock {
    epoch: Instant,
}

impl GazeClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    /// Nanoseconds elapsed since the epoch.
    pub fn elapsed_ns(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }
}

/// Age of a wall-clock timestamp relative to `now`.
///
/// A timestamp in the future (clock skew between producer and consumer)
/// has age zero.
pub fn age_of(timestamp: SystemTime, now: SystemTime) -> Duration {
    now.duration_since(timestamp).unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_elapsed() {
        let clock = GazeClock::start();
        let first = clock.elapsed_ns();
        assert!(first < 1_000_000_000);
        assert!(clock.elapsed_ns() >= first);
    }

    #[test]
    fn test_age_of_past_and_future() {
        let now = SystemTime::now();
        let past = now - Duration::from_secs(3);
        assert_eq!(age_of(past, now), Duration::from_secs(3));

        let future = now + Duration::from_secs(10);
        assert_eq!(age_of(future, now), Duration::ZERO);
    }
}
