use std::time::{Duration, Instant};

/// Spaces out calls so that two never start closer than `min_interval`.
///
/// There is no burst allowance: each call waits out whatever remains of the
/// interval since the previous one.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last: Option<Instant>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: None,
        }
    }

    /// A limiter allowing at most `per_second` calls per second.
    /// Non-positive rates disable the limit.
    pub fn per_second(per_second: f64) -> Self {
        if per_second > 0.0 && per_second.is_finite() {
            Self::new(Duration::from_secs_f64(1.0 / per_second))
        } else {
            Self::new(Duration::ZERO)
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// How long the next call would have to wait right now.
    pub fn remaining(&self) -> Duration {
        match self.last {
            Some(last) => self.min_interval.saturating_sub(last.elapsed()),
            None => Duration::ZERO,
        }
    }

    /// Sleep until the next call is allowed, then record it as issued.
    pub fn wait(&mut self) {
        let remaining = self.remaining();
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
        self.last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_call_does_not_wait() {
        let limiter = RateLimiter::new(Duration::from_secs(60));
        assert_eq!(limiter.remaining(), Duration::ZERO);
    }

    #[test]
    fn consecutive_calls_are_spaced() {
        let mut limiter = RateLimiter::new(Duration::from_millis(30));
        let start = Instant::now();
        limiter.wait();
        limiter.wait();
        limiter.wait();
        assert!(start.elapsed() >= Duration::from_millis(60));
    }

    #[test]
    fn rate_converts_to_interval() {
        assert_eq!(RateLimiter::per_second(4.0).min_interval(), Duration::from_millis(250));
        assert_eq!(RateLimiter::per_second(0.0).min_interval(), Duration::ZERO);
    }
}
