//! Linear backoff
//!
//! Delay schedule between poll attempts: starts at the initial delay and grows
//! by a fixed increment until it saturates at the maximum.

use std::time::Duration;

use crate::config::PollerConfig;

/// Inter-attempt delay schedule
///
/// `delay(0) = initial`, `delay(i + 1) = min(delay(i) + increment, max)`.
#[derive(Debug, Clone)]
pub struct Backoff {
    current: Duration,
    increment: Duration,
    max: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, increment: Duration, max: Duration) -> Self {
        Self {
            current: initial,
            increment,
            max,
        }
    }

    /// Creates the schedule described by a poller configuration
    pub fn from_config(config: &PollerConfig) -> Self {
        Self::new(config.initial_delay, config.delay_increment, config.max_delay)
    }

    /// The delay the next call to [`Backoff::advance`] returns
    pub fn current(&self) -> Duration {
        self.current
    }

    /// Returns the current delay and moves the schedule one step forward
    pub fn advance(&mut self) -> Duration {
        let delay = self.current;
        self.current = self.current.saturating_add(self.increment).min(self.max);
        delay
    }
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        Some(self.advance())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_linear_ramp_saturates() {
        let delays: Vec<Duration> = Backoff::new(ms(10), ms(5), ms(20)).take(5).collect();
        assert_eq!(delays, vec![ms(10), ms(15), ms(20), ms(20), ms(20)]);
    }

    #[test]
    fn test_default_schedule() {
        let delays: Vec<Duration> = Backoff::from_config(&PollerConfig::default())
            .take(8)
            .collect();
        assert_eq!(delays[0], ms(1500));
        assert_eq!(delays[1], ms(1750));
        assert_eq!(delays[6], ms(3000));
        assert_eq!(delays[7], ms(3000));
    }

    #[test]
    fn test_schedule_is_non_decreasing_and_bounded() {
        let max = ms(3000);
        let delays: Vec<Duration> = Backoff::new(ms(1500), ms(250), max).take(60).collect();
        assert!(delays.windows(2).all(|w| w[0] <= w[1]));
        assert!(delays.iter().all(|d| *d <= max));
    }

    #[test]
    fn test_initial_above_max_is_clamped_after_first_step() {
        let mut backoff = Backoff::new(ms(50), ms(5), ms(20));
        assert_eq!(backoff.advance(), ms(50));
        assert_eq!(backoff.current(), ms(20));
    }

    #[test]
    fn test_zero_increment_keeps_delay() {
        let delays: Vec<Duration> = Backoff::new(ms(7), Duration::ZERO, ms(20)).take(3).collect();
        assert_eq!(delays, vec![ms(7), ms(7), ms(7)]);
    }
}
