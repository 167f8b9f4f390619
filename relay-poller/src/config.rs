//! Poller configuration
//!
//! Defines the attempt budget, the backoff delays and the status tokens
//! the poller classifies poll results with.

use std::collections::HashSet;
use std::time::Duration;

use crate::error::TaskError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1500);
pub const DEFAULT_DELAY_INCREMENT: Duration = Duration::from_millis(250);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(3000);
pub const DEFAULT_SUCCESS_STATES: [&str; 2] = ["SUCCESS", "COMPLETED"];
pub const DEFAULT_FAILURE_STATES: [&str; 1] = ["FAILURE"];

/// Poller configuration
///
/// Delays are tunable so the same poller fits quick resizes and multi-minute
/// video conversions.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Maximum number of poll calls before the run times out
    pub max_attempts: u32,

    /// Delay after the first unfinished poll
    pub initial_delay: Duration,

    /// Amount added to the delay after every unfinished poll
    pub delay_increment: Duration,

    /// Upper bound the delay saturates to
    pub max_delay: Duration,

    /// Status tokens that mark success (when the result payload is present)
    pub success_states: HashSet<String>,

    /// Status tokens that mark failure
    pub failure_states: HashSet<String>,
}

impl PollerConfig {
    /// Creates a new configuration with defaults
    pub fn new() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: DEFAULT_INITIAL_DELAY,
            delay_increment: DEFAULT_DELAY_INCREMENT,
            max_delay: DEFAULT_MAX_DELAY,
            success_states: DEFAULT_SUCCESS_STATES.iter().map(|s| s.to_string()).collect(),
            failure_states: DEFAULT_FAILURE_STATES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables (all optional):
    /// - RELAY_MAX_ATTEMPTS (default: 60)
    /// - RELAY_INITIAL_DELAY_MS (default: 1500)
    /// - RELAY_DELAY_INCREMENT_MS (default: 250)
    /// - RELAY_MAX_DELAY_MS (default: 3000)
    /// - RELAY_SUCCESS_STATES (comma separated, default: SUCCESS,COMPLETED)
    /// - RELAY_FAILURE_STATES (comma separated, default: FAILURE)
    ///
    /// Unparsable values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`PollerConfig::from_env`], reading variables through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::new();

        let millis = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(default)
        };

        let states = |key: &str, default: HashSet<String>| {
            lookup(key)
                .map(|s| parse_states(&s))
                .filter(|set| !set.is_empty())
                .unwrap_or(default)
        };

        Self {
            max_attempts: lookup("RELAY_MAX_ATTEMPTS")
                .and_then(|s| s.trim().parse::<u32>().ok())
                .unwrap_or(defaults.max_attempts),
            initial_delay: millis("RELAY_INITIAL_DELAY_MS", defaults.initial_delay),
            delay_increment: millis("RELAY_DELAY_INCREMENT_MS", defaults.delay_increment),
            max_delay: millis("RELAY_MAX_DELAY_MS", defaults.max_delay),
            success_states: states("RELAY_SUCCESS_STATES", defaults.success_states),
            failure_states: states("RELAY_FAILURE_STATES", defaults.failure_states),
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_delay_increment(mut self, increment: Duration) -> Self {
        self.delay_increment = increment;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Replaces the success tokens
    pub fn with_success_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.success_states = states.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the failure tokens
    pub fn with_failure_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failure_states = states.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_success_state(&self, token: Option<&str>) -> bool {
        token.is_some_and(|t| self.success_states.contains(t))
    }

    pub fn is_failure_state(&self, token: Option<&str>) -> bool {
        token.is_some_and(|t| self.failure_states.contains(t))
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), TaskError> {
        if self.max_attempts == 0 {
            return Err(TaskError::Configuration(
                "max_attempts must be greater than 0".to_string(),
            ));
        }

        if self.max_delay < self.initial_delay {
            return Err(TaskError::Configuration(
                "max_delay cannot be smaller than initial_delay".to_string(),
            ));
        }

        if self.success_states.is_empty() {
            return Err(TaskError::Configuration(
                "success_states cannot be empty".to_string(),
            ));
        }

        if let Some(token) = self.success_states.intersection(&self.failure_states).next() {
            return Err(TaskError::Configuration(format!(
                "state '{}' is both a success and a failure state",
                token
            )));
        }

        Ok(())
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_states(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
