//! Configuration module
//!
//! Handles CLI configuration: the media API URL and the poller settings.

use relay_poller::PollerConfig;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the media API
    pub api_url: String,

    /// Poller settings loaded from the environment, before flag overrides
    pub poller: PollerConfig,
}
