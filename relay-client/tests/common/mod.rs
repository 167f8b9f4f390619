//! Common test utilities for relay-client tests

use relay_poller::{PollerConfig, TaskPoller};
use serde::de::DeserializeOwned;
use std::time::Duration;
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Poller that does not wait between attempts
#[allow(dead_code)]
pub fn instant_poller<T>(max_attempts: u32) -> TaskPoller<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    let config = PollerConfig::default()
        .with_max_attempts(max_attempts)
        .with_initial_delay(Duration::ZERO)
        .with_delay_increment(Duration::ZERO)
        .with_max_delay(Duration::ZERO);
    TaskPoller::with_config(config)
}
