//! Client settings for tests against the mock Fluree service
#![allow(dead_code)]

use fluree_client::ClientConfig;
use fluree_mock::{unused_port, MockFluree};
use std::time::Duration;

/// Fast polling and a bounded readiness wait so a broken test cannot hang
pub fn mock_config(mock: &MockFluree) -> ClientConfig {
    ClientConfig {
        host: mock.addr.ip().to_string(),
        port: mock.port(),
        ready_poll_interval: Duration::from_millis(5),
        ready_timeout: Some(Duration::from_secs(5)),
        ..ClientConfig::default()
    }
}

/// Settings for a port nothing listens on
pub async fn unreachable_config(ready_timeout: Duration) -> ClientConfig {
    ClientConfig {
        host: "127.0.0.1".to_string(),
        port: unused_port().await,
        ready_poll_interval: Duration::from_millis(5),
        ready_timeout: Some(ready_timeout),
        ..ClientConfig::default()
    }
}
