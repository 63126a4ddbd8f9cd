//! Demo settings for tests against the mock Fluree service
#![allow(dead_code)]

use fluree_client::ClientConfig;
use fluree_mock::{MockFluree, unused_port};
use fluree_sql_demo::Config;
use std::time::Duration;

pub fn demo_config(mock: &MockFluree) -> Config {
    Config {
        client: ClientConfig {
            host: mock.addr.ip().to_string(),
            port: mock.port(),
            ready_poll_interval: Duration::from_millis(5),
            ready_timeout: Some(Duration::from_secs(5)),
            ..ClientConfig::default()
        },
        ..Config::default()
    }
}

pub async fn unreachable_demo_config(ready_timeout: Duration) -> Config {
    Config {
        client: ClientConfig {
            host: "127.0.0.1".to_string(),
            port: unused_port().await,
            ready_poll_interval: Duration::from_millis(5),
            ready_timeout: Some(ready_timeout),
            ..ClientConfig::default()
        },
        ..Config::default()
    }
}
