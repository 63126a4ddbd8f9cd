use anyhow::{bail, Context, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use crate::client::FlureeClient;

#[derive(Debug, Deserialize)]
struct HealthResponse {
    #[serde(default = "default_ready")]
    ready: bool,
}

fn default_ready() -> bool {
    true
}

/// Readiness probe for the service behind a [`FlureeClient`]
pub struct Health<'a> {
    client: &'a FlureeClient,
}

impl<'a> Health<'a> {
    pub(crate) fn new(client: &'a FlureeClient) -> Self {
        Self { client }
    }

    /// Single probe of `/fdb/health`.
    ///
    /// A service that is still booting (connection refused, 503, or
    /// `"ready": false`) reports `false`; anything else unexpected is an error.
    pub async fn check(&self) -> Result<bool> {
        let url = format!("{}/fdb/health", self.client.base_url());

        let response = match self.client.http().get(&url).send().await {
            Ok(response) => response,
            Err(e) if e.is_connect() || e.is_timeout() => {
                debug!(url = %url, error = %e, "Health probe could not reach service");
                return Ok(false);
            }
            Err(e) => return Err(e).context("Health probe failed"),
        };

        let status = response.status();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            debug!(url = %url, "Service reports unavailable");
            return Ok(false);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Health probe returned {}: {}", status, body);
        }

        let health: HealthResponse = response
            .json()
            .await
            .context("Failed to parse health response")?;

        Ok(health.ready)
    }

    /// Suspend until the service reports ready.
    ///
    /// Without a configured `ready_timeout` this never gives up.
    pub async fn ready(&self) -> Result<()> {
        let config = self.client.config();
        let started = Instant::now();
        let mut attempts: u64 = 0;

        loop {
            attempts = next_attempt(attempts);
            if self.check().await? {
                info!(attempts, elapsed_ms = started.elapsed().as_millis() as u64, "Fluree is ready");
                return Ok(());
            }

            if let Some(limit) = config.ready_timeout {
                if started.elapsed() + config.ready_poll_interval > limit {
                    bail!(
                        "Service at {} not ready after {:?} ({} probes)",
                        config.base_url(),
                        limit,
                        attempts
                    );
                }
            }

            sleep(poll_delay(config.ready_poll_interval)).await;
        }
    }
}

/// An unbounded wait can outlive any fixed-width counter
fn next_attempt(attempts: u64) -> u64 {
    attempts.saturating_add(1)
}

/// Zero would spin the loop without yielding to the timer
fn poll_delay(interval: Duration) -> Duration {
    interval.max(Duration::from_millis(1))
}
