use anyhow::{bail, Context, Result};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::database::DatabaseRef;
use crate::health::Health;
use crate::name::DatabaseName;

/// Session against a Fluree service as a whole.
///
/// Dropping the client releases its HTTP connections; [`FlureeClient::close`]
/// does the same explicitly.
pub struct FlureeClient {
    config: ClientConfig,
    base_url: String,
    http: reqwest::Client,
}

impl FlureeClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = config.http_client()?;
        let base_url = config.base_url();
        debug!(base_url = %base_url, "Client session opened");

        Ok(Self {
            config,
            base_url,
            http,
        })
    }

    /// Session on `localhost:<port>` with default settings
    pub fn connect(port: u16) -> Result<Self> {
        Self::new(ClientConfig::with_port(port))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn health(&self) -> Health<'_> {
        Health::new(self)
    }

    /// All databases the service knows about
    pub async fn dbs(&self) -> Result<Vec<DatabaseName>> {
        let url = format!("{}/fdb/dbs", self.base_url);
        debug!(url = %url, "Listing databases");

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({}))
            .send()
            .await
            .context("Failed to list databases")?;

        let entries = match read_json(response).await? {
            Value::Array(entries) => entries,
            other => bail!("Unexpected database listing: {}", other),
        };

        Ok(entries.iter().filter_map(DatabaseName::from_listing).collect())
    }

    /// Resolve `network/db` to a reference, failing when the service does not
    /// list it
    pub async fn database(&self, name: &str) -> Result<DatabaseRef> {
        let name: DatabaseName = name.parse()?;
        let known = self.dbs().await?;

        if !known.contains(&name) {
            bail!("Unknown database {} at {}", name, self.base_url);
        }

        info!(database = %name, "Database found");
        Ok(DatabaseRef::new(self.config.clone(), name))
    }

    pub fn close(self) {
        debug!(base_url = %self.base_url, "Client session closed");
    }
}

/// Turn a response into JSON, failing on non-success status with the body
/// attached
pub(crate) async fn read_json(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let url = response.url().clone();

    if !status.is_success() {
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response body".to_string());
        bail!("Request to {} failed with {}: {}", url, status, error_body);
    }

    response
        .json()
        .await
        .with_context(|| format!("Failed to parse response from {}", url))
}
