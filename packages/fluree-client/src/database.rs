use anyhow::{Context, Result};
use serde_json::Value;
use std::fmt;
use tracing::debug;

use crate::client::read_json;
use crate::config::ClientConfig;
use crate::name::DatabaseName;

/// A database the service is known to host.
///
/// Carries its own copy of the endpoint settings, so it stays usable after
/// the [`FlureeClient`](crate::FlureeClient) that resolved it is closed.
#[derive(Clone, Debug)]
pub struct DatabaseRef {
    config: ClientConfig,
    name: DatabaseName,
}

impl DatabaseRef {
    pub(crate) fn new(config: ClientConfig, name: DatabaseName) -> Self {
        Self { config, name }
    }

    pub fn name(&self) -> &DatabaseName {
        &self.name
    }

    /// Open a session with its own connections to this database
    pub fn open(&self) -> Result<DatabaseSession> {
        let http = self.config.http_client()?;
        let url = format!("{}{}", self.config.base_url(), self.name.path());
        debug!(database = %self.name, "Database session opened");

        Ok(DatabaseSession {
            name: self.name.clone(),
            url,
            http,
        })
    }
}

/// Connection context scoped to one database
pub struct DatabaseSession {
    name: DatabaseName,
    url: String,
    http: reqwest::Client,
}

impl DatabaseSession {
    pub fn name(&self) -> &DatabaseName {
        &self.name
    }

    /// Run a SQL query through the service's `/sql` endpoint
    pub async fn sql(&self, query: &str) -> Result<QueryResult> {
        debug!(database = %self.name, query = %query, "Sending SQL query");
        self.post("sql", &Value::String(query.to_string())).await
    }

    /// Run a FlureeQL query object through the `/query` endpoint
    pub async fn query(&self, flureeql: &Value) -> Result<QueryResult> {
        debug!(database = %self.name, "Sending FlureeQL query");
        self.post("query", flureeql).await
    }

    pub fn close(self) {
        debug!(database = %self.name, "Database session closed");
    }

    async fn post(&self, endpoint: &str, body: &Value) -> Result<QueryResult> {
        let url = format!("{}/{}", self.url, endpoint);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send {} query to {}", endpoint, self.name))?;

        read_json(response).await.map(QueryResult)
    }
}

/// Body returned by a query, kept as the service sent it
#[derive(Clone, Debug, PartialEq)]
pub struct QueryResult(pub Value);

impl QueryResult {
    /// Result rows when the service answered with an array
    pub fn rows(&self) -> &[Value] {
        match &self.0 {
            Value::Array(rows) => rows.as_slice(),
            _ => &[],
        }
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
