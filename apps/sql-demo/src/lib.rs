use anyhow::Context;
use fluree_client::config::{DEFAULT_PORT, env_var};
use fluree_client::{ClientConfig, DatabaseName, FlureeClient};
use std::io::Write;
use tracing::{debug, info};

pub mod logging;

// --- Progress lines, printed once each and in this order ---

pub const CONNECTING: &str = "Connecting to FlureeDB";
pub const WAITING_FOR_READY: &str = "Waiting till Fluree is ready";
pub const LOOKING_UP_DATABASE: &str = "Looking up database";
pub const OPENING_DATABASE: &str = "Opening database";
pub const SQL_QUERY: &str = "SQL query";

pub const DEFAULT_DATABASE: &str = "dla/base";
pub const DEFAULT_QUERY: &str = "select name from _predicate";

// --- Configuration ---

#[derive(Clone, Debug)]
pub struct Config {
    pub client: ClientConfig,
    pub database: String,
    pub query: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client: ClientConfig::with_port(DEFAULT_PORT),
            database: DEFAULT_DATABASE.to_string(),
            query: DEFAULT_QUERY.to_string(),
        }
    }
}

impl Config {
    /// Defaults overridden by `FLUREE_*` variables read through `lookup`
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let client =
            ClientConfig::from_lookup(&lookup).context("Failed to read Fluree client settings")?;

        let database = lookup("FLUREE_DB").unwrap_or_else(|| DEFAULT_DATABASE.to_string());
        database
            .parse::<DatabaseName>()
            .with_context(|| format!("Invalid value for FLUREE_DB: {:?}", database))?;

        let query = lookup("FLUREE_SQL").unwrap_or_else(|| DEFAULT_QUERY.to_string());

        Ok(Self {
            client,
            database,
            query,
        })
    }
}

pub fn load_config() -> anyhow::Result<Config> {
    Config::from_lookup(env_var)
}

// --- Demo ---

/// Connect, wait for readiness, look up the database, then run the query
/// against it, writing progress and the result to `out`.
///
/// The client session is closed before the database session is opened. Any
/// failure ends the run at that step.
pub async fn run<W: Write>(config: &Config, out: &mut W) -> anyhow::Result<()> {
    progress(out, CONNECTING)?;
    let db = {
        let client = FlureeClient::new(config.client.clone())
            .context("Failed to create Fluree client")?;
        info!(base_url = %client.base_url(), "Connecting to Fluree");

        progress(out, WAITING_FOR_READY)?;
        client
            .health()
            .ready()
            .await
            .context("Fluree did not become ready")?;

        progress(out, LOOKING_UP_DATABASE)?;
        let db = client
            .database(&config.database)
            .await
            .with_context(|| format!("Failed to look up database {}", config.database))?;

        client.close();
        db
    };

    progress(out, OPENING_DATABASE)?;
    let database = db
        .open()
        .with_context(|| format!("Failed to open database {}", db.name()))?;

    progress(out, SQL_QUERY)?;
    let result = database
        .sql(&config.query)
        .await
        .context("SQL query failed")?;
    debug!(rows = result.rows().len(), "Query answered");

    writeln!(out, "{}", result)?;
    out.flush()?;
    database.close();

    Ok(())
}

fn progress<W: Write>(out: &mut W, message: &str) -> anyhow::Result<()> {
    writeln!(out, "{}", message)?;
    out.flush()?;
    Ok(())
}
