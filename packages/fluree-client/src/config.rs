use anyhow::{Context, Result};
use std::env::VarError;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8090;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Where the Fluree service lives and how patiently we talk to it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub https: bool,
    pub request_timeout: Duration,
    pub ready_poll_interval: Duration,
    /// `None` waits for readiness forever
    pub ready_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            https: false,
            request_timeout: REQUEST_TIMEOUT,
            ready_poll_interval: READY_POLL_INTERVAL,
            ready_timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Self::default()
        }
    }

    /// Defaults overridden by `FLUREE_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_var)
    }

    /// Same as [`ClientConfig::from_env`] but reads variables through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("FLUREE_HOST") {
            config.host = host;
        }
        if let Some(port) = parse_var(&lookup, "FLUREE_PORT")? {
            config.port = port;
        }
        if let Some(https) = parse_var(&lookup, "FLUREE_HTTPS")? {
            config.https = https;
        }
        if let Some(ms) = parse_var(&lookup, "FLUREE_REQUEST_TIMEOUT_MS")? {
            config.request_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var(&lookup, "FLUREE_READY_POLL_MS")? {
            config.ready_poll_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var(&lookup, "FLUREE_READY_TIMEOUT_MS")? {
            config.ready_timeout = Some(Duration::from_millis(ms));
        }

        Ok(config)
    }

    pub fn base_url(&self) -> String {
        let scheme = if self.https { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }

    pub(crate) fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .context("Failed to create HTTP client")
    }
}

/// Environment lookup for `from_lookup`.
///
/// A variable that is set but not UTF-8 comes back lossily decoded rather than
/// as unset, so it fails validation instead of silently falling back.
pub fn env_var(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) => Some(value),
        Err(VarError::NotPresent) => None,
        Err(VarError::NotUnicode(raw)) => Some(raw.to_string_lossy().into_owned()),
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(None),
    }
}
