use anyhow::{bail, Result};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A ledger address in `network/db` form, e.g. `dla/base`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DatabaseName {
    pub network: String,
    pub db: String,
}

impl DatabaseName {
    pub fn new(network: impl Into<String>, db: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            db: db.into(),
        }
    }

    /// Accepts the two shapes `/fdb/dbs` is known to return per entry:
    /// `["network", "db"]` or `"network/db"`
    pub(crate) fn from_listing(entry: &Value) -> Option<Self> {
        match entry {
            Value::Array(parts) => match parts.as_slice() {
                [Value::String(network), Value::String(db)] => Some(Self::new(network, db)),
                _ => None,
            },
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub(crate) fn path(&self) -> String {
        format!("/fdb/{}/{}", self.network, self.db)
    }
}

impl FromStr for DatabaseName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(network), Some(db), None) if is_valid_part(network) && is_valid_part(db) => {
                Ok(Self::new(network, db))
            }
            _ => bail!(
                "Invalid database name {:?}: expected \"network/db\" using a-z, 0-9 and '-'",
                s
            ),
        }
    }
}

/// Fluree network and ledger names are lowercase alphanumerics and dashes,
/// which also keeps them safe to splice into a URL path
fn is_valid_part(part: &str) -> bool {
    !part.is_empty()
        && part
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

impl fmt::Display for DatabaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.db)
    }
}
