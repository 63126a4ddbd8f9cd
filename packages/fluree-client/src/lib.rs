//! Minimal async client for the Fluree HTTP API: a service session, a
//! readiness probe, database lookup and per-database query sessions.

pub mod client;
pub mod config;
pub mod database;
pub mod health;
pub mod name;

pub use client::FlureeClient;
pub use config::ClientConfig;
pub use database::{DatabaseRef, DatabaseSession, QueryResult};
pub use health::Health;
pub use name::DatabaseName;
