//! In-process stand-in for a Fluree service.
//!
//! Serves the handful of endpoints the client touches and records what it saw,
//! so tests can assert on both sides of the conversation.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub use axum::http::StatusCode;

#[derive(Default)]
pub struct MockState {
    not_ready_probes: usize,
    health_failure: Option<StatusCode>,
    databases: Vec<(String, String)>,
    query_failure: Option<(StatusCode, String)>,
    rows: Value,
    health_probes: AtomicUsize,
    queries: Mutex<Vec<(String, Value)>>,
}

pub struct MockFluree {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

pub struct MockBuilder {
    host: String,
    state: MockState,
}

impl Default for MockBuilder {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            state: MockState::default(),
        }
    }
}

impl MockBuilder {
    /// Bind to `host` instead of `127.0.0.1`
    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    /// Answer the first `n` health probes with `"ready": false`
    pub fn not_ready_for(mut self, n: usize) -> Self {
        self.state.not_ready_probes = n;
        self
    }

    pub fn health_failure(mut self, status: StatusCode) -> Self {
        self.state.health_failure = Some(status);
        self
    }

    pub fn database(mut self, network: &str, db: &str) -> Self {
        self.state.databases.push((network.to_string(), db.to_string()));
        self
    }

    pub fn rows(mut self, rows: Value) -> Self {
        self.state.rows = rows;
        self
    }

    pub fn query_failure(mut self, status: StatusCode, message: &str) -> Self {
        self.state.query_failure = Some((status, message.to_string()));
        self
    }

    pub async fn spawn(self) -> MockFluree {
        let MockBuilder { host, state } = self;
        let state = Arc::new(state);

        let app = Router::new()
            .route("/fdb/health", get(health_handler))
            .route("/fdb/dbs", post(dbs_handler))
            .route("/fdb/:network/:db/:endpoint", post(query_handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind((host.as_str(), 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockFluree { addr, state }
    }
}

impl MockFluree {
    pub fn builder() -> MockBuilder {
        MockBuilder::default()
    }

    /// A ready service hosting `dla/base` with a few predicate rows
    pub async fn ready_with_predicates() -> Self {
        Self::builder()
            .database("dla", "base")
            .rows(predicate_rows())
            .spawn()
            .await
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn health_probes(&self) -> usize {
        self.state.health_probes.load(Ordering::SeqCst)
    }

    /// `(endpoint, body)` for every query received, in order
    pub fn queries(&self) -> Vec<(String, Value)> {
        self.state.queries.lock().unwrap().clone()
    }
}

pub fn predicate_rows() -> Value {
    json!([
        {"name": "_predicate/name"},
        {"name": "_collection/name"},
        {"name": "_user/username"}
    ])
}

/// A local port nothing listens on
pub async fn unused_port() -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn health_handler(State(state): State<Arc<MockState>>) -> Response {
    let probe = state.health_probes.fetch_add(1, Ordering::SeqCst) + 1;

    if let Some(status) = state.health_failure {
        return (status, "health check exploded").into_response();
    }
    if probe <= state.not_ready_probes {
        return Json(json!({"ready": false, "status": "initializing"})).into_response();
    }
    Json(json!({"ready": true, "status": "ready", "utilization": 0.1})).into_response()
}

async fn dbs_handler(State(state): State<Arc<MockState>>) -> Json<Value> {
    let listing: Vec<Value> = state
        .databases
        .iter()
        .map(|(network, db)| json!([network, db]))
        .collect();
    Json(Value::Array(listing))
}

async fn query_handler(
    State(state): State<Arc<MockState>>,
    Path((network, db, endpoint)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Response {
    if !state.databases.contains(&(network.clone(), db.clone())) {
        return (
            StatusCode::NOT_FOUND,
            format!("Database {}/{} not found", network, db),
        )
            .into_response();
    }

    state.queries.lock().unwrap().push((endpoint, body));

    match &state.query_failure {
        Some((status, message)) => (*status, Json(json!({"status": status.as_u16(), "message": message}))).into_response(),
        None => Json(state.rows.clone()).into_response(),
    }
}
