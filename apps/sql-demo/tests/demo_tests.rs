mod common;

use common::*;
use fluree_mock::{MockFluree, StatusCode, predicate_rows};
use fluree_sql_demo::{
    CONNECTING, Config, LOOKING_UP_DATABASE, OPENING_DATABASE, SQL_QUERY, WAITING_FOR_READY, run,
};
use serde_json::json;
use std::time::Duration;

async fn run_captured(config: &Config) -> (anyhow::Result<()>, Vec<String>) {
    let mut out = Vec::new();
    let result = run(config, &mut out).await;
    let lines = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    (result, lines)
}

#[tokio::test]
async fn test_successful_run_prints_steps_then_rows() {
    let mock = MockFluree::ready_with_predicates().await;

    let (result, lines) = run_captured(&demo_config(&mock)).await;

    result.unwrap();
    assert_eq!(
        lines,
        vec![
            CONNECTING.to_string(),
            WAITING_FOR_READY.to_string(),
            LOOKING_UP_DATABASE.to_string(),
            OPENING_DATABASE.to_string(),
            SQL_QUERY.to_string(),
            predicate_rows().to_string(),
        ]
    );
    assert_eq!(
        mock.queries(),
        vec![("sql".to_string(), json!("select name from _predicate"))]
    );
}

#[tokio::test]
async fn test_run_waits_for_booting_service() {
    let mock = MockFluree::builder()
        .not_ready_for(2)
        .database("dla", "base")
        .rows(predicate_rows())
        .spawn()
        .await;

    let (result, lines) = run_captured(&demo_config(&mock)).await;

    result.unwrap();
    assert_eq!(mock.health_probes(), 3);
    assert_eq!(lines.iter().filter(|l| *l == WAITING_FOR_READY).count(), 1);
}

#[tokio::test]
async fn test_readiness_failure_stops_before_lookup() {
    let mock = MockFluree::builder()
        .health_failure(StatusCode::INTERNAL_SERVER_ERROR)
        .database("dla", "base")
        .spawn()
        .await;

    let (result, lines) = run_captured(&demo_config(&mock)).await;

    assert!(result.is_err());
    assert_eq!(lines, vec![CONNECTING, WAITING_FOR_READY]);
    assert!(mock.queries().is_empty());
}

#[tokio::test]
async fn test_unreachable_service_times_out() {
    let config = unreachable_demo_config(Duration::from_millis(50)).await;

    let (result, lines) = run_captured(&config).await;

    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("not ready"), "unexpected error: {err:#}");
    assert_eq!(lines, vec![CONNECTING, WAITING_FOR_READY]);
}

#[tokio::test]
async fn test_unknown_database_stops_before_open() {
    let mock = MockFluree::builder().database("dla", "other").spawn().await;

    let (result, lines) = run_captured(&demo_config(&mock)).await;

    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("dla/base"), "unexpected error: {err:#}");
    assert_eq!(lines, vec![CONNECTING, WAITING_FOR_READY, LOOKING_UP_DATABASE]);
}

#[tokio::test]
async fn test_query_failure_prints_no_result() {
    let mock = MockFluree::builder()
        .database("dla", "base")
        .query_failure(StatusCode::BAD_REQUEST, "Unknown collection")
        .spawn()
        .await;

    let (result, lines) = run_captured(&demo_config(&mock)).await;

    assert!(result.is_err());
    assert_eq!(
        lines,
        vec![
            CONNECTING,
            WAITING_FOR_READY,
            LOOKING_UP_DATABASE,
            OPENING_DATABASE,
            SQL_QUERY
        ]
    );
}

#[tokio::test]
async fn test_custom_database_and_query() {
    let mock = MockFluree::builder()
        .database("acme", "ledger")
        .rows(json!([{"name": "_tx/id"}]))
        .spawn()
        .await;
    let config = Config {
        database: "acme/ledger".to_string(),
        query: "select name from _predicate where name = '_tx/id'".to_string(),
        ..demo_config(&mock)
    };

    let (result, lines) = run_captured(&config).await;

    result.unwrap();
    assert_eq!(lines.last().unwrap(), r#"[{"name":"_tx/id"}]"#);
    assert_eq!(mock.queries()[0].1, json!(config.query));
}
