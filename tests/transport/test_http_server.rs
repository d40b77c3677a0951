// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! End-to-end transport tests against a local axum server

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use bid_envelope::transport::{RequestSpec, Transport, TransportError};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Clone, Default)]
struct Counters {
    item: Arc<AtomicUsize>,
}

async fn item(State(counters): State<Counters>) -> Json<Value> {
    let n = counters.item.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({ "hits": n }))
}

async fn missing() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "no such thing")
}

async fn echo(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let marker = headers
        .get("x-marker")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    Json(json!({ "body": body, "contentType": content_type, "marker": marker }))
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(5)).await;
    "late"
}

async fn start_server() -> (SocketAddr, Counters) {
    let counters = Counters::default();
    let app = Router::new()
        .route("/item", get(item))
        .route("/missing", get(missing))
        .route("/echo", post(echo))
        .route("/slow", get(slow))
        .with_state(counters.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, counters)
}

#[tokio::test]
async fn test_second_call_served_from_cache() {
    let (addr, counters) = start_server().await;
    let transport = Transport::new().unwrap();
    let spec = RequestSpec::get(format!("http://{}/item", addr))
        .cache_key("k1")
        .ttl(Duration::from_secs(5))
        .keep_alive(true);

    let first = transport.execute_request(spec.clone()).await.unwrap();
    let second = transport.execute_request(spec).await.unwrap();

    assert_eq!(counters.item.load(Ordering::SeqCst), 1, "Server must be hit once");
    assert_eq!(first, second);
    assert_eq!(first.json.unwrap()["hits"], 1);
}

#[tokio::test]
async fn test_uncached_calls_reach_server() {
    let (addr, counters) = start_server().await;
    let transport = Transport::new().unwrap();

    for _ in 0..3 {
        transport
            .execute_request(RequestSpec::get(format!("http://{}/item", addr)))
            .await
            .unwrap();
    }
    assert_eq!(counters.item.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_not_found_is_a_response() {
    let (addr, _) = start_server().await;
    let transport = Transport::new().unwrap();

    let response = transport
        .execute_request(RequestSpec::get(format!("http://{}/missing", addr)).cache_key("m"))
        .await
        .unwrap();

    assert_eq!(response.status, 404);
    assert_eq!(response.text, "no such thing");
    assert!(response.json.is_none());
    assert_eq!(transport.cache().count().await, 0);

    let err = response.error_for_status("missing").unwrap_err();
    assert!(matches!(err, TransportError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_json_body_and_headers_sent() {
    let (addr, _) = start_server().await;
    let transport = Transport::new().unwrap();

    let response = transport
        .execute_request(
            RequestSpec::post(format!("http://{}/echo", addr))
                .header("x-marker", "m-1")
                .json_body(json!({"data": "abc"})),
        )
        .await
        .unwrap();

    let json = response.json.unwrap();
    assert_eq!(json["body"]["data"], "abc");
    assert_eq!(json["marker"], "m-1");
    assert!(json["contentType"]
        .as_str()
        .unwrap()
        .starts_with("application/json"));
}

#[tokio::test]
async fn test_caller_agent_is_used() {
    let (addr, counters) = start_server().await;
    let transport = Transport::new().unwrap();
    let agent = reqwest::Client::builder().build().unwrap();

    tokio_test::assert_ok!(
        transport
            .execute_request(RequestSpec::get(format!("http://{}/item", addr)).agent(agent))
            .await
    );
    assert_eq!(counters.item.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_timeout_against_slow_server() {
    let (addr, _) = start_server().await;
    let transport = Transport::new().unwrap();

    let result = transport
        .execute_request(
            RequestSpec::get(format!("http://{}/slow", addr))
                .cache_key("slow")
                .timeout(Duration::from_millis(200)),
        )
        .await;

    assert!(matches!(result, Err(TransportError::Timeout { .. })));
    assert!(result.unwrap_err().is_retryable());
    assert_eq!(transport.cache().count().await, 0);
}

#[tokio::test]
async fn test_cancellation_aborts_request() {
    let (addr, _) = start_server().await;
    let transport = Transport::new().unwrap();
    let token = CancellationToken::new();

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let result = transport
        .execute_request(RequestSpec::get(format!("http://{}/slow", addr)).cancel_token(token))
        .await;

    assert!(matches!(result, Err(TransportError::Aborted { .. })));
}

#[tokio::test]
async fn test_connection_refused() {
    let transport = Transport::new().unwrap();
    let result = transport
        .execute_request(RequestSpec::get("http://127.0.0.1:9/nothing"))
        .await;
    assert!(matches!(result, Err(TransportError::Connect { .. })));
}
