// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Cache admission strategy tests

use bid_envelope::transport::{
    Admission, AdmitJsonIf, RequestSpec, ResponseEnvelope, Transport,
};
use std::sync::Arc;

use super::support::CountingDispatch;

#[tokio::test]
async fn test_veto_skips_cache_but_returns_response() {
    let dispatch = Arc::new(CountingDispatch::new(200, r#"{"other":1}"#));
    let transport = Transport::with_dispatcher(dispatch.clone());
    let spec = RequestSpec::get("https://svc.example/publickeys")
        .cache_key("pk")
        .admission(AdmitJsonIf::new(|json| json.get("publicKey").is_some()));

    let first = transport.execute_request(spec.clone()).await.unwrap();
    assert_eq!(first.status, 200);
    assert_eq!(first.json.unwrap()["other"], 1);

    transport.execute_request(spec).await.unwrap();
    assert_eq!(dispatch.calls(), 2, "Vetoed responses must not be cached");
    assert_eq!(transport.cache().count().await, 0);
}

#[tokio::test]
async fn test_accepted_response_is_cached() {
    let dispatch = Arc::new(CountingDispatch::new(200, r#"{"publicKey":"abc"}"#));
    let transport = Transport::with_dispatcher(dispatch.clone());
    let spec = RequestSpec::get("https://svc.example/publickeys")
        .cache_key("pk")
        .admission(AdmitJsonIf::new(|json| json.get("publicKey").is_some()));

    transport.execute_request(spec.clone()).await.unwrap();
    let cached = transport.execute_request(spec).await.unwrap();

    assert_eq!(dispatch.calls(), 1);
    assert_eq!(cached.json_str("publicKey"), Some("abc"));
}

#[tokio::test]
async fn test_transformed_value_is_what_gets_cached() {
    let dispatch = Arc::new(CountingDispatch::new(200, r#"{"v":1}"#));
    let transport = Transport::with_dispatcher(dispatch.clone());

    let stamp = Admission::from_fn(|response: &ResponseEnvelope| {
        let mut json = response.json.clone()?;
        json["stamped"] = serde_json::Value::Bool(true);
        Some(ResponseEnvelope {
            status: response.status,
            text: json.to_string(),
            json: Some(json),
        })
    });
    let spec = RequestSpec::get("https://svc.example/x")
        .cache_key("x")
        .admission_handle(stamp);

    let live = transport.execute_request(spec.clone()).await.unwrap();
    let cached = transport.execute_request(spec).await.unwrap();

    assert!(live.json.unwrap().get("stamped").is_none());
    assert_eq!(cached.json.unwrap()["stamped"], true);
    assert_eq!(dispatch.calls(), 1);
}

#[tokio::test]
async fn test_admission_not_consulted_for_errors() {
    let dispatch = Arc::new(CountingDispatch::new(500, r#"{"publicKey":"abc"}"#));
    let transport = Transport::with_dispatcher(dispatch.clone());
    let spec = RequestSpec::get("https://svc.example/publickeys")
        .cache_key("pk")
        .admission(AdmitJsonIf::new(|_| true));

    let response = transport.execute_request(spec).await.unwrap();
    assert_eq!(response.status, 500);
    assert_eq!(transport.cache().count().await, 0);
}
