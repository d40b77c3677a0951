// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Cache lifetime tests on a paused clock

use bid_envelope::transport::{RequestSpec, Transport};
use std::sync::Arc;
use std::time::Duration;

use super::support::CountingDispatch;

#[tokio::test(start_paused = true)]
async fn test_entry_expires_after_ttl() {
    let dispatch = Arc::new(CountingDispatch::scripted(vec![
        (200, r#"{"v":1}"#),
        (200, r#"{"v":2}"#),
    ]));
    let transport = Transport::with_dispatcher(dispatch.clone());
    let spec = RequestSpec::get("https://svc.example/item")
        .cache_key("k1")
        .ttl(Duration::from_secs(5));

    let first = transport.execute_request(spec.clone()).await.unwrap();
    tokio::time::advance(Duration::from_secs(4)).await;
    let within = transport.execute_request(spec.clone()).await.unwrap();
    assert_eq!(first, within);
    assert_eq!(dispatch.calls(), 1);

    tokio::time::advance(Duration::from_secs(2)).await;
    let after = transport.execute_request(spec).await.unwrap();
    assert_eq!(dispatch.calls(), 2);
    assert_eq!(after.json.unwrap()["v"], 2);
}

#[tokio::test(start_paused = true)]
async fn test_no_ttl_never_expires() {
    let dispatch = Arc::new(CountingDispatch::new(200, "{}"));
    let transport = Transport::with_dispatcher(dispatch.clone());
    let spec = RequestSpec::get("https://svc.example/item").cache_key("forever");

    transport.execute_request(spec.clone()).await.unwrap();
    tokio::time::advance(Duration::from_secs(365 * 86_400)).await;
    transport.execute_request(spec).await.unwrap();

    assert_eq!(dispatch.calls(), 1);
}

#[tokio::test]
async fn test_non_200_not_cached() {
    let dispatch = Arc::new(CountingDispatch::scripted(vec![
        (503, "busy"),
        (201, r#"{"created":true}"#),
        (200, r#"{"ok":true}"#),
    ]));
    let transport = Transport::with_dispatcher(dispatch.clone());
    let spec = RequestSpec::get("https://svc.example/item").cache_key("k1");

    let unavailable = transport.execute_request(spec.clone()).await.unwrap();
    assert_eq!(unavailable.status, 503);
    assert_eq!(unavailable.text, "busy");
    assert!(unavailable.json.is_none());

    let created = transport.execute_request(spec.clone()).await.unwrap();
    assert_eq!(created.status, 201);
    assert_eq!(transport.cache().count().await, 0);

    transport.execute_request(spec.clone()).await.unwrap();
    transport.execute_request(spec).await.unwrap();
    assert_eq!(dispatch.calls(), 3);
}

#[tokio::test]
async fn test_delete_cache_key_evicts_before_read() {
    let dispatch = Arc::new(CountingDispatch::new(200, r#"{"v":1}"#));
    let transport = Transport::with_dispatcher(dispatch.clone());

    transport
        .execute_request(RequestSpec::get("https://svc.example/a").cache_key("a"))
        .await
        .unwrap();
    transport
        .execute_request(
            RequestSpec::get("https://svc.example/a")
                .cache_key("a")
                .delete_cache_key("a"),
        )
        .await
        .unwrap();

    assert_eq!(dispatch.calls(), 2);
}

#[tokio::test]
async fn test_force_fresh_still_writes() {
    let dispatch = Arc::new(CountingDispatch::scripted(vec![
        (200, r#"{"v":1}"#),
        (200, r#"{"v":2}"#),
    ]));
    let transport = Transport::with_dispatcher(dispatch.clone());
    let spec = RequestSpec::get("https://svc.example/a").cache_key("a");

    transport.execute_request(spec.clone()).await.unwrap();
    transport
        .execute_request(spec.clone().force_fresh(true))
        .await
        .unwrap();
    let cached = transport.execute_request(spec).await.unwrap();

    assert_eq!(dispatch.calls(), 2);
    assert_eq!(cached.json.unwrap()["v"], 2);
}

#[tokio::test]
async fn test_caches_are_isolated_per_transport() {
    let dispatch = Arc::new(CountingDispatch::new(200, "{}"));
    let first = Transport::with_dispatcher(dispatch.clone());
    let second = Transport::with_dispatcher(dispatch.clone());
    let spec = RequestSpec::get("https://svc.example/a").cache_key("a");

    first.execute_request(spec.clone()).await.unwrap();
    second.execute_request(spec.clone()).await.unwrap();
    assert_eq!(dispatch.calls(), 2);

    // Sharing the cache explicitly shares entries
    let shared = Transport::with_dispatcher(dispatch.clone()).with_cache(first.cache().clone());
    shared.execute_request(spec).await.unwrap();
    assert_eq!(dispatch.calls(), 2);
}

#[tokio::test]
async fn test_concurrent_misses_both_dispatch() {
    let dispatch = Arc::new(CountingDispatch::new(200, r#"{"v":1}"#));
    let transport = Transport::with_dispatcher(dispatch.clone());
    let spec = RequestSpec::get("https://svc.example/a").cache_key("a");

    let results = futures::future::join_all(
        (0..4).map(|_| transport.execute_request(spec.clone())),
    )
    .await;

    assert!(results.iter().all(|r| r.is_ok()));
    assert!(dispatch.calls() >= 1);
    assert_eq!(transport.cache().count().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_expired_entries_swept_on_write() {
    let dispatch = Arc::new(CountingDispatch::new(200, "{}"));
    let transport = Transport::with_dispatcher(dispatch.clone());

    for i in 0..1000 {
        transport
            .execute_request(
                RequestSpec::get(format!("https://svc.example/item/{}", i))
                    .cache_key(format!("item-{}", i))
                    .ttl(Duration::from_secs(1)),
            )
            .await
            .unwrap();
    }
    assert_eq!(transport.cache().count().await, 1000);

    tokio::time::advance(Duration::from_secs(3600)).await;
    transport
        .execute_request(
            RequestSpec::get("https://svc.example/item/last")
                .cache_key("item-last")
                .ttl(Duration::from_secs(1)),
        )
        .await
        .unwrap();

    assert_eq!(transport.cache().count().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_unrepresentable_ttl_caches_without_expiry() {
    let dispatch = Arc::new(CountingDispatch::new(200, r#"{"v":1}"#));
    let transport = Transport::with_dispatcher(dispatch.clone());
    let spec = RequestSpec::get("https://svc.example/item")
        .cache_key("k1")
        .ttl(Duration::from_secs(u64::MAX));

    transport.execute_request(spec.clone()).await.unwrap();
    tokio::time::advance(Duration::from_secs(86_400)).await;
    let cached = transport.execute_request(spec).await.unwrap();

    assert_eq!(dispatch.calls(), 1);
    assert_eq!(cached.json.unwrap()["v"], 1);
}
