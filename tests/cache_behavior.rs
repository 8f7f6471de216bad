//! Response cache behavior: TTL, invalidation, and method gating.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bazaar_client::{ApiClient, ClientConfig, RequestOptions};
use serde_json::json;

mod common;
use common::MockResponse;

fn test_client(addr: SocketAddr) -> ApiClient {
    let mut config = ClientConfig::default();
    config.base_url = format!("http://{}", addr);
    ApiClient::new(config).unwrap()
}

/// Backend that counts hits and answers 200 with a JSON body.
async fn counting_backend(hits: Arc<AtomicU32>) -> SocketAddr {
    common::start_programmable_backend(move |_req| {
        let hits = hits.clone();
        async move {
            let n = hits.fetch_add(1, Ordering::SeqCst) + 1;
            MockResponse::json(200, &format!(r#"{{ "serial": {} }}"#, n))
        }
    })
    .await
}

#[tokio::test]
async fn test_repeated_get_is_served_from_cache() {
    let hits = Arc::new(AtomicU32::new(0));
    let addr = counting_backend(hits.clone()).await;
    let client = test_client(addr);

    let first = client.get("/products", RequestOptions::new()).await.unwrap();
    let second = client.get("/products", RequestOptions::new()).await.unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 1, "second call must not dispatch");
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_expired_entry_is_refetched_not_served() {
    let hits = Arc::new(AtomicU32::new(0));
    let addr = counting_backend(hits.clone()).await;

    let mut config = ClientConfig::default();
    config.base_url = format!("http://{}", addr);
    config.cache.ttl_ms = 50;
    let client = ApiClient::new(config).unwrap();

    let first = client.get("/products", RequestOptions::new()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(80)).await;
    let second = client.get("/products", RequestOptions::new()).await.unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert_ne!(first, second, "stale payload must never be served");
}

#[tokio::test]
async fn test_clear_single_key_keeps_other_entries() {
    let hits = Arc::new(AtomicU32::new(0));
    let addr = counting_backend(hits.clone()).await;
    let client = test_client(addr);

    client.get("/products", RequestOptions::new()).await.unwrap();
    client.get("/profile", RequestOptions::new()).await.unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 2);

    client.clear_cache(Some("GET:/products:"));

    // /products refetches, /profile is still cached
    client.get("/products", RequestOptions::new()).await.unwrap();
    client.get("/profile", RequestOptions::new()).await.unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_clear_all_empties_the_cache() {
    let hits = Arc::new(AtomicU32::new(0));
    let addr = counting_backend(hits.clone()).await;
    let client = test_client(addr);

    client.get("/products", RequestOptions::new()).await.unwrap();
    client.get("/profile", RequestOptions::new()).await.unwrap();

    client.clear_cache(None);
    assert!(client.cache().is_empty());

    client.get("/products", RequestOptions::new()).await.unwrap();
    client.get("/profile", RequestOptions::new()).await.unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_non_get_methods_never_touch_the_cache() {
    let hits = Arc::new(AtomicU32::new(0));
    let addr = counting_backend(hits.clone()).await;
    let client = test_client(addr);

    let body = json!({ "product_id": "p-17", "quantity": 1 });
    client
        .post("/orders", body.clone(), RequestOptions::new())
        .await
        .unwrap();
    client
        .post("/orders", body.clone(), RequestOptions::new())
        .await
        .unwrap();
    client.delete("/orders/o-1", RequestOptions::new()).await.unwrap();
    client
        .put("/profile", json!({ "display_name": "آرش" }), RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 4, "every write must dispatch");
    assert!(client.cache().is_empty(), "writes must not populate the cache");
}

#[tokio::test]
async fn test_no_cache_header_prevents_storing() {
    let hits = Arc::new(AtomicU32::new(0));
    let addr = counting_backend(hits.clone()).await;
    let client = test_client(addr);

    let options = || RequestOptions::new().header("Cache-Control", "no-cache");
    client.get("/products", options()).await.unwrap();
    client.get("/products", options()).await.unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert!(client.cache().is_empty());
}

#[tokio::test]
async fn test_distinct_endpoints_cache_independently() {
    let hits = Arc::new(AtomicU32::new(0));
    let addr = counting_backend(hits.clone()).await;
    let client = test_client(addr);

    client.get("/products", RequestOptions::new()).await.unwrap();
    client.get("/products/p-1", RequestOptions::new()).await.unwrap();
    client.get("/products", RequestOptions::new()).await.unwrap();
    client.get("/products/p-1", RequestOptions::new()).await.unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_shared_cache_across_clients() {
    let hits = Arc::new(AtomicU32::new(0));
    let addr = counting_backend(hits.clone()).await;

    let first = test_client(addr);
    let second = test_client(addr).with_cache(first.cache().clone());

    first.get("/products", RequestOptions::new()).await.unwrap();
    second.get("/products", RequestOptions::new()).await.unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
