//! Basic usage walkthrough.
//!
//! Point `BAZAAR_API_URL` at a storefront backend and run with
//! `cargo run --example basic`.

use bazaar_client::{ApiClient, RequestOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    bazaar_client::observability::logging::init("debug");

    let client = ApiClient::from_env()?;

    // React to session problems surfaced by any call
    let mut auth_events = client.subscribe_auth_events();
    tokio::spawn(async move {
        while let Ok(event) = auth_events.recv().await {
            eprintln!("auth signal: {:?}", event);
        }
    });

    // First read goes to the network, the second is served from cache
    let products = client.get("/products", RequestOptions::new()).await?;
    let cached = client.get("/products", RequestOptions::new()).await?;
    assert_eq!(products, cached);
    println!("products: {:?}", products.as_json());

    // Writes bypass the cache; drop the product list so the next read is fresh
    client.clear_cache(Some("GET:/products:"));

    Ok(())
}
