//! Typed helpers for the storefront REST surface.
//!
//! Thin wrappers over [`ApiClient`] for the endpoints the storefront
//! actually exposes. Each helper decodes into its response type and leans
//! on the client for caching, retries, and auth.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::cache::cache_key;
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::http::request::RequestOptions;
use reqwest::Method;

/// A product as served by `GET /products`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Unit price in rials.
    pub price: u64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// One line of an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub product_id: String,
    pub quantity: u32,
    /// Unit price in rials at order time.
    pub price: u64,
}

/// Payload for `POST /orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub items: Vec<OrderItem>,
    pub shipping_address: String,
}

/// An order as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub items: Vec<OrderItem>,
    /// Order total in rials.
    pub total: u64,
    pub status: String,
}

/// The signed-in user's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Typed view of the storefront API.
#[derive(Debug, Clone)]
pub struct StorefrontApi {
    client: ApiClient,
}

impl StorefrontApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// The underlying client, for calls outside the typed surface.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// List all products. Served from cache within the TTL.
    pub async fn list_products(&self) -> ApiResult<Vec<Product>> {
        let data = self.client.get("/products", RequestOptions::new()).await?;
        data.json()
    }

    /// Fetch one product by id.
    pub async fn product(&self, id: &str) -> ApiResult<Product> {
        let endpoint = format!("/products/{}", id);
        let data = self.client.get(&endpoint, RequestOptions::new()).await?;
        data.json()
    }

    /// Place an order. Never cached.
    pub async fn create_order(&self, order: &NewOrder) -> ApiResult<Order> {
        let data = self
            .client
            .post("/orders", json!(order), RequestOptions::new())
            .await?;
        data.json()
    }

    /// List the signed-in user's orders.
    pub async fn orders(&self) -> ApiResult<Vec<Order>> {
        let data = self.client.get("/orders", RequestOptions::new()).await?;
        data.json()
    }

    /// Fetch the signed-in user's profile.
    pub async fn profile(&self) -> ApiResult<Profile> {
        let data = self.client.get("/profile", RequestOptions::new()).await?;
        data.json()
    }

    /// Update the profile and drop its cached copy so the next read is
    /// fresh.
    pub async fn update_profile(&self, profile: &Profile) -> ApiResult<Profile> {
        let data = self
            .client
            .put("/profile", json!(profile), RequestOptions::new())
            .await?;
        self.client
            .clear_cache(Some(&cache_key(&Method::GET, "/profile", None)));
        data.json()
    }
}
