//! REST inventory client.
//!
//! Talks to a catalogue API exposing `GET /products/{id}` and
//! `GET /stock/{id}`, both answering JSON.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use shopcart_core::ProductId;

use crate::client::{InventoryClient, InventoryError, ProductMetadata, Stock};

/// Inventory client backed by the catalogue REST API.
#[derive(Debug, Clone)]
pub struct HttpInventoryClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpInventoryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: normalize_base(base_url.into()),
            token: None,
        }
    }

    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::new(base_url)
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, resource: &str, product_id: ProductId) -> String {
        format!("{}/{}/{}", self.base_url, resource, product_id)
    }

    async fn get_json<T>(&self, resource: &str, product_id: ProductId) -> Result<T, InventoryError>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(resource, product_id);
        let mut req = self.client.get(&url);

        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(|e| {
            tracing::warn!(%url, error = %e, "inventory request failed");
            InventoryError::unavailable(format!("network error: {e}"))
        })?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(InventoryError::NotFound(product_id));
        }
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "inventory API returned an error");
            return Err(InventoryError::unavailable(format!(
                "API error ({})",
                status.as_u16()
            )));
        }

        resp.json::<T>()
            .await
            .map_err(|e| InventoryError::unavailable(format!("parse error: {e}")))
    }
}

#[async_trait::async_trait]
impl InventoryClient for HttpInventoryClient {
    async fn fetch_product(&self, product_id: ProductId) -> Result<ProductMetadata, InventoryError> {
        self.get_json("products", product_id).await
    }

    async fn fetch_stock(&self, product_id: ProductId) -> Result<Stock, InventoryError> {
        self.get_json("stock", product_id).await
    }
}

fn normalize_base(mut base: String) -> String {
    while base.ends_with('/') {
        base.pop();
    }
    base
}
