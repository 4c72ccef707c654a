use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use shopcart_core::ProductId;

/// Product metadata as served by the catalogue.
///
/// Only `id` is interpreted. Every other attribute (title, price, image, ...)
/// is carried verbatim so the cart can hand it back to the rendering layer
/// without knowing its shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMetadata {
    pub id: ProductId,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl ProductMetadata {
    pub fn new(id: ProductId) -> Self {
        Self {
            id,
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}

/// Units currently available for purchase.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub amount: u32,
}

impl Stock {
    pub fn new(amount: u32) -> Self {
        Self { amount }
    }
}

/// Inventory lookup failure.
///
/// The cart treats both variants as "abort the operation"; the distinction is
/// kept for logging and for callers that want to tell a dead link from an
/// outage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("product {0} not found")]
    NotFound(ProductId),

    #[error("inventory unavailable: {0}")]
    Unavailable(String),
}

impl InventoryError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Read-only access to product metadata and stock levels.
///
/// Implementations perform a single attempt per call; retries, caching and
/// timeouts are their own business and invisible to the cart.
#[async_trait::async_trait]
pub trait InventoryClient: Send + Sync {
    /// Fetch the catalogue entry for a product.
    async fn fetch_product(&self, product_id: ProductId) -> Result<ProductMetadata, InventoryError>;

    /// Fetch the current stock level for a product.
    async fn fetch_stock(&self, product_id: ProductId) -> Result<Stock, InventoryError>;
}

#[async_trait::async_trait]
impl<C> InventoryClient for Arc<C>
where
    C: InventoryClient + ?Sized,
{
    async fn fetch_product(&self, product_id: ProductId) -> Result<ProductMetadata, InventoryError> {
        (**self).fetch_product(product_id).await
    }

    async fn fetch_stock(&self, product_id: ProductId) -> Result<Stock, InventoryError> {
        (**self).fetch_stock(product_id).await
    }
}
