use std::collections::HashMap;
use std::sync::RwLock;

use shopcart_core::ProductId;

use crate::client::{InventoryClient, InventoryError, ProductMetadata, Stock};

#[derive(Debug, Clone)]
struct CatalogueEntry {
    product: ProductMetadata,
    stock: Stock,
}

/// In-memory product catalogue.
///
/// Intended for tests/dev. Stock levels can be changed while a cart is using
/// the catalogue, which is how tests simulate the remote side moving.
#[derive(Debug, Default)]
pub struct InMemoryInventory {
    entries: RwLock<HashMap<ProductId, CatalogueEntry>>,
}

impl InMemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy when seeding fixtures.
    pub fn with_product(self, product: ProductMetadata, stock: u32) -> Self {
        self.upsert(product, stock);
        self
    }

    /// Insert or replace a product together with its stock level.
    pub fn upsert(&self, product: ProductMetadata, stock: u32) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.insert(
            product.id,
            CatalogueEntry {
                product,
                stock: Stock::new(stock),
            },
        );
    }

    /// Change the stock level of a known product. Returns `false` if the product
    /// is not in the catalogue.
    pub fn set_stock(&self, product_id: ProductId, amount: u32) -> bool {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match entries.get_mut(&product_id) {
            Some(entry) => {
                entry.stock = Stock::new(amount);
                true
            }
            None => false,
        }
    }

    fn lookup(&self, product_id: ProductId) -> Result<CatalogueEntry, InventoryError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| InventoryError::unavailable("lock poisoned"))?;
        entries
            .get(&product_id)
            .cloned()
            .ok_or(InventoryError::NotFound(product_id))
    }
}

#[async_trait::async_trait]
impl InventoryClient for InMemoryInventory {
    async fn fetch_product(&self, product_id: ProductId) -> Result<ProductMetadata, InventoryError> {
        self.lookup(product_id).map(|entry| entry.product)
    }

    async fn fetch_stock(&self, product_id: ProductId) -> Result<Stock, InventoryError> {
        self.lookup(product_id).map(|entry| entry.stock)
    }
}
