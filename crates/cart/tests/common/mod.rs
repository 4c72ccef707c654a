//! Test doubles shared by the cart integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::{Notify, Semaphore};

use shopcart_cart::{InMemorySnapshotStore, SnapshotError, SnapshotStore};
use shopcart_core::ProductId;
use shopcart_inventory::{InMemoryInventory, InventoryClient, InventoryError, ProductMetadata, Stock};

pub fn shoe(id: u64) -> ProductMetadata {
    ProductMetadata::new(ProductId::new(id))
        .with_attribute("title", format!("Sneaker #{id}"))
        .with_attribute("price", 139.9)
        .with_attribute("image", format!("https://cdn.example/shoes/{id}.jpg"))
}

pub fn pid(id: u64) -> ProductId {
    ProductId::new(id)
}

/// Snapshot store whose writes can be switched off.
#[derive(Debug, Default)]
pub struct FlakySnapshotStore {
    inner: InMemorySnapshotStore,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl FlakySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            inner: InMemorySnapshotStore::new().seeded(bytes),
            ..Self::default()
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn bytes(&self) -> Option<Vec<u8>> {
        self.inner.read().unwrap()
    }
}

impl SnapshotStore for FlakySnapshotStore {
    fn read(&self) -> Result<Option<Vec<u8>>, SnapshotError> {
        self.inner.read()
    }

    fn write(&self, bytes: &[u8]) -> Result<(), SnapshotError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SnapshotError::unavailable("disk full"));
        }
        self.inner.write(bytes)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Snapshot store whose reads always fail.
#[derive(Debug, Default)]
pub struct UnreadableSnapshotStore;

impl SnapshotStore for UnreadableSnapshotStore {
    fn read(&self) -> Result<Option<Vec<u8>>, SnapshotError> {
        Err(SnapshotError::unavailable("storage locked"))
    }

    fn write(&self, _bytes: &[u8]) -> Result<(), SnapshotError> {
        Ok(())
    }
}

/// Inventory whose lookups block until the test releases them.
///
/// Each lookup signals `entered` and then consumes one permit from `gate`.
#[derive(Debug)]
pub struct GatedInventory {
    inner: InMemoryInventory,
    gate: Semaphore,
    entered: Notify,
}

impl GatedInventory {
    pub fn new(inner: InMemoryInventory) -> Self {
        Self {
            inner,
            gate: Semaphore::new(0),
            entered: Notify::new(),
        }
    }

    pub fn release(&self, lookups: usize) {
        self.gate.add_permits(lookups);
    }

    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    pub fn inner(&self) -> &InMemoryInventory {
        &self.inner
    }

    async fn pass(&self) -> Result<(), InventoryError> {
        self.entered.notify_one();
        self.gate
            .acquire()
            .await
            .map_err(|_| InventoryError::unavailable("gate closed"))?
            .forget();
        Ok(())
    }
}

#[async_trait::async_trait]
impl InventoryClient for GatedInventory {
    async fn fetch_product(&self, product_id: ProductId) -> Result<ProductMetadata, InventoryError> {
        self.pass().await?;
        self.inner.fetch_product(product_id).await
    }

    async fn fetch_stock(&self, product_id: ProductId) -> Result<Stock, InventoryError> {
        self.pass().await?;
        self.inner.fetch_stock(product_id).await
    }
}

/// Inventory that is always down.
#[derive(Debug, Default)]
pub struct OfflineInventory;

#[async_trait::async_trait]
impl InventoryClient for OfflineInventory {
    async fn fetch_product(&self, _product_id: ProductId) -> Result<ProductMetadata, InventoryError> {
        Err(InventoryError::unavailable("connection refused"))
    }

    async fn fetch_stock(&self, _product_id: ProductId) -> Result<Stock, InventoryError> {
        Err(InventoryError::unavailable("connection refused"))
    }
}

/// Catalogue that answers every product lookup with the same entry.
#[derive(Debug)]
pub struct MisroutedInventory {
    pub answer: ProductMetadata,
    pub stock: u32,
}

#[async_trait::async_trait]
impl InventoryClient for MisroutedInventory {
    async fn fetch_product(&self, _product_id: ProductId) -> Result<ProductMetadata, InventoryError> {
        Ok(self.answer.clone())
    }

    async fn fetch_stock(&self, _product_id: ProductId) -> Result<Stock, InventoryError> {
        Ok(Stock::new(self.stock))
    }
}
