//! Cart operation errors.

use thiserror::Error;

use shopcart_core::ProductId;
use shopcart_inventory::InventoryError;

pub type CartResult<T> = Result<T, CartError>;

/// Durable snapshot store failure.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("snapshot store unavailable: {0}")]
    Unavailable(String),
}

impl SnapshotError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Why a cart operation did not complete.
///
/// Every variant means the committed cart and the persisted snapshot are
/// exactly what they were before the call.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("inventory lookup failed: {0}")]
    InventoryFetch(#[from] InventoryError),

    #[error("product {product_id}: requested {requested}, only {available} in stock")]
    OutOfStock {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    #[error("product {0} is not in the cart")]
    ProductNotInCart(ProductId),

    #[error("another cart update is in progress")]
    Busy,

    #[error("failed to persist cart: {0}")]
    PersistFailure(#[source] SnapshotError),
}

/// The caller-facing operation an error came from.
///
/// The message shown to a shopper depends on what they were doing, not only
/// on what went wrong.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CartOperation {
    AddProduct,
    RemoveProduct,
    SetQuantity,
}

impl CartError {
    /// Short message suitable for a toast or status line.
    pub fn user_message(&self, operation: CartOperation) -> &'static str {
        match self {
            CartError::OutOfStock { .. } => "Requested quantity is out of stock",
            CartError::Busy => "Another cart update is in progress, try again",
            _ => match operation {
                CartOperation::AddProduct => "Error adding product",
                CartOperation::RemoveProduct => "Error removing product",
                CartOperation::SetQuantity => "Error updating product quantity",
            },
        }
    }
}
