//! `shopcart-cart`
//!
//! **Responsibility:** the single shopping cart of a client session.
//!
//! This crate provides:
//! - the `Cart` / `LineItem` model and its pure transitions
//! - `CartStore`, the only writer of the cart, serialising every mutation and
//!   committing memory and the durable snapshot as one unit
//! - the `SnapshotStore` seam with in-memory and file-backed implementations
//!
//! Product and stock data always come from a `shopcart_inventory::InventoryClient`;
//! the cart never invents them.

pub mod cart;
pub mod error;
pub mod snapshot;
pub mod store;

pub use cart::{Cart, LineItem};
pub use error::{CartError, CartOperation, CartResult, SnapshotError};
pub use snapshot::{CART_STORAGE_KEY, FileSnapshotStore, InMemorySnapshotStore, SnapshotStore};
pub use store::{CartStore, ConcurrencyPolicy};
