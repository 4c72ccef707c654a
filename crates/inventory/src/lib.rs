//! Inventory collaborator for the cart.
//!
//! The cart never owns product or stock data; it asks an [`InventoryClient`]
//! each time it needs to verify a mutation. This crate defines that seam plus
//! two implementations: an in-memory catalogue for tests and demos, and (with
//! the `http` feature) a REST client.

pub mod client;
pub mod memory;

#[cfg(feature = "http")]
pub mod http;

pub use client::{InventoryClient, InventoryError, ProductMetadata, Stock};
pub use memory::InMemoryInventory;

#[cfg(feature = "http")]
pub use http::HttpInventoryClient;
