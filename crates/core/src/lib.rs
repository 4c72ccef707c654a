//! `shopcart-core`: value types shared by every shopcart crate.
//!
//! This crate contains **pure domain** primitives (no IO, no async).

pub mod error;
pub mod id;
pub mod quantity;

pub use error::{DomainError, DomainResult};
pub use id::ProductId;
pub use quantity::Quantity;
