//! Line item quantity.

use core::num::NonZeroU32;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Number of units of one product held in the cart.
///
/// Always at least one: a line item with nothing in it is removed, not kept
/// at zero. Deserialisation goes through the same check, so a stored `0` is
/// rejected rather than silently admitted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(NonZeroU32);

impl Quantity {
    pub const ONE: Quantity = Quantity(NonZeroU32::MIN);

    pub fn new(amount: u32) -> DomainResult<Self> {
        NonZeroU32::new(amount)
            .map(Self)
            .ok_or_else(|| DomainError::validation("quantity must be positive"))
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for Quantity {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(value: Quantity) -> Self {
        value.get()
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
