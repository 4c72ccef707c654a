//! Cart model.
//!
//! `Cart` values are immutable snapshots: every transition returns a new cart
//! and leaves the receiver untouched, so the store can compute a candidate,
//! persist it, and only then make it visible.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use shopcart_core::{DomainError, ProductId, Quantity};
use shopcart_inventory::ProductMetadata;

/// One product in the cart together with how many units were requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    id: ProductId,
    amount: Quantity,
    /// Catalogue attributes copied at add-time, never re-fetched.
    #[serde(flatten)]
    attributes: Map<String, Value>,
}

impl LineItem {
    /// A fresh line for `product` holding a single unit.
    pub fn from_product(product: ProductMetadata) -> Self {
        let ProductMetadata { id, mut attributes } = product;
        // `id` and `amount` are ours; catalogue fields of those names would
        // collide on disk.
        attributes.remove("id");
        attributes.remove("amount");
        Self {
            id,
            amount: Quantity::ONE,
            attributes,
        }
    }

    pub fn product_id(&self) -> ProductId {
        self.id
    }

    pub fn amount(&self) -> Quantity {
        self.amount
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    fn with_amount(&self, amount: Quantity) -> Self {
        Self {
            amount,
            ..self.clone()
        }
    }
}

/// Ordered list of line items; insertion order is display order.
///
/// Holds at most one line per product. The invariant is enforced on every
/// constructor, including deserialisation, so a snapshot that repeats a
/// product is rejected as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<LineItem>) -> Result<Self, DomainError> {
        for (idx, item) in items.iter().enumerate() {
            if items[..idx].iter().any(|prev| prev.id == item.id) {
                return Err(DomainError::invariant(format!(
                    "product {} appears more than once",
                    item.id
                )));
            }
        }
        Ok(Self { items })
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.amount.get())).sum()
    }

    pub fn get(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == product_id)
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Append a line. `None` if the product already has one.
    pub fn with_line(&self, line: LineItem) -> Option<Self> {
        if self.contains(line.id) {
            return None;
        }
        let mut items = self.items.clone();
        items.push(line);
        Some(Self { items })
    }

    /// Replace the amount of an existing line, keeping its position and
    /// attributes. `None` if the product has no line.
    pub fn with_quantity(&self, product_id: ProductId, amount: Quantity) -> Option<Self> {
        let idx = self.items.iter().position(|i| i.id == product_id)?;
        let mut items = self.items.clone();
        items[idx] = items[idx].with_amount(amount);
        Some(Self { items })
    }

    /// Drop the line for `product_id`. `None` if there is none.
    pub fn without(&self, product_id: ProductId) -> Option<Self> {
        let idx = self.items.iter().position(|i| i.id == product_id)?;
        let mut items = self.items.clone();
        items.remove(idx);
        Some(Self { items })
    }
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = DomainError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
