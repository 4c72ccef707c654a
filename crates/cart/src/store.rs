//! The cart store: sole owner and writer of the session cart.
//!
//! Every mutation follows the same shape:
//!
//! 1. take the mutation gate (at most one mutation in flight)
//! 2. ask the inventory for whatever the decision needs
//! 3. read the *live* committed cart and compute the next one
//! 4. persist the next cart, then publish it to memory
//!
//! Step 3 happens after the inventory call has resolved, so nothing read
//! before a suspension point is ever acted upon. Step 4 publishes only after
//! a successful write; a failed write leaves both sides on the old cart.

use std::str::FromStr;

use tokio::sync::{Mutex, MutexGuard, watch};

use shopcart_core::{DomainError, ProductId, Quantity};
use shopcart_inventory::{InventoryClient, InventoryError, Stock};

use crate::cart::{Cart, LineItem};
use crate::error::{CartError, CartResult};
use crate::snapshot::{SnapshotStore, decode_cart, encode_cart};

/// What a mutation does when another one is already in flight.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ConcurrencyPolicy {
    /// Wait for the running mutation to finish (FIFO).
    #[default]
    Queue,
    /// Fail immediately with [`CartError::Busy`].
    Reject,
}

impl FromStr for ConcurrencyPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "queue" => Ok(Self::Queue),
            "reject" => Ok(Self::Reject),
            other => Err(DomainError::validation(format!(
                "unknown concurrency policy '{other}' (expected 'queue' or 'reject')"
            ))),
        }
    }
}

/// Owner of the session cart.
///
/// Share it behind an `Arc`; all methods take `&self`. Readers get clones via
/// [`CartStore::cart`] or follow commits through [`CartStore::subscribe`].
pub struct CartStore<I, S> {
    inventory: I,
    snapshots: S,
    policy: ConcurrencyPolicy,
    gate: Mutex<()>,
    state: watch::Sender<Cart>,
}

impl<I, S> CartStore<I, S>
where
    I: InventoryClient,
    S: SnapshotStore,
{
    /// Rehydrate the cart from `snapshots` and wrap it in a store.
    ///
    /// A missing, unreadable or malformed snapshot yields an empty cart; it
    /// is logged, never fatal.
    pub fn open(inventory: I, snapshots: S) -> Self {
        let cart = rehydrate(&snapshots);
        tracing::info!(lines = cart.len(), items = cart.item_count(), "cart rehydrated");

        Self {
            inventory,
            snapshots,
            policy: ConcurrencyPolicy::default(),
            gate: Mutex::new(()),
            state: watch::Sender::new(cart),
        }
    }

    pub fn with_policy(mut self, policy: ConcurrencyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ConcurrencyPolicy {
        self.policy
    }

    /// The committed cart.
    pub fn cart(&self) -> Cart {
        self.state.borrow().clone()
    }

    /// Receiver that observes every committed cart, starting with the current one.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.state.subscribe()
    }

    /// Add one unit of `product_id`.
    ///
    /// A product already in the cart goes through the same stock check as
    /// [`CartStore::set_quantity`] with its amount plus one.
    pub async fn add_product(&self, product_id: ProductId) -> CartResult<Cart> {
        let _guard = self.acquire().await?;

        let product = self
            .inventory
            .fetch_product(product_id)
            .await
            .inspect_err(|e| tracing::warn!(%product_id, error = %e, "product lookup failed"))?;
        if product.id != product_id {
            tracing::warn!(
                %product_id,
                returned = %product.id,
                "catalogue answered for another product"
            );
            return Err(InventoryError::unavailable(format!(
                "catalogue returned product {} for {product_id}",
                product.id
            ))
            .into());
        }
        let stock = self
            .inventory
            .fetch_stock(product_id)
            .await
            .inspect_err(|e| tracing::warn!(%product_id, error = %e, "stock lookup failed"))?;

        let current = self.cart();
        let next = match current.with_line(LineItem::from_product(product)) {
            Some(_) if stock.amount == 0 => {
                return Err(CartError::OutOfStock {
                    product_id,
                    requested: 1,
                    available: 0,
                });
            }
            Some(appended) => appended,
            None => {
                let held = current
                    .get(product_id)
                    .map_or(0, |line| u64::from(line.amount().get()));
                resize(&current, product_id, held + 1, stock)?
            }
        };

        let committed = self.commit(next)?;
        tracing::info!(%product_id, "product added to cart");
        Ok(committed)
    }

    /// Remove the line for `product_id`.
    pub async fn remove_product(&self, product_id: ProductId) -> CartResult<Cart> {
        let _guard = self.acquire().await?;

        let next = self
            .cart()
            .without(product_id)
            .ok_or(CartError::ProductNotInCart(product_id))?;

        let committed = self.commit(next)?;
        tracing::info!(%product_id, "product removed from cart");
        Ok(committed)
    }

    /// Set the amount of a line already in the cart.
    ///
    /// `amount <= 0` is a no-op: nothing is fetched or written and the current
    /// cart is returned. This never creates a line.
    pub async fn set_quantity(&self, product_id: ProductId, amount: i64) -> CartResult<Cart> {
        let Some(requested) = u64::try_from(amount).ok().filter(|n| *n > 0) else {
            tracing::debug!(%product_id, amount, "ignoring non-positive quantity");
            return Ok(self.cart());
        };

        let _guard = self.acquire().await?;

        let stock = self
            .inventory
            .fetch_stock(product_id)
            .await
            .inspect_err(|e| tracing::warn!(%product_id, error = %e, "stock lookup failed"))?;

        let next = resize(&self.cart(), product_id, requested, stock)?;

        let committed = self.commit(next)?;
        tracing::info!(%product_id, amount = requested, "cart quantity updated");
        Ok(committed)
    }

    async fn acquire(&self) -> CartResult<MutexGuard<'_, ()>> {
        match self.policy {
            ConcurrencyPolicy::Queue => Ok(self.gate.lock().await),
            ConcurrencyPolicy::Reject => self.gate.try_lock().map_err(|_| {
                tracing::debug!("cart mutation rejected, another one is in flight");
                CartError::Busy
            }),
        }
    }

    /// Persist `next`, then make it the committed cart.
    fn commit(&self, next: Cart) -> CartResult<Cart> {
        let bytes = encode_cart(&next).map_err(CartError::PersistFailure)?;
        self.snapshots.write(&bytes).map_err(|e| {
            tracing::error!(error = %e, "cart snapshot write failed, keeping previous cart");
            CartError::PersistFailure(e)
        })?;

        self.state.send_replace(next.clone());
        Ok(next)
    }
}

/// Stock-checked amount change shared by `set_quantity` and re-adding a
/// product that is already in the cart.
fn resize(cart: &Cart, product_id: ProductId, requested: u64, stock: Stock) -> CartResult<Cart> {
    let amount = u32::try_from(requested)
        .ok()
        .filter(|n| *n <= stock.amount)
        .and_then(|n| Quantity::new(n).ok())
        .ok_or(CartError::OutOfStock {
            product_id,
            requested,
            available: stock.amount,
        })?;

    cart.with_quantity(product_id, amount)
        .ok_or(CartError::ProductNotInCart(product_id))
}

fn rehydrate<S: SnapshotStore>(snapshots: &S) -> Cart {
    let bytes = match snapshots.read() {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return Cart::new(),
        Err(e) => {
            tracing::warn!(error = %e, "cart snapshot unreadable, starting empty");
            return Cart::new();
        }
    };

    decode_cart(&bytes).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "cart snapshot malformed, starting empty");
        Cart::new()
    })
}
