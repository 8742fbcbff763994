//! Carts service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{debug, error};

use crate::{
    domain::carts::{
        errors::{CartsServiceError, StorageError},
        models::{Cart, CartId, CartItem, CartItemId, NewCartItem},
        storage::CartsStorage,
    },
    request_context::RequestContext,
};

#[derive(Clone)]
pub struct StorageCartsService {
    storage: Arc<dyn CartsStorage>,
}

impl StorageCartsService {
    #[must_use]
    pub fn new(storage: Arc<dyn CartsStorage>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl CartsService for StorageCartsService {
    #[tracing::instrument(name = "carts.create_cart", skip_all)]
    async fn create_cart(&self, ctx: &RequestContext) -> Result<Cart, CartsServiceError> {
        ctx.check()?;

        self.storage
            .create_cart(ctx)
            .await
            .map_err(|error| classify("carts.create_cart", error))
    }

    #[tracing::instrument(
        name = "carts.add_to_cart",
        skip_all,
        fields(cart_id = %cart, product = %item.product, quantity = item.quantity)
    )]
    async fn add_to_cart(
        &self,
        ctx: &RequestContext,
        cart: CartId,
        item: NewCartItem,
    ) -> Result<CartItem, CartsServiceError> {
        ctx.check()?;

        self.storage
            .add_to_cart(ctx, cart, item)
            .await
            .map_err(|error| classify("carts.add_to_cart", error))
    }

    #[tracing::instrument(
        name = "carts.remove_from_cart",
        skip_all,
        fields(cart_id = %cart, item_id = %item)
    )]
    async fn remove_from_cart(
        &self,
        ctx: &RequestContext,
        cart: CartId,
        item: CartItemId,
    ) -> Result<(), CartsServiceError> {
        ctx.check()?;

        self.storage
            .remove_from_cart(ctx, cart, item)
            .await
            .map_err(|error| classify("carts.remove_from_cart", error))
    }

    #[tracing::instrument(name = "carts.view_cart", skip_all, fields(cart_id = %cart))]
    async fn view_cart(&self, ctx: &RequestContext, cart: CartId) -> Result<Cart, CartsServiceError> {
        ctx.check()?;

        self.storage
            .view_cart(ctx, cart)
            .await
            .map_err(|error| classify("carts.view_cart", error))
    }
}

/// Map a storage failure onto the service's error kinds.
fn classify(op: &'static str, error: StorageError) -> CartsServiceError {
    match error {
        StorageError::Canceled => {
            debug!(op, "storage call canceled");

            CartsServiceError::ContextCanceled
        }
        StorageError::DeadlineExceeded => {
            debug!(op, "storage call exceeded its deadline");

            CartsServiceError::DeadlineExceeded
        }
        StorageError::NotFound => {
            debug!(op, "record not found");

            CartsServiceError::NotFound
        }
        source @ StorageError::Sql(_) => {
            error!(op, error = ?source, "storage call failed");

            CartsServiceError::Storage { op, source }
        }
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Creates a new, empty cart.
    async fn create_cart(&self, ctx: &RequestContext) -> Result<Cart, CartsServiceError>;

    /// Add an item to the given cart
    async fn add_to_cart(
        &self,
        ctx: &RequestContext,
        cart: CartId,
        item: NewCartItem,
    ) -> Result<CartItem, CartsServiceError>;

    /// Remove an item from the given cart
    async fn remove_from_cart(
        &self,
        ctx: &RequestContext,
        cart: CartId,
        item: CartItemId,
    ) -> Result<(), CartsServiceError>;

    /// Retrieve a single cart with its items.
    async fn view_cart(&self, ctx: &RequestContext, cart: CartId) -> Result<Cart, CartsServiceError>;
}
