//! Carts storage.

use async_trait::async_trait;
use mockall::automock;
use tracing::warn;

use crate::{
    database::Db,
    domain::carts::{
        errors::StorageError,
        models::{Cart, CartId, CartItem, CartItemId, NewCartItem},
        repositories::{PgCartItemsRepository, PgCartsRepository},
    },
    request_context::RequestContext,
};

#[derive(Debug, Clone)]
pub struct PgCartsStorage {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
}

impl PgCartsStorage {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
        }
    }

    async fn insert_cart(&self) -> Result<Cart, StorageError> {
        let mut tx = self.db.begin().await?;

        let cart = self.carts_repository.create_cart(&mut tx).await?;

        tx.commit().await?;

        Ok(Cart::empty(cart))
    }

    async fn insert_item(&self, cart: CartId, item: NewCartItem) -> Result<CartItem, StorageError> {
        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .find_cart(&mut tx, cart)
            .await
            .map_err(|error| missing(error, "cart does not exist"))?;

        let created = self
            .items_repository
            .create_cart_item(&mut tx, cart, &item)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn delete_item(&self, cart: CartId, item: CartItemId) -> Result<(), StorageError> {
        let mut tx = self.db.begin().await?;

        self.carts_repository
            .find_cart(&mut tx, cart)
            .await
            .map_err(|error| missing(error, "cart does not exist"))?;

        let owner = self
            .items_repository
            .find_cart_item_owner(&mut tx, item)
            .await
            .map_err(|error| missing(error, "cart item does not exist"))?;

        if owner != cart {
            warn!(%owner, "cart item belongs to another cart");

            return Err(StorageError::NotFound);
        }

        let deleted = self
            .items_repository
            .delete_cart_item(&mut tx, cart, item)
            .await?;

        // A concurrent removal can delete the row between the owner lookup and here.
        if deleted == 0 {
            warn!("cart item was already removed");

            return Err(StorageError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn load_cart(&self, cart: CartId) -> Result<Cart, StorageError> {
        let mut tx = self.db.begin().await?;

        if self.carts_repository.count_carts(&mut tx, cart).await? == 0 {
            warn!("cart does not exist");

            return Err(StorageError::NotFound);
        }

        let items = self.items_repository.get_cart_items(&mut tx, cart).await?;

        tx.commit().await?;

        Ok(Cart { id: cart, items })
    }
}

#[async_trait]
impl CartsStorage for PgCartsStorage {
    #[tracing::instrument(name = "storage.create_cart", skip_all)]
    async fn create_cart(&self, ctx: &RequestContext) -> Result<Cart, StorageError> {
        ctx.run(self.insert_cart()).await?
    }

    #[tracing::instrument(name = "storage.add_to_cart", skip_all, fields(cart_id = %cart))]
    async fn add_to_cart(
        &self,
        ctx: &RequestContext,
        cart: CartId,
        item: NewCartItem,
    ) -> Result<CartItem, StorageError> {
        ctx.run(self.insert_item(cart, item)).await?
    }

    #[tracing::instrument(
        name = "storage.remove_from_cart",
        skip_all,
        fields(cart_id = %cart, item_id = %item)
    )]
    async fn remove_from_cart(
        &self,
        ctx: &RequestContext,
        cart: CartId,
        item: CartItemId,
    ) -> Result<(), StorageError> {
        ctx.run(self.delete_item(cart, item)).await?
    }

    #[tracing::instrument(name = "storage.view_cart", skip_all, fields(cart_id = %cart))]
    async fn view_cart(&self, ctx: &RequestContext, cart: CartId) -> Result<Cart, StorageError> {
        ctx.run(self.load_cart(cart)).await?
    }
}

fn missing(error: sqlx::Error, message: &'static str) -> StorageError {
    let error = StorageError::from(error);

    if matches!(error, StorageError::NotFound) {
        warn!("{message}");
    }

    error
}

/// Cart persistence.
///
/// Every operation observes the given [`RequestContext`]: a context that is already
/// done fails before any statement is issued, and one that finishes mid-flight aborts
/// the statement and rolls back the open transaction.
#[automock]
#[async_trait]
pub trait CartsStorage: Send + Sync {
    /// Inserts an empty cart and returns it with its generated id.
    async fn create_cart(&self, ctx: &RequestContext) -> Result<Cart, StorageError>;

    /// Inserts an item into an existing cart.
    async fn add_to_cart(
        &self,
        ctx: &RequestContext,
        cart: CartId,
        item: NewCartItem,
    ) -> Result<CartItem, StorageError>;

    /// Deletes an item from an existing cart.
    async fn remove_from_cart(
        &self,
        ctx: &RequestContext,
        cart: CartId,
        item: CartItemId,
    ) -> Result<(), StorageError>;

    /// Loads a cart with its items.
    async fn view_cart(&self, ctx: &RequestContext, cart: CartId) -> Result<Cart, StorageError>;
}

#[cfg(test)]
mod tests {
    use sqlx::{postgres::PgPoolOptions, query_scalar};
    use testresult::TestResult;
    use tokio::time::Instant;

    use crate::{request_context::CancelHandle, test::TestContext};

    use super::*;

    fn new_item(product: &str, quantity: u32) -> NewCartItem {
        NewCartItem {
            product: product.to_string(),
            quantity,
        }
    }

    // Never connects; any statement issued against it would fail with a connection error.
    fn unreachable_storage() -> Result<PgCartsStorage, sqlx::Error> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://nobody@127.0.0.1:1/none")?;

        Ok(PgCartsStorage::new(Db::new(pool)))
    }

    fn canceled_context() -> RequestContext {
        let handle = CancelHandle::new();
        handle.cancel();
        handle.context()
    }

    fn expired_context() -> RequestContext {
        RequestContext::background().with_deadline(Instant::now())
    }

    #[tokio::test]
    async fn canceled_context_fails_every_operation_before_touching_the_database() -> TestResult {
        let storage = unreachable_storage()?;
        let ctx = canceled_context();
        let cart = CartId::from_i64(1);

        assert!(matches!(
            storage.create_cart(&ctx).await,
            Err(StorageError::Canceled)
        ));
        assert!(matches!(
            storage.add_to_cart(&ctx, cart, new_item("apple", 1)).await,
            Err(StorageError::Canceled)
        ));
        assert!(matches!(
            storage
                .remove_from_cart(&ctx, cart, CartItemId::from_i64(1))
                .await,
            Err(StorageError::Canceled)
        ));
        assert!(matches!(
            storage.view_cart(&ctx, cart).await,
            Err(StorageError::Canceled)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn expired_deadline_fails_every_operation_before_touching_the_database() -> TestResult {
        let storage = unreachable_storage()?;
        let ctx = expired_context();
        let cart = CartId::from_i64(1);

        assert!(matches!(
            storage.create_cart(&ctx).await,
            Err(StorageError::DeadlineExceeded)
        ));
        assert!(matches!(
            storage.add_to_cart(&ctx, cart, new_item("apple", 1)).await,
            Err(StorageError::DeadlineExceeded)
        ));
        assert!(matches!(
            storage
                .remove_from_cart(&ctx, cart, CartItemId::from_i64(1))
                .await,
            Err(StorageError::DeadlineExceeded)
        ));
        assert!(matches!(
            storage.view_cart(&ctx, cart).await,
            Err(StorageError::DeadlineExceeded)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn create_cart_returns_empty_cart_with_generated_id() -> TestResult {
        let ctx = TestContext::new().await;
        let req = RequestContext::background();

        let first = ctx.storage.create_cart(&req).await?;
        let second = ctx.storage.create_cart(&req).await?;

        assert!(first.items.is_empty());
        assert_ne!(first.id, second.id);

        Ok(())
    }

    #[tokio::test]
    async fn add_to_cart_echoes_input_with_new_id() -> TestResult {
        let ctx = TestContext::new().await;
        let req = RequestContext::background();

        let cart = ctx.storage.create_cart(&req).await?;

        let item = ctx
            .storage
            .add_to_cart(&req, cart.id, new_item("apple", 3))
            .await?;

        assert_eq!(item.cart_id, cart.id);
        assert_eq!(item.product, "apple");
        assert_eq!(item.quantity, 3);

        let other = ctx
            .storage
            .add_to_cart(&req, cart.id, new_item("apple", 3))
            .await?;

        assert_ne!(item.id, other.id);

        Ok(())
    }

    #[tokio::test]
    async fn add_to_unknown_cart_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .storage
            .add_to_cart(
                &RequestContext::background(),
                CartId::from_i64(404),
                new_item("apple", 1),
            )
            .await;

        assert!(
            matches!(result, Err(StorageError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn failed_insert_leaves_no_item_behind() -> TestResult {
        let ctx = TestContext::new().await;
        let req = RequestContext::background();

        let cart = ctx.storage.create_cart(&req).await?;

        // An empty product violates the table's check constraint after the cart lookup succeeded.
        let result = ctx
            .storage
            .add_to_cart(&req, cart.id, new_item("", 1))
            .await;

        assert!(
            matches!(result, Err(StorageError::Sql(_))),
            "expected Sql error, got {result:?}"
        );

        let count: i64 = query_scalar("SELECT COUNT(*) FROM cart_items")
            .fetch_one(ctx.db.pool())
            .await?;

        assert_eq!(count, 0);

        Ok(())
    }

    #[tokio::test]
    async fn remove_from_cart_excludes_item_from_view() -> TestResult {
        let ctx = TestContext::new().await;
        let req = RequestContext::background();

        let cart = ctx.storage.create_cart(&req).await?;
        let apple = ctx
            .storage
            .add_to_cart(&req, cart.id, new_item("apple", 3))
            .await?;
        let pear = ctx
            .storage
            .add_to_cart(&req, cart.id, new_item("pear", 1))
            .await?;

        ctx.storage.remove_from_cart(&req, cart.id, apple.id).await?;

        let viewed = ctx.storage.view_cart(&req, cart.id).await?;

        assert_eq!(viewed.id, cart.id);
        assert_eq!(viewed.items, vec![pear]);

        Ok(())
    }

    #[tokio::test]
    async fn remove_from_unknown_cart_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .storage
            .remove_from_cart(
                &RequestContext::background(),
                CartId::from_i64(404),
                CartItemId::from_i64(1),
            )
            .await;

        assert!(
            matches!(result, Err(StorageError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn remove_unknown_item_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let req = RequestContext::background();

        let cart = ctx.storage.create_cart(&req).await?;

        let result = ctx
            .storage
            .remove_from_cart(&req, cart.id, CartItemId::from_i64(404))
            .await;

        assert!(
            matches!(result, Err(StorageError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn remove_item_of_another_cart_returns_not_found_and_keeps_item() -> TestResult {
        let ctx = TestContext::new().await;
        let req = RequestContext::background();

        let owner = ctx.storage.create_cart(&req).await?;
        let other = ctx.storage.create_cart(&req).await?;
        let item = ctx
            .storage
            .add_to_cart(&req, owner.id, new_item("apple", 2))
            .await?;

        let result = ctx.storage.remove_from_cart(&req, other.id, item.id).await;

        assert!(
            matches!(result, Err(StorageError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        let viewed = ctx.storage.view_cart(&req, owner.id).await?;

        assert_eq!(viewed.items, vec![item]);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_removals_of_one_item_succeed_once() -> TestResult {
        let ctx = TestContext::new().await;
        let req = RequestContext::background();

        let cart = ctx.storage.create_cart(&req).await?;
        let item = ctx
            .storage
            .add_to_cart(&req, cart.id, new_item("apple", 1))
            .await?;

        let (first, second) = tokio::join!(
            ctx.storage.remove_from_cart(&req, cart.id, item.id),
            ctx.storage.remove_from_cart(&req, cart.id, item.id),
        );

        let outcomes = [first, second];

        assert_eq!(outcomes.iter().filter(|result| result.is_ok()).count(), 1);
        assert!(
            outcomes
                .iter()
                .any(|result| matches!(result, Err(StorageError::NotFound))),
            "expected one NotFound, got {outcomes:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn view_unknown_cart_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .storage
            .view_cart(&RequestContext::background(), CartId::from_i64(404))
            .await;

        assert!(
            matches!(result, Err(StorageError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn view_cart_skips_rows_that_fail_to_decode() -> TestResult {
        let ctx = TestContext::new().await;
        let req = RequestContext::background();

        let cart = ctx.storage.create_cart(&req).await?;
        let kept = ctx
            .storage
            .add_to_cart(&req, cart.id, new_item("apple", 1))
            .await?;

        // Quantity outside the u32 range cannot be decoded into a cart item.
        sqlx::query("INSERT INTO cart_items (cart_id, product, quantity) VALUES ($1, 'pear', $2)")
            .bind(cart.id.into_i64())
            .bind(i64::from(u32::MAX) + 1)
            .execute(ctx.db.pool())
            .await?;

        let viewed = ctx.storage.view_cart(&req, cart.id).await?;

        assert_eq!(viewed.items, vec![kept]);

        Ok(())
    }
}
