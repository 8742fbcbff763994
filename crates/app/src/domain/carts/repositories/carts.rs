//! Carts Repository

use sqlx::{Postgres, Transaction, query_scalar};

use crate::domain::carts::models::CartId;

const CREATE_CART_SQL: &str = include_str!("../sql/create_cart.sql");
const FIND_CART_SQL: &str = include_str!("../sql/find_cart.sql");
const COUNT_CARTS_SQL: &str = include_str!("../sql/count_carts.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<CartId, sqlx::Error> {
        query_scalar::<Postgres, i64>(CREATE_CART_SQL)
            .fetch_one(&mut **tx)
            .await
            .map(CartId::from_i64)
    }

    /// Fails with [`sqlx::Error::RowNotFound`] when the cart does not exist.
    pub(crate) async fn find_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartId,
    ) -> Result<CartId, sqlx::Error> {
        query_scalar::<Postgres, i64>(FIND_CART_SQL)
            .bind(cart.into_i64())
            .fetch_one(&mut **tx)
            .await
            .map(CartId::from_i64)
    }

    pub(crate) async fn count_carts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartId,
    ) -> Result<i64, sqlx::Error> {
        query_scalar::<Postgres, i64>(COUNT_CARTS_SQL)
            .bind(cart.into_i64())
            .fetch_one(&mut **tx)
            .await
    }
}
