//! Cart Items Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use tracing::error;

use crate::domain::carts::models::{CartId, CartItem, CartItemId, NewCartItem};

const GET_CART_ITEMS_SQL: &str = include_str!("../sql/get_cart_items.sql");
const CREATE_CART_ITEM_SQL: &str = include_str!("../sql/create_cart_item.sql");
const FIND_CART_ITEM_OWNER_SQL: &str = include_str!("../sql/find_cart_item_owner.sql");
const DELETE_CART_ITEM_SQL: &str = include_str!("../sql/delete_cart_item.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartItemsRepository;

impl PgCartItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Load the items of a cart, skipping rows that cannot be decoded.
    pub(crate) async fn get_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartId,
    ) -> Result<Vec<CartItem>, sqlx::Error> {
        let rows = query(GET_CART_ITEMS_SQL)
            .bind(cart.into_i64())
            .fetch_all(&mut **tx)
            .await?;

        Ok(decode_items(&rows))
    }

    pub(crate) async fn create_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartId,
        item: &NewCartItem,
    ) -> Result<CartItem, sqlx::Error> {
        query_as::<Postgres, CartItem>(CREATE_CART_ITEM_SQL)
            .bind(cart.into_i64())
            .bind(&item.product)
            .bind(i64::from(item.quantity))
            .fetch_one(&mut **tx)
            .await
    }

    /// Resolve the cart owning `item`; fails with [`sqlx::Error::RowNotFound`] when absent.
    pub(crate) async fn find_cart_item_owner(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: CartItemId,
    ) -> Result<CartId, sqlx::Error> {
        query_scalar::<Postgres, i64>(FIND_CART_ITEM_OWNER_SQL)
            .bind(item.into_i64())
            .fetch_one(&mut **tx)
            .await
            .map(CartId::from_i64)
    }

    pub(crate) async fn delete_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartId,
        item: CartItemId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_ITEM_SQL)
            .bind(item.into_i64())
            .bind(cart.into_i64())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

// A row that fails to decode is logged and dropped; the rest of the cart is still returned.
fn decode_items(rows: &[PgRow]) -> Vec<CartItem> {
    rows.iter()
        .filter_map(|row| match CartItem::from_row(row) {
            Ok(item) => Some(item),
            Err(source) => {
                error!("failed to decode cart item row, skipping: {source}");

                None
            }
        })
        .collect()
}

impl<'r> FromRow<'r, PgRow> for CartItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: CartItemId::from_i64(row.try_get("id")?),
            cart_id: CartId::from_i64(row.try_get("cart_id")?),
            product: row.try_get("product")?,
            quantity: try_get_quantity(row, "quantity")?,
        })
    }
}

fn try_get_quantity(row: &PgRow, col: &str) -> Result<u32, sqlx::Error> {
    let quantity: i64 = row.try_get(col)?;

    u32::try_from(quantity).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}
