//! Cart response bodies.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use cartapi_app::domain::carts::models::{Cart, CartItem};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub id: i64,

    /// The items in the cart, ordered by id
    pub items: Vec<CartItemResponse>,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            id: cart.id.into_i64(),
            items: cart.items.into_iter().map(CartItemResponse::from).collect(),
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// The unique identifier of the cart item
    pub id: i64,

    /// The cart the item belongs to
    pub cart_id: i64,

    /// Product name
    pub product: String,

    /// Number of units
    pub quantity: u32,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            id: item.id.into_i64(),
            cart_id: item.cart_id.into_i64(),
            product: item.product,
            quantity: item.quantity,
        }
    }
}
