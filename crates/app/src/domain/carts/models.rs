//! Cart Models

use crate::ids::TypedId;

/// Cart Id
pub type CartId = TypedId<Cart>;

/// Cart Item Id
pub type CartItemId = TypedId<CartItem>;

/// Cart Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    pub id: CartId,
    pub items: Vec<CartItem>,
}

impl Cart {
    /// A freshly created cart holds no items.
    #[must_use]
    pub fn empty(id: CartId) -> Self {
        Self {
            id,
            items: Vec::new(),
        }
    }
}

/// CartItem Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub id: CartItemId,
    pub cart_id: CartId,
    pub product: String,
    pub quantity: u32,
}

/// NewCartItem Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    pub product: String,
    pub quantity: u32,
}
