//! Cart path parameters.

use salvo::prelude::{Request, StatusError};

use cartapi_app::domain::carts::models::{CartId, CartItemId};

use crate::{extensions::*, path::parse_cart_path};

/// Cart id from the request path. It must be a positive integer.
pub(crate) fn cart_id(req: &Request) -> Result<CartId, StatusError> {
    let params = parse_cart_path(req.uri().path()).or_400("Cart id must be a positive integer")?;

    positive(params.cart_id, "Cart id must be a positive integer").map(CartId::from_i64)
}

/// Cart and item ids from a `/carts/{cartId}/items/{itemId}` path.
pub(crate) fn cart_item_ids(req: &Request) -> Result<(CartId, CartItemId), StatusError> {
    let params = parse_cart_path(req.uri().path()).or_400("Invalid cart item path")?;

    let cart = positive(params.cart_id, "Cart id must be a positive integer")?;

    let item = params
        .item_id
        .ok_or_else(|| StatusError::bad_request().brief("Item id is required"))
        .and_then(|item| positive(item, "Item id must be a positive integer"))?;

    Ok((CartId::from_i64(cart), CartItemId::from_i64(item)))
}

fn positive(id: i64, brief: &str) -> Result<i64, StatusError> {
    if id > 0 {
        Ok(id)
    } else {
        Err(StatusError::bad_request().brief(brief))
    }
}
