//! Cart path parsing.

use thiserror::Error;

/// Ids extracted from a `/carts/...` path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PathParams {
    pub(crate) cart_id: i64,
    pub(crate) item_id: Option<i64>,
}

/// Why a path does not name a cart resource.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum InvalidPath {
    #[error("invalid path, expected {expected}")]
    Shape { expected: &'static str },

    #[error("invalid cart id, must be an integer")]
    CartId,

    #[error("invalid item id, must be an integer")]
    ItemId,

    #[error("unrecognised cart path")]
    Unrecognised,
}

const CART: &str = "/carts/{cartId}";
const ITEMS: &str = "/carts/{cartId}/items";
const ITEM: &str = "/carts/{cartId}/items/{itemId}";

/// Parse `/carts/{cartId}`, `/carts/{cartId}/items` or `/carts/{cartId}/items/{itemId}`.
///
/// Leading and trailing slashes are ignored.
pub(crate) fn parse_cart_path(path: &str) -> Result<PathParams, InvalidPath> {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match segments.as_slice() {
        [carts, cart] => {
            expect_literals(*carts == "carts", CART)?;

            Ok(PathParams {
                cart_id: parse_cart_id(cart)?,
                item_id: None,
            })
        }
        [carts, cart, items] => {
            expect_literals(*carts == "carts" && *items == "items", ITEMS)?;

            Ok(PathParams {
                cart_id: parse_cart_id(cart)?,
                item_id: None,
            })
        }
        [carts, cart, items, item] => {
            expect_literals(*carts == "carts" && *items == "items", ITEM)?;

            Ok(PathParams {
                cart_id: parse_cart_id(cart)?,
                item_id: Some(item.parse().map_err(|_err| InvalidPath::ItemId)?),
            })
        }
        _ => Err(InvalidPath::Unrecognised),
    }
}

fn expect_literals(matched: bool, expected: &'static str) -> Result<(), InvalidPath> {
    if matched {
        Ok(())
    } else {
        Err(InvalidPath::Shape { expected })
    }
}

fn parse_cart_id(segment: &str) -> Result<i64, InvalidPath> {
    segment.parse().map_err(|_err| InvalidPath::CartId)
}
