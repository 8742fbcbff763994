//! Delete Cart Item Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{errors::into_status_error, params},
    extensions::*,
    state::State,
};

/// Delete Cart Item Handler
#[endpoint(
    tags("carts"),
    summary = "Remove Item from Cart",
    parameters(
        ("cart" = i64, Path, description = "Cart id"),
        ("item" = i64, Path, description = "Cart item id"),
    ),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Cart item removed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid cart or item id"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart or cart item not found"),
        (status_code = 499, description = "Request canceled"),
        (status_code = StatusCode::GATEWAY_TIMEOUT, description = "Deadline exceeded"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let (cart, item) = params::cart_item_ids(req)?;

    let state = depot.obtain_or_500::<Arc<State>>()?;
    let ctx = depot.request_context_or_500()?;

    state
        .carts
        .remove_from_cart(ctx, cart, item)
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}
