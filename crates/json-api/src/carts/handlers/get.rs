//! Get Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{errors::into_status_error, params, responses::CartResponse},
    extensions::*,
    state::State,
};

/// Get Cart Handler
///
/// Returns a cart with its items.
#[endpoint(
    tags("carts"),
    summary = "Get Cart",
    parameters(("cart" = i64, Path, description = "Cart id")),
    responses(
        (status_code = StatusCode::OK, description = "Cart found", body = CartResponse),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid cart id"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = 499, description = "Request canceled"),
        (status_code = StatusCode::GATEWAY_TIMEOUT, description = "Deadline exceeded"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let cart = params::cart_id(req)?;

    let state = depot.obtain_or_500::<Arc<State>>()?;
    let ctx = depot.request_context_or_500()?;

    let cart = state
        .carts
        .view_cart(ctx, cart)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
