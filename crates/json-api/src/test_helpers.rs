//! Test helpers.

use std::{sync::Arc, time::Duration};

use salvo::{affix_state::inject, prelude::*};

use cartapi_app::{
    domain::carts::{
        MockCartsService,
        models::{Cart, CartId, CartItem, CartItemId},
    },
    request_context::CancelHandle,
};

use crate::{request_context, state::State};

pub(crate) fn make_cart(id: i64, items: Vec<CartItem>) -> Cart {
    Cart {
        id: CartId::from_i64(id),
        items,
    }
}

pub(crate) fn make_item(cart: i64, id: i64, product: &str, quantity: u32) -> CartItem {
    CartItem {
        id: CartItemId::from_i64(id),
        cart_id: CartId::from_i64(cart),
        product: product.to_string(),
        quantity,
    }
}

pub(crate) fn state_with_carts(carts: MockCartsService) -> Arc<State> {
    Arc::new(State::new(
        Arc::new(carts),
        CancelHandle::new(),
        Duration::from_secs(30),
    ))
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_carts(carts)))
            .hoop(request_context::handler)
            .push(route),
    )
}
