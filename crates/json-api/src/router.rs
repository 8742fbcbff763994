//! App Router

use salvo::Router;

use crate::{carts, healthcheck, observability, request_context};

/// Route table for the JSON API. Application state must be injected by the caller.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(observability::metrics_handler))
        .push(
            Router::with_path("carts")
                .hoop(request_context::handler)
                .post(carts::create::handler)
                .push(
                    Router::with_path("{cart}").get(carts::get::handler).push(
                        Router::with_path("items")
                            .post(carts::items::create::handler)
                            .push(
                                Router::with_path("{item}")
                                    .delete(carts::items::delete::handler),
                            ),
                    ),
                ),
        )
}
