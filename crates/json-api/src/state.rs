//! State

use std::{sync::Arc, time::Duration};

use cartapi_app::{context::AppContext, domain::carts::CartsService, request_context::CancelHandle};

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) carts: Arc<dyn CartsService>,

    /// Cancelled once the server starts shutting down.
    pub(crate) shutdown: CancelHandle,

    pub(crate) request_timeout: Duration,
}

impl State {
    #[must_use]
    pub(crate) fn new(
        carts: Arc<dyn CartsService>,
        shutdown: CancelHandle,
        request_timeout: Duration,
    ) -> Self {
        Self {
            carts,
            shutdown,
            request_timeout,
        }
    }

    #[must_use]
    pub(crate) fn from_app_context(
        app: &AppContext,
        shutdown: CancelHandle,
        request_timeout: Duration,
    ) -> Arc<Self> {
        Arc::new(Self::new(app.carts.clone(), shutdown, request_timeout))
    }
}
