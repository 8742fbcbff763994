//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};
use tracing::error;

use cartapi_app::request_context::RequestContext;

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_request_context(&mut self, ctx: RequestContext);

    fn request_context_or_500(&self) -> Result<&RequestContext, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_request_context(&mut self, ctx: RequestContext) {
        self.inject(ctx);
    }

    fn request_context_or_500(&self) -> Result<&RequestContext, StatusError> {
        self.obtain::<RequestContext>().map_err(|_ignored| {
            error!("request context missing from depot");

            StatusError::internal_server_error()
        })
    }
}
