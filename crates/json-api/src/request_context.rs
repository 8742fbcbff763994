//! Per-request cancellation and deadline.

use std::sync::Arc;

use salvo::prelude::*;
use tracing::error;

use crate::{extensions::*, state::State};

/// Store a [`RequestContext`](cartapi_app::request_context::RequestContext) for downstream
/// handlers. It is cancelled when the server shuts down and expires after the configured
/// request timeout.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let ctx = match depot.obtain::<Arc<State>>() {
        Ok(state) => state.shutdown.context().with_timeout(state.request_timeout),
        Err(_error) => {
            error!("application state missing from depot");

            res.render(StatusError::internal_server_error());

            return;
        }
    };

    depot.insert_request_context(ctx);

    ctrl.call_next(req, depot, res).await;
}
