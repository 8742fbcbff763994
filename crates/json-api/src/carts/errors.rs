//! Errors

use salvo::http::{StatusCode, StatusError};
use tracing::{error, warn};

use cartapi_app::domain::carts::CartsServiceError;

/// Non-standard status for requests abandoned before a response was produced.
const CLIENT_CLOSED_REQUEST: u16 = 499;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::ContextCanceled => {
            warn!("request canceled before completion");

            client_closed_request()
        }
        CartsServiceError::DeadlineExceeded => {
            warn!("request deadline exceeded");

            StatusError::gateway_timeout().brief("Deadline exceeded")
        }
        CartsServiceError::NotFound => {
            warn!("cart or cart item not found");

            StatusError::not_found().brief("Cart or cart item not found")
        }
        error @ CartsServiceError::Storage { .. } => {
            error!("cart operation failed: {error}");

            StatusError::internal_server_error()
        }
    }
}

fn client_closed_request() -> StatusError {
    let mut error = StatusError::bad_request().brief("Context canceled");

    if let Ok(code) = StatusCode::from_u16(CLIENT_CLOSED_REQUEST) {
        error.code = code;
        error.name = "Client Closed Request".to_owned();
    }

    error
}
