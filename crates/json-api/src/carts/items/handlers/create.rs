//! Create Cart Item Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::ToSchema,
    prelude::*,
};
use serde::{Deserialize, Serialize};

use cartapi_app::domain::carts::models::NewCartItem;

use crate::{
    carts::{errors::into_status_error, params, responses::CartItemResponse},
    extensions::*,
    state::State,
};

/// Create Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateCartItemRequest {
    /// Product name, must not be empty
    pub product: String,

    /// Number of units, must be positive
    pub quantity: i64,
}

impl TryFrom<CreateCartItemRequest> for NewCartItem {
    type Error = StatusError;

    fn try_from(request: CreateCartItemRequest) -> Result<Self, Self::Error> {
        if request.product.is_empty() {
            return Err(StatusError::bad_request().brief("Product must not be empty"));
        }

        let quantity = u32::try_from(request.quantity)
            .ok()
            .filter(|quantity| *quantity > 0)
            .ok_or_else(|| StatusError::bad_request().brief("Quantity must be a positive integer"))?;

        Ok(NewCartItem {
            product: request.product,
            quantity,
        })
    }
}

/// Create Cart Item Handler
#[endpoint(
    tags("carts"),
    summary = "Add Item to Cart",
    request_body = CreateCartItemRequest,
    parameters(("cart" = i64, Path, description = "Cart id")),
    responses(
        (status_code = StatusCode::CREATED, description = "Cart item created", body = CartItemResponse),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = 499, description = "Request canceled"),
        (status_code = StatusCode::GATEWAY_TIMEOUT, description = "Deadline exceeded"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartItemResponse>, StatusError> {
    let cart = params::cart_id(req)?;

    // The body is decoded whatever its content type.
    let body = req.payload().await.or_400("Invalid request body")?;

    let item: NewCartItem = serde_json::from_slice::<CreateCartItemRequest>(body)
        .or_400("Invalid request body")?
        .try_into()?;

    let state = depot.obtain_or_500::<Arc<State>>()?;
    let ctx = depot.request_context_or_500()?;

    let item = state
        .carts
        .add_to_cart(ctx, cart, item)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/carts/{cart}/items/{}", item.id), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(item.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use cartapi_app::{
        database::SqlError,
        domain::carts::{
            CartsServiceError, MockCartsService, StorageError,
            models::{CartId, CartItem, CartItemId},
        },
    };

    use crate::test_helpers::carts_service;

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(
            carts,
            Router::with_path("carts/{cart}/items").post(handler),
        )
    }

    fn rejecting_service() -> Service {
        let mut carts = MockCartsService::new();

        carts.expect_add_to_cart().never();

        make_service(carts)
    }

    #[tokio::test]
    async fn test_add_item_success() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_to_cart()
            .once()
            .withf(|_, cart, item| {
                *cart == CartId::from_i64(5)
                    && *item
                        == NewCartItem {
                            product: "apple".to_string(),
                            quantity: 3,
                        }
            })
            .return_once(|_, cart, item| {
                Ok(CartItem {
                    id: CartItemId::from_i64(9),
                    cart_id: cart,
                    product: item.product,
                    quantity: item.quantity,
                })
            });

        let mut res = TestClient::post("http://example.com/carts/5/items")
            .json(&json!({ "product": "apple", "quantity": 3 }))
            .send(&make_service(carts))
            .await;

        let body: CartItemResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some("/carts/5/items/9"));
        assert_eq!(body.id, 9);
        assert_eq!(body.cart_id, 5);
        assert_eq!(body.product, "apple");
        assert_eq!(body.quantity, 3);

        Ok(())
    }

    fn accepting_service() -> Service {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_to_cart()
            .once()
            .return_once(|_, cart, item| {
                Ok(CartItem {
                    id: CartItemId::from_i64(1),
                    cart_id: cart,
                    product: item.product,
                    quantity: item.quantity,
                })
            });

        make_service(carts)
    }

    fn failing_service(error: CartsServiceError) -> Service {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_to_cart()
            .once()
            .return_once(move |_, _, _| Err(error));

        make_service(carts)
    }

    #[tokio::test]
    async fn test_add_item_without_content_type_returns_201() {
        let res = TestClient::post("http://example.com/carts/1/items")
            .body(r#"{"product":"apple","quantity":3}"#)
            .send(&accepting_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
    }

    #[tokio::test]
    async fn test_add_item_text_plain_body_returns_201() {
        let res = TestClient::post("http://example.com/carts/1/items")
            .text(r#"{"product":"apple","quantity":3}"#)
            .send(&accepting_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
    }

    #[tokio::test]
    async fn test_add_item_canceled_returns_499() {
        let res = TestClient::post("http://example.com/carts/1/items")
            .json(&json!({ "product": "apple", "quantity": 1 }))
            .send(&failing_service(CartsServiceError::ContextCanceled))
            .await;

        assert_eq!(res.status_code.map(|code| code.as_u16()), Some(499));
    }

    #[tokio::test]
    async fn test_add_item_deadline_returns_504() {
        let res = TestClient::post("http://example.com/carts/1/items")
            .json(&json!({ "product": "apple", "quantity": 1 }))
            .send(&failing_service(CartsServiceError::DeadlineExceeded))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::GATEWAY_TIMEOUT));
    }

    #[tokio::test]
    async fn test_add_item_storage_failure_returns_500() {
        let error = CartsServiceError::Storage {
            op: "carts.add_to_cart",
            source: StorageError::Sql(SqlError::PoolClosed),
        };

        let res = TestClient::post("http://example.com/carts/1/items")
            .json(&json!({ "product": "apple", "quantity": 1 }))
            .send(&failing_service(error))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn test_add_item_empty_product_returns_400() {
        let res = TestClient::post("http://example.com/carts/1/items")
            .json(&json!({ "product": "", "quantity": 5 }))
            .send(&rejecting_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_add_item_invalid_quantity_returns_400() {
        for quantity in [json!(0), json!(-1), json!(u64::from(u32::MAX) + 1), json!("3")] {
            let res = TestClient::post("http://example.com/carts/1/items")
                .json(&json!({ "product": "apple", "quantity": quantity }))
                .send(&rejecting_service())
                .await;

            assert_eq!(
                res.status_code,
                Some(StatusCode::BAD_REQUEST),
                "expected 400 for quantity {quantity}"
            );
        }
    }

    #[tokio::test]
    async fn test_add_item_missing_or_malformed_body_returns_400() {
        let empty = TestClient::post("http://example.com/carts/1/items")
            .send(&rejecting_service())
            .await;

        let malformed = TestClient::post("http://example.com/carts/1/items")
            .raw_json("{\"product\":")
            .send(&rejecting_service())
            .await;

        assert_eq!(empty.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(malformed.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_add_item_invalid_cart_id_returns_400() {
        let res = TestClient::post("http://example.com/carts/abc/items")
            .json(&json!({ "product": "apple", "quantity": 1 }))
            .send(&rejecting_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_add_item_missing_cart_returns_404() {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_to_cart()
            .once()
            .return_once(|_, _, _| Err(CartsServiceError::NotFound));

        let res = TestClient::post("http://example.com/carts/404/items")
            .json(&json!({ "product": "apple", "quantity": 1 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }
}
