//! Checkout Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::info;

use apothecary_app::domain::orders::data::NewCheckout;

use crate::{
    extensions::*,
    observability::{CheckoutOutcome, record_checkout},
    orders::{
        errors::{checkout_outcome, into_status_error},
        models::{OrderResponse, ShippingAddressBody},
    },
    state::State,
};

/// Checkout Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckoutRequest {
    pub shipping_address: ShippingAddressBody,

    /// Recorded on the order as given
    #[serde(default)]
    pub payment_method: Option<String>,
}

impl From<CheckoutRequest> for NewCheckout {
    fn from(request: CheckoutRequest) -> Self {
        NewCheckout {
            shipping_address: request.shipping_address.into(),
            payment_method: request.payment_method,
        }
    }
}

/// Checkout Handler
///
/// Places an order from the caller's cart and empties the cart.
#[endpoint(
    tags("orders"),
    summary = "Checkout",
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Empty cart or invalid shipping address"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing caller identity"),
        (status_code = StatusCode::NOT_FOUND, description = "Patient profile not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.checkout",
    skip(json, depot, res),
    fields(owner_uuid = tracing::field::Empty, order_number = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CheckoutRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.owner_uuid_or_401()?;

    let span = tracing::Span::current();

    span.record("owner_uuid", tracing::field::display(owner));

    let order = match state.app.orders.checkout(owner, json.into_inner().into()).await {
        Ok(order) => order,
        Err(error) => {
            record_checkout(checkout_outcome(&error));

            return Err(into_status_error(error));
        }
    };

    record_checkout(CheckoutOutcome::Placed);

    span.record("order_number", tracing::field::display(&order.order.order_number));

    info!(order_uuid = %order.order.uuid, "order placed");

    res.add_header(LOCATION, format!("/orders/{}", order.order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use apothecary_app::domain::orders::{
        MockOrdersService, OrdersServiceError, records::OrderUuid,
    };

    use crate::test_helpers::{TEST_OWNER_UUID, make_order, orders_service};

    use super::*;

    fn make_service(repo: MockOrdersService) -> Service {
        orders_service(repo, Router::with_path("orders").post(handler))
    }

    fn checkout_body() -> Value {
        json!({
            "shippingAddress": {
                "addressLine1": "12 High Street",
                "city": "Leeds",
                "state": "West Yorkshire",
                "postalCode": "LS1 1AA",
                "country": "GB"
            },
            "paymentMethod": "card"
        })
    }

    #[tokio::test]
    async fn test_checkout_returns_201_with_location() -> TestResult {
        let mut repo = MockOrdersService::new();
        let uuid = OrderUuid::new();
        let order = make_order(uuid)?;

        repo.expect_checkout()
            .once()
            .withf(|owner, checkout| {
                *owner == TEST_OWNER_UUID
                    && checkout.payment_method.as_deref() == Some("card")
                    && checkout.shipping_address.city == "Leeds"
                    && checkout.shipping_address.address_line2.is_none()
            })
            .return_once(move |_, _| Ok(order));

        let mut res = TestClient::post("http://example.com/orders")
            .json(&checkout_body())
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let location = res
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);

        assert_eq!(location, Some(format!("/orders/{uuid}")));

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(body.order_number, "ORD-20260310-001");
        assert_eq!(body.status, "pending");
        assert_eq!(body.payment_status, "pending");
        assert_eq!(body.subtotal, 2500);
        assert_eq!(body.discount_amount, 200);
        assert_eq!(body.total_amount, 2300);
        assert_eq!(body.lines.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_returns_400() -> TestResult {
        let mut repo = MockOrdersService::new();

        repo.expect_checkout()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::EmptyCart));

        let res = TestClient::post("http://example.com/orders")
            .json(&checkout_body())
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_allocation_conflict_returns_500() -> TestResult {
        let mut repo = MockOrdersService::new();

        repo.expect_checkout()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::AllocationConflict { attempts: 3 }));

        let res = TestClient::post("http://example.com/orders")
            .json(&checkout_body())
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_without_address_is_rejected_before_service() -> TestResult {
        let mut repo = MockOrdersService::new();

        repo.expect_checkout().never();

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({ "paymentMethod": "card" }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
