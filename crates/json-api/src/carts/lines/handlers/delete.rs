//! Remove Cart Line Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    carts::{errors::into_status_error, models::CartResponse},
    extensions::*,
    state::State,
};

/// Remove Cart Line Handler
///
/// Removing a line that does not exist succeeds and returns the cart unchanged.
#[endpoint(
    tags("cart"),
    summary = "Remove Cart Line",
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing caller identity"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart line belongs to another cart"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    line: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.owner_uuid_or_401()?;

    let cart = state
        .app
        .carts
        .remove_item(owner, line.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use apothecary_app::domain::carts::{CartsServiceError, MockCartsService};

    use crate::test_helpers::{TEST_OWNER_UUID, carts_service, make_cart};

    use super::*;

    fn make_service(repo: MockCartsService) -> Service {
        carts_service(repo, Router::with_path("cart/lines/{line}").delete(handler))
    }

    #[tokio::test]
    async fn test_remove_line_returns_cart() -> TestResult {
        let mut repo = MockCartsService::new();
        let line = Uuid::now_v7();
        let cart = make_cart()?;

        repo.expect_remove_item()
            .once()
            .withf(move |owner, l| *owner == TEST_OWNER_UUID && l.into_uuid() == line)
            .return_once(move |_, _| Ok(cart));

        let res = TestClient::delete(format!("http://example.com/cart/lines/{line}"))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_foreign_line_returns_404() -> TestResult {
        let mut repo = MockCartsService::new();

        repo.expect_remove_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::LineNotFound));

        let res = TestClient::delete(format!("http://example.com/cart/lines/{}", Uuid::now_v7()))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
