//! Clear Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Clear Cart Handler
///
/// Deletes the caller's cart and every line in it. Clearing an absent cart succeeds.
#[endpoint(
    tags("cart"),
    summary = "Clear Cart",
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Cart cleared"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing caller identity"),
        (status_code = StatusCode::NOT_FOUND, description = "Patient profile not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "cart.clear",
    skip(depot),
    fields(owner_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.owner_uuid_or_401()?;

    tracing::Span::current().record("owner_uuid", tracing::field::display(owner));

    state
        .app
        .carts
        .clear(owner)
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use apothecary_app::domain::carts::{CartsServiceError, MockCartsService};

    use crate::test_helpers::{TEST_OWNER_UUID, carts_service};

    use super::*;

    fn make_service(repo: MockCartsService) -> Service {
        carts_service(repo, Router::with_path("cart").delete(handler))
    }

    #[tokio::test]
    async fn test_clear_returns_204() -> TestResult {
        let mut repo = MockCartsService::new();

        repo.expect_clear()
            .once()
            .withf(|owner| *owner == TEST_OWNER_UUID)
            .return_once(|_| Ok(()));

        repo.expect_get_cart().never();

        let res = TestClient::delete("http://example.com/cart")
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }

    #[tokio::test]
    async fn test_clear_without_profile_returns_404() -> TestResult {
        let mut repo = MockCartsService::new();

        repo.expect_clear()
            .once()
            .return_once(|_| Err(CartsServiceError::ProfileNotFound));

        let res = TestClient::delete("http://example.com/cart")
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
