//! App Router

use salvo::Router;

use crate::{carts, identity, orders};

/// Routes that act on behalf of the calling patient.
pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(identity::handler)
        .push(
            Router::with_path("cart")
                .get(carts::get::handler)
                .delete(carts::clear::handler)
                .push(
                    Router::with_path("lines")
                        .post(carts::lines::create::handler)
                        .push(
                            Router::with_path("{line}")
                                .put(carts::lines::update::handler)
                                .delete(carts::lines::delete::handler),
                        ),
                ),
        )
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(Router::with_path("{order}").get(orders::get::handler)),
        )
}
