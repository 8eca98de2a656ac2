//! Add Cart Line Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use apothecary_app::domain::carts::data::NewCartLine;

use crate::{
    carts::{errors::into_status_error, models::CartResponse},
    extensions::*,
    state::State,
};

/// Add Cart Line Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddCartLineRequest {
    /// Catalog item to add
    pub catalog_item_uuid: Uuid,

    /// Units to add; must be at least 1
    pub quantity: u32,
}

impl From<AddCartLineRequest> for NewCartLine {
    fn from(request: AddCartLineRequest) -> Self {
        NewCartLine {
            catalog_item_uuid: request.catalog_item_uuid.into(),
            quantity: request.quantity,
        }
    }
}

/// Add Cart Line Handler
///
/// Adds an item to the caller's cart. Adding an item already in the cart increases its
/// quantity and keeps the price captured when it was first added.
#[endpoint(
    tags("cart"),
    summary = "Add Item to Cart",
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid quantity"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing caller identity"),
        (status_code = StatusCode::NOT_FOUND, description = "Patient profile not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Item is unavailable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "cart.lines.create",
    skip(json, depot),
    fields(owner_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<AddCartLineRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.owner_uuid_or_401()?;

    tracing::Span::current().record("owner_uuid", tracing::field::display(owner));

    let cart = state
        .app
        .carts
        .add_item(owner, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
