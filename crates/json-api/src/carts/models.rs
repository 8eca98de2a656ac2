//! Cart Response Models

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use apothecary_app::domain::carts::models::{CartLineView, CartView};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub uuid: Uuid,

    /// The patient the cart belongs to
    pub patient_uuid: Uuid,

    /// The lines in the cart
    pub lines: Vec<CartLineResponse>,

    /// Sum of line gross amounts, in minor units
    pub subtotal: u64,

    /// Sum of line discounts, in minor units
    pub total_discount: u64,

    /// Amount payable, in minor units
    pub total: u64,

    /// Number of distinct lines
    pub item_count: usize,

    /// The date and time the cart was created
    pub created_at: String,

    /// The date and time the cart was last updated
    pub updated_at: String,
}

impl From<CartView> for CartResponse {
    fn from(cart: CartView) -> Self {
        Self {
            uuid: cart.uuid.into(),
            patient_uuid: cart.patient_uuid.into(),
            lines: cart.lines.into_iter().map(CartLineResponse::from).collect(),
            subtotal: cart.subtotal,
            total_discount: cart.total_discount,
            total: cart.total,
            item_count: cart.item_count,
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// Cart Line Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartLineResponse {
    /// The unique identifier of the cart line
    pub uuid: Uuid,

    /// The catalog item on this line
    pub catalog_item_uuid: Uuid,

    /// Item display name
    pub name: String,

    /// Item image
    pub image_url: Option<String>,

    /// Whether the item can currently be bought
    pub in_stock: bool,

    pub quantity: u32,

    /// Unit price captured when the line was created, in minor units
    pub unit_price: u64,

    /// Discount percent captured when the line was created
    pub discount_percent: String,

    /// `unitPrice × quantity`
    pub gross: u64,

    pub discount: u64,

    /// `gross − discount`
    pub total: u64,
}

impl From<CartLineView> for CartLineResponse {
    fn from(line: CartLineView) -> Self {
        Self {
            uuid: line.uuid.into(),
            catalog_item_uuid: line.catalog_item_uuid.into(),
            name: line.name,
            image_url: line.image_url,
            in_stock: line.in_stock,
            quantity: line.quantity,
            unit_price: line.unit_price,
            discount_percent: line.discount_percent.to_string(),
            gross: line.amounts.gross,
            discount: line.amounts.discount,
            total: line.amounts.total,
        }
    }
}
