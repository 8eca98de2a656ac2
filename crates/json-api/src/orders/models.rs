//! Order Request and Response Models

use std::string::ToString;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use apothecary_app::domain::orders::{
    data::ShippingAddress,
    models::OrderView,
    records::{OrderLineRecord, OrderRecord},
};

/// Shipping Address
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ShippingAddressBody {
    pub address_line1: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,

    pub city: String,

    pub state: String,

    pub postal_code: String,

    pub country: String,
}

impl From<ShippingAddressBody> for ShippingAddress {
    fn from(body: ShippingAddressBody) -> Self {
        Self {
            address_line1: body.address_line1,
            address_line2: body.address_line2,
            city: body.city,
            state: body.state,
            postal_code: body.postal_code,
            country: body.country,
        }
    }
}

impl From<ShippingAddress> for ShippingAddressBody {
    fn from(address: ShippingAddress) -> Self {
        Self {
            address_line1: address.address_line1,
            address_line2: address.address_line2,
            city: address.city,
            state: address.state,
            postal_code: address.postal_code,
            country: address.country,
        }
    }
}

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,

    /// Human-facing order number, `ORD-YYYYMMDD-NNN`
    pub order_number: String,

    pub patient_uuid: Uuid,

    /// Fulfilment status
    pub status: String,

    pub payment_status: String,

    pub payment_method: Option<String>,

    /// Amounts are in minor currency units
    pub subtotal: u64,

    pub discount_amount: u64,

    pub tax_amount: u64,

    pub shipping_charges: u64,

    pub total_amount: u64,

    pub shipping_address: ShippingAddressBody,

    pub tracking_number: Option<String>,

    pub courier_name: Option<String>,

    pub verified_at: Option<String>,

    pub shipped_at: Option<String>,

    pub delivered_at: Option<String>,

    pub created_at: String,

    pub updated_at: String,

    /// Lines in checkout order
    pub lines: Vec<OrderLineResponse>,
}

impl From<OrderView> for OrderResponse {
    fn from(view: OrderView) -> Self {
        let OrderView { order, lines } = view;
        let OrderRecord {
            uuid,
            order_number,
            patient_uuid,
            status,
            payment_status,
            payment_method,
            subtotal,
            discount_amount,
            tax_amount,
            shipping_charges,
            total_amount,
            shipping_address,
            verified_at,
            shipped_at,
            delivered_at,
            tracking_number,
            courier_name,
            created_at,
            updated_at,
            ..
        } = order;

        Self {
            uuid: uuid.into(),
            order_number: order_number.into(),
            patient_uuid: patient_uuid.into(),
            status: status.to_string(),
            payment_status: payment_status.to_string(),
            payment_method,
            subtotal,
            discount_amount,
            tax_amount,
            shipping_charges,
            total_amount,
            shipping_address: shipping_address.into(),
            tracking_number,
            courier_name,
            verified_at: verified_at.as_ref().map(ToString::to_string),
            shipped_at: shipped_at.as_ref().map(ToString::to_string),
            delivered_at: delivered_at.as_ref().map(ToString::to_string),
            created_at: created_at.to_string(),
            updated_at: updated_at.to_string(),
            lines: lines.into_iter().map(OrderLineResponse::from).collect(),
        }
    }
}

/// Order Line Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderLineResponse {
    pub uuid: Uuid,

    pub catalog_item_uuid: Uuid,

    /// Item display name
    pub name: String,

    pub image_url: Option<String>,

    pub quantity: u32,

    /// Unit price frozen at checkout, in minor units
    pub unit_price: u64,

    /// Discount percent frozen at checkout
    pub discount_percent: String,

    /// Amount payable for the line, in minor units
    pub line_total: u64,
}

impl From<OrderLineRecord> for OrderLineResponse {
    fn from(line: OrderLineRecord) -> Self {
        Self {
            uuid: line.uuid.into(),
            catalog_item_uuid: line.catalog_item_uuid.into(),
            name: line.name,
            image_url: line.image_url,
            quantity: line.quantity,
            unit_price: line.unit_price,
            discount_percent: line.discount_percent.to_string(),
            line_total: line.line_total,
        }
    }
}
