//! Cart Records

use jiff::Timestamp;

use crate::{
    domain::{catalog::records::CatalogItemUuid, patients::records::PatientUuid},
    money::DiscountPercent,
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart Record
#[derive(Debug, Clone, PartialEq)]
pub struct CartRecord {
    pub uuid: CartUuid,
    pub patient_uuid: PatientUuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Cart Line UUID
pub type CartLineUuid = TypedUuid<CartLineRecord>;

/// Cart Line Record
///
/// A line joined with the display metadata of its catalog item and the item's current
/// availability. `unit_price` and `discount_percent` are the values captured when the
/// line was first added.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineRecord {
    pub uuid: CartLineUuid,
    pub cart_uuid: CartUuid,
    pub catalog_item_uuid: CatalogItemUuid,
    pub name: String,
    pub image_url: Option<String>,
    pub in_stock: bool,
    pub quantity: u32,
    pub unit_price: u64,
    pub discount_percent: DiscountPercent,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
