//! Catalog Records

use jiff::{Timestamp, civil::Date};

use crate::{money::DiscountPercent, uuids::TypedUuid};

/// Catalog Item UUID
pub type CatalogItemUuid = TypedUuid<CatalogItemRecord>;

/// Catalog Item Record
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItemRecord {
    pub uuid: CatalogItemUuid,
    pub name: String,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Inventory Lot UUID
pub type LotUuid = TypedUuid<LotRecord>;

/// Inventory Lot Record
#[derive(Debug, Clone, PartialEq)]
pub struct LotRecord {
    pub uuid: LotUuid,
    pub catalog_item_uuid: CatalogItemUuid,
    pub batch_number: String,
    pub expiry_date: Date,
    pub quantity_available: u32,
    pub unit_price: u64,
    pub discount_percent: DiscountPercent,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Price and availability of a catalog item on a given day.
///
/// The price is taken from the cheapest non-expired lot that still has stock; with no
/// such lot the price and discount are zero and the item is out of stock.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingSnapshot {
    pub catalog_item_uuid: CatalogItemUuid,
    pub unit_price: u64,
    pub discount_percent: DiscountPercent,
    pub available_quantity: u64,
    pub in_stock: bool,
}
