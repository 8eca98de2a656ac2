//! Catalog Data

use jiff::civil::Date;

use crate::{
    domain::catalog::records::{CatalogItemUuid, LotUuid},
    money::DiscountPercent,
};

/// New Catalog Item Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCatalogItem {
    pub uuid: CatalogItemUuid,
    pub name: String,
    pub image_url: Option<String>,
}

/// New Inventory Lot Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewLot {
    pub uuid: LotUuid,
    pub catalog_item_uuid: CatalogItemUuid,
    pub batch_number: String,
    pub expiry_date: Date,
    pub quantity_available: u32,
    pub unit_price: u64,
    pub discount_percent: DiscountPercent,
}

/// Inventory Lot Update Data
#[derive(Debug, Clone, PartialEq)]
pub struct LotUpdate {
    pub quantity_available: u32,
    pub unit_price: u64,
    pub discount_percent: DiscountPercent,
}
