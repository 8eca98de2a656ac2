//! Cart Data

use crate::domain::catalog::records::CatalogItemUuid;

/// New Cart Line Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartLine {
    pub catalog_item_uuid: CatalogItemUuid,
    pub quantity: u32,
}
