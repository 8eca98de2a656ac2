//! Test Helpers

use jiff::civil::Date;
use testresult::TestResult;

use crate::{
    domain::catalog::{
        CatalogService,
        data::NewLot,
        records::{CatalogItemUuid, LotRecord, LotUuid},
    },
    test::TestContext,
};

/// Receive a lot of `item` expiring on `expiry_date`.
pub(crate) async fn create_lot(
    ctx: &TestContext,
    item: CatalogItemUuid,
    expiry_date: Date,
    quantity_available: u32,
    unit_price: u64,
    discount_percent: &str,
) -> TestResult<LotRecord> {
    let lot = ctx
        .catalog
        .create_lot(NewLot {
            uuid: LotUuid::new(),
            catalog_item_uuid: item,
            batch_number: format!("B-{}", LotUuid::new()),
            expiry_date,
            quantity_available,
            unit_price,
            discount_percent: discount_percent.parse()?,
        })
        .await?;

    Ok(lot)
}
