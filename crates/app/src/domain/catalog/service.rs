//! Catalog service.

use async_trait::async_trait;
use jiff::civil::Date;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::catalog::{
        data::{LotUpdate, NewCatalogItem, NewLot},
        errors::CatalogServiceError,
        records::{CatalogItemRecord, CatalogItemUuid, LotRecord, LotUuid, PricingSnapshot},
        repository::PgCatalogRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    #[tracing::instrument(
        name = "catalog.service.get_item",
        skip(self),
        fields(catalog_item_uuid = %item),
        err
    )]
    async fn get_item(
        &self,
        item: CatalogItemUuid,
    ) -> Result<CatalogItemRecord, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.repository.get_item(&mut tx, item).await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(
        name = "catalog.service.create_item",
        skip(self, item),
        fields(catalog_item_uuid = %item.uuid),
        err
    )]
    async fn create_item(
        &self,
        item: NewCatalogItem,
    ) -> Result<CatalogItemRecord, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_item(&mut tx, &item).await?;

        tx.commit().await?;

        info!(catalog_item_uuid = %created.uuid, "created catalog item");

        Ok(created)
    }

    #[tracing::instrument(
        name = "catalog.service.create_lot",
        skip(self, lot),
        fields(catalog_item_uuid = %lot.catalog_item_uuid, lot_uuid = %lot.uuid),
        err
    )]
    async fn create_lot(&self, lot: NewLot) -> Result<LotRecord, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_lot(&mut tx, &lot).await?;

        tx.commit().await?;

        Ok(created)
    }

    #[tracing::instrument(
        name = "catalog.service.update_lot",
        skip(self, update),
        fields(lot_uuid = %lot),
        err
    )]
    async fn update_lot(
        &self,
        lot: LotUuid,
        update: LotUpdate,
    ) -> Result<LotRecord, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let updated = self.repository.update_lot(&mut tx, lot, &update).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn resolve_pricing(
        &self,
        item: CatalogItemUuid,
        on_date: Date,
    ) -> Result<Option<PricingSnapshot>, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let snapshot = self
            .repository
            .resolve_pricing(&mut tx, item, on_date)
            .await?;

        tx.commit().await?;

        Ok(snapshot)
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Retrieve a single, non-deleted catalog item.
    async fn get_item(&self, item: CatalogItemUuid)
    -> Result<CatalogItemRecord, CatalogServiceError>;

    /// Create a catalog item.
    async fn create_item(
        &self,
        item: NewCatalogItem,
    ) -> Result<CatalogItemRecord, CatalogServiceError>;

    /// Receive an inventory lot for an item.
    async fn create_lot(&self, lot: NewLot) -> Result<LotRecord, CatalogServiceError>;

    /// Change the stock level and price of a lot.
    async fn update_lot(
        &self,
        lot: LotUuid,
        update: LotUpdate,
    ) -> Result<LotRecord, CatalogServiceError>;

    /// Resolve the price and availability of an item on a day. `None` when the item
    /// is unknown.
    async fn resolve_pricing(
        &self,
        item: CatalogItemUuid,
        on_date: Date,
    ) -> Result<Option<PricingSnapshot>, CatalogServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use crate::{
        money::DiscountPercent,
        test::{TestContext, helpers::create_lot},
    };

    use super::*;

    const TODAY: Date = date(2026, 3, 10);

    #[tokio::test]
    async fn create_item_then_get_returns_it() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = CatalogItemUuid::new();

        ctx.catalog
            .create_item(NewCatalogItem {
                uuid,
                name: "Paracetamol 500mg".to_string(),
                image_url: Some("https://img.example/para.png".to_string()),
            })
            .await?;

        let item = ctx.catalog.get_item(uuid).await?;

        assert_eq!(item.uuid, uuid);
        assert_eq!(item.name, "Paracetamol 500mg");
        assert!(item.deleted_at.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn get_unknown_item_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.catalog.get_item(CatalogItemUuid::new()).await;

        assert!(
            matches!(result, Err(CatalogServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn create_lot_for_unknown_item_returns_invalid_reference() {
        let ctx = TestContext::new().await;

        let result = ctx
            .catalog
            .create_lot(NewLot {
                uuid: LotUuid::new(),
                catalog_item_uuid: CatalogItemUuid::new(),
                batch_number: "B-1".to_string(),
                expiry_date: date(2027, 1, 1),
                quantity_available: 10,
                unit_price: 100,
                discount_percent: DiscountPercent::ZERO,
            })
            .await;

        assert!(
            matches!(result, Err(CatalogServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );
    }

    #[tokio::test]
    async fn resolve_pricing_unknown_item_returns_none() -> TestResult {
        let ctx = TestContext::new().await;

        let snapshot = ctx
            .catalog
            .resolve_pricing(CatalogItemUuid::new(), TODAY)
            .await?;

        assert!(snapshot.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn resolve_pricing_picks_cheapest_unexpired_lot_with_stock() -> TestResult {
        let ctx = TestContext::new().await;
        let item = ctx.create_item("Ibuprofen 200mg").await?;

        // Expired, cheapest.
        create_lot(&ctx, item, date(2026, 3, 10), 50, 100, "0").await?;
        // Unexpired, but sold out.
        create_lot(&ctx, item, date(2026, 6, 1), 0, 200, "0").await?;
        // Unexpired with stock.
        create_lot(&ctx, item, date(2026, 9, 1), 5, 450, "5").await?;
        create_lot(&ctx, item, date(2026, 7, 1), 7, 300, "12.5").await?;

        let snapshot = ctx
            .catalog
            .resolve_pricing(item, TODAY)
            .await?
            .ok_or("expected a snapshot")?;

        assert_eq!(snapshot.unit_price, 300);
        assert_eq!(snapshot.discount_percent, "12.5".parse::<DiscountPercent>()?);
        assert_eq!(snapshot.available_quantity, 12);
        assert!(snapshot.in_stock);

        Ok(())
    }

    #[tokio::test]
    async fn resolve_pricing_breaks_price_ties_by_earliest_expiry() -> TestResult {
        let ctx = TestContext::new().await;
        let item = ctx.create_item("Cetirizine 10mg").await?;

        create_lot(&ctx, item, date(2026, 12, 1), 3, 250, "0").await?;
        create_lot(&ctx, item, date(2026, 5, 1), 3, 250, "10").await?;

        let snapshot = ctx
            .catalog
            .resolve_pricing(item, TODAY)
            .await?
            .ok_or("expected a snapshot")?;

        assert_eq!(snapshot.discount_percent, "10".parse::<DiscountPercent>()?);

        Ok(())
    }

    #[tokio::test]
    async fn resolve_pricing_without_eligible_lot_is_out_of_stock() -> TestResult {
        let ctx = TestContext::new().await;
        let item = ctx.create_item("Amoxicillin 250mg").await?;

        create_lot(&ctx, item, date(2026, 1, 1), 20, 900, "0").await?;

        let snapshot = ctx
            .catalog
            .resolve_pricing(item, TODAY)
            .await?
            .ok_or("expected a snapshot")?;

        assert_eq!(snapshot.unit_price, 0);
        assert_eq!(snapshot.discount_percent, DiscountPercent::ZERO);
        assert_eq!(snapshot.available_quantity, 0);
        assert!(!snapshot.in_stock);

        Ok(())
    }

    #[tokio::test]
    async fn update_lot_changes_resolved_price() -> TestResult {
        let ctx = TestContext::new().await;
        let item = ctx.create_item("Loratadine 10mg").await?;
        let lot = create_lot(&ctx, item, date(2027, 1, 1), 10, 500, "0").await?;

        ctx.catalog
            .update_lot(
                lot.uuid,
                LotUpdate {
                    quantity_available: 10,
                    unit_price: 650,
                    discount_percent: "20".parse()?,
                },
            )
            .await?;

        let snapshot = ctx
            .catalog
            .resolve_pricing(item, TODAY)
            .await?
            .ok_or("expected a snapshot")?;

        assert_eq!(snapshot.unit_price, 650);
        assert_eq!(snapshot.discount_percent, "20".parse::<DiscountPercent>()?);

        Ok(())
    }
}
