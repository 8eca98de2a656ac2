//! Carts service.

use async_trait::async_trait;
use jiff::{Timestamp, civil::Date};
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{Span, info};

use crate::{
    database::Db,
    domain::{
        carts::{
            data::NewCartLine,
            errors::CartsServiceError,
            models::CartView,
            records::{CartLineUuid, CartRecord},
            repositories::{PgCartLinesRepository, PgCartsRepository},
        },
        catalog::repository::PgCatalogRepository,
        patients::{
            records::{OwnerUuid, PatientRecord},
            repository::PgPatientsRepository,
        },
        utc_date,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts: PgCartsRepository,
    lines: PgCartLinesRepository,
    catalog: PgCatalogRepository,
    patients: PgPatientsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts: PgCartsRepository::new(),
            lines: PgCartLinesRepository::new(),
            catalog: PgCatalogRepository::new(),
            patients: PgPatientsRepository::new(),
        }
    }

    async fn patient(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: OwnerUuid,
    ) -> Result<PatientRecord, CartsServiceError> {
        let patient = self
            .patients
            .find_by_owner(tx, owner)
            .await?
            .ok_or(CartsServiceError::ProfileNotFound)?;

        Span::current().record("patient_uuid", tracing::field::display(patient.uuid));

        Ok(patient)
    }

    async fn view(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartRecord,
        today: Date,
    ) -> Result<CartView, CartsServiceError> {
        let lines = self.lines.get_cart_lines(tx, cart.uuid, today).await?;

        Ok(CartView::build(cart, lines)?)
    }
}

fn validate_quantity(quantity: u32) -> Result<u32, CartsServiceError> {
    if quantity == 0 || i32::try_from(quantity).is_err() {
        return Err(CartsServiceError::InvalidQuantity);
    }

    Ok(quantity)
}

#[async_trait]
impl CartsService for PgCartsService {
    #[tracing::instrument(
        name = "carts.service.get_cart",
        skip(self),
        fields(owner_uuid = %owner, patient_uuid = tracing::field::Empty),
        err
    )]
    async fn get_cart(&self, owner: OwnerUuid) -> Result<CartView, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let patient = self.patient(&mut tx, owner).await?;

        let cart = self.carts.get_or_create_cart(&mut tx, patient.uuid).await?;

        let view = self
            .view(&mut tx, cart, utc_date(Timestamp::now()))
            .await?;

        tx.commit().await?;

        Ok(view)
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, line),
        fields(
            owner_uuid = %owner,
            patient_uuid = tracing::field::Empty,
            catalog_item_uuid = %line.catalog_item_uuid,
            quantity = line.quantity,
            new_line = tracing::field::Empty
        ),
        err
    )]
    async fn add_item(
        &self,
        owner: OwnerUuid,
        line: NewCartLine,
    ) -> Result<CartView, CartsServiceError> {
        let quantity = validate_quantity(line.quantity)?;
        let today = utc_date(Timestamp::now());

        let mut tx = self.db.begin_transaction().await?;

        let patient = self.patient(&mut tx, owner).await?;

        let cart = self.carts.get_or_create_cart(&mut tx, patient.uuid).await?;

        let incremented = self
            .lines
            .increment_line(&mut tx, cart.uuid, line.catalog_item_uuid, quantity)
            .await?;

        Span::current().record("new_line", tracing::field::display(incremented == 0));

        if incremented == 0 {
            let pricing = self
                .catalog
                .resolve_pricing(&mut tx, line.catalog_item_uuid, today)
                .await?
                .filter(|pricing| pricing.in_stock)
                .ok_or(CartsServiceError::ItemUnavailable)?;

            self.lines
                .create_line(&mut tx, cart.uuid, &pricing, quantity)
                .await?;
        }

        let cart = self.carts.touch_cart(&mut tx, cart.uuid).await?;

        let view = self.view(&mut tx, cart, today).await?;

        tx.commit().await?;

        Ok(view)
    }

    #[tracing::instrument(
        name = "carts.service.update_item",
        skip(self),
        fields(
            owner_uuid = %owner,
            patient_uuid = tracing::field::Empty,
            cart_line_uuid = %line
        ),
        err
    )]
    async fn update_item(
        &self,
        owner: OwnerUuid,
        line: CartLineUuid,
        quantity: u32,
    ) -> Result<CartView, CartsServiceError> {
        let quantity = validate_quantity(quantity)?;

        let mut tx = self.db.begin_transaction().await?;

        let patient = self.patient(&mut tx, owner).await?;

        let cart = self
            .carts
            .lock_cart(&mut tx, patient.uuid)
            .await?
            .ok_or(CartsServiceError::LineNotFound)?;

        let rows_affected = self
            .lines
            .update_line(&mut tx, cart.uuid, line, quantity)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::LineNotFound);
        }

        let cart = self.carts.touch_cart(&mut tx, cart.uuid).await?;

        let view = self
            .view(&mut tx, cart, utc_date(Timestamp::now()))
            .await?;

        tx.commit().await?;

        Ok(view)
    }

    #[tracing::instrument(
        name = "carts.service.remove_item",
        skip(self),
        fields(
            owner_uuid = %owner,
            patient_uuid = tracing::field::Empty,
            cart_line_uuid = %line
        ),
        err
    )]
    async fn remove_item(
        &self,
        owner: OwnerUuid,
        line: CartLineUuid,
    ) -> Result<CartView, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let patient = self.patient(&mut tx, owner).await?;

        let cart = self.carts.get_or_create_cart(&mut tx, patient.uuid).await?;

        let rows_affected = self.lines.delete_line(&mut tx, cart.uuid, line).await?;

        let cart = if rows_affected == 0 {
            // Someone else's line is not ours to remove; an unknown id is already gone.
            if self.lines.line_exists(&mut tx, line).await? {
                return Err(CartsServiceError::LineNotFound);
            }

            cart
        } else {
            self.carts.touch_cart(&mut tx, cart.uuid).await?
        };

        let view = self
            .view(&mut tx, cart, utc_date(Timestamp::now()))
            .await?;

        tx.commit().await?;

        Ok(view)
    }

    #[tracing::instrument(
        name = "carts.service.clear",
        skip(self),
        fields(owner_uuid = %owner, patient_uuid = tracing::field::Empty),
        err
    )]
    async fn clear(&self, owner: OwnerUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let patient = self.patient(&mut tx, owner).await?;

        let rows_affected = self.carts.delete_cart(&mut tx, patient.uuid).await?;

        tx.commit().await?;

        if rows_affected > 0 {
            info!(patient_uuid = %patient.uuid, "cleared cart");
        }

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the owner's cart, creating an empty one on first access.
    async fn get_cart(&self, owner: OwnerUuid) -> Result<CartView, CartsServiceError>;

    /// Add a catalog item to the owner's cart.
    ///
    /// Adding an item that already has a line increases that line's quantity and keeps
    /// the price captured when the line was created.
    async fn add_item(
        &self,
        owner: OwnerUuid,
        line: NewCartLine,
    ) -> Result<CartView, CartsServiceError>;

    /// Set the quantity of one of the owner's cart lines.
    async fn update_item(
        &self,
        owner: OwnerUuid,
        line: CartLineUuid,
        quantity: u32,
    ) -> Result<CartView, CartsServiceError>;

    /// Remove a line from the owner's cart.
    async fn remove_item(
        &self,
        owner: OwnerUuid,
        line: CartLineUuid,
    ) -> Result<CartView, CartsServiceError>;

    /// Delete the owner's cart and all of its lines.
    async fn clear(&self, owner: OwnerUuid) -> Result<(), CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use jiff::civil::date;
    use testresult::TestResult;
    use tokio::task::JoinSet;

    use crate::{
        domain::{
            catalog::{CatalogService, data::LotUpdate, records::CatalogItemUuid},
            patients::records::OwnerUuid,
        },
        money::DiscountPercent,
        test::{TestContext, helpers::create_lot},
    };

    use super::*;

    #[tokio::test]
    async fn get_cart_creates_empty_cart() -> TestResult {
        let ctx = TestContext::new().await;

        let cart = ctx.carts.get_cart(ctx.owner).await?;

        assert_eq!(cart.patient_uuid, ctx.patient.uuid);
        assert!(cart.lines.is_empty());
        assert_eq!(cart.subtotal, 0);
        assert_eq!(cart.total_discount, 0);
        assert_eq!(cart.total, 0);
        assert_eq!(cart.item_count, 0);

        let again = ctx.carts.get_cart(ctx.owner).await?;

        assert_eq!(again.uuid, cart.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn get_cart_without_profile_returns_profile_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.carts.get_cart(OwnerUuid::new()).await;

        assert!(
            matches!(result, Err(CartsServiceError::ProfileNotFound)),
            "expected ProfileNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn add_item_captures_price_and_totals_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let x = ctx.stock_item("Vitamin C", 1000, "10").await?;
        let y = ctx.stock_item("Zinc", 500, "0").await?;

        ctx.carts
            .add_item(
                ctx.owner,
                NewCartLine {
                    catalog_item_uuid: x,
                    quantity: 2,
                },
            )
            .await?;

        let cart = ctx
            .carts
            .add_item(
                ctx.owner,
                NewCartLine {
                    catalog_item_uuid: y,
                    quantity: 1,
                },
            )
            .await?;

        assert_eq!(cart.item_count, 2);
        assert_eq!(cart.subtotal, 2500);
        assert_eq!(cart.total_discount, 200);
        assert_eq!(cart.total, 2300);

        let line = cart
            .lines
            .iter()
            .find(|line| line.catalog_item_uuid == x)
            .ok_or("missing line for X")?;

        assert_eq!(line.name, "Vitamin C");
        assert_eq!(line.unit_price, 1000);
        assert_eq!(line.discount_percent, "10".parse::<DiscountPercent>()?);
        assert_eq!(line.amounts.total, 1800);
        assert!(line.in_stock);

        Ok(())
    }

    #[tokio::test]
    async fn adding_same_item_twice_sums_quantity_and_keeps_price() -> TestResult {
        let ctx = TestContext::new().await;
        let item = ctx.create_item("Aspirin").await?;
        let lot = create_lot(&ctx, item, date(2099, 1, 1), 50, 400, "0").await?;

        ctx.carts
            .add_item(
                ctx.owner,
                NewCartLine {
                    catalog_item_uuid: item,
                    quantity: 1,
                },
            )
            .await?;

        ctx.catalog
            .update_lot(
                lot.uuid,
                LotUpdate {
                    quantity_available: 50,
                    unit_price: 999,
                    discount_percent: DiscountPercent::ZERO,
                },
            )
            .await?;

        let cart = ctx
            .carts
            .add_item(
                ctx.owner,
                NewCartLine {
                    catalog_item_uuid: item,
                    quantity: 3,
                },
            )
            .await?;

        assert_eq!(cart.lines.len(), 1);

        let line = cart.lines.first().ok_or("missing line")?;

        assert_eq!(line.quantity, 4);
        assert_eq!(line.unit_price, 400);
        assert_eq!(cart.subtotal, 1600);

        Ok(())
    }

    #[tokio::test]
    async fn add_unknown_item_returns_item_unavailable() {
        let ctx = TestContext::new().await;

        let result = ctx
            .carts
            .add_item(
                ctx.owner,
                NewCartLine {
                    catalog_item_uuid: CatalogItemUuid::new(),
                    quantity: 1,
                },
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ItemUnavailable)),
            "expected ItemUnavailable, got {result:?}"
        );
    }

    #[tokio::test]
    async fn add_out_of_stock_item_returns_item_unavailable() -> TestResult {
        let ctx = TestContext::new().await;
        let item = ctx.create_item("Expired Syrup").await?;

        create_lot(&ctx, item, date(2020, 1, 1), 10, 300, "0").await?;

        let result = ctx
            .carts
            .add_item(
                ctx.owner,
                NewCartLine {
                    catalog_item_uuid: item,
                    quantity: 1,
                },
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ItemUnavailable)),
            "expected ItemUnavailable, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_zero_quantity_returns_invalid_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let item = ctx.stock_item("Plasters", 150, "0").await?;

        let result = ctx
            .carts
            .add_item(
                ctx.owner,
                NewCartLine {
                    catalog_item_uuid: item,
                    quantity: 0,
                },
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_past_line_capacity_returns_invalid_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let item = ctx.stock_item("Cotton Buds", 1, "0").await?;

        let line = NewCartLine {
            catalog_item_uuid: item,
            quantity: 2_000_000_000,
        };

        ctx.carts.add_item(ctx.owner, line.clone()).await?;

        let result = ctx.carts.add_item(ctx.owner, line).await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );

        let cart = ctx.carts.get_cart(ctx.owner).await?;

        assert_eq!(cart.lines.first().map(|l| l.quantity), Some(2_000_000_000));

        Ok(())
    }

    #[tokio::test]
    async fn update_item_sets_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let item = ctx.stock_item("Antacid", 250, "0").await?;

        let cart = ctx
            .carts
            .add_item(
                ctx.owner,
                NewCartLine {
                    catalog_item_uuid: item,
                    quantity: 1,
                },
            )
            .await?;

        let line = cart.lines.first().ok_or("missing line")?.uuid;

        let cart = ctx.carts.update_item(ctx.owner, line, 5).await?;

        assert_eq!(cart.lines.first().map(|l| l.quantity), Some(5));
        assert_eq!(cart.subtotal, 1250);

        let result = ctx.carts.update_item(ctx.owner, line, 0).await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_item_in_other_owners_cart_returns_line_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let other = ctx.create_owner("Other Patient").await?;
        let item = ctx.stock_item("Antacid", 250, "0").await?;

        let cart = ctx
            .carts
            .add_item(
                other,
                NewCartLine {
                    catalog_item_uuid: item,
                    quantity: 1,
                },
            )
            .await?;

        let line = cart.lines.first().ok_or("missing line")?.uuid;

        ctx.carts.get_cart(ctx.owner).await?;

        let result = ctx.carts.update_item(ctx.owner, line, 3).await;

        assert!(
            matches!(result, Err(CartsServiceError::LineNotFound)),
            "expected LineNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn remove_item_drops_line() -> TestResult {
        let ctx = TestContext::new().await;
        let item = ctx.stock_item("Nasal Spray", 700, "0").await?;

        let cart = ctx
            .carts
            .add_item(
                ctx.owner,
                NewCartLine {
                    catalog_item_uuid: item,
                    quantity: 2,
                },
            )
            .await?;

        let line = cart.lines.first().ok_or("missing line")?.uuid;

        let cart = ctx.carts.remove_item(ctx.owner, line).await?;

        assert!(cart.lines.is_empty());
        assert_eq!(cart.total, 0);

        Ok(())
    }

    #[tokio::test]
    async fn remove_unknown_line_is_a_no_op() -> TestResult {
        let ctx = TestContext::new().await;

        let cart = ctx.carts.remove_item(ctx.owner, CartLineUuid::new()).await?;

        assert!(cart.lines.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn remove_other_owners_line_returns_line_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let other = ctx.create_owner("Other Patient").await?;
        let item = ctx.stock_item("Eye Drops", 450, "0").await?;

        let cart = ctx
            .carts
            .add_item(
                other,
                NewCartLine {
                    catalog_item_uuid: item,
                    quantity: 1,
                },
            )
            .await?;

        let line = cart.lines.first().ok_or("missing line")?.uuid;

        let result = ctx.carts.remove_item(ctx.owner, line).await;

        assert!(
            matches!(result, Err(CartsServiceError::LineNotFound)),
            "expected LineNotFound, got {result:?}"
        );

        let other_cart = ctx.carts.get_cart(other).await?;

        assert_eq!(other_cart.lines.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn clear_is_idempotent() -> TestResult {
        let ctx = TestContext::new().await;
        let item = ctx.stock_item("Throat Lozenges", 300, "0").await?;

        ctx.carts
            .add_item(
                ctx.owner,
                NewCartLine {
                    catalog_item_uuid: item,
                    quantity: 1,
                },
            )
            .await?;

        ctx.carts.clear(ctx.owner).await?;
        ctx.carts.clear(ctx.owner).await?;

        let cart = ctx.carts.get_cart(ctx.owner).await?;

        assert!(cart.lines.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn line_reports_live_stock() -> TestResult {
        let ctx = TestContext::new().await;
        let item = ctx.create_item("Cough Syrup").await?;
        let lot = create_lot(&ctx, item, date(2099, 1, 1), 2, 800, "0").await?;

        ctx.carts
            .add_item(
                ctx.owner,
                NewCartLine {
                    catalog_item_uuid: item,
                    quantity: 1,
                },
            )
            .await?;

        ctx.catalog
            .update_lot(
                lot.uuid,
                LotUpdate {
                    quantity_available: 0,
                    unit_price: 800,
                    discount_percent: DiscountPercent::ZERO,
                },
            )
            .await?;

        let cart = ctx.carts.get_cart(ctx.owner).await?;

        assert_eq!(cart.lines.first().map(|l| l.in_stock), Some(false));

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_adds_of_same_item_share_one_line() -> TestResult {
        let ctx = TestContext::new().await;
        let item = ctx.stock_item("Hand Sanitiser", 200, "0").await?;
        let carts = Arc::new(ctx.carts.clone());

        let mut tasks = JoinSet::new();

        for _ in 0..4 {
            let carts = Arc::clone(&carts);
            let owner = ctx.owner;

            tasks.spawn(async move {
                carts
                    .add_item(
                        owner,
                        NewCartLine {
                            catalog_item_uuid: item,
                            quantity: 1,
                        },
                    )
                    .await
            });
        }

        while let Some(result) = tasks.join_next().await {
            result??;
        }

        let cart = ctx.carts.get_cart(ctx.owner).await?;

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines.first().map(|l| l.quantity), Some(4));

        Ok(())
    }
}
