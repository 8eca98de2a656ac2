//! Catalog Repository

use jiff::civil::Date;
use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    domain::catalog::{
        data::{LotUpdate, NewCatalogItem, NewLot},
        records::{CatalogItemRecord, CatalogItemUuid, LotRecord, LotUuid, PricingSnapshot},
    },
    money::{
        DiscountPercent, to_minor_i64, to_quantity_i32, try_get_amount, try_get_percent,
        try_get_quantity,
    },
};

const CREATE_ITEM_SQL: &str = include_str!("sql/create_item.sql");
const GET_ITEM_SQL: &str = include_str!("sql/get_item.sql");
const CREATE_LOT_SQL: &str = include_str!("sql/create_lot.sql");
const UPDATE_LOT_SQL: &str = include_str!("sql/update_lot.sql");
const RESOLVE_PRICING_SQL: &str = include_str!("sql/resolve_pricing.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: &NewCatalogItem,
    ) -> Result<CatalogItemRecord, sqlx::Error> {
        query_as::<Postgres, CatalogItemRecord>(CREATE_ITEM_SQL)
            .bind(item.uuid.into_uuid())
            .bind(&item.name)
            .bind(item.image_url.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: CatalogItemUuid,
    ) -> Result<CatalogItemRecord, sqlx::Error> {
        query_as::<Postgres, CatalogItemRecord>(GET_ITEM_SQL)
            .bind(item.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_lot(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        lot: &NewLot,
    ) -> Result<LotRecord, sqlx::Error> {
        query_as::<Postgres, LotRecord>(CREATE_LOT_SQL)
            .bind(lot.uuid.into_uuid())
            .bind(lot.catalog_item_uuid.into_uuid())
            .bind(&lot.batch_number)
            .bind(SqlxDate::from(lot.expiry_date))
            .bind(to_quantity_i32(lot.quantity_available, "quantity_available")?)
            .bind(to_minor_i64(lot.unit_price, "unit_price")?)
            .bind(lot.discount_percent.as_decimal())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_lot(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        lot: LotUuid,
        update: &LotUpdate,
    ) -> Result<LotRecord, sqlx::Error> {
        query_as::<Postgres, LotRecord>(UPDATE_LOT_SQL)
            .bind(lot.into_uuid())
            .bind(to_quantity_i32(update.quantity_available, "quantity_available")?)
            .bind(to_minor_i64(update.unit_price, "unit_price")?)
            .bind(update.discount_percent.as_decimal())
            .fetch_one(&mut **tx)
            .await
    }

    /// Resolve the price and availability of an item on `on_date`.
    ///
    /// Returns `None` when the item is unknown or deleted.
    pub(crate) async fn resolve_pricing(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: CatalogItemUuid,
        on_date: Date,
    ) -> Result<Option<PricingSnapshot>, sqlx::Error> {
        query_as::<Postgres, PricingSnapshot>(RESOLVE_PRICING_SQL)
            .bind(item.into_uuid())
            .bind(SqlxDate::from(on_date))
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for CatalogItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CatalogItemUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            image_url: row.try_get("image_url")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for LotRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: LotUuid::from_uuid(row.try_get("uuid")?),
            catalog_item_uuid: CatalogItemUuid::from_uuid(row.try_get("catalog_item_uuid")?),
            batch_number: row.try_get("batch_number")?,
            expiry_date: row.try_get::<SqlxDate, _>("expiry_date")?.to_jiff(),
            quantity_available: try_get_quantity(row, "quantity_available")?,
            unit_price: try_get_amount(row, "unit_price")?,
            discount_percent: try_get_percent(row, "discount_percent")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for PricingSnapshot {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let unit_price = row
            .try_get::<Option<i64>, _>("unit_price")?
            .map(u64::try_from)
            .transpose()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "unit_price".to_string(),
                source: Box::new(e),
            })?;

        let discount_percent = row
            .try_get::<Option<Decimal>, _>("discount_percent")?
            .map(DiscountPercent::new)
            .transpose()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "discount_percent".to_string(),
                source: Box::new(e),
            })?;

        let available_quantity = try_get_amount(row, "available_quantity")?;

        let in_stock = unit_price.is_some() && available_quantity > 0;

        Ok(Self {
            catalog_item_uuid: CatalogItemUuid::from_uuid(row.try_get("catalog_item_uuid")?),
            unit_price: unit_price.unwrap_or_default(),
            discount_percent: discount_percent.unwrap_or_default(),
            available_quantity,
            in_stock,
        })
    }
}
