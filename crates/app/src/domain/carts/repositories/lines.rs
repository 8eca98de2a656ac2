//! Cart Lines Repository

use jiff::civil::Date;
use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    domain::{
        carts::records::{CartLineRecord, CartLineUuid, CartUuid},
        catalog::records::{CatalogItemUuid, PricingSnapshot},
    },
    money::{to_minor_i64, to_quantity_i32, try_get_amount, try_get_percent, try_get_quantity},
};

const GET_CART_LINES_SQL: &str = include_str!("../sql/get_cart_lines.sql");
const INCREMENT_CART_LINE_SQL: &str = include_str!("../sql/increment_cart_line.sql");
const CREATE_CART_LINE_SQL: &str = include_str!("../sql/create_cart_line.sql");
const UPDATE_CART_LINE_SQL: &str = include_str!("../sql/update_cart_line.sql");
const DELETE_CART_LINE_SQL: &str = include_str!("../sql/delete_cart_line.sql");
const CART_LINE_EXISTS_SQL: &str = include_str!("../sql/cart_line_exists.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartLinesRepository;

impl PgCartLinesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Lines of a cart in insertion order, with availability evaluated on `on_date`.
    pub(crate) async fn get_cart_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        on_date: Date,
    ) -> Result<Vec<CartLineRecord>, sqlx::Error> {
        query_as::<Postgres, CartLineRecord>(GET_CART_LINES_SQL)
            .bind(cart.into_uuid())
            .bind(SqlxDate::from(on_date))
            .fetch_all(&mut **tx)
            .await
    }

    /// Add to the quantity of an existing line, leaving its captured price untouched.
    pub(crate) async fn increment_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        item: CatalogItemUuid,
        quantity: u32,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(INCREMENT_CART_LINE_SQL)
            .bind(cart.into_uuid())
            .bind(item.into_uuid())
            .bind(to_quantity_i32(quantity, "quantity")?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Insert a line priced from `pricing`. A concurrent insert of the same item
    /// collapses into one line with the quantities summed.
    pub(crate) async fn create_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        pricing: &PricingSnapshot,
        quantity: u32,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_CART_LINE_SQL)
            .bind(CartLineUuid::new().into_uuid())
            .bind(cart.into_uuid())
            .bind(pricing.catalog_item_uuid.into_uuid())
            .bind(to_quantity_i32(quantity, "quantity")?)
            .bind(to_minor_i64(pricing.unit_price, "unit_price")?)
            .bind(pricing.discount_percent.as_decimal())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn update_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        line: CartLineUuid,
        quantity: u32,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_CART_LINE_SQL)
            .bind(cart.into_uuid())
            .bind(line.into_uuid())
            .bind(to_quantity_i32(quantity, "quantity")?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        line: CartLineUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_LINE_SQL)
            .bind(cart.into_uuid())
            .bind(line.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Whether a line with this id exists in any cart.
    pub(crate) async fn line_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        line: CartLineUuid,
    ) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(CART_LINE_EXISTS_SQL)
            .bind(line.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for CartLineRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartLineUuid::from_uuid(row.try_get("uuid")?),
            cart_uuid: CartUuid::from_uuid(row.try_get("cart_uuid")?),
            catalog_item_uuid: CatalogItemUuid::from_uuid(row.try_get("catalog_item_uuid")?),
            name: row.try_get("name")?,
            image_url: row.try_get("image_url")?,
            in_stock: row.try_get("in_stock")?,
            quantity: try_get_quantity(row, "quantity")?,
            unit_price: try_get_amount(row, "unit_price")?,
            discount_percent: try_get_percent(row, "discount_percent")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
