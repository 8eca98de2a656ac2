//! Order Lines Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    domain::{
        catalog::records::CatalogItemUuid,
        orders::records::{OrderLineRecord, OrderLineUuid, OrderUuid},
    },
    money::{to_minor_i64, to_quantity_i32, try_get_amount, try_get_percent, try_get_quantity},
};

const CREATE_ORDER_LINE_SQL: &str = include_str!("../sql/create_order_line.sql");
const GET_ORDER_LINES_SQL: &str = include_str!("../sql/get_order_lines.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderLinesRepository;

impl PgOrderLinesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        line: &OrderLineRecord,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_ORDER_LINE_SQL)
            .bind(line.uuid.into_uuid())
            .bind(line.order_uuid.into_uuid())
            .bind(line.catalog_item_uuid.into_uuid())
            .bind(to_quantity_i32(line.position, "position")?)
            .bind(to_quantity_i32(line.quantity, "quantity")?)
            .bind(to_minor_i64(line.unit_price, "unit_price")?)
            .bind(line.discount_percent.as_decimal())
            .bind(to_minor_i64(line.line_total, "line_total")?)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Lines of every given order, grouped by order and in position order.
    pub(crate) async fn get_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
    ) -> Result<Vec<OrderLineRecord>, sqlx::Error> {
        let orders: Vec<Uuid> = orders.iter().map(|order| order.into_uuid()).collect();

        query_as::<Postgres, OrderLineRecord>(GET_ORDER_LINES_SQL)
            .bind(orders)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderLineRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderLineUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            catalog_item_uuid: CatalogItemUuid::from_uuid(row.try_get("catalog_item_uuid")?),
            name: row.try_get("name")?,
            image_url: row.try_get("image_url")?,
            position: try_get_quantity(row, "position")?,
            quantity: try_get_quantity(row, "quantity")?,
            unit_price: try_get_amount(row, "unit_price")?,
            discount_percent: try_get_percent(row, "discount_percent")?,
            line_total: try_get_amount(row, "line_total")?,
        })
    }
}
