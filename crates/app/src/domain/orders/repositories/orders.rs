//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, types::Json,
};

use crate::{
    domain::{
        orders::{
            data::ShippingAddress,
            numbers::OrderNumber,
            records::{OrderRecord, OrderStatus, OrderUuid, PaymentStatus},
        },
        patients::records::PatientUuid,
    },
    money::{OrderTotals, to_minor_i64, try_get_amount},
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("../sql/list_orders.sql");

/// Name of the unique constraint on `orders.order_number`.
const ORDER_NUMBER_CONSTRAINT: &str = "orders_order_number_key";

/// Order header as written at checkout.
#[derive(Debug, Clone)]
pub(crate) struct NewOrder<'a> {
    pub uuid: OrderUuid,
    pub order_number: &'a OrderNumber,
    pub patient_uuid: PatientUuid,
    pub payment_method: Option<&'a str>,
    pub totals: OrderTotals,
    pub shipping_address: &'a ShippingAddress,
}

/// Whether `error` is a collision on the order number.
pub(crate) fn is_order_number_conflict(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .and_then(|e| e.constraint())
        .is_some_and(|constraint| constraint == ORDER_NUMBER_CONSTRAINT)
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder<'_>,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.order_number.as_str())
            .bind(order.patient_uuid.into_uuid())
            .bind(OrderStatus::Pending.as_str())
            .bind(PaymentStatus::Pending.as_str())
            .bind(order.payment_method)
            .bind(to_minor_i64(order.totals.subtotal, "subtotal")?)
            .bind(to_minor_i64(order.totals.discount_amount, "discount_amount")?)
            .bind(to_minor_i64(order.totals.tax_amount, "tax_amount")?)
            .bind(to_minor_i64(order.totals.shipping_charges, "shipping_charges")?)
            .bind(to_minor_i64(order.totals.total_amount, "total_amount")?)
            .bind(Json(order.shipping_address))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Orders of a patient, most recent first.
    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        patient: PatientUuid,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(patient.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

fn decode_error<E>(col: &str, error: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(error),
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let order_number: String = row.try_get("order_number")?;
        let status: String = row.try_get("status")?;
        let payment_status: String = row.try_get("payment_status")?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            order_number: order_number
                .parse()
                .map_err(|e| decode_error("order_number", e))?,
            patient_uuid: PatientUuid::from_uuid(row.try_get("patient_uuid")?),
            status: status.parse().map_err(|e| decode_error("status", e))?,
            payment_status: payment_status
                .parse()
                .map_err(|e| decode_error("payment_status", e))?,
            payment_method: row.try_get("payment_method")?,
            payment_transaction_id: row.try_get("payment_transaction_id")?,
            subtotal: try_get_amount(row, "subtotal")?,
            discount_amount: try_get_amount(row, "discount_amount")?,
            tax_amount: try_get_amount(row, "tax_amount")?,
            shipping_charges: try_get_amount(row, "shipping_charges")?,
            total_amount: try_get_amount(row, "total_amount")?,
            shipping_address: row
                .try_get::<Json<ShippingAddress>, _>("shipping_address")?
                .0,
            verified_by: row.try_get("verified_by")?,
            verified_at: row
                .try_get::<Option<SqlxTimestamp>, _>("verified_at")?
                .map(SqlxTimestamp::to_jiff),
            shipped_at: row
                .try_get::<Option<SqlxTimestamp>, _>("shipped_at")?
                .map(SqlxTimestamp::to_jiff),
            delivered_at: row
                .try_get::<Option<SqlxTimestamp>, _>("delivered_at")?
                .map(SqlxTimestamp::to_jiff),
            tracking_number: row.try_get("tracking_number")?,
            courier_name: row.try_get("courier_name")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
