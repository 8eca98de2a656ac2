//! Order Number Allocator

use jiff::civil::Date;
use jiff_sqlx::Date as SqlxDate;
use sqlx::{Postgres, Transaction, query_scalar};

use crate::domain::orders::numbers::OrderNumber;

const ALLOCATE_ORDER_NUMBER_SQL: &str = include_str!("../sql/allocate_order_number.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderNumbersRepository;

impl PgOrderNumbersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Take the next number of `day` from its counter row.
    ///
    /// The counter row stays locked until the surrounding transaction ends, so
    /// concurrent allocators for the same day queue behind each other and a rolled
    /// back checkout gives its number back. The first allocation of a day seeds the
    /// counter from the orders already numbered for it.
    pub(crate) async fn allocate(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        day: Date,
    ) -> Result<OrderNumber, sqlx::Error> {
        let sequence: i32 = query_scalar(ALLOCATE_ORDER_NUMBER_SQL)
            .bind(SqlxDate::from(day))
            .bind(OrderNumber::day_pattern(day))
            .fetch_one(&mut **tx)
            .await?;

        let sequence = u32::try_from(sequence).map_err(|e| sqlx::Error::ColumnDecode {
            index: "last_value".to_string(),
            source: Box::new(e),
        })?;

        OrderNumber::format(day, sequence).map_err(|e| sqlx::Error::ColumnDecode {
            index: "last_value".to_string(),
            source: Box::new(e),
        })
    }
}
