//! Checkout Read Model
//!
//! The joined cart, cart line and catalog view that checkout reads, plus retiring the
//! cart once its order is written.

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    domain::{
        carts::records::CartUuid, catalog::records::CatalogItemUuid,
        patients::records::PatientUuid,
    },
    money::{DiscountPercent, try_get_amount, try_get_percent, try_get_quantity},
};

const LOCK_CART_SQL: &str = include_str!("../sql/lock_cart.sql");
const GET_CHECKOUT_LINES_SQL: &str = include_str!("../sql/get_checkout_lines.sql");
const RETIRE_CART_SQL: &str = include_str!("../sql/retire_cart.sql");

/// A cart line as checkout sees it, with the captured price.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CheckoutLine {
    pub catalog_item_uuid: CatalogItemUuid,
    pub name: String,
    pub image_url: Option<String>,
    pub quantity: u32,
    pub unit_price: u64,
    pub discount_percent: DiscountPercent,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCheckoutRepository;

impl PgCheckoutRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Lock the patient's cart row until the transaction ends.
    ///
    /// A concurrent checkout of the same cart waits here and, once the first commits,
    /// finds no cart.
    pub(crate) async fn lock_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        patient: PatientUuid,
    ) -> Result<Option<CartUuid>, sqlx::Error> {
        let cart: Option<Uuid> = query_scalar(LOCK_CART_SQL)
            .bind(patient.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        Ok(cart.map(CartUuid::from_uuid))
    }

    pub(crate) async fn get_checkout_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Vec<CheckoutLine>, sqlx::Error> {
        query_as::<Postgres, CheckoutLine>(GET_CHECKOUT_LINES_SQL)
            .bind(cart.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Delete the cart; its lines go with it.
    pub(crate) async fn retire_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(RETIRE_CART_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CheckoutLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            catalog_item_uuid: CatalogItemUuid::from_uuid(row.try_get("catalog_item_uuid")?),
            name: row.try_get("name")?,
            image_url: row.try_get("image_url")?,
            quantity: try_get_quantity(row, "quantity")?,
            unit_price: try_get_amount(row, "unit_price")?,
            discount_percent: try_get_percent(row, "discount_percent")?,
        })
    }
}
