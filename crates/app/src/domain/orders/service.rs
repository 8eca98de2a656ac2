//! Orders service.

use std::collections::HashMap;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Connection, Postgres, Transaction};
use tracing::{Span, info, warn};

use crate::{
    database::Db,
    domain::{
        orders::{
            data::NewCheckout,
            errors::OrdersServiceError,
            models::OrderView,
            records::{OrderLineRecord, OrderLineUuid, OrderRecord, OrderUuid},
            repositories::{
                CheckoutLine, NewOrder, PgCheckoutRepository, PgOrderLinesRepository,
                PgOrderNumbersRepository, PgOrdersRepository, is_order_number_conflict,
            },
        },
        patients::{
            records::{OwnerUuid, PatientRecord},
            repository::PgPatientsRepository,
        },
        utc_date,
    },
    money::{LineAmounts, OrderTotals},
};

/// Attempts at writing an order header before giving up on order number collisions.
pub const MAX_ALLOCATION_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders: PgOrdersRepository,
    lines: PgOrderLinesRepository,
    numbers: PgOrderNumbersRepository,
    checkout: PgCheckoutRepository,
    patients: PgPatientsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            lines: PgOrderLinesRepository::new(),
            numbers: PgOrderNumbersRepository::new(),
            checkout: PgCheckoutRepository::new(),
            patients: PgPatientsRepository::new(),
        }
    }

    async fn patient(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: OwnerUuid,
    ) -> Result<PatientRecord, OrdersServiceError> {
        let patient = self
            .patients
            .find_by_owner(tx, owner)
            .await?
            .ok_or(OrdersServiceError::ProfileNotFound)?;

        Span::current().record("patient_uuid", tracing::field::display(patient.uuid));

        Ok(patient)
    }

    /// Allocate a number and write the order header and lines.
    ///
    /// The writes run in a savepoint so a collision on the order number can be undone
    /// and retried with a fresh number without losing the rest of the transaction.
    async fn write_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        patient: &PatientRecord,
        checkout: &NewCheckout,
        totals: OrderTotals,
        lines: &[(CheckoutLine, LineAmounts)],
    ) -> Result<OrderView, OrdersServiceError> {
        let day = utc_date(Timestamp::now());

        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let order_number = self.numbers.allocate(tx, day).await?;

            let mut savepoint = Connection::begin(&mut **tx).await?;

            let new_order = NewOrder {
                uuid: OrderUuid::new(),
                order_number: &order_number,
                patient_uuid: patient.uuid,
                payment_method: checkout.payment_method.as_deref(),
                totals,
                shipping_address: &checkout.shipping_address,
            };

            let order = match self.orders.create_order(&mut savepoint, &new_order).await {
                Ok(order) => order,
                Err(error) if is_order_number_conflict(&error) => {
                    warn!(
                        order_number = %order_number,
                        attempt,
                        "order number already taken, allocating another"
                    );

                    savepoint.rollback().await?;

                    continue;
                }
                Err(error) => return Err(error.into()),
            };

            let mut order_lines = Vec::with_capacity(lines.len());

            for (position, (line, amounts)) in (0_u32..).zip(lines) {
                let order_line = OrderLineRecord {
                    uuid: OrderLineUuid::new(),
                    order_uuid: order.uuid,
                    catalog_item_uuid: line.catalog_item_uuid,
                    name: line.name.clone(),
                    image_url: line.image_url.clone(),
                    position,
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    discount_percent: line.discount_percent,
                    line_total: amounts.total,
                };

                self.lines.create_line(&mut savepoint, &order_line).await?;

                order_lines.push(order_line);
            }

            savepoint.commit().await?;

            return Ok(OrderView {
                order,
                lines: order_lines,
            });
        }

        Err(OrdersServiceError::AllocationConflict {
            attempts: MAX_ALLOCATION_ATTEMPTS,
        })
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.checkout",
        skip(self, checkout),
        fields(
            owner_uuid = %owner,
            patient_uuid = tracing::field::Empty,
            line_count = tracing::field::Empty,
            order_number = tracing::field::Empty
        ),
        err
    )]
    async fn checkout(
        &self,
        owner: OwnerUuid,
        checkout: NewCheckout,
    ) -> Result<OrderView, OrdersServiceError> {
        let missing = checkout.shipping_address.missing_fields();

        if !missing.is_empty() {
            return Err(OrdersServiceError::InvalidShippingAddress(missing.join(", ")));
        }

        let mut tx = self.db.begin_transaction().await?;

        let patient = self.patient(&mut tx, owner).await?;

        let cart = self
            .checkout
            .lock_cart(&mut tx, patient.uuid)
            .await?
            .ok_or(OrdersServiceError::EmptyCart)?;

        let lines = self.checkout.get_checkout_lines(&mut tx, cart).await?;

        if lines.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        let span = Span::current();

        span.record("line_count", tracing::field::display(lines.len()));

        let priced = lines
            .into_iter()
            .map(|line| {
                LineAmounts::compute(line.unit_price, line.quantity, line.discount_percent)
                    .map(|amounts| (line, amounts))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let totals = OrderTotals::from_lines(priced.iter().map(|(_, amounts)| amounts))?;

        let view = self
            .write_order(&mut tx, &patient, &checkout, totals, &priced)
            .await?;

        self.checkout.retire_cart(&mut tx, cart).await?;

        tx.commit().await?;

        span.record(
            "order_number",
            tracing::field::display(&view.order.order_number),
        );

        info!(
            order_number = %view.order.order_number,
            patient_uuid = %patient.uuid,
            total_amount = view.order.total_amount,
            "checked out cart"
        );

        Ok(view)
    }

    #[tracing::instrument(
        name = "orders.service.list_orders",
        skip(self),
        fields(owner_uuid = %owner, patient_uuid = tracing::field::Empty),
        err
    )]
    async fn list_orders(&self, owner: OwnerUuid) -> Result<Vec<OrderView>, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let patient = self.patient(&mut tx, owner).await?;

        let orders = self.orders.list_orders(&mut tx, patient.uuid).await?;

        let uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();

        let lines = self.lines.get_lines(&mut tx, &uuids).await?;

        tx.commit().await?;

        let mut lines_by_order: HashMap<OrderUuid, Vec<OrderLineRecord>> = HashMap::new();

        for line in lines {
            lines_by_order.entry(line.order_uuid).or_default().push(line);
        }

        Ok(orders
            .into_iter()
            .map(|order| OrderView {
                lines: lines_by_order.remove(&order.uuid).unwrap_or_default(),
                order,
            })
            .collect())
    }

    #[tracing::instrument(
        name = "orders.service.get_order",
        skip(self),
        fields(
            owner_uuid = %owner,
            order_uuid = %order,
            patient_uuid = tracing::field::Empty
        ),
        err
    )]
    async fn get_order(
        &self,
        owner: OwnerUuid,
        order: OrderUuid,
    ) -> Result<OrderView, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let patient = self.patient(&mut tx, owner).await?;

        let record: OrderRecord = self
            .orders
            .get_order(&mut tx, order)
            .await?
            .ok_or(OrdersServiceError::NotFound)?;

        if record.patient_uuid != patient.uuid {
            return Err(OrdersServiceError::Forbidden);
        }

        let lines = self.lines.get_lines(&mut tx, &[record.uuid]).await?;

        tx.commit().await?;

        Ok(OrderView {
            order: record,
            lines,
        })
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Convert the owner's cart into an order.
    ///
    /// Lines are frozen at the price captured in the cart. The order, its lines and
    /// the removal of the cart are committed together or not at all.
    async fn checkout(
        &self,
        owner: OwnerUuid,
        checkout: NewCheckout,
    ) -> Result<OrderView, OrdersServiceError>;

    /// The owner's orders, most recent first.
    async fn list_orders(&self, owner: OwnerUuid) -> Result<Vec<OrderView>, OrdersServiceError>;

    /// A single order, only if it belongs to the owner.
    async fn get_order(
        &self,
        owner: OwnerUuid,
        order: OrderUuid,
    ) -> Result<OrderView, OrdersServiceError>;
}
