//! Order Models

use crate::domain::orders::records::{OrderLineRecord, OrderRecord};

/// An order with its lines in checkout order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderView {
    pub order: OrderRecord,
    pub lines: Vec<OrderLineRecord>,
}
