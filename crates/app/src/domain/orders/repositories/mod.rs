//! Order Repositories

mod checkout;
mod lines;
mod numbers;
mod orders;

pub(crate) use checkout::{CheckoutLine, PgCheckoutRepository};
pub(crate) use lines::PgOrderLinesRepository;
pub(crate) use numbers::PgOrderNumbersRepository;
pub(crate) use orders::{NewOrder, PgOrdersRepository, is_order_number_conflict};
