//! Orders
//!
//! Checkout turns a patient's cart into an order, all in one transaction: the cart is
//! locked and read, priced from its captured values, an order number is allocated, the
//! order and its lines are written and the cart is deleted.

pub mod data;
pub mod errors;
pub mod models;
pub mod numbers;
pub mod records;
mod repositories;
pub mod service;

pub use errors::OrdersServiceError;
pub use service::*;
