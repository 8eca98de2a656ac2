//! Catalog
//!
//! Catalog items with their inventory lots, and the pricing snapshot that carts capture.

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::CatalogServiceError;
pub use service::*;
