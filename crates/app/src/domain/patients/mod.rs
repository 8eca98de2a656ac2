//! Patients
//!
//! Resolves the authenticated owner to the patient profile that carts and orders belong to.

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::PatientsServiceError;
pub use service::*;
