//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::money::MoneyError;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("no patient profile for owner")]
    ProfileNotFound,

    #[error("cart is empty")]
    EmptyCart,

    #[error("shipping address is missing {0}")]
    InvalidShippingAddress(String),

    #[error("order not found")]
    NotFound,

    #[error("order belongs to another patient")]
    Forbidden,

    #[error("could not allocate a unique order number after {attempts} attempts")]
    AllocationConflict { attempts: u32 },

    #[error("order already exists")]
    AlreadyExists,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("amount error")]
    Money(#[from] MoneyError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
