//! Errors

use salvo::http::StatusError;
use tracing::error;

use apothecary_app::domain::orders::OrdersServiceError;

use crate::observability::CheckoutOutcome;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::ProfileNotFound => {
            StatusError::not_found().brief("Patient profile not found")
        }
        OrdersServiceError::EmptyCart => StatusError::bad_request().brief("Cart is empty"),
        OrdersServiceError::InvalidShippingAddress(fields) => {
            StatusError::bad_request().brief(format!("Shipping address is missing {fields}"))
        }
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::Forbidden => StatusError::forbidden(),
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::AllocationConflict { attempts } => {
            error!(attempts, "could not allocate an order number");

            StatusError::internal_server_error()
        }
        OrdersServiceError::Money(source) => {
            error!("failed to price order: {source}");

            StatusError::internal_server_error()
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}

/// How a failed checkout is counted.
pub(crate) fn checkout_outcome(error: &OrdersServiceError) -> CheckoutOutcome {
    match error {
        OrdersServiceError::EmptyCart => CheckoutOutcome::EmptyCart,
        OrdersServiceError::AllocationConflict { .. }
        | OrdersServiceError::Money(_)
        | OrdersServiceError::Sql(_) => CheckoutOutcome::Failed,
        OrdersServiceError::ProfileNotFound
        | OrdersServiceError::InvalidShippingAddress(_)
        | OrdersServiceError::NotFound
        | OrdersServiceError::Forbidden
        | OrdersServiceError::AlreadyExists
        | OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => CheckoutOutcome::Rejected,
    }
}
