//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use apothecary_app::domain::patients::records::OwnerUuid;

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Record the caller's identity for downstream handlers.
    fn insert_owner_uuid(&mut self, owner: OwnerUuid);

    /// The caller's identity, or 401 when the identity middleware did not run.
    fn owner_uuid_or_401(&self) -> Result<OwnerUuid, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_owner_uuid(&mut self, owner: OwnerUuid) {
        self.inject(owner);
    }

    fn owner_uuid_or_401(&self) -> Result<OwnerUuid, StatusError> {
        self.obtain::<OwnerUuid>()
            .copied()
            .map_err(|_ignored| StatusError::unauthorized())
    }
}
