//! Patient Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Marker for identifiers issued by the upstream identity provider.
#[derive(Debug)]
pub struct Owner;

/// Owner UUID
pub type OwnerUuid = TypedUuid<Owner>;

/// Patient UUID
pub type PatientUuid = TypedUuid<PatientRecord>;

/// Patient Record
#[derive(Debug, Clone, PartialEq)]
pub struct PatientRecord {
    pub uuid: PatientUuid,
    pub owner_uuid: OwnerUuid,
    pub full_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
