//! Patients Data

use crate::domain::patients::records::{OwnerUuid, PatientUuid};

/// New Patient Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewPatient {
    pub uuid: PatientUuid,
    pub owner_uuid: OwnerUuid,
    pub full_name: String,
}
