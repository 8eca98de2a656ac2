//! Patients service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::patients::{
        data::NewPatient,
        errors::PatientsServiceError,
        records::{OwnerUuid, PatientRecord},
        repository::PgPatientsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgPatientsService {
    db: Db,
    repository: PgPatientsRepository,
}

impl PgPatientsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgPatientsRepository::new(),
        }
    }
}

#[async_trait]
impl PatientsService for PgPatientsService {
    #[tracing::instrument(
        name = "patients.service.find_patient",
        skip(self),
        fields(owner_uuid = %owner),
        err
    )]
    async fn find_patient(&self, owner: OwnerUuid) -> Result<PatientRecord, PatientsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let patient = self
            .repository
            .find_by_owner(&mut tx, owner)
            .await?
            .ok_or(PatientsServiceError::NotFound)?;

        tx.commit().await?;

        Ok(patient)
    }

    #[tracing::instrument(
        name = "patients.service.create_patient",
        skip(self, patient),
        fields(owner_uuid = %patient.owner_uuid, patient_uuid = %patient.uuid),
        err
    )]
    async fn create_patient(
        &self,
        patient: NewPatient,
    ) -> Result<PatientRecord, PatientsServiceError> {
        if patient.full_name.trim().is_empty() {
            return Err(PatientsServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_patient(&mut tx, &patient).await?;

        tx.commit().await?;

        info!(patient_uuid = %created.uuid, "created patient");

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait PatientsService: Send + Sync {
    /// Look up the patient profile belonging to an owner.
    async fn find_patient(&self, owner: OwnerUuid) -> Result<PatientRecord, PatientsServiceError>;

    /// Register a patient profile for an owner.
    async fn create_patient(
        &self,
        patient: NewPatient,
    ) -> Result<PatientRecord, PatientsServiceError>;
}
