//! Patients Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::patients::{
    data::NewPatient,
    records::{OwnerUuid, PatientRecord, PatientUuid},
};

const FIND_PATIENT_BY_OWNER_SQL: &str = include_str!("sql/find_patient_by_owner.sql");
const CREATE_PATIENT_SQL: &str = include_str!("sql/create_patient.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPatientsRepository;

impl PgPatientsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_by_owner(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: OwnerUuid,
    ) -> Result<Option<PatientRecord>, sqlx::Error> {
        query_as::<Postgres, PatientRecord>(FIND_PATIENT_BY_OWNER_SQL)
            .bind(owner.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_patient(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        patient: &NewPatient,
    ) -> Result<PatientRecord, sqlx::Error> {
        query_as::<Postgres, PatientRecord>(CREATE_PATIENT_SQL)
            .bind(patient.uuid.into_uuid())
            .bind(patient.owner_uuid.into_uuid())
            .bind(&patient.full_name)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for PatientRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: PatientUuid::from_uuid(row.try_get("uuid")?),
            owner_uuid: OwnerUuid::from_uuid(row.try_get("owner_uuid")?),
            full_name: row.try_get("full_name")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
