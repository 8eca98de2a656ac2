use apothecary_app::{
    database::{self, Db},
    domain::patients::{
        PatientsService, PgPatientsService,
        data::NewPatient,
        records::{OwnerUuid, PatientUuid},
    },
};
use clap::Args;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreatePatientArgs {
    /// Identity of the account that owns the profile (the `X-User-Id` the gateway sends)
    #[arg(long)]
    owner_uuid: Uuid,

    /// Patient full name
    #[arg(long)]
    full_name: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreatePatientArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url, 1)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgPatientsService::new(Db::new(pool));

    let patient = service
        .create_patient(NewPatient {
            uuid: PatientUuid::new(),
            owner_uuid: OwnerUuid::from(args.owner_uuid),
            full_name: args.full_name,
        })
        .await
        .map_err(|error| format!("failed to create patient: {error}"))?;

    println!("patient_uuid: {}", patient.uuid);
    println!("owner_uuid: {}", patient.owner_uuid);
    println!("full_name: {}", patient.full_name);

    Ok(())
}
