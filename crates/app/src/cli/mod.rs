use clap::{Parser, Subcommand};

mod catalog;
mod db;
mod patient;

#[derive(Debug, Parser)]
#[command(name = "apothecary-app", about = "Apothecary CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Patient(patient::PatientCommand),
    Catalog(catalog::CatalogCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Patient(command) => patient::run(command).await,
            Commands::Catalog(command) => catalog::run(command).await,
        }
    }
}
