use clap::{Args, Subcommand};

mod item_create;
mod lot_create;

#[derive(Debug, Args)]
pub(crate) struct CatalogCommand {
    #[command(subcommand)]
    command: CatalogSubcommand,
}

#[derive(Debug, Subcommand)]
enum CatalogSubcommand {
    ItemCreate(item_create::CreateItemArgs),
    LotCreate(lot_create::CreateLotArgs),
}

pub(crate) async fn run(command: CatalogCommand) -> Result<(), String> {
    match command.command {
        CatalogSubcommand::ItemCreate(args) => item_create::run(args).await,
        CatalogSubcommand::LotCreate(args) => lot_create::run(args).await,
    }
}
