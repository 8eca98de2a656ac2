use apothecary_app::{
    database::{self, Db},
    domain::catalog::{
        CatalogService, PgCatalogService, data::NewCatalogItem, records::CatalogItemUuid,
    },
};
use clap::Args;

#[derive(Debug, Args)]
pub(crate) struct CreateItemArgs {
    /// Display name shown on carts and orders
    #[arg(long)]
    name: String,

    /// Optional product image URL
    #[arg(long)]
    image_url: Option<String>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreateItemArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url, 1)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgCatalogService::new(Db::new(pool));

    let item = service
        .create_item(NewCatalogItem {
            uuid: CatalogItemUuid::new(),
            name: args.name,
            image_url: args.image_url,
        })
        .await
        .map_err(|error| format!("failed to create catalog item: {error}"))?;

    println!("item_uuid: {}", item.uuid);
    println!("name: {}", item.name);

    Ok(())
}
