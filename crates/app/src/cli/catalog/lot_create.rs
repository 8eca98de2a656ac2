use apothecary_app::{
    database::{self, Db},
    domain::catalog::{
        CatalogService, PgCatalogService,
        data::NewLot,
        records::{CatalogItemUuid, LotUuid},
    },
    money::DiscountPercent,
};
use clap::Args;
use jiff::civil::Date;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateLotArgs {
    /// Catalog item the lot belongs to
    #[arg(long)]
    item_uuid: Uuid,

    /// Supplier batch number
    #[arg(long)]
    batch_number: String,

    /// Last day the lot may be sold is the day before this date (YYYY-MM-DD)
    #[arg(long)]
    expiry_date: Date,

    /// Units received
    #[arg(long)]
    quantity: u32,

    /// Unit price in minor currency units
    #[arg(long)]
    unit_price: u64,

    /// Discount percent, 0 to 100
    #[arg(long, default_value = "0")]
    discount_percent: DiscountPercent,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreateLotArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url, 1)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgCatalogService::new(Db::new(pool));

    let lot = service
        .create_lot(NewLot {
            uuid: LotUuid::new(),
            catalog_item_uuid: CatalogItemUuid::from(args.item_uuid),
            batch_number: args.batch_number,
            expiry_date: args.expiry_date,
            quantity_available: args.quantity,
            unit_price: args.unit_price,
            discount_percent: args.discount_percent,
        })
        .await
        .map_err(|error| format!("failed to create lot: {error}"))?;

    println!("lot_uuid: {}", lot.uuid);
    println!("expiry_date: {}", lot.expiry_date);
    println!("quantity_available: {}", lot.quantity_available);
    println!("unit_price: {}", lot.unit_price);
    println!("discount_percent: {}", lot.discount_percent);

    Ok(())
}
